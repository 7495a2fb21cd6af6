use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{collections::BTreeSet, fs::File, path::Path, str, time::Instant};

use crate::processor::{
    ParseError, ParseSummary, PipelineError, Value,
    column::Dimension,
    record::{EngagementRecord, RawRecord},
    selection::FilterSelection,
};

/// Immutable, ordered collection of engagement records.
///
/// Load it once, wrap it in an `Rc` and hand out [`FilteredView`]s; nothing in
/// the pipeline mutates it.
///
/// # Examples
///
/// ```rust,no_run
/// # use engagement_analytics::Dataset;
/// let (dataset, summary) = Dataset::load_csv("social_media_engagement.csv".as_ref())?;
/// println!("{} rows, {} rejected", dataset.len(), summary.errors.len());
/// # Ok::<(), engagement_analytics::PipelineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<EngagementRecord>,
}

/// Written by Excel and Google Sheets exports.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column positions resolved from the CSV header.
#[derive(Debug)]
struct CsvLayout {
    headers: Vec<String>,
    platform: usize,
    content_type: usize,
    year: Option<usize>,
    date: Option<usize>,
    post_hour: usize,
    campaign_name: Option<usize>,
    engagement: usize,
    engagement_rate: usize,
    ad_spend: usize,
    roi: usize,
}

/// Rows parsed from one newline-aligned slice of the file.
struct ChunkBatch {
    records: Vec<EngagementRecord>,
    errors: Vec<ParseError>,
    lines: usize,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Dataset {
            records: Vec::new(),
        }
    }

    /// Builds a dataset from typed rows, deriving `revenue_generated` for each.
    pub fn from_records<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        Dataset {
            records: rows.into_iter().map(EngagementRecord::from).collect(),
        }
    }

    /// Loads an engagement CSV through a memory map.
    ///
    /// Columns are matched by header name, so their order does not matter and
    /// extra columns are ignored. Rows that fail to parse are skipped and
    /// listed in the returned [`ParseSummary`].
    ///
    /// # Errors
    /// Returns a [`PipelineError`] if:
    /// - the file cannot be opened or mapped
    /// - the header is missing or lacks a required column
    pub fn load_csv(path: &Path) -> Result<(Self, ParseSummary), PipelineError> {
        let started = Instant::now();
        let file = File::open(path)?;
        // SAFETY: the map is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };
        let loaded = Self::parse_csv(&mmap[..])?;

        tracing::info!(
            path = %path.display(),
            rows = loaded.1.rows_processed,
            rejected = loaded.1.errors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded engagement dataset"
        );
        Ok(loaded)
    }

    /// Parses CSV bytes already in memory. See [`Dataset::load_csv`].
    pub fn parse_csv(buf: &[u8]) -> Result<(Self, ParseSummary), PipelineError> {
        if buf.is_empty() {
            return Err(PipelineError::Parse("Missing header line".into()));
        }

        let buf = buf.strip_prefix(UTF8_BOM).unwrap_or(buf);
        let header_end = memchr::memchr(b'\n', buf).unwrap_or(buf.len());
        let headers: Vec<String> = buf[..header_end]
            .split(|&b| b == b',')
            .map(|s| str::from_utf8(clean(s)).map(ToOwned::to_owned))
            .collect::<Result<_, _>>()?;
        let layout = CsvLayout::resolve(headers)?;

        let data = buf.get(header_end + 1..).unwrap_or_default();
        let chunks = Self::find_chunk_boundaries(data, rayon::current_num_threads());

        let batches: Vec<ChunkBatch> = chunks
            .par_iter()
            .map(|(start, end)| Self::parse_chunk(&data[*start..*end], &layout))
            .collect();

        let mut records = Vec::with_capacity(batches.iter().map(|b| b.records.len()).sum());
        let mut errors = Vec::new();
        // header is line 1
        let mut line_offset = 2;

        for batch in batches {
            records.extend(batch.records);
            errors.extend(batch.errors.into_iter().map(|mut e| {
                e.line += line_offset;
                e
            }));
            line_offset += batch.lines;
        }

        for e in &errors {
            tracing::debug!(line = e.line, column = %e.column, value = %e.value, "rejected row");
        }

        let summary = ParseSummary {
            rows_processed: records.len(),
            errors,
        };
        Ok((Dataset { records }, summary))
    }

    fn find_chunk_boundaries(data: &[u8], num_chunks: usize) -> Vec<(usize, usize)> {
        if data.is_empty() {
            return vec![];
        }

        let num_chunks = num_chunks.max(1);
        let chunk_size = data.len() / num_chunks;
        let mut boundaries = Vec::with_capacity(num_chunks);
        let mut start = 0;

        for i in 0..num_chunks - 1 {
            let mut end = ((i + 1) * chunk_size).max(start);

            // Find next newline
            while end < data.len() && data[end] != b'\n' {
                end += 1;
            }

            if end < data.len() {
                end += 1; // Include the newline
            }

            if start < end {
                boundaries.push((start, end));
            }
            start = end;
        }

        // Last chunk gets everything remaining
        if start < data.len() {
            boundaries.push((start, data.len()));
        }

        boundaries
    }

    fn parse_chunk(chunk: &[u8], layout: &CsvLayout) -> ChunkBatch {
        let mut records = Vec::with_capacity(chunk.len() / 64 + 1);
        let mut errors = Vec::new();
        let mut fields: Vec<&[u8]> = Vec::with_capacity(layout.headers.len());
        let mut lines = 0;

        let mut line_ends: Vec<usize> = memchr_iter(b'\n', chunk).collect();
        if chunk.last().is_some_and(|&b| b != b'\n') {
            line_ends.push(chunk.len());
        }

        let mut start = 0;

        for end in line_ends {
            let line = &chunk[start..end];
            let line_idx = lines;
            start = end + 1;
            lines += 1;

            if clean(line).is_empty() {
                continue;
            }

            fields.clear();
            let mut field_start = 0;
            for comma_pos in memchr_iter(b',', line) {
                fields.push(&line[field_start..comma_pos]);
                field_start = comma_pos + 1;
            }
            fields.push(&line[field_start..]);

            if fields.len() != layout.headers.len() {
                errors.push(ParseError {
                    line: line_idx,
                    column: "".to_string(),
                    value: format!(
                        "Expected {} fields, got {}",
                        layout.headers.len(),
                        fields.len()
                    ),
                    error: None,
                });
                continue;
            }

            match layout.parse_row(&fields) {
                Ok(raw) => records.push(EngagementRecord::from(raw)),
                Err(mut e) => {
                    e.line = line_idx;
                    errors.push(e);
                }
            }
        }

        ChunkBatch {
            records,
            errors,
            lines,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EngagementRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&EngagementRecord> {
        self.records.get(idx)
    }

    /// Distinct values of `dimension`, in key order. Records without a value
    /// (no campaign) contribute nothing.
    pub fn distinct(&self, dimension: Dimension) -> BTreeSet<Value> {
        self.records.iter().filter_map(|r| dimension.of(r)).collect()
    }

    /// Rows passing `selection`, in dataset order.
    pub fn filter(&self, selection: &FilterSelection) -> FilteredView<'_> {
        let rows = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| selection.matches(r))
            .map(|(i, _)| i)
            .collect();
        FilteredView {
            dataset: self,
            rows,
        }
    }

    /// View over every record.
    pub fn full_view(&self) -> FilteredView<'_> {
        FilteredView {
            dataset: self,
            rows: (0..self.records.len()).collect(),
        }
    }
}

/// A filtered, order-preserving window onto a [`Dataset`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Indices into the underlying dataset, ascending.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EngagementRecord> + '_ {
        let records = self.dataset.records();
        self.rows.iter().map(move |&i| &records[i])
    }

    pub fn to_records(&self) -> Vec<EngagementRecord> {
        self.iter().cloned().collect()
    }
}

impl CsvLayout {
    fn resolve(headers: Vec<String>) -> Result<Self, PipelineError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
        };

        let year = find("year");
        let date = find("date");
        if year.is_none() && date.is_none() {
            return Err(PipelineError::MissingColumn("year".into()));
        }

        let platform = require("platform")?;
        let content_type = require("content_type")?;
        let post_hour = require("post_hour")?;
        let campaign_name = find("campaign_name");
        let engagement = require("engagement")?;
        let engagement_rate = require("engagement_rate")?;
        let ad_spend = require("ad_spend")?;
        let roi = require("roi")?;

        Ok(CsvLayout {
            headers,
            platform,
            content_type,
            year,
            date,
            post_hour,
            campaign_name,
            engagement,
            engagement_rate,
            ad_spend,
            roi,
        })
    }

    /// `line` on the returned error is filled in by the caller.
    fn parse_row(&self, fields: &[&[u8]]) -> Result<RawRecord, ParseError> {
        let date = match self.date {
            Some(idx) => {
                let raw = self.text(fields, idx)?;
                if raw.is_empty() {
                    None
                } else {
                    match parse_date(&raw) {
                        Ok(d) => Some(d),
                        // the year column makes the date optional
                        Err(e) if self.year.is_some() => {
                            tracing::debug!(value = %raw, error = %e, "ignoring unparsable date");
                            None
                        }
                        Err(e) => return Err(self.error(fields, idx, Some(e))),
                    }
                }
            }
            None => None,
        };

        let year = match (self.year, date) {
            (Some(idx), _) => {
                let v = self.int(fields, idx)?;
                i32::try_from(v).map_err(|e| self.error(fields, idx, Some(e.to_string())))?
            }
            (None, Some(d)) => d.year(),
            (None, None) => {
                let idx = self.date.unwrap_or_default();
                return Err(self.error(fields, idx, Some("no year or date".into())));
            }
        };

        let hour = self.int(fields, self.post_hour)?;
        let post_hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| {
                self.error(fields, self.post_hour, Some("hour must be within 0-23".into()))
            })?;

        let campaign_name = match self.campaign_name {
            Some(idx) => Some(self.text(fields, idx)?).filter(|s| !s.is_empty()),
            None => None,
        };

        Ok(RawRecord {
            platform: self.text(fields, self.platform)?,
            content_type: self.text(fields, self.content_type)?,
            year,
            post_hour,
            campaign_name,
            engagement: self.float(fields, self.engagement)?,
            engagement_rate: self.float(fields, self.engagement_rate)?,
            ad_spend: self.float(fields, self.ad_spend)?,
            roi: self.float(fields, self.roi)?,
            date,
        })
    }

    fn text(&self, fields: &[&[u8]], idx: usize) -> Result<String, ParseError> {
        str::from_utf8(clean(fields[idx]))
            .map(ToOwned::to_owned)
            .map_err(|e| self.error(fields, idx, Some(e.to_string())))
    }

    fn int(&self, fields: &[&[u8]], idx: usize) -> Result<i64, ParseError> {
        atoi_simd::parse::<i64>(clean(fields[idx]))
            .map_err(|e| self.error(fields, idx, Some(e.to_string())))
    }

    fn float(&self, fields: &[&[u8]], idx: usize) -> Result<f64, ParseError> {
        fast_float::parse::<f64, _>(clean(fields[idx]))
            .map_err(|e| self.error(fields, idx, Some(e.to_string())))
    }

    fn error(&self, fields: &[&[u8]], idx: usize, error: Option<String>) -> ParseError {
        ParseError {
            line: 0,
            column: self.headers[idx].clone(),
            value: String::from_utf8_lossy(fields[idx]).trim().to_string(),
            error,
        }
    }
}

/// Trims ASCII whitespace (including `\r`) and one pair of surrounding quotes.
fn clean(field: &[u8]) -> &[u8] {
    let field = field.trim_ascii();
    match field {
        [b'"', inner @ .., b'"'] => inner,
        _ => field,
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Calendar date of an ISO date, naive timestamp or RFC 3339 timestamp.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| format!("unrecognised date format: {s}"))
}
