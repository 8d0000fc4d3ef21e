// src/series.rs
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};

use crate::config::consts::{LEGACY_HEADER, LOCAL_TS_FMT, SERIES_HEADER, SERIES_SEP, SERIES_SUFFIX};
use crate::csv::parse_records;
use crate::error::SeriesError;
use crate::file::{append_rows, create_with_header};

/// One follower-count sample.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Observation {
    pub at: DateTime<Utc>,
    /// Local wall-clock column; absent in legacy two-column files
    pub local: Option<String>,
    pub fans: u64,
}

/// Column layout, detected from the header row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `ts,fans`
    Legacy,
    /// `ts_utc,ts_cn,fans`
    Current,
}

impl Layout {
    pub fn from_columns(n: usize) -> Result<Self, SeriesError> {
        match n {
            2 => Ok(Layout::Legacy),
            3 => Ok(Layout::Current),
            n => Err(SeriesError::UnknownLayout(n)),
        }
    }

    pub fn columns(&self) -> usize {
        self.header().len()
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Layout::Legacy => LEGACY_HEADER,
            Layout::Current => SERIES_HEADER,
        }
    }
}

/// Append-only per-account CSV logs in one directory.
pub struct SeriesStore {
    dir: PathBuf,
    offset: FixedOffset,
}

impl SeriesStore {
    pub fn new(dir: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self { dir: dir.into(), offset }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, uid: u64) -> PathBuf {
        self.dir.join(join!(uid, SERIES_SUFFIX))
    }

    /// Create the log with its header if missing. `true` if created now.
    pub fn ensure(&self, uid: u64) -> io::Result<bool> {
        create_with_header(&self.path(uid), SERIES_HEADER, SERIES_SEP)
    }

    /// Append one `ts_utc,ts_cn,fans` row. Existing rows are never touched.
    pub fn append(&self, uid: u64, at: DateTime<Utc>, fans: u64) -> Result<(), SeriesError> {
        self.ensure(uid)?;
        let row = vec![
            at.to_rfc3339_opts(SecondsFormat::Secs, false),
            at.with_timezone(&self.offset).format(LOCAL_TS_FMT).to_string(),
            fans.to_string(),
        ];
        append_rows(&self.path(uid), &[row], SERIES_SEP)?;
        Ok(())
    }

    /// All rows, sorted by time with exact duplicates dropped.
    pub fn read(&self, uid: u64) -> Result<Vec<Observation>, SeriesError> {
        let text = fs::read_to_string(self.path(uid))?;
        let (_, rows) = parse_series(&text)?;
        Ok(rows)
    }
}

/// Parse a whole series file (header first). An empty text is an empty series.
pub fn parse_series(text: &str) -> Result<(Layout, Vec<Observation>), SeriesError> {
    let mut records = parse_records(text, SERIES_SEP).into_iter();
    let Some(header) = records.next() else {
        return Ok((Layout::Current, Vec::new()));
    };
    let layout = Layout::from_columns(header.fields.len())?;

    let mut rows = Vec::new();
    for rec in records {
        if rec.fields.len() != layout.columns() {
            return Err(SeriesError::Malformed {
                line: rec.line,
                reason: format!("expected {} fields, found {}", layout.columns(), rec.fields.len()),
            });
        }
        let malformed = |reason: String| SeriesError::Malformed { line: rec.line, reason };

        let stamp = rec.fields[0].trim();
        let at = parse_stamp(stamp).ok_or_else(|| malformed(format!("bad timestamp '{stamp}'")))?;
        let count = rec.fields[layout.columns() - 1].trim();
        let fans = count.parse().map_err(|_| malformed(format!("bad count '{count}'")))?;
        let local = match layout {
            Layout::Current => Some(rec.fields[1].trim().to_string()),
            Layout::Legacy => None,
        };
        rows.push(Observation { at, local, fans });
    }

    rows.sort_by_key(|o| o.at);
    let mut seen = HashSet::with_capacity(rows.len());
    rows.retain(|o| seen.insert(o.clone()));
    Ok((layout, rows))
}

/// RFC 3339 with any offset, or a naive ISO date-time taken as UTC.
pub fn parse_stamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn detects_layouts() {
        let (l, rows) = parse_series("ts,fans\n2024-01-01T00:00:00+00:00,5\n").unwrap();
        assert_eq!(l, Layout::Legacy);
        assert_eq!(rows[0].local, None);

        let text = "ts_utc,ts_cn,fans\n2024-01-01T00:00:00+00:00,2024/01/01 08:00:00,5\n";
        let (l, rows) = parse_series(text).unwrap();
        assert_eq!(l, Layout::Current);
        assert_eq!(rows[0].local.as_deref(), Some("2024/01/01 08:00:00"));
    }

    #[test]
    fn unknown_column_count_is_an_error() {
        let err = parse_series("a,b,c,d\n1,2,3,4\n").unwrap_err();
        assert!(matches!(err, SeriesError::UnknownLayout(4)));
        assert!(matches!(parse_series("fans\n1\n"), Err(SeriesError::UnknownLayout(1))));
    }

    #[test]
    fn empty_text_is_empty_series() {
        assert!(parse_series("").unwrap().1.is_empty());
    }

    #[test]
    fn sorts_and_drops_exact_duplicates() {
        let text = "ts,fans\n\
                    2024-01-02T00:00:00Z,7\n\
                    2024-01-01T00:00:00Z,5\n\
                    2024-01-02T00:00:00Z,7\n\
                    2024-01-02T00:00:00Z,8\n";
        let (_, rows) = parse_series(text).unwrap();
        let fans: Vec<u64> = rows.iter().map(|o| o.fans).collect();
        assert_eq!(fans, vec![5, 7, 8]);
    }

    #[test]
    fn malformed_row_reports_line() {
        let err = parse_series("ts,fans\n2024-01-01T00:00:00Z,5\nnot-a-date,6\n").unwrap_err();
        assert!(matches!(err, SeriesError::Malformed { line: 3, .. }));
        let err = parse_series("ts,fans\n2024-01-01T00:00:00Z,-4\n").unwrap_err();
        assert!(matches!(err, SeriesError::Malformed { line: 2, .. }));
    }

    #[test]
    fn stamps_with_offsets_and_naive() {
        let want = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_stamp("2024-01-01T08:00:00.123456+08:00").map(|d| d.timestamp()), Some(want.timestamp()));
        assert_eq!(parse_stamp("2024-01-01 00:00:00"), Some(want));
        assert_eq!(parse_stamp("2024-01-01T00:00:00"), Some(want));
        assert_eq!(parse_stamp("yesterday"), None);
    }
}
