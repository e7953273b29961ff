//! CSV report aggregation
//!
//! The aggregator is the single owner of the report stream. Appends take
//! `&mut self`, so whoever owns the aggregator serializes every row; the
//! runner keeps it on one draining task fed by the outcome channel.

use crate::model::{UnitOutcome, UnitStatus};
use crate::output::{candidate_name, file_stamp, MAX_NAME_ATTEMPTS};
use crate::SurveyError;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Column names written as the first row
pub const REPORT_HEADER: [&str; 4] = ["Domain", "IP Address", "Traceroute File", "Timestamp"];

/// Value substituted for a missing address or artifact
const NOT_AVAILABLE: &str = "N/A";

/// Address column value for errored units that never resolved
const ERROR_MARKER: &str = "Error";

/// Builds `network_report_<YYYYMMDD_HHMMSS>.csv`
pub fn report_file_name(at: &DateTime<Local>) -> String {
    format!("network_report_{}.csv", file_stamp(at))
}

/// Formats the four report columns for one outcome
pub fn format_row(outcome: &UnitOutcome, appended_at: &DateTime<Local>) -> [String; 4] {
    let address = outcome.address.map(|a| a.to_string());
    let timestamp = appended_at.format("%Y-%m-%d %H:%M:%S").to_string();

    let (address_col, artifact_col) = match outcome.status {
        UnitStatus::Unresolved => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        UnitStatus::Errored => (
            address.unwrap_or_else(|| ERROR_MARKER.to_string()),
            outcome.error.clone().unwrap_or_default(),
        ),
        _ => (
            address.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            outcome
                .artifact_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    };

    [outcome.domain.clone(), address_col, artifact_col, timestamp]
}

/// Quotes a field when it contains a delimiter, quote or line break
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn encode_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Serializes unit outcomes into a CSV report
pub struct ReportAggregator<W: Write> {
    writer: W,
    path: PathBuf,
    rows: usize,
}

impl ReportAggregator<BufWriter<File>> {
    /// Creates the report file in `dir`, named after `started_at`
    ///
    /// An existing report is never truncated: if the name is taken by a run
    /// started in the same second, a numeric suffix is added. Failing to
    /// create the report is fatal for the run.
    pub fn create(dir: &Path, started_at: &DateTime<Local>) -> Result<Self, SurveyError> {
        let base = report_file_name(started_at);

        let mut attempt = 0;
        loop {
            let path = dir.join(candidate_name(&base, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Self::new(BufWriter::new(file), path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    tracing::debug!(path = %path.display(), "Report name taken");
                    attempt += 1;
                }
                Err(source) => return Err(SurveyError::Report { path, source }),
            }
        }
    }
}

impl<W: Write> ReportAggregator<W> {
    /// Wraps `writer` and writes the header row
    pub fn new(mut writer: W, path: PathBuf) -> Result<Self, SurveyError> {
        writer
            .write_all(encode_record(&REPORT_HEADER).as_bytes())
            .map_err(|source| SurveyError::Report {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    /// Appends one row, stamped with the current local time
    pub fn append(&mut self, outcome: &UnitOutcome) -> Result<(), SurveyError> {
        let row = format_row(outcome, &Local::now());
        let line = encode_record(&row);

        self.writer
            .write_all(line.as_bytes())
            .map_err(|source| SurveyError::Report {
                path: self.path.clone(),
                source,
            })?;
        self.rows += 1;

        tracing::trace!(domain = %outcome.domain, rows = self.rows, "Report row appended");
        Ok(())
    }

    /// Number of data rows appended so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Path the report is written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the report and hands back the underlying writer
    pub fn finish(mut self) -> Result<W, SurveyError> {
        self.writer.flush().map_err(|source| SurveyError::Report {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.writer)
    }
}
