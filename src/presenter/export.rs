// src/presenter/export.rs
//! CSV export of the current view, and reading such an export back.
//!
//! Format: header row, every text field quoted (even when it looks like a
//! number), salary amounts and flags bare, backslash as the escape character
//! (quotes are never doubled), no index column.

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::info;

use crate::error::ExportError;
use crate::types::JobRecord;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "lucy_results.csv";

pub const EXPORT_COLUMNS: [&str; 15] = [
    "id",
    "site",
    "title",
    "company",
    "location",
    "job_type",
    "date_posted",
    "min_amount",
    "max_amount",
    "interval",
    "currency",
    "is_remote",
    "description",
    "job_url",
    "job_url_direct",
];

const ESCAPE: u8 = b'\\';

pub fn to_csv<'a, I>(records: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    // Quoting is decided per column in `export_fields`, not by content.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_COLUMNS.map(text))?;
    for record in records {
        writer.write_record(export_fields(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn write_csv_file(path: &Path, csv: &str) -> Result<(), ExportError> {
    std::fs::write(path, csv)?;
    info!("Jobs saved to {}", path.display());
    Ok(())
}

/// Parse text produced by [`to_csv`].
pub fn read_csv(text: &str) -> Result<Vec<JobRecord>, ExportError> {
    let mut reader = ReaderBuilder::new()
        .double_quote(false)
        .escape(Some(ESCAPE))
        .from_reader(text.as_bytes());

    let records = reader
        .deserialize::<JobRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

fn export_fields(record: &JobRecord) -> [String; 15] {
    [
        text(&record.id),
        text(&record.site),
        text(&record.title),
        text(&record.company),
        text(&record.location),
        optional_text(record.job_type.as_deref()),
        optional_text(record.date_posted.as_deref()),
        number(record.min_amount),
        number(record.max_amount),
        optional_text(record.interval.as_ref().map(|i| i.as_str())),
        optional_text(record.currency.as_deref()),
        record.is_remote.map(|r| r.to_string()).unwrap_or_default(),
        text(&record.description),
        text(&record.job_url),
        optional_text(record.job_url_direct.as_deref()),
    ]
}

fn text(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn optional_text(value: Option<&str>) -> String {
    value.map(text).unwrap_or_default()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalaryInterval;

    fn sample() -> Vec<JobRecord> {
        vec![
            JobRecord::new(
                "indeed",
                "Senior \"Rust\" Engineer",
                "Acme, Inc.",
                "San Francisco, CA",
                "https://indeed.com/1",
            )
            .with_job_type("fulltime")
            .with_date_posted("2024-05-01")
            .with_salary(Some(150000.0), Some(190000.0), Some(SalaryInterval::Yearly))
            .with_description("**Stack** \\- Rust, C:\\tools\n\n* \"quoted\" item"),
            JobRecord::new("linkedin", "Analyst", "Beta", "Remote", "https://linkedin.com/2")
                .with_salary(None, Some(42.5), Some(SalaryInterval::Hourly)),
        ]
    }

    #[test]
    fn test_export_round_trip() {
        let records = sample();
        let csv = to_csv(&records).unwrap();
        let parsed = read_csv(&csv).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_quoting_and_escaping() {
        let csv = to_csv(&sample()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "\"id\",\"site\",\"title\",\"company\",\"location\",\"job_type\",\"date_posted\",\
             \"min_amount\",\"max_amount\",\"interval\",\"currency\",\"is_remote\",\
             \"description\",\"job_url\",\"job_url_direct\""
        );
        assert!(csv.contains("\"Senior \\\"Rust\\\" Engineer\""));
        assert!(csv.contains(",150000,190000,"));
        assert!(csv.contains(",,42.5,\"hourly\","));
        assert!(csv.contains("C:\\\\tools"));
        assert!(!csv.contains("\"\"Rust"));
    }

    #[test]
    fn test_numeric_looking_text_stays_quoted() {
        let records = vec![JobRecord::new("indeed", "911", "3M", "10001", "https://indeed.com/3")
            .with_job_type("fulltime")];
        let csv = to_csv(&records).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.starts_with("\"\",\"indeed\",\"911\",\"3M\",\"10001\",\"fulltime\","));
        assert!(row.contains(",,,,,,\"\","));
        assert_eq!(read_csv(&csv).unwrap(), records);
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = to_csv(std::iter::empty()).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(read_csv(&csv).unwrap().is_empty());
    }
}
