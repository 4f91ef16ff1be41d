// src/presenter/mod.rs
//! Filtering, sorting, rendering and export of one result set.
//!
//! Every view is a pure function of the result set and the selection, so the
//! same selection always yields the same records in the same order, and the
//! export is built from exactly those records.

pub mod export;
pub mod render;
pub mod salary;

pub use export::{read_csv, to_csv, write_csv_file, DEFAULT_EXPORT_FILE_NAME};
pub use render::{render_record, RenderedJob};
pub use salary::salary_range;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{ConfigurationError, ExportError};
use crate::types::{JobRecord, JobType, ResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Unordered,
    DatePostedDesc,
    MaxSalaryDesc,
    MinSalaryAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Unordered,
        SortOrder::DatePostedDesc,
        SortOrder::MaxSalaryDesc,
        SortOrder::MinSalaryAsc,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Unordered => "unordered",
            Self::DatePostedDesc => "date_posted_desc",
            Self::MaxSalaryDesc => "max_salary_desc",
            Self::MinSalaryAsc => "min_salary_asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unordered => "Default order",
            Self::DatePostedDesc => "Date posted (newest first)",
            Self::MaxSalaryDesc => "Salary (highest first)",
            Self::MinSalaryAsc => "Salary (lowest first)",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortOrder {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "" | "none" | "unordered" | "default" => Ok(Self::Unordered),
            "date" | "date_posted" | "date_posted_desc" | "newest" => Ok(Self::DatePostedDesc),
            "max_salary" | "max_salary_desc" | "salary_high" => Ok(Self::MaxSalaryDesc),
            "min_salary" | "min_salary_asc" | "salary_low" => Ok(Self::MinSalaryAsc),
            _ => Err(ConfigurationError::UnknownSortOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PresenterOptions {
    /// Enables the job-type filter and the sort selector.
    pub extended_controls: bool,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            extended_controls: true,
        }
    }
}

/// What the user picked in the result controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSelection {
    /// `None` keeps every site present in the results.
    pub sites: Option<Vec<String>>,
    /// Empty keeps every job type.
    pub job_types: Vec<String>,
    pub sort: SortOrder,
}

#[derive(Debug)]
pub struct View<'a> {
    pub total: usize,
    pub records: Vec<&'a JobRecord>,
    pub warnings: Vec<String>,
}

impl View<'_> {
    pub fn render(&self) -> Vec<RenderedJob> {
        self.records.iter().map(|r| render_record(r)).collect()
    }

    pub fn to_csv(&self) -> Result<String, ExportError> {
        to_csv(self.records.iter().copied())
    }

    pub fn summary(&self) -> String {
        format!("Found {} jobs, displaying {}", self.total, self.records.len())
    }
}

pub struct Presenter {
    options: PresenterOptions,
}

impl Presenter {
    pub fn new(options: PresenterOptions) -> Self {
        Self { options }
    }

    pub fn view<'a>(&self, results: &'a ResultSet, selection: &ViewSelection) -> View<'a> {
        let mut warnings = Vec::new();
        let mut records = filter_by_site(results.iter(), selection.sites.as_deref());

        if self.options.extended_controls {
            records = filter_by_job_type(records, &selection.job_types);
            if let Err(warning) = sort_records(&mut records, selection.sort) {
                warn!("{}", warning);
                warnings.push(warning);
            }
        } else if !selection.job_types.is_empty() || selection.sort != SortOrder::Unordered {
            let warning =
                "Job type filter and sorting are disabled in this view; ignoring them".to_string();
            warn!("{}", warning);
            warnings.push(warning);
        }

        View {
            total: results.len(),
            records,
            warnings,
        }
    }
}

/// Keep records whose site is selected. `None` means every site.
pub fn filter_by_site<'a>(
    records: impl Iterator<Item = &'a JobRecord>,
    sites: Option<&[String]>,
) -> Vec<&'a JobRecord> {
    match sites {
        None => records.collect(),
        Some(sites) => records
            .filter(|r| sites.iter().any(|s| s.eq_ignore_ascii_case(&r.site)))
            .collect(),
    }
}

/// Keep records whose job type is selected. An empty selection keeps all.
/// Spelling differences ("Full-time" vs "fulltime") are ignored.
pub fn filter_by_job_type<'a>(records: Vec<&'a JobRecord>, job_types: &[String]) -> Vec<&'a JobRecord> {
    if job_types.is_empty() {
        return records;
    }

    let wanted: Vec<String> = job_types.iter().map(|t| JobType::spelling_key(t)).collect();
    records
        .into_iter()
        .filter(|r| {
            r.job_type_label()
                .is_some_and(|t| wanted.contains(&JobType::spelling_key(t)))
        })
        .collect()
}

/// Stable sort, records lacking the key go last. Returns a warning and
/// leaves the order alone when posting dates are present but none parse.
pub fn sort_records(records: &mut [&JobRecord], order: SortOrder) -> Result<(), String> {
    match order {
        SortOrder::Unordered => {}
        SortOrder::DatePostedDesc => {
            let has_dates = records.iter().any(|r| r.date_posted_label().is_some());
            let usable = records.iter().any(|r| posted_on(r).is_some());
            if has_dates && !usable {
                return Err(
                    "Posting dates could not be read; results are shown unsorted".to_string(),
                );
            }
            records.sort_by(|a, b| missing_last(posted_on(a), posted_on(b), |x, y| y.cmp(x)));
        }
        SortOrder::MaxSalaryDesc => {
            records.sort_by(|a, b| {
                missing_last(amount(a.max_amount), amount(b.max_amount), |x, y| {
                    y.total_cmp(x)
                })
            });
        }
        SortOrder::MinSalaryAsc => {
            records.sort_by(|a, b| {
                missing_last(amount(a.min_amount), amount(b.min_amount), |x, y| {
                    x.total_cmp(y)
                })
            });
        }
    }
    Ok(())
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn posted_on(record: &JobRecord) -> Option<NaiveDate> {
    let raw = record.date_posted_label()?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
}
