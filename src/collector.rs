// src/collector.rs
//! Parameter collection: raw form state in, validated `SearchRequest` out.

use crate::error::ConfigurationError;
use crate::types::{Country, JobType, SearchRequest, Site, Verbosity};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

// Slider bounds. The surfaces enforce these (clap ranges on the CLI,
// `check_ranges` for presets and the API); `collect` does not.
pub const RESULTS_WANTED_RANGE: RangeInclusive<i64> = 5..=50;
pub const HOURS_OLD_RANGE: RangeInclusive<i64> = 24..=168;
pub const VERBOSITY_RANGE: RangeInclusive<i64> = 0..=2;
pub const TIMEOUT_SECS_RANGE: RangeInclusive<u64> = 10..=600;

/// Where the timeout slider starts when the form leaves it unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Widget state as the user left it. Rebuilt for every search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub keyword: String,
    pub location: String,
    pub sites: Vec<String>,
    pub results_wanted: u32,
    pub hours_old: u32,
    pub remote_only: bool,
    pub job_type: String,
    pub country: String,
    pub verbosity: u8,
    pub timeout_secs: Option<u64>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            keyword: "Software Engineer".to_string(),
            location: "San Francisco, CA".to_string(),
            sites: vec![Site::Indeed.id().to_string()],
            results_wanted: 10,
            hours_old: 72,
            remote_only: false,
            job_type: "Any".to_string(),
            country: Country::Usa.name().to_string(),
            verbosity: 1,
            timeout_secs: None,
        }
    }
}

impl SearchForm {
    /// Turn the form into a request. Fails before any search is attempted
    /// when no job board is selected.
    pub fn collect(&self) -> Result<SearchRequest, ConfigurationError> {
        let mut sites: Vec<Site> = Vec::with_capacity(self.sites.len());
        for raw in &self.sites {
            let site = raw.parse::<Site>()?;
            if !sites.contains(&site) {
                sites.push(site);
            }
        }

        if sites.is_empty() {
            return Err(ConfigurationError::NoSiteSelected);
        }

        let job_type = JobType::parse_selection(&self.job_type)?;
        let country = self.country.parse::<Country>()?;

        Ok(SearchRequest::new(
            self.keyword.clone(),
            self.location.clone(),
            sites,
            self.results_wanted,
            self.hours_old,
            self.remote_only,
            job_type,
            country,
            Verbosity::from(self.verbosity),
            self.timeout_secs.map(Duration::from_secs),
        ))
    }

    /// Reject values a slider could not have produced.
    pub fn check_ranges(&self) -> Result<(), ConfigurationError> {
        within("results_wanted", self.results_wanted.into(), unsigned(RESULTS_WANTED_RANGE))?;
        within("hours_old", self.hours_old.into(), unsigned(HOURS_OLD_RANGE))?;
        within("verbosity", self.verbosity.into(), unsigned(VERBOSITY_RANGE))?;
        if let Some(timeout) = self.timeout_secs {
            within("timeout_secs", timeout, TIMEOUT_SECS_RANGE)?;
        }
        Ok(())
    }
}

fn unsigned(range: RangeInclusive<i64>) -> RangeInclusive<u64> {
    let (start, end) = range.into_inner();
    start.max(0) as u64..=end.max(0) as u64
}

fn within(
    field: &'static str,
    value: u64,
    range: RangeInclusive<u64>,
) -> Result<(), ConfigurationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_site_selection_is_rejected() {
        let form = SearchForm {
            sites: vec![],
            ..SearchForm::default()
        };
        assert_eq!(form.collect(), Err(ConfigurationError::NoSiteSelected));
    }

    #[test]
    fn test_any_job_type_means_no_filter() {
        let request = SearchForm::default().collect().unwrap();
        assert_eq!(request.job_type(), None);
        assert!(request.to_scrape_params().job_type.is_none());
    }

    #[test]
    fn test_collect_maps_every_field() {
        let form = SearchForm {
            keyword: "data engineer".to_string(),
            location: "New York, NY".to_string(),
            sites: vec!["LinkedIn".to_string(), "indeed".to_string(), "indeed".to_string()],
            results_wanted: 3,
            hours_old: 72,
            remote_only: true,
            job_type: "Contract".to_string(),
            country: "usa".to_string(),
            verbosity: 2,
            timeout_secs: Some(120),
        };

        let request = form.collect().unwrap();
        assert_eq!(request.sites().len(), 2);
        assert_eq!(request.timeout(), Some(Duration::from_secs(120)));

        let params = request.to_scrape_params();
        assert_eq!(params.site_name, vec!["linkedin", "indeed"]);
        assert_eq!(params.search_term, "data engineer");
        assert_eq!(params.location, "New York, NY");
        assert_eq!(params.results_wanted, 3);
        assert!(params.is_remote);
        assert_eq!(params.job_type.as_deref(), Some("contract"));
        assert_eq!(params.country_indeed, "USA");
        assert_eq!(params.verbose, 2);
    }

    #[test]
    fn test_free_text_is_not_sanitized() {
        let form = SearchForm {
            keyword: "  <C++> & \"Rust\"  ".to_string(),
            ..SearchForm::default()
        };
        let request = form.collect().unwrap();
        assert_eq!(request.keyword(), "  <C++> & \"Rust\"  ");
    }

    #[test]
    fn test_unknown_site_is_reported() {
        let form = SearchForm {
            sites: vec!["monster".to_string()],
            ..SearchForm::default()
        };
        assert_eq!(
            form.collect(),
            Err(ConfigurationError::UnknownSite("monster".to_string()))
        );
    }

    #[test]
    fn test_defaults_are_within_slider_ranges() {
        assert_eq!(SearchForm::default().check_ranges(), Ok(()));
        let form = SearchForm {
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            ..SearchForm::default()
        };
        assert_eq!(form.check_ranges(), Ok(()));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let form = SearchForm {
            results_wanted: 100_000,
            ..SearchForm::default()
        };
        assert_eq!(
            form.check_ranges(),
            Err(ConfigurationError::OutOfRange {
                field: "results_wanted",
                value: 100_000,
                min: 5,
                max: 50,
            })
        );

        let zero_timeout = SearchForm {
            timeout_secs: Some(0),
            ..SearchForm::default()
        };
        assert!(matches!(
            zero_timeout.check_ranges(),
            Err(ConfigurationError::OutOfRange { field: "timeout_secs", .. })
        ));

        let loud = SearchForm {
            verbosity: 200,
            ..SearchForm::default()
        };
        assert!(loud.check_ranges().is_err());
    }
}
