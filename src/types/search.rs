// src/types/search.rs
//! Search parameter types and the wire shape of the external search call

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Job boards the search service knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Indeed,
    #[serde(rename = "linkedin")]
    LinkedIn,
    ZipRecruiter,
    Glassdoor,
    Google,
    Bayt,
}

impl Site {
    pub const ALL: [Site; 6] = [
        Site::Indeed,
        Site::LinkedIn,
        Site::ZipRecruiter,
        Site::Glassdoor,
        Site::Google,
        Site::Bayt,
    ];

    /// Identifier used on the wire and in result rows.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Indeed => "indeed",
            Self::LinkedIn => "linkedin",
            Self::ZipRecruiter => "zip_recruiter",
            Self::Glassdoor => "glassdoor",
            Self::Google => "google",
            Self::Bayt => "bayt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Indeed => "Indeed",
            Self::LinkedIn => "LinkedIn",
            Self::ZipRecruiter => "ZipRecruiter",
            Self::Glassdoor => "Glassdoor",
            Self::Google => "Google",
            Self::Bayt => "Bayt",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Site {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indeed" => Ok(Self::Indeed),
            "linkedin" => Ok(Self::LinkedIn),
            "zip_recruiter" | "ziprecruiter" => Ok(Self::ZipRecruiter),
            "glassdoor" => Ok(Self::Glassdoor),
            "google" => Ok(Self::Google),
            "bayt" => Ok(Self::Bayt),
            _ => Err(ConfigurationError::UnknownSite(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Temporary,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::FullTime => "fulltime",
            Self::PartTime => "parttime",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Temporary => "temporary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Temporary => "Temporary",
        }
    }

    /// Parse a job type selection. The "any" sentinel (or nothing) means no filter.
    pub fn parse_selection(value: &str) -> Result<Option<Self>, ConfigurationError> {
        match Self::spelling_key(value).as_str() {
            "" | "any" => Ok(None),
            "fulltime" => Ok(Some(Self::FullTime)),
            "parttime" => Ok(Some(Self::PartTime)),
            "contract" => Ok(Some(Self::Contract)),
            "internship" => Ok(Some(Self::Internship)),
            "temporary" => Ok(Some(Self::Temporary)),
            _ => Err(ConfigurationError::UnknownJobType(value.to_string())),
        }
    }

    /// Lower-cased with separators dropped, so "Full-time", "full time" and
    /// "fulltime" compare equal.
    pub fn spelling_key(value: &str) -> String {
        value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect()
    }
}

/// Country used by the Indeed and Glassdoor scrapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Country {
    #[default]
    Usa,
    Uk,
    Canada,
    Australia,
    India,
    Germany,
    France,
}

impl Country {
    pub const ALL: [Country; 7] = [
        Country::Usa,
        Country::Uk,
        Country::Canada,
        Country::Australia,
        Country::India,
        Country::Germany,
        Country::France,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Uk => "UK",
            Self::Canada => "Canada",
            Self::Australia => "Australia",
            Self::India => "India",
            Self::Germany => "Germany",
            Self::France => "France",
        }
    }
}

impl FromStr for Country {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usa" | "us" | "united states" => Ok(Self::Usa),
            "uk" | "united kingdom" => Ok(Self::Uk),
            "canada" => Ok(Self::Canada),
            "australia" => Ok(Self::Australia),
            "india" => Ok(Self::India),
            "germany" => Ok(Self::Germany),
            "france" => Ok(Self::France),
            _ => Err(ConfigurationError::UnknownCountry(s.to_string())),
        }
    }
}

/// Logging level forwarded to the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Errors,
    #[default]
    Warnings,
    All,
}

impl Verbosity {
    pub fn level(&self) -> u8 {
        match self {
            Self::Errors => 0,
            Self::Warnings => 1,
            Self::All => 2,
        }
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        match level {
            0 => Self::Errors,
            1 => Self::Warnings,
            _ => Self::All,
        }
    }
}

/// A validated search. Only the collector builds these, so the site list is
/// never empty. Sites keep the order they were picked in, without repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    keyword: String,
    location: String,
    sites: Vec<Site>,
    results_wanted: u32,
    hours_old: u32,
    remote_only: bool,
    job_type: Option<JobType>,
    country: Country,
    verbosity: Verbosity,
    timeout: Option<Duration>,
}

impl SearchRequest {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        keyword: String,
        location: String,
        sites: Vec<Site>,
        results_wanted: u32,
        hours_old: u32,
        remote_only: bool,
        job_type: Option<JobType>,
        country: Country,
        verbosity: Verbosity,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            keyword,
            location,
            sites,
            results_wanted,
            hours_old,
            remote_only,
            job_type,
            country,
            verbosity,
            timeout,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn results_wanted(&self) -> u32 {
        self.results_wanted
    }

    pub fn hours_old(&self) -> u32 {
        self.hours_old
    }

    pub fn remote_only(&self) -> bool {
        self.remote_only
    }

    pub fn job_type(&self) -> Option<JobType> {
        self.job_type
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Map to the parameter shape of the external search call.
    pub fn to_scrape_params(&self) -> ScrapeParams {
        ScrapeParams {
            site_name: self.sites.iter().map(|s| s.id().to_string()).collect(),
            search_term: self.keyword.clone(),
            location: self.location.clone(),
            results_wanted: self.results_wanted,
            hours_old: self.hours_old,
            is_remote: self.remote_only,
            job_type: self.job_type.map(|t| t.id().to_string()),
            country_indeed: self.country.name().to_string(),
            verbose: self.verbosity.level(),
            description_format: "markdown".to_string(),
        }
    }
}

/// JSON body of the external search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeParams {
    pub site_name: Vec<String>,
    pub search_term: String,
    pub location: String,
    pub results_wanted: u32,
    pub hours_old: u32,
    pub is_remote: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    pub country_indeed: String,
    pub verbose: u8,
    pub description_format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_parsing() {
        assert_eq!("Indeed".parse::<Site>().unwrap(), Site::Indeed);
        assert_eq!("ziprecruiter".parse::<Site>().unwrap(), Site::ZipRecruiter);
        assert_eq!("zip_recruiter".parse::<Site>().unwrap(), Site::ZipRecruiter);
        assert_eq!(
            "monster".parse::<Site>(),
            Err(ConfigurationError::UnknownSite("monster".to_string()))
        );
    }

    #[test]
    fn test_job_type_selection() {
        assert_eq!(JobType::parse_selection("Any").unwrap(), None);
        assert_eq!(JobType::parse_selection("").unwrap(), None);
        assert_eq!(
            JobType::parse_selection("Full-time").unwrap(),
            Some(JobType::FullTime)
        );
        assert_eq!(
            JobType::parse_selection("part time").unwrap(),
            Some(JobType::PartTime)
        );
        assert!(JobType::parse_selection("gig").is_err());
        assert_eq!(JobType::spelling_key("Full-time"), JobType::spelling_key("fulltime"));
    }

    #[test]
    fn test_country_and_verbosity() {
        assert_eq!("uk".parse::<Country>().unwrap(), Country::Uk);
        assert_eq!(Country::default().name(), "USA");
        assert_eq!(Verbosity::from(2).level(), 2);
        assert_eq!(Verbosity::from(9), Verbosity::All);
    }

    #[test]
    fn test_scrape_params_omit_absent_job_type() {
        let params = ScrapeParams {
            site_name: vec!["indeed".to_string()],
            search_term: "rust".to_string(),
            location: "Berlin".to_string(),
            results_wanted: 5,
            hours_old: 24,
            is_remote: false,
            job_type: None,
            country_indeed: "Germany".to_string(),
            verbose: 1,
            description_format: "markdown".to_string(),
        };

        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("job_type").is_none());
        assert_eq!(json["site_name"][0], "indeed");
    }
}
