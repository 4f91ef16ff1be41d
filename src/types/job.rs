// src/types/job.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pay period attached to salary amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SalaryInterval {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Other(String),
}

impl SalaryInterval {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for SalaryInterval {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Other(value),
        }
    }
}

impl From<SalaryInterval> for String {
    fn from(interval: SalaryInterval) -> Self {
        interval.as_str().to_string()
    }
}

impl fmt::Display for SalaryInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "string_or_null")]
    pub id: String,
    pub site: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub company: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub location: String,
    #[serde(default)]
    pub job_type: Option<String>,
    /// ISO date as sent by the search service; parsed only when sorting.
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub interval: Option<SalaryInterval>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_remote: Option<bool>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub job_url: String,
    #[serde(default)]
    pub job_url_direct: Option<String>,
}

impl JobRecord {
    pub fn new(site: &str, title: &str, company: &str, location: &str, job_url: &str) -> Self {
        Self {
            id: String::new(),
            site: site.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            job_type: None,
            date_posted: None,
            min_amount: None,
            max_amount: None,
            interval: None,
            currency: None,
            is_remote: None,
            description: String::new(),
            job_url: job_url.to_string(),
            job_url_direct: None,
        }
    }

    pub fn with_salary(
        mut self,
        min: Option<f64>,
        max: Option<f64>,
        interval: Option<SalaryInterval>,
    ) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self.interval = interval;
        self
    }

    pub fn with_job_type(mut self, job_type: &str) -> Self {
        self.job_type = Some(job_type.to_string());
        self
    }

    pub fn with_date_posted(mut self, date: &str) -> Self {
        self.date_posted = Some(date.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Job type if the search service filled it in.
    pub fn job_type_label(&self) -> Option<&str> {
        self.job_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn date_posted_label(&self) -> Option<&str> {
        self.date_posted
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Records produced by a single search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub search_id: Uuid,
    pub records: Vec<JobRecord>,
}

impl ResultSet {
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self::with_id(Uuid::new_v4(), records)
    }

    pub fn with_id(search_id: Uuid, records: Vec<JobRecord>) -> Self {
        Self { search_id, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobRecord> {
        self.records.iter()
    }

    /// Distinct sites in order of first appearance.
    pub fn sites_present(&self) -> Vec<String> {
        let mut sites: Vec<String> = Vec::new();
        for record in &self.records {
            if !sites.contains(&record.site) {
                sites.push(record.site.clone());
            }
        }
        sites
    }

    /// Distinct non-empty job types in order of first appearance.
    pub fn job_types_present(&self) -> Vec<String> {
        let mut job_types: Vec<String> = Vec::new();
        for job_type in self.records.iter().filter_map(JobRecord::job_type_label) {
            if !job_types.iter().any(|t| t == job_type) {
                job_types.push(job_type.to_string());
            }
        }
        job_types
    }
}
