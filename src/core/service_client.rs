// src/core/service_client.rs
//! HTTP client for a JobSpy-compatible search service

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::backend::JobSearchBackend;
use crate::types::{JobRecord, ScrapeParams};

const SEARCH_JOBS_ENDPOINT: &str = "/api/v1/search_jobs";
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct SearchJobsResponse {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    jobs: Vec<JobRecord>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(alias = "detail", alias = "message")]
    error: String,
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ServiceClient {
    /// `connect_timeout_seconds` bounds the connection only. The search itself
    /// runs as long as the service takes unless the request carries a timeout.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        connect_timeout_seconds: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_JOBS_ENDPOINT)
    }

    pub async fn search_jobs(
        &self,
        params: &ScrapeParams,
        timeout: Option<Duration>,
    ) -> Result<Vec<JobRecord>> {
        let url = self.search_url();
        info!("Calling job search service: {}", url);

        let mut request = self.client.post(&url).json(params);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach job search service at {}", url))?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        parse_search_response(status, &body)
    }
}

#[rocket::async_trait]
impl JobSearchBackend for ServiceClient {
    async fn search(
        &self,
        params: &ScrapeParams,
        timeout: Option<Duration>,
    ) -> Result<Vec<JobRecord>> {
        self.search_jobs(params, timeout).await
    }
}

fn parse_search_response(status: StatusCode, body: &str) -> Result<Vec<JobRecord>> {
    if !status.is_success() {
        let message = match serde_json::from_str::<ServiceErrorBody>(body) {
            Ok(error_body) => error_body.error,
            Err(_) => body.trim().to_string(),
        };
        error!("Job search service error {}: {}", status, message);
        anyhow::bail!("Job search service returned {}: {}", status, message);
    }

    let parsed: SearchJobsResponse = serde_json::from_str(body)
        .context("Failed to parse job search service response")?;

    if let Some(count) = parsed.count {
        if count != parsed.jobs.len() {
            debug!(
                "Service reported {} jobs but sent {}",
                count,
                parsed.jobs.len()
            );
        }
    }

    Ok(parsed.jobs)
}
