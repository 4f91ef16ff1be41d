// src/core/backend.rs
//! The single external collaborator: something that turns scrape parameters
//! into job rows. Scraping, per-site parsing and fan-out across job boards all
//! happen behind this trait.

use crate::types::{JobRecord, ScrapeParams};
use anyhow::Result;
use std::time::Duration;

#[rocket::async_trait]
pub trait JobSearchBackend: Send + Sync {
    /// Run one search. `timeout` is a hint the backend may honor; callers do
    /// not enforce it.
    async fn search(&self, params: &ScrapeParams, timeout: Option<Duration>)
        -> Result<Vec<JobRecord>>;
}
