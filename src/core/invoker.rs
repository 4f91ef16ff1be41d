// src/core/invoker.rs
//! One search per user action: collect, call the backend once, keep the result.

use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::backend::JobSearchBackend;
use crate::collector::SearchForm;
use crate::error::{SearchError, SessionError};
use crate::progress::with_indicator;
use crate::types::{ResultSet, SearchRequest};

pub struct SearchInvoker {
    backend: Arc<dyn JobSearchBackend>,
    show_progress: bool,
}

impl SearchInvoker {
    pub fn new(backend: Arc<dyn JobSearchBackend>) -> Self {
        Self {
            backend,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Call the backend exactly once. No retry, no client-side timeout.
    pub async fn invoke(&self, request: &SearchRequest) -> Result<ResultSet, SearchError> {
        let search_id = Uuid::new_v4();
        let params = request.to_scrape_params();
        let span = info_span!(
            "search",
            %search_id,
            sites = ?params.site_name,
            keyword = %params.search_term
        );

        async {
            match serde_json::to_string(&params) {
                Ok(json) => info!("Search parameters: {}", json),
                Err(e) => error!("Failed to serialize search parameters: {}", e),
            }

            let outcome = with_indicator(
                "Searching for jobs... This may take a minute.",
                self.show_progress,
                self.backend.search(&params, request.timeout()),
            )
            .await;

            match outcome {
                Ok(records) => {
                    info!("Found {} jobs", records.len());
                    Ok(ResultSet::with_id(search_id, records))
                }
                Err(e) => {
                    error!("Search failed: {:#}", e);
                    Err(SearchError::from_backend(&e))
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Holds the latest successful result between searches.
pub struct Session {
    invoker: SearchInvoker,
    last: Option<ResultSet>,
}

impl Session {
    pub fn new(invoker: SearchInvoker) -> Self {
        Self {
            invoker,
            last: None,
        }
    }

    pub fn last_results(&self) -> Option<&ResultSet> {
        self.last.as_ref()
    }

    /// Build a request from the form and run it. A failed search leaves the
    /// previous result in place.
    pub async fn search(&mut self, form: &SearchForm) -> Result<&ResultSet, SessionError> {
        let request = form.collect()?;
        let results = self.invoker.invoke(&request).await?;
        Ok(self.last.insert(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::presenter::{Presenter, PresenterOptions, ViewSelection};
    use crate::types::{JobRecord, ScrapeParams};
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubBackend {
        calls: AtomicUsize,
        seen: Mutex<Vec<ScrapeParams>>,
        fail: bool,
    }

    impl StubBackend {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::succeeding()
            }
        }
    }

    #[rocket::async_trait]
    impl JobSearchBackend for StubBackend {
        async fn search(
            &self,
            params: &ScrapeParams,
            _timeout: Option<Duration>,
        ) -> Result<Vec<JobRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(params.clone());

            if self.fail {
                return Err(anyhow::anyhow!("connection refused")
                    .context("Failed to reach job search service"));
            }

            let site = params.site_name[0].clone();
            Ok((0..params.results_wanted)
                .map(|i| {
                    JobRecord::new(
                        &site,
                        &format!("{} #{}", params.search_term, i),
                        "Acme",
                        &params.location,
                        &format!("https://jobs.example.com/{}", i),
                    )
                })
                .collect())
        }
    }

    fn scenario_form() -> SearchForm {
        SearchForm {
            keyword: "software engineer".to_string(),
            location: "San Francisco, CA".to_string(),
            sites: vec!["indeed".to_string()],
            results_wanted: 5,
            hours_old: 72,
            country: "USA".to_string(),
            verbosity: 2,
            ..SearchForm::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_single_site_search() {
        let backend = Arc::new(StubBackend::succeeding());
        let mut session = Session::new(SearchInvoker::new(backend.clone()));

        let results = session.search(&scenario_form()).await.unwrap();
        assert_eq!(results.len(), 5);

        let presenter = Presenter::new(PresenterOptions::default());
        let view = presenter.view(results, &ViewSelection::default());
        assert_eq!(view.records.len(), 5);
        assert!(view.records.iter().all(|r| r.site == "indeed"));

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].country_indeed, "USA");
        assert_eq!(seen[0].hours_old, 72);
    }

    #[tokio::test]
    async fn test_no_site_never_reaches_backend() {
        let backend = Arc::new(StubBackend::succeeding());
        let mut session = Session::new(SearchInvoker::new(backend.clone()));

        let form = SearchForm {
            sites: vec![],
            ..scenario_form()
        };
        let err = session.search(&form).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Configuration(ConfigurationError::NoSiteSelected)
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(session.last_results().is_none());
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let good = Arc::new(StubBackend::succeeding());
        let mut session = Session::new(SearchInvoker::new(good));
        let before = session.search(&scenario_form()).await.unwrap().clone();

        session.invoker = SearchInvoker::new(Arc::new(StubBackend::failing()));
        let err = session.search(&scenario_form()).await.unwrap_err();

        match err {
            SessionError::Search(search_error) => {
                assert!(search_error.message.contains("connection refused"));
                assert!(search_error.detail.contains("Caused by"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(session.last_results(), Some(&before));
    }

    #[tokio::test]
    async fn test_backend_called_once_on_failure() {
        let backend = Arc::new(StubBackend::failing());
        let invoker = SearchInvoker::new(backend.clone());
        let request = scenario_form().collect().unwrap();

        assert!(invoker.invoke(&request).await.is_err());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
