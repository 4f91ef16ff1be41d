//! Lucy: one query, several job boards.
//!
//! A search form is collected into a [`types::SearchRequest`], handed once to
//! a [`core::JobSearchBackend`], and the resulting rows are filtered, sorted,
//! rendered and exported by the [`presenter`].

pub mod cli;
pub mod collector;
pub mod core;
pub mod error;
pub mod presenter;
pub mod presets;
pub mod progress;
pub mod types;
pub mod utils;
pub mod web;

pub use collector::SearchForm;
pub use error::{ConfigurationError, ExportError, RenderError, SearchError, SessionError};
pub use presenter::{Presenter, PresenterOptions, SortOrder, View, ViewSelection};
pub use web::start_web_server;
