// src/core/mod.rs
//! Configuration, the search backend seam and the invoker built on it

pub mod backend;
pub mod config_manager;
pub mod invoker;
pub mod service_client;

pub use backend::JobSearchBackend;
pub use config_manager::ConfigManager;
pub use invoker::{SearchInvoker, Session};
pub use service_client::ServiceClient;
