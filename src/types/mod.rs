pub mod job;
pub mod search;

pub use job::{JobRecord, ResultSet, SalaryInterval};
pub use search::{Country, JobType, ScrapeParams, SearchRequest, Site, Verbosity};
