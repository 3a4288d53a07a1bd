pub mod config;
pub mod dataset;
pub mod error;
pub mod menu;
pub mod query;
pub mod report;

pub use config::Config;
pub use dataset::{load_dir, Dataset, Datasets};
pub use error::{AnalyticsError, Result};
pub use query::Query;
pub use report::Report;
