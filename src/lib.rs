pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod output;
pub mod parser;
pub mod recommend;
pub mod segment;
pub mod stats;
pub mod upload;

pub use analyzers::analyzer::analyze;
pub use analyzers::types::AnalysisReport;
pub use config::Thresholds;
pub use error::AnalysisError;
pub use parser::{TripTable, parse_table};
