pub mod aggregates;
pub mod config;
pub mod error;
pub mod filters;
pub mod frames;
pub mod ingestion;
pub mod merge;
pub mod normalize;
pub mod snapshot;
pub mod types;

pub use socialdash_parser::{CanonicalColumn, Platform, SourceId};
