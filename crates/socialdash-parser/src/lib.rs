pub mod errors;
pub mod fields;
pub mod model;
pub mod source;
pub mod table;

pub use errors::SourceError;
pub use model::{CanonicalColumn, Platform, RawRecord, RawTable, SourceSchema};
pub use source::{discover_sources, read_source, ReadOptions, SourceId, SourceOutcome};
pub use table::decode_table;
