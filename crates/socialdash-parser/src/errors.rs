use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_id} does not exist")]
    NotFound { source_id: String },

    #[error("{source_id} could not be read: {source}")]
    Io {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_id} fetch failed: {message}")]
    Http { source_id: String, message: String },

    #[error("{source_id} is not valid UTF-8 text")]
    Utf8 { source_id: String },

    #[error("{source_id} CSV error: {source}")]
    Csv {
        source_id: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_id} has no header row")]
    MissingHeader { source_id: String },

    #[error("source discovery under '{root}' failed: {message}")]
    Discovery { root: String, message: String },
}

