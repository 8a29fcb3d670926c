//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wiregen compiler
///
/// Every variant is a configuration error in the broad sense: the run is
/// a single batch pass, so any failure aborts the invocation before an
/// output file is written.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// YAML parsing error in the description document
    #[error("YAML parsing error: {source}")]
    Yaml {
        /// The underlying YAML error
        #[from]
        source: serde_yaml::Error,
    },

    /// An expression referenced a service that is not in the graph
    #[error("unknown service: {name}")]
    UnknownService {
        /// Name of the missing service
        name: String,
    },

    /// A descriptor declared a scope outside the recognized set
    #[error("invalid scope for service {service}: {scope}")]
    InvalidScope {
        /// Name of the offending service
        service: String,
        /// The unrecognized scope value
        scope: String,
    },

    /// A function-shaped type signature could not be parsed
    #[error("malformed type signature: {signature}")]
    MalformedType {
        /// The signature text that failed to parse
        signature: String,
    },
}
