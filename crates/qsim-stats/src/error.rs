//! Error types for loading statistics and resolving selectors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a statistics results document.
#[derive(Debug, Error)]
pub enum StatisticsError {
    /// Failed to read the statistics file.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed statistics XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The document has no root element.
    #[error("statistics document contains no root element")]
    EmptyDocument,
}

/// Errors raised while resolving a selector against a statistics source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The selector contains no components.
    #[error("empty selector")]
    EmptySelector,

    /// A selector component could not be parsed.
    #[error("invalid selector ({0})")]
    InvalidComponent(String),

    /// No element matched the given component.
    #[error("no element matches selector component \"{0}\"")]
    NoMatchingElement(String),

    /// The selected element does not carry the requested attribute.
    #[error("element <{element}> has no attribute \"{attribute}\"")]
    MissingAttribute { element: String, attribute: String },

    /// No statistics are loaded.
    #[error("no statistics available")]
    NoStatistics,
}

/// Result type alias for statistics loading.
pub type Result<T> = std::result::Result<T, StatisticsError>;
