//! Error types for conversion operations

use thiserror::Error;

/// Errors that abort a conversion
///
/// Recoverable anomalies (unknown block types, missing layout entries, markup
/// that is not shaped the way a preprocessor expects) are not errors: they are
/// reported through [`crate::Diagnostics`] and the conversion carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// A marker attribute holds something that is not valid JSON
    #[error("attribute '{attribute}' holds invalid JSON: {message}")]
    InvalidJson { attribute: String, message: String },
    /// A table row contains a cell that is neither `th` nor `td`
    #[error("table cell must be 'th' or 'td', found '{0}'")]
    InvalidTableCell(String),
    /// The column width table has no entry for `12 / cells`
    #[error("no column width configured for a span of {0}")]
    MissingColumnWidth(usize),
    /// Nested conversion went deeper than the configured limit
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    /// A block payload is not usable (not an object, no `@type`)
    #[error("invalid block: {0}")]
    InvalidBlock(String),
    /// Writing the DOM back to a string failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ConvertError {
    pub(crate) fn invalid_json(attribute: &str, err: serde_json::Error) -> Self {
        ConvertError::InvalidJson {
            attribute: attribute.to_string(),
            message: err.to_string(),
        }
    }
}
