use thiserror::Error;

/// Errors surfaced by the map catalog and the resolvers built on top of it.
///
/// Both variants are recoverable: `NotFound` means a chart or caller refers to
/// a map that was never registered, `InvalidFormat` means one registered map is
/// unusable while every other map stays available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map '{id}' is not registered")]
    NotFound { id: String },
    #[error("map '{id}' has an invalid descriptor: {reason}")]
    InvalidFormat { id: String, reason: String },
}

impl MapError {
    pub fn not_found(id: impl Into<String>) -> Self {
        MapError::NotFound { id: id.into() }
    }

    pub fn invalid_format(id: impl Into<String>, reason: impl Into<String>) -> Self {
        MapError::InvalidFormat {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// The map id the error refers to.
    pub fn map_id(&self) -> &str {
        match self {
            MapError::NotFound { id } | MapError::InvalidFormat { id, .. } => id.as_str(),
        }
    }
}
