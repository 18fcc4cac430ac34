use std::path::PathBuf;

use thiserror::Error;

/// Defects in the emission factor dataset. These are deployment problems,
/// never something the caller of a calculation can fix.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing emission factor: {path}")]
    MissingFactor { path: String },
    #[error("cannot read emission factors from {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed emission factor dataset: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("emission factor {path} must be finite and non-negative, got {value}")]
    InvalidFactor { path: String, value: f64 },
}

impl DataError {
    pub(crate) fn missing(category: &str, key: &str) -> Self {
        DataError::MissingFactor {
            path: format!("{category}.{key}"),
        }
    }
}

/// Errors surfaced by a footprint calculation.
#[derive(Debug, Error)]
pub enum FootprintError {
    /// A caller-supplied value is outside the accepted domain.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Data(#[from] DataError),
}

impl FootprintError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        FootprintError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FootprintError::InvalidInput { .. })
    }

    /// HTTP status an outer service layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            FootprintError::InvalidInput { .. } => 400,
            FootprintError::Data(_) => 500,
        }
    }
}
