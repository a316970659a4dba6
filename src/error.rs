// src/error.rs

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything an extraction can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised before any fetch is issued.
    #[error("year {year} is not in range: {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The document did not have the markup we rely on (site layout drift).
    #[error("unexpected document structure in {context}: {reason}")]
    Structure { context: String, reason: String },

    #[error("invalid base url `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    pub fn structure(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Structure {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// True for failures caused by the document layout rather than I/O or input.
    pub fn is_structure(&self) -> bool {
        matches!(self, Error::Structure { .. })
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("GET {url} returned non-success status {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn transport<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        FetchError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. } | FetchError::Status { url, .. } => url,
        }
    }
}
