//! Error types for NexTrip requests.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The GET could not be completed or the server refused it.
    Transport,
    /// The body arrived but is not the JSON shape we expected.
    Decode,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl { .. } | Error::Transport { .. } | Error::Status { .. } => {
                ErrorKind::Transport
            }
            Error::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// The URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            Error::InvalidUrl { url, .. }
            | Error::Transport { url, .. }
            | Error::Status { url, .. }
            | Error::Decode { url, .. } => url,
        }
    }
}
