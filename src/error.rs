use std::sync::Arc;

use thiserror::Error;

/// Result type alias for resolver and provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed call against the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The remote API answered with a non-success status.
    #[error("remote API returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not the expected JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Why a caller did not receive a value from a batch window.
#[derive(Debug, Error)]
pub enum BatchError<E> {
    /// The window's fetch failed. Every caller queued in that window holds the same error.
    #[error("batch fetch failed: {0}")]
    Fetch(Arc<E>),
    /// The caller's cancellation token fired while it was waiting.
    #[error("request cancelled while waiting for batch")]
    Cancelled,
    /// The caller's deadline passed while it was waiting.
    #[error("deadline exceeded while waiting for batch")]
    DeadlineExceeded,
    /// The batch worker is no longer running.
    #[error("batch worker stopped")]
    WorkerGone,
}

impl<E> BatchError<E> {
    /// Returns the fetch error shared by the window, if that is what failed.
    pub fn fetch_error(&self) -> Option<&Arc<E>> {
        match self {
            BatchError::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

// Manual impl: the shared error is behind an `Arc`, so `E` itself need not be `Clone`.
impl<E> Clone for BatchError<E> {
    fn clone(&self) -> Self {
        match self {
            BatchError::Fetch(err) => BatchError::Fetch(Arc::clone(err)),
            BatchError::Cancelled => BatchError::Cancelled,
            BatchError::DeadlineExceeded => BatchError::DeadlineExceeded,
            BatchError::WorkerGone => BatchError::WorkerGone,
        }
    }
}

/// Errors surfaced by the resolvers and the provider.
#[derive(Debug, Error)]
pub enum Error {
    /// A one-shot create or destroy call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A batched lookup failed or was abandoned.
    #[error(transparent)]
    Batch(#[from] BatchError<ApiError>),
    /// Resource ids are base-10 64-bit integers.
    #[error("invalid user id {id:?}: {source}")]
    InvalidId {
        id: String,
        #[source]
        source: std::num::ParseIntError,
    },
    /// An attribute failed validation before any remote call was made.
    #[error("invalid {field} {value:?}: {reason}")]
    Validation { field: &'static str, value: String, reason: &'static str },
    /// A single apply may add or remove at most [`crate::MAX_MEMBER_CHANGES`] list members.
    #[error(
        "can only process {max} create ({create}) or destroy ({destroy}) member operations in a single apply"
    )]
    TooManyMemberChanges { create: usize, destroy: usize, max: usize },
}
