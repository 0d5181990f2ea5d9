use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::BatchError;

/// Governs how long a single caller is willing to wait on a batch window.
///
/// Cancelling the token or passing the deadline only releases the caller holding this context.
/// The window's shared fetch keeps running for everybody else queued in it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if this context is already cancelled or past its deadline.
    pub(crate) fn check<E>(&self) -> Result<(), BatchError<E>> {
        if self.cancel.is_cancelled() {
            return Err(BatchError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Err(BatchError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves once this context is done, with the reason.
    pub(crate) async fn done<E>(&self) -> BatchError<E> {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancel.cancelled() => BatchError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => BatchError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                BatchError::Cancelled
            }
        }
    }
}
