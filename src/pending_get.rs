use tokio::sync::oneshot;

use crate::error::BatchError;

pub type Response<V, E> = Result<Option<V>, BatchError<E>>;

/// A key sent to the [`crate::batcher_worker::BatcherWorker`] together with the slot its answer
/// goes to.
#[derive(Debug)]
pub struct PendingGet<K, V, E> {
    pub key: K,
    response_tx: oneshot::Sender<Response<V, E>>,
}

impl<K, V, E> PendingGet<K, V, E>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    pub fn new(key: K) -> (Self, oneshot::Receiver<Response<V, E>>) {
        let (response_tx, response_rx) = oneshot::channel();
        (Self { key, response_tx }, response_rx)
    }

    pub fn is_abandoned(&self) -> bool {
        self.response_tx.is_closed()
    }

    /// Delivers the answer. A requester that stopped waiting is logged and otherwise ignored.
    pub fn send_response(self, response: Response<V, E>) {
        if self.response_tx.send(response).is_err() {
            tracing::debug!(key = ?self.key, "receiver dropped");
        }
    }
}
