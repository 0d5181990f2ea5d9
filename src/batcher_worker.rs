use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing_futures::Instrument;

use crate::{
    batch_function::BatchFunction, error::BatchError, pending_get::PendingGet,
    window_stats::WindowStats,
};

/// Lifecycle of a batch window.
///
/// `Closed -> Open -> Fetching -> Closed`. The first request to arrive while closed opens a window
/// with a deadline; every request arriving before the deadline joins it. At the deadline the window
/// moves to `Fetching`, the batch function runs exactly once for all queued keys, the answers are
/// handed out and the window closes again.
#[derive(Debug)]
pub(crate) enum WindowState<K, V, E> {
    Closed,
    Open { deadline: Instant, pending: Vec<PendingGet<K, V, E>> },
    Fetching { size: usize },
}

impl<K, V, E> WindowState<K, V, E> {
    pub fn deadline(&self) -> Option<Instant> {
        match self {
            WindowState::Open { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }

    /// Moves an open window to `Fetching` and hands back its queue. Any other state yields an
    /// empty queue and is left untouched.
    pub fn begin_fetch(&mut self) -> Vec<PendingGet<K, V, E>> {
        match std::mem::replace(self, WindowState::Closed) {
            WindowState::Open { pending, .. } => {
                *self = WindowState::Fetching { size: pending.len() };
                pending
            }
            other => {
                *self = other;
                Vec::new()
            }
        }
    }
}

/// A `BatcherWorker` is the "single-thread" task that owns the batch window and performs the
/// fetches.
///
/// Once started, it runs in a loop until the parent [`crate::Batcher`] aborts its `JoinHandle` or
/// drops the request channel. Because the worker awaits each fetch before it reads the channel
/// again, at most one fetch is in flight per worker; requests that arrive during a fetch wait in
/// the channel and open the next window.
pub(crate) struct BatcherWorker<K, V, F, ContextT>
where
    F: BatchFunction<K, V, Context = ContextT>,
{
    request_rx: mpsc::UnboundedReceiver<PendingGet<K, V, F::Error>>,
    state: WindowState<K, V, F::Error>,
    window: Duration,
    context: ContextT,
    stats: Arc<WindowStats>,
    phantom_batch_function: PhantomData<F>,
    debug_name: &'static str,
}

impl<K, V, F, ContextT> BatcherWorker<K, V, F, ContextT>
where
    K: 'static + Debug + Clone + Send + Sync,
    V: 'static + Debug + Send,
    F: 'static + BatchFunction<K, V, Context = ContextT> + Send,
    F::Error: 'static + Debug + Send + Sync,
    ContextT: Send + Sync + 'static,
{
    pub fn new(
        request_rx: mpsc::UnboundedReceiver<PendingGet<K, V, F::Error>>,
        context: ContextT,
        window: Duration,
        stats: Arc<WindowStats>,
    ) -> Self {
        Self {
            request_rx,
            state: WindowState::Closed,
            window,
            context,
            stats,
            phantom_batch_function: PhantomData,
            debug_name: std::any::type_name::<(K, V)>(),
        }
    }

    pub async fn start(self) {
        let span = tracing::trace_span!("BatcherWorker", kv = self.debug_name);
        self.run().instrument(span).await
    }

    async fn run(mut self) {
        loop {
            let next = match self.state.deadline() {
                // Closed: idle until the first request opens a window.
                None => self.request_rx.recv().await,
                Some(deadline) => match tokio::time::timeout_at(deadline, self.request_rx.recv()).await {
                    Ok(next) => next,
                    Err(_elapsed) => {
                        // Anything already sitting in the channel still belongs to this window.
                        while let Some(Some(request)) = self.request_rx.recv().now_or_never() {
                            self.enqueue(request);
                        }
                        self.execute_fetch().await;
                        continue;
                    }
                },
            };
            match next {
                Some(request) => self.enqueue(request),
                None => {
                    tracing::info!("Tx channel closed. Terminating BatcherWorker.");
                    return;
                }
            }
        }
    }

    fn enqueue(&mut self, request: PendingGet<K, V, F::Error>) {
        self.stats.record_request();
        match &mut self.state {
            WindowState::Open { pending, .. } => pending.push(request),
            state => {
                let deadline = Instant::now() + self.window;
                tracing::debug!(window_ms = self.window.as_millis() as u64, "opening batch window");
                self.stats.record_window_opened();
                *state = WindowState::Open { deadline, pending: vec![request] };
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn execute_fetch(&mut self) {
        let pending = self.state.begin_fetch();
        let keys = pending.iter().map(|request| request.key.clone()).collect::<Vec<_>>();
        if let WindowState::Fetching { size } = self.state {
            tracing::debug!(window_size = size, ?keys, "fetching");
        }

        let result = F::load(&keys, &self.context).await;
        self.stats.record_fetch(keys.len(), result.is_err());
        self.stats.record_abandoned(pending.iter().filter(|request| request.is_abandoned()).count());

        match result {
            Ok(values) => {
                if values.len() != keys.len() {
                    tracing::warn!(
                        expected = keys.len(),
                        returned = values.len(),
                        "batch function returned a mismatched number of slots"
                    );
                }
                let mut values = values.into_iter();
                for request in pending {
                    request.send_response(Ok(values.next().flatten()));
                }
            }
            Err(err) => {
                tracing::warn!(error = ?err, window_size = keys.len(), "batch fetch failed");
                let err = Arc::new(err);
                for request in pending {
                    request.send_response(Err(BatchError::Fetch(Arc::clone(&err))));
                }
            }
        }
        self.state = WindowState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = WindowState<u32, u32, ()>;

    #[test]
    fn begin_fetch_takes_the_open_queue() {
        let (first, _rx1) = PendingGet::new(1);
        let (second, _rx2) = PendingGet::new(2);
        let mut state: State =
            WindowState::Open { deadline: Instant::now(), pending: vec![first, second] };

        let pending = state.begin_fetch();
        assert_eq!(pending.iter().map(|p| p.key).collect::<Vec<_>>(), vec![1, 2]);
        assert!(matches!(state, WindowState::Fetching { size: 2 }));
        assert_eq!(state.deadline(), None);
    }

    #[test]
    fn begin_fetch_on_closed_window_is_a_no_op() {
        let mut state: State = WindowState::Closed;
        assert!(state.begin_fetch().is_empty());
        assert!(matches!(state, WindowState::Closed));
    }
}
