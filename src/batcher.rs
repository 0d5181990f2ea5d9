use std::fmt::Debug;
use std::ops::Drop;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::{
    batch_function::BatchFunction,
    batcher_worker::BatcherWorker,
    context::RequestContext,
    error::BatchError,
    pending_get::PendingGet,
    window_stats::{BatchStats, WindowStats},
};

/// Window length used by [`Batcher::new`].
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);

/// Coalesces concurrent point lookups into one fetch per time window, primarily intended for
/// resolving many entities against a remote API that can only list everything.
///
/// The first [`Batcher::get`] after an idle period opens a window. Every `get` issued before the
/// window's deadline joins it, and once the deadline passes the [`BatchFunction`] runs a single
/// time for all of the window's keys. Each caller then receives the slot for its own key. There
/// is no caching across windows: a later `get` opens a new window and triggers a new fetch.
///
/// The `Batcher` struct acts as an intermediary between the async domain in which `get` calls are
/// invoked and the pseudo-single-threaded domain of the `BatcherWorker`. Callers can invoke the
/// `Batcher` from multiple parallel tasks; the worker owns the window state exclusively and
/// answers each caller through its own oneshot channel.
pub struct Batcher<K, V, E>
where
    K: 'static + Debug + Send,
    V: 'static + Debug + Send,
    E: 'static + Send + Sync,
{
    request_tx: mpsc::UnboundedSender<PendingGet<K, V, E>>,
    stats: Arc<WindowStats>,
    window: Duration,
    worker_handle: tokio::task::JoinHandle<()>,
}

impl<K, V, E> Drop for Batcher<K, V, E>
where
    K: 'static + Debug + Send,
    V: 'static + Debug + Send,
    E: 'static + Send + Sync,
{
    fn drop(&mut self) {
        self.worker_handle.abort();
    }
}

impl<K, V, E> Batcher<K, V, E>
where
    K: 'static + Debug + Clone + Send + Sync,
    V: 'static + Debug + Send,
    E: 'static + Debug + Send + Sync,
{
    /// Creates a new Batcher for the provided BatchFunction and Context type, using the
    /// [`DEFAULT_WINDOW`].
    ///
    /// Note: the batch function is passed in as a marker for type inference. Must be called from
    /// within a tokio runtime.
    pub fn new<F, ContextT>(batch_fn: F, context: ContextT) -> Self
    where
        ContextT: Send + Sync + 'static,
        F: 'static + BatchFunction<K, V, Context = ContextT, Error = E> + Send,
    {
        Self::with_window(batch_fn, context, DEFAULT_WINDOW)
    }

    /// Like [`Batcher::new`] with a custom window length.
    pub fn with_window<F, ContextT>(_: F, context: ContextT, window: Duration) -> Self
    where
        ContextT: Send + Sync + 'static,
        F: 'static + BatchFunction<K, V, Context = ContextT, Error = E> + Send,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(WindowStats::new(std::any::type_name::<F>()));
        Self {
            request_tx: tx,
            stats: Arc::clone(&stats),
            window,
            worker_handle: tokio::task::spawn(
                BatcherWorker::<K, V, F, ContextT>::new(rx, context, window, stats).start(),
            ),
        }
    }
}

impl<K, V, E> Batcher<K, V, E>
where
    K: 'static + Debug + Send,
    V: 'static + Debug + Send,
    E: 'static + Send + Sync,
{
    /// Resolves `key` with the current or next window's fetch.
    ///
    /// Returns `Ok(None)` when the fetch completed but contained no entry for the key. A failed
    /// fetch returns the same [`BatchError::Fetch`] to every caller in the window. If `ctx` is
    /// cancelled or its deadline passes first, only this caller gives up; the fetch still runs for
    /// the rest of the window.
    ///
    /// A context that is already done is rejected without enqueueing, so it never opens a window.
    pub async fn get(&self, ctx: &RequestContext, key: K) -> Result<Option<V>, BatchError<E>> {
        ctx.check()?;
        let (request, response_rx) = PendingGet::new(key);
        self.request_tx.send(request).map_err(|_| BatchError::WorkerGone)?;
        tokio::select! {
            biased;
            response = response_rx => response.unwrap_or(Err(BatchError::WorkerGone)),
            reason = ctx.done() => {
                tracing::debug!("caller stopped waiting for batch");
                Err(reason)
            }
        }
    }

    /// The window length this batcher was built with.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Current window counters.
    pub fn stats(&self) -> BatchStats {
        self.stats.snapshot()
    }
}
