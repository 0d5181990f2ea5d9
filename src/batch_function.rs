use async_trait::async_trait;

/// A `BatchFunction` defines how a [`crate::Batcher`] resolves every key queued during one batch
/// window. It receives the keys in the order they were enqueued and some user defined context
/// struct.
///
/// The function must return one slot per key, in key order. `None` means the key is absent from
/// the resource, which is a normal outcome rather than an error. Slots missing from a short
/// result are treated as `None`.
///
/// Returning `Err` fails the whole window: every requester queued in it receives the same error
/// and no values are distributed.
///
/// Multiple `BatchFunctions` (and therefore batchers) can share the same context (likely through
/// an `Arc`).
#[async_trait]
pub trait BatchFunction<K, V> {
    type Context;
    type Error;
    async fn load(keys: &[K], context: &Self::Context) -> Result<Vec<Option<V>>, Self::Error>;
}
