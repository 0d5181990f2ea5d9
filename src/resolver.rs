use std::sync::Arc;

use tokio::time::Duration;

use crate::{
    api::{CreateParams, DestroyParams, RelationApi, RelationKind, User},
    batcher::{Batcher, DEFAULT_WINDOW},
    context::RequestContext,
    error::{ApiError, Error, Result},
    listing::ListingLookup,
    lookup::LookupKey,
    window_stats::BatchStats,
};

/// Resolves blocked or muted users for the resources built on top of it.
///
/// Reads and imports go through a [`Batcher`], so concurrent lookups share one full-listing fetch
/// per window. Creates and deletes are single remote calls and never wait on a window.
pub struct Resolver<A: RelationApi + ?Sized + 'static> {
    api: Arc<A>,
    batcher: Batcher<LookupKey, User, ApiError>,
}

impl<A: RelationApi + ?Sized + 'static> Resolver<A> {
    /// Must be called from within a tokio runtime.
    pub fn new(api: Arc<A>) -> Self {
        Self::with_window(api, DEFAULT_WINDOW)
    }

    pub fn with_window(api: Arc<A>, window: Duration) -> Self {
        let batcher = Batcher::with_window(ListingLookup::<A>::new(), Arc::clone(&api), window);
        Self { api, batcher }
    }

    pub fn kind(&self) -> RelationKind {
        self.api.kind()
    }

    pub fn stats(&self) -> BatchStats {
        self.batcher.stats()
    }

    /// Blocks or mutes `screen_name`.
    #[tracing::instrument(skip(self), fields(kind = %self.kind()))]
    pub async fn create(&self, screen_name: &str) -> Result<User> {
        let user = self.api.create(&CreateParams::new(screen_name)).await?;
        tracing::debug!(id = %user.id_str, "created");
        Ok(user)
    }

    /// Looks `key` up in the current listing. `None` means the relationship no longer exists.
    #[tracing::instrument(skip(self, ctx), fields(kind = %self.kind()))]
    pub async fn read(&self, ctx: &RequestContext, key: LookupKey) -> Result<Option<User>> {
        Ok(self.batcher.get(ctx, key).await?)
    }

    pub async fn read_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Option<User>> {
        self.read(ctx, LookupKey::by_id(id)).await
    }

    /// Unblocks or unmutes the user with the numeric id `id`.
    #[tracing::instrument(skip(self), fields(kind = %self.kind()))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let user_id = parse_user_id(id)?;
        self.api.destroy(&DestroyParams::new(user_id)).await?;
        Ok(())
    }

    /// Resolves an import reference, which is always a screen name. `None` means nothing by that
    /// name is in the listing; whether that is fatal is up to the caller.
    #[tracing::instrument(skip(self, ctx), fields(kind = %self.kind()))]
    pub async fn import(&self, ctx: &RequestContext, screen_name: &str) -> Result<Option<User>> {
        Ok(self.batcher.get(ctx, LookupKey::by_name(screen_name)).await?)
    }
}

pub(crate) fn parse_user_id(id: &str) -> Result<i64> {
    id.parse::<i64>().map_err(|source| Error::InvalidId { id: id.to_owned(), source })
}
