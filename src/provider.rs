//! Resource-level glue: maps resolver results onto the `id` / `screen_name` attribute pair the
//! block and mute resources persist, and owns the list manager.

use std::sync::Arc;

use tokio::time::Duration;

use crate::{
    api::{ListsApi, RelationApi, RelationKind, User},
    config::ProviderConfig,
    context::RequestContext,
    error::Result,
    list::ListManager,
    resolver::Resolver,
    rest::{RestLists, RestRelations},
};

/// Attributes persisted for a block or mute resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationState {
    pub id: String,
    pub screen_name: String,
}

impl From<User> for RelationState {
    fn from(user: User) -> Self {
        Self { id: user.id_str, screen_name: user.screen_name }
    }
}

/// Screen names are case-insensitive handles, so a configured `Jack` and a remote `jack` are not
/// a change.
pub fn screen_name_diff_suppressed(old: &str, new: &str) -> bool {
    old.to_lowercase() == new.to_lowercase()
}

/// Holds one resolver per relationship kind, plus the list manager, for the lifetime of a
/// provider invocation.
pub struct Provider {
    blocks: Resolver<dyn RelationApi>,
    mutes: Resolver<dyn RelationApi>,
    lists: ListManager<dyn ListsApi>,
}

impl Provider {
    /// Builds REST-backed resolvers sharing `http`. Must be called from within a tokio runtime.
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        let base = config.api_base_url.clone();
        let blocks = RestRelations::new(http.clone(), base.clone(), RelationKind::Block);
        let mutes = RestRelations::new(http.clone(), base.clone(), RelationKind::Mute);
        let lists = RestLists::new(http, base);
        tracing::debug!(
            api_base_url = %config.api_base_url,
            window_ms = config.batch_window().as_millis() as u64,
            "configuring provider"
        );
        Self::from_apis(Arc::new(blocks), Arc::new(mutes), Arc::new(lists), config.batch_window())
    }

    pub fn from_apis(
        blocks: Arc<dyn RelationApi>,
        mutes: Arc<dyn RelationApi>,
        lists: Arc<dyn ListsApi>,
        window: Duration,
    ) -> Self {
        Self {
            blocks: Resolver::with_window(blocks, window),
            mutes: Resolver::with_window(mutes, window),
            lists: ListManager::new(lists),
        }
    }

    pub fn lists(&self) -> &ListManager<dyn ListsApi> {
        &self.lists
    }

    pub fn blocks(&self) -> &Resolver<dyn RelationApi> {
        &self.blocks
    }

    pub fn mutes(&self) -> &Resolver<dyn RelationApi> {
        &self.mutes
    }

    pub fn resolver(&self, kind: RelationKind) -> &Resolver<dyn RelationApi> {
        match kind {
            RelationKind::Block => &self.blocks,
            RelationKind::Mute => &self.mutes,
        }
    }

    pub async fn create_state(&self, kind: RelationKind, screen_name: &str) -> Result<RelationState> {
        Ok(self.resolver(kind).create(screen_name).await?.into())
    }

    /// Refreshes a resource by id. `None` means it should be dropped from state.
    pub async fn read_state(
        &self,
        kind: RelationKind,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Option<RelationState>> {
        let user = self.resolver(kind).read_by_id(ctx, id).await?;
        if user.is_none() {
            tracing::info!(%kind, id, "relationship no longer exists, removing from state");
        }
        Ok(user.map(RelationState::from))
    }

    /// Imports by screen name. `None` means nothing by that name is blocked / muted.
    pub async fn import_state(
        &self,
        kind: RelationKind,
        ctx: &RequestContext,
        screen_name: &str,
    ) -> Result<Option<RelationState>> {
        Ok(self.resolver(kind).import(ctx, screen_name).await?.map(RelationState::from))
    }

    pub async fn delete_state(&self, kind: RelationKind, id: &str) -> Result<()> {
        self.resolver(kind).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_case_only_changes() {
        assert!(screen_name_diff_suppressed("Jack", "jack"));
        assert!(!screen_name_diff_suppressed("jack", "jill"));
    }

    #[test]
    fn state_keeps_remote_spelling() {
        let user = User { id: 12, id_str: "12".into(), screen_name: "Jack".into(), name: "jack".into() };
        assert_eq!(RelationState::from(user), RelationState { id: "12".into(), screen_name: "Jack".into() });
    }
}
