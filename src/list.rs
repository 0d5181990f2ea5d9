use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    api::{List, ListCreateParams, ListMembersParams, ListMode, ListUpdateParams, ListsApi},
    error::{Error, Result},
    validate::Validators,
};

/// Most members a single apply may add, and separately remove.
pub const MAX_MEMBER_CHANGES: usize = 100;

/// Desired configuration of a list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListSpec {
    pub name: String,
    pub mode: ListMode,
    pub description: String,
    pub members: Vec<String>,
}

/// Attributes persisted for a list resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub id: String,
    pub name: String,
    pub mode: ListMode,
    pub description: String,
    pub slug: String,
    pub uri: String,
    pub members: Vec<String>,
}

impl ListState {
    fn new(list: List, members: Vec<String>) -> Self {
        Self {
            id: list.id_str,
            name: list.name,
            mode: list.mode,
            description: list.description,
            slug: list.slug,
            uri: list.uri,
            members,
        }
    }
}

/// Members to add and remove to get from one member set to another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberSync {
    pub create: Vec<String>,
    pub destroy: Vec<String>,
}

impl MemberSync {
    /// `create` keeps the order of `to`, `destroy` the order of `from`. Fails if either side
    /// exceeds [`MAX_MEMBER_CHANGES`].
    pub fn plan(from: &[String], to: &[String]) -> Result<Self> {
        let from_set = from.iter().collect::<HashSet<_>>();
        let to_set = to.iter().collect::<HashSet<_>>();

        let create = to.iter().filter(|m| !from_set.contains(m)).cloned().collect::<Vec<_>>();
        let destroy = from.iter().filter(|m| !to_set.contains(m)).cloned().collect::<Vec<_>>();

        if create.len() > MAX_MEMBER_CHANGES || destroy.len() > MAX_MEMBER_CHANGES {
            return Err(Error::TooManyMemberChanges {
                create: create.len(),
                destroy: destroy.len(),
                max: MAX_MEMBER_CHANGES,
            });
        }
        Ok(Self { create, destroy })
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.destroy.is_empty()
    }
}

/// CRUD for lists. Lists are read directly by id, so nothing here is batched.
pub struct ListManager<A: ListsApi + ?Sized> {
    api: Arc<A>,
    validators: Validators,
}

impl<A: ListsApi + ?Sized> ListManager<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api, validators: Validators::new() }
    }

    fn validate(&self, spec: &ListSpec) -> Result<()> {
        self.validators.list_name(&spec.name)?;
        if spec.members.len() > MAX_MEMBER_CHANGES {
            return Err(Error::Validation {
                field: "members",
                value: spec.members.len().to_string(),
                reason: "at most 100 members are supported",
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, spec: &ListSpec) -> Result<ListState> {
        self.validate(spec)?;
        let list = self
            .api
            .create(&ListCreateParams {
                name: spec.name.clone(),
                mode: spec.mode,
                description: spec.description.clone(),
            })
            .await?;
        self.sync_members(list.id, &[], &spec.members).await?;
        Ok(ListState::new(list, spec.members.clone()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn read(&self, id: &str) -> Result<ListState> {
        let list_id = self.validators.string_id(id)?;
        let list = self.api.show(list_id).await?;
        let members = self.read_members(list_id).await?;
        Ok(ListState::new(list, members))
    }

    /// Updates the list's attributes, then moves its members from what the remote currently has
    /// to `spec.members`.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &str, spec: &ListSpec) -> Result<ListState> {
        let list_id = self.validators.string_id(id)?;
        self.validate(spec)?;
        self.api
            .update(&ListUpdateParams {
                list_id,
                name: spec.name.clone(),
                mode: spec.mode,
                description: spec.description.clone(),
            })
            .await?;
        let list = self.api.show(list_id).await?;
        let current = self.read_members(list_id).await?;
        self.sync_members(list.id, &current, &spec.members).await?;
        Ok(ListState::new(list, spec.members.clone()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let list_id = self.validators.string_id(id)?;
        self.api.destroy(list_id).await?;
        Ok(())
    }

    /// Screen names of the list's members. Only the first 100 are read.
    pub async fn read_members(&self, list_id: i64) -> Result<Vec<String>> {
        let page = self.api.members(&ListMembersParams::first_page(list_id)).await?;
        let members = page.users.into_iter().map(|user| user.screen_name).collect::<Vec<_>>();
        tracing::trace!(list_id, ?members, "members read");
        Ok(members)
    }

    /// Removals go out before additions, each as one call.
    pub async fn sync_members(&self, list_id: i64, from: &[String], to: &[String]) -> Result<MemberSync> {
        let sync = MemberSync::plan(from, to)?;
        tracing::trace!(create = sync.create.len(), destroy = sync.destroy.len(), "syncing members");
        if !sync.destroy.is_empty() {
            self.api.members_destroy_all(list_id, &sync.destroy).await?;
        }
        if !sync.create.is_empty() {
            self.api.members_create_all(list_id, &sync.create).await?;
        }
        Ok(sync)
    }
}
