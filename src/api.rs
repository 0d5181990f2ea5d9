//! Types and the trait at the boundary with the remote block / mute API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{cursor::Cursor, error::ApiError, lookup::Identified};

/// A user record as returned by the list, create and destroy endpoints.
///
/// Only the identifying fields are modelled; everything else in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub id_str: String,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
}

impl Identified for User {
    fn id_str(&self) -> &str {
        &self.id_str
    }

    fn screen_name(&self) -> &str {
        &self.screen_name
    }
}

/// One page of a cursored user listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserCursorPage {
    #[serde(default)]
    pub users: Vec<User>,
    pub next_cursor: i64,
}

/// Which relationship a [`RelationApi`] manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Block,
    Mute,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Block => "block",
            RelationKind::Mute => "mute",
        }
    }

    pub(crate) fn list_path(self) -> &'static str {
        match self {
            RelationKind::Block => "blocks/list.json",
            RelationKind::Mute => "mutes/users/list.json",
        }
    }

    pub(crate) fn create_path(self) -> &'static str {
        match self {
            RelationKind::Block => "blocks/create.json",
            RelationKind::Mute => "mutes/users/create.json",
        }
    }

    pub(crate) fn destroy_path(self) -> &'static str {
        match self {
            RelationKind::Block => "blocks/destroy.json",
            RelationKind::Mute => "mutes/users/destroy.json",
        }
    }

    /// Block mutations accept the entity/status flags, mute mutations do not.
    pub(crate) fn mutation_takes_flags(self) -> bool {
        matches!(self, RelationKind::Block)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for one page of the blocked / muted user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub cursor: Cursor,
    pub include_user_entities: bool,
    pub skip_status: bool,
}

impl ListParams {
    /// The listing query issued by the resolvers: no extended entities, no status payload.
    pub fn at(cursor: Cursor) -> Self {
        Self { cursor, include_user_entities: false, skip_status: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub screen_name: String,
    pub include_entities: bool,
    pub skip_status: bool,
}

impl CreateParams {
    pub fn new(screen_name: impl Into<String>) -> Self {
        Self { screen_name: screen_name.into(), include_entities: false, skip_status: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyParams {
    pub user_id: i64,
    pub include_entities: bool,
    pub skip_status: bool,
}

impl DestroyParams {
    pub fn new(user_id: i64) -> Self {
        Self { user_id, include_entities: false, skip_status: true }
    }
}

/// Remote calls for one relationship kind.
///
/// Implementations own authentication and any retry/backoff policy. Errors are handed back
/// unchanged; nothing above this trait retries.
#[async_trait]
pub trait RelationApi: Send + Sync {
    fn kind(&self) -> RelationKind;
    async fn list(&self, params: &ListParams) -> Result<UserCursorPage, ApiError>;
    async fn create(&self, params: &CreateParams) -> Result<User, ApiError>;
    async fn destroy(&self, params: &DestroyParams) -> Result<User, ApiError>;
}

/// Visibility of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    #[default]
    Public,
    Private,
}

impl ListMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ListMode::Public => "public",
            ListMode::Private => "private",
        }
    }
}

/// A list as returned by the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: i64,
    pub id_str: String,
    pub name: String,
    pub mode: ListMode,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCreateParams {
    pub name: String,
    pub mode: ListMode,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUpdateParams {
    pub list_id: i64,
    pub name: String,
    pub mode: ListMode,
    pub description: String,
}

/// Query for the members of a list. Only the first page is ever requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMembersParams {
    pub list_id: i64,
    pub count: u32,
    pub include_entities: bool,
    pub skip_status: bool,
}

impl ListMembersParams {
    pub fn first_page(list_id: i64) -> Self {
        Self { list_id, count: 100, include_entities: false, skip_status: true }
    }
}

/// Remote calls for lists and their members. Same error contract as [`RelationApi`].
#[async_trait]
pub trait ListsApi: Send + Sync {
    async fn create(&self, params: &ListCreateParams) -> Result<List, ApiError>;
    async fn show(&self, list_id: i64) -> Result<List, ApiError>;
    async fn update(&self, params: &ListUpdateParams) -> Result<(), ApiError>;
    async fn destroy(&self, list_id: i64) -> Result<List, ApiError>;
    async fn members(&self, params: &ListMembersParams) -> Result<UserCursorPage, ApiError>;
    /// Adds every screen name in one call.
    async fn members_create_all(&self, list_id: i64, screen_names: &[String]) -> Result<(), ApiError>;
    /// Removes every screen name in one call.
    async fn members_destroy_all(&self, list_id: i64, screen_names: &[String]) -> Result<(), ApiError>;
}
