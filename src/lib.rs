mod api;
mod batch_function;
mod batcher;
mod batcher_worker;
mod config;
mod context;
mod cursor;
mod error;
mod list;
mod listing;
mod lookup;
mod pending_get;
mod provider;
mod resolver;
mod rest;
mod validate;
mod window_stats;

pub use api::{
    CreateParams, DestroyParams, List, ListCreateParams, ListMembersParams, ListMode, ListParams,
    ListUpdateParams, ListsApi, RelationApi, RelationKind, User, UserCursorPage,
};
pub use batch_function::BatchFunction;
pub use batcher::{Batcher, DEFAULT_WINDOW};
pub use config::{ProviderConfig, DEFAULT_API_BASE_URL, DEFAULT_BATCH_WINDOW_MS};
pub use context::RequestContext;
pub use cursor::{walk, Cursor, PageFetch};
pub use error::{ApiError, BatchError, Error, Result};
pub use list::{ListManager, ListSpec, ListState, MemberSync, MAX_MEMBER_CHANGES};
pub use listing::{all_users, ListingLookup, UserListing};
pub use lookup::{scan, Identified, LookupKey};
pub use provider::{screen_name_diff_suppressed, Provider, RelationState};
pub use resolver::Resolver;
pub use rest::{RestLists, RestRelations};
pub use validate::Validators;
pub use window_stats::BatchStats;
