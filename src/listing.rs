use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    api::{ListParams, RelationApi, User},
    batch_function::BatchFunction,
    cursor::{self, Cursor, PageFetch},
    error::ApiError,
    lookup::{self, LookupKey},
};

/// Page fetcher that collects every user of a block or mute listing.
pub struct UserListing<'a, A: ?Sized> {
    api: &'a A,
    users: Vec<User>,
}

impl<'a, A: RelationApi + ?Sized> UserListing<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api, users: Vec::new() }
    }

    pub fn into_users(self) -> Vec<User> {
        self.users
    }
}

#[async_trait]
impl<A: RelationApi + ?Sized> PageFetch for UserListing<'_, A> {
    type Error = ApiError;

    async fn fetch_page(&mut self, cursor: Cursor) -> Result<Cursor, ApiError> {
        let page = self.api.list(&ListParams::at(cursor)).await?;
        self.users.extend(page.users);
        Ok(Cursor(page.next_cursor))
    }
}

/// Walks the whole listing. A failed page discards what was collected so far.
#[tracing::instrument(skip(api), fields(kind = %api.kind()))]
pub async fn all_users<A: RelationApi + ?Sized>(api: &A) -> Result<Vec<User>, ApiError> {
    let mut listing = UserListing::new(api);
    cursor::walk(&mut listing).await?;
    tracing::debug!(users = listing.users.len(), "listing complete");
    Ok(listing.into_users())
}

/// Batch function that answers lookups by fetching the full listing once and scanning it.
pub struct ListingLookup<A: ?Sized>(PhantomData<fn() -> Arc<A>>);

impl<A: ?Sized> ListingLookup<A> {
    pub fn new() -> Self {
        ListingLookup(PhantomData)
    }
}

impl<A: ?Sized> Default for ListingLookup<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: RelationApi + ?Sized + 'static> BatchFunction<LookupKey, User> for ListingLookup<A> {
    type Context = Arc<A>;
    type Error = ApiError;

    async fn load(keys: &[LookupKey], api: &Arc<A>) -> Result<Vec<Option<User>>, ApiError> {
        let users = all_users(api.as_ref()).await?;
        Ok(lookup::scan(keys, &users).into_iter().map(|user| user.cloned()).collect())
    }
}
