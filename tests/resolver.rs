mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::FakeLists;
use futures::future;
use twitter_provider_rs::{
    all_users, ApiError, BatchError, CreateParams, Cursor, DestroyParams, Error, ListParams,
    Provider, RelationApi, RelationKind, RelationState, RequestContext, Resolver, User,
    UserCursorPage,
};

const WINDOW: Duration = Duration::from_secs(2);
const PAGE_STRIDE: i64 = 1_000;

fn user(id: i64, screen_name: &str) -> User {
    User { id, id_str: id.to_string(), screen_name: screen_name.to_owned(), name: screen_name.to_uppercase() }
}

/// In-memory relationship listing served in pages, recording every call it receives.
struct FakeRelations {
    kind: RelationKind,
    pages: Vec<Vec<User>>,
    fail_on_page: Option<usize>,
    list_calls: Mutex<Vec<ListParams>>,
    created: Mutex<Vec<CreateParams>>,
    destroyed: Mutex<Vec<DestroyParams>>,
}

impl FakeRelations {
    fn new(kind: RelationKind, pages: Vec<Vec<User>>) -> Self {
        Self {
            kind,
            pages,
            fail_on_page: None,
            list_calls: Mutex::default(),
            created: Mutex::default(),
            destroyed: Mutex::default(),
        }
    }

    fn failing_on(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    fn list_cursors(&self) -> Vec<Cursor> {
        self.list_calls.lock().unwrap().iter().map(|params| params.cursor).collect()
    }
}

#[async_trait]
impl RelationApi for FakeRelations {
    fn kind(&self) -> RelationKind {
        self.kind
    }

    async fn list(&self, params: &ListParams) -> Result<UserCursorPage, ApiError> {
        self.list_calls.lock().unwrap().push(*params);
        let index = if params.cursor == Cursor::START { 0 } else { (params.cursor.0 / PAGE_STRIDE) as usize };
        if self.fail_on_page == Some(index) {
            return Err(ApiError::Status { status: 429, body: "Rate limit exceeded".to_owned() });
        }
        let next_cursor = if index + 1 < self.pages.len() { (index as i64 + 1) * PAGE_STRIDE } else { 0 };
        Ok(UserCursorPage { users: self.pages.get(index).cloned().unwrap_or_default(), next_cursor })
    }

    async fn create(&self, params: &CreateParams) -> Result<User, ApiError> {
        self.created.lock().unwrap().push(params.clone());
        Ok(user(777, &params.screen_name))
    }

    async fn destroy(&self, params: &DestroyParams) -> Result<User, ApiError> {
        self.destroyed.lock().unwrap().push(*params);
        Ok(user(params.user_id, "gone"))
    }
}

fn alice_and_bob(kind: RelationKind) -> FakeRelations {
    FakeRelations::new(kind, vec![vec![user(1, "alice")], vec![user(2, "bob")]])
}

#[tokio::test]
async fn walks_every_page_with_fixed_params() {
    let api = alice_and_bob(RelationKind::Block);
    let users = all_users(&api).await.unwrap();
    assert_eq!(users, vec![user(1, "alice"), user(2, "bob")]);
    assert_eq!(api.list_cursors(), vec![Cursor::START, Cursor(PAGE_STRIDE)]);
    for params in api.list_calls.lock().unwrap().iter() {
        assert!(!params.include_user_entities);
        assert!(params.skip_status);
    }
}

#[tokio::test]
async fn failed_page_discards_the_listing() {
    let api = FakeRelations::new(
        RelationKind::Mute,
        vec![vec![user(1, "alice")], vec![user(2, "bob")], vec![user(3, "carol")]],
    )
    .failing_on(1);
    let err = all_users(&api).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 429, .. }));
    // The third page is never requested.
    assert_eq!(api.list_cursors().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_reads_resolve_from_one_listing() {
    let api = Arc::new(alice_and_bob(RelationKind::Block));
    let resolver = Resolver::with_window(Arc::clone(&api), WINDOW);
    let ctx = RequestContext::background();

    let (by_id, by_name, missing) = future::join3(
        resolver.read_by_id(&ctx, "2"),
        resolver.import(&ctx, "alice"),
        resolver.read_by_id(&ctx, "99"),
    )
    .await;

    assert_eq!(by_id.unwrap(), Some(user(2, "bob")));
    assert_eq!(by_name.unwrap(), Some(user(1, "alice")));
    assert_eq!(missing.unwrap(), None);

    // One walk over both pages serves all three lookups.
    assert_eq!(api.list_cursors(), vec![Cursor::START, Cursor(PAGE_STRIDE)]);
    assert_eq!(resolver.stats().fetches, 1);
}

#[tokio::test(start_paused = true)]
async fn import_matches_screen_name_exactly() {
    let api = Arc::new(alice_and_bob(RelationKind::Mute));
    let resolver = Resolver::with_window(api, WINDOW);
    let ctx = RequestContext::background();
    assert_eq!(resolver.import(&ctx, "Alice").await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn listing_failure_fails_the_whole_window() {
    let api = Arc::new(alice_and_bob(RelationKind::Block).failing_on(1));
    let resolver = Resolver::with_window(Arc::clone(&api), WINDOW);
    let ctx = RequestContext::background();

    let (a, b) = future::join(resolver.read_by_id(&ctx, "1"), resolver.import(&ctx, "bob")).await;
    for result in [a, b] {
        match result {
            Err(Error::Batch(BatchError::Fetch(err))) => {
                assert!(matches!(*err, ApiError::Status { status: 429, .. }))
            }
            other => panic!("expected shared fetch error, got {other:?}"),
        }
    }
    assert_eq!(resolver.stats().failed_fetches, 1);
}

#[tokio::test]
async fn create_and_delete_bypass_the_batcher() {
    let api = Arc::new(alice_and_bob(RelationKind::Block));
    let resolver = Resolver::with_window(Arc::clone(&api), WINDOW);

    let created = resolver.create("carol").await.unwrap();
    assert_eq!(created.screen_name, "carol");
    resolver.delete("2").await.unwrap();

    assert_eq!(api.created.lock().unwrap().as_slice(), &[CreateParams::new("carol")]);
    assert_eq!(api.destroyed.lock().unwrap().as_slice(), &[DestroyParams::new(2)]);
    assert!(api.list_cursors().is_empty());
    assert_eq!(resolver.stats().windows_opened, 0);
}

#[tokio::test]
async fn delete_rejects_non_numeric_id() {
    let api = Arc::new(alice_and_bob(RelationKind::Mute));
    let resolver = Resolver::with_window(Arc::clone(&api), WINDOW);

    let err = resolver.delete("alice").await.unwrap_err();
    assert!(matches!(err, Error::InvalidId { ref id, .. } if id == "alice"));
    assert!(api.destroyed.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn provider_maps_resolver_results_to_state() {
    let blocks = Arc::new(alice_and_bob(RelationKind::Block));
    let mutes = Arc::new(FakeRelations::new(RelationKind::Mute, vec![vec![user(3, "Carol")]]));
    let lists = Arc::new(FakeLists::with_list(42, "friends", &["alice"]));
    let provider = Provider::from_apis(blocks.clone(), mutes.clone(), lists, WINDOW);
    let ctx = RequestContext::background();

    let (block, vanished, muted) = future::join3(
        provider.read_state(RelationKind::Block, &ctx, "1"),
        provider.read_state(RelationKind::Block, &ctx, "404"),
        provider.import_state(RelationKind::Mute, &ctx, "Carol"),
    )
    .await;
    assert_eq!(block.unwrap(), Some(RelationState { id: "1".into(), screen_name: "alice".into() }));
    assert_eq!(vanished.unwrap(), None);
    assert_eq!(muted.unwrap(), Some(RelationState { id: "3".into(), screen_name: "Carol".into() }));

    // Blocks and mutes batch independently.
    assert_eq!(provider.blocks().stats().fetches, 1);
    assert_eq!(provider.mutes().stats().fetches, 1);
    assert_eq!(mutes.list_cursors(), vec![Cursor::START]);

    let created = provider.create_state(RelationKind::Mute, "dave").await.unwrap();
    assert_eq!(created, RelationState { id: "777".into(), screen_name: "dave".into() });
    provider.delete_state(RelationKind::Block, "1").await.unwrap();
    assert_eq!(blocks.destroyed.lock().unwrap().as_slice(), &[DestroyParams::new(1)]);

    let list = provider.lists().read("42").await.unwrap();
    assert_eq!(list.members, vec!["alice"]);
}
