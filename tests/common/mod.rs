#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use twitter_provider_rs::{
    ApiError, List, ListCreateParams, ListMembersParams, ListMode, ListUpdateParams, ListsApi, User,
    UserCursorPage,
};

/// In-memory lists API holding a single list, recording every call it receives.
#[derive(Default)]
pub struct FakeLists {
    pub list: Mutex<Option<List>>,
    pub members: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeLists {
    pub fn with_list(id: i64, name: &str, members: &[&str]) -> Self {
        let fake = FakeLists::default();
        *fake.list.lock().unwrap() = Some(list(id, name, ListMode::Public, ""));
        *fake.members.lock().unwrap() = members.iter().map(|m| m.to_string()).collect();
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn current(&self, list_id: i64) -> Result<List, ApiError> {
        match self.list.lock().unwrap().clone() {
            Some(list) if list.id == list_id => Ok(list),
            _ => Err(ApiError::Status { status: 404, body: "list not found".to_owned() }),
        }
    }
}

pub fn list(id: i64, name: &str, mode: ListMode, description: &str) -> List {
    List {
        id,
        id_str: id.to_string(),
        name: name.to_owned(),
        mode,
        description: description.to_owned(),
        slug: name.to_lowercase(),
        uri: format!("/me/lists/{}", name.to_lowercase()),
    }
}

#[async_trait]
impl ListsApi for FakeLists {
    async fn create(&self, params: &ListCreateParams) -> Result<List, ApiError> {
        self.record(format!("create {}", params.name));
        let created = list(500, &params.name, params.mode, &params.description);
        *self.list.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn show(&self, list_id: i64) -> Result<List, ApiError> {
        self.record(format!("show {list_id}"));
        self.current(list_id)
    }

    async fn update(&self, params: &ListUpdateParams) -> Result<(), ApiError> {
        self.record(format!("update {}", params.list_id));
        self.current(params.list_id)?;
        *self.list.lock().unwrap() =
            Some(list(params.list_id, &params.name, params.mode, &params.description));
        Ok(())
    }

    async fn destroy(&self, list_id: i64) -> Result<List, ApiError> {
        self.record(format!("destroy {list_id}"));
        let list = self.current(list_id)?;
        *self.list.lock().unwrap() = None;
        Ok(list)
    }

    async fn members(&self, params: &ListMembersParams) -> Result<UserCursorPage, ApiError> {
        self.record(format!("members {} count={}", params.list_id, params.count));
        self.current(params.list_id)?;
        let users = self
            .members
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, name)| User {
                id: i as i64 + 1,
                id_str: (i + 1).to_string(),
                screen_name: name.clone(),
                name: name.clone(),
            })
            .collect();
        Ok(UserCursorPage { users, next_cursor: 0 })
    }

    async fn members_create_all(&self, list_id: i64, screen_names: &[String]) -> Result<(), ApiError> {
        self.record(format!("add {list_id} {}", screen_names.join(",")));
        self.members.lock().unwrap().extend(screen_names.iter().cloned());
        Ok(())
    }

    async fn members_destroy_all(&self, list_id: i64, screen_names: &[String]) -> Result<(), ApiError> {
        self.record(format!("remove {list_id} {}", screen_names.join(",")));
        self.members.lock().unwrap().retain(|m| !screen_names.contains(m));
        Ok(())
    }
}
