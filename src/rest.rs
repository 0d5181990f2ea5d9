//! `reqwest` implementations of [`RelationApi`] and [`ListsApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    api::{
        CreateParams, DestroyParams, List, ListCreateParams, ListMembersParams, ListParams,
        ListUpdateParams, ListsApi, RelationApi, RelationKind, User, UserCursorPage,
    },
    error::ApiError,
};

/// Talks to the REST endpoints of one relationship kind.
///
/// The `reqwest::Client` is expected to arrive fully configured: request signing and
/// rate-limit backoff live in its middleware, not here. Cloning is cheap and shares the client.
#[derive(Debug, Clone)]
pub struct RestRelations {
    http: Client,
    base_url: Url,
    kind: RelationKind,
}

impl RestRelations {
    pub fn new(http: Client, base_url: Url, kind: RelationKind) -> Self {
        Self { http, base_url, kind }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn list_query(params: &ListParams) -> Vec<(&'static str, String)> {
        vec![
            ("cursor", params.cursor.0.to_string()),
            ("include_user_entities", params.include_user_entities.to_string()),
            ("skip_status", params.skip_status.to_string()),
        ]
    }

    pub(crate) fn create_form(&self, params: &CreateParams) -> Vec<(&'static str, String)> {
        let mut form = vec![("screen_name", params.screen_name.clone())];
        if self.kind.mutation_takes_flags() {
            form.push(("include_entities", params.include_entities.to_string()));
            form.push(("skip_status", params.skip_status.to_string()));
        }
        form
    }

    pub(crate) fn destroy_form(&self, params: &DestroyParams) -> Vec<(&'static str, String)> {
        let mut form = vec![("user_id", params.user_id.to_string())];
        if self.kind.mutation_takes_flags() {
            form.push(("include_entities", params.include_entities.to_string()));
            form.push(("skip_status", params.skip_status.to_string()));
        }
        form
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }
}

/// Maps a non-success status to [`ApiError::Status`] with the raw body, otherwise decodes JSON.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Like [`decode`] for endpoints whose response body is not needed.
async fn expect_success(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    Ok(())
}

#[async_trait]
impl RelationApi for RestRelations {
    fn kind(&self) -> RelationKind {
        self.kind
    }

    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    async fn list(&self, params: &ListParams) -> Result<UserCursorPage, ApiError> {
        let url = self.endpoint(self.kind.list_path())?;
        let response = self.http.get(url).query(&Self::list_query(params)).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    async fn create(&self, params: &CreateParams) -> Result<User, ApiError> {
        let url = self.endpoint(self.kind.create_path())?;
        let response = self.http.post(url).form(&self.create_form(params)).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    async fn destroy(&self, params: &DestroyParams) -> Result<User, ApiError> {
        let url = self.endpoint(self.kind.destroy_path())?;
        let response = self.http.post(url).form(&self.destroy_form(params)).send().await?;
        decode(response).await
    }
}

/// Talks to the list and list-member endpoints. Same client expectations as [`RestRelations`].
#[derive(Debug, Clone)]
pub struct RestLists {
    http: Client,
    base_url: Url,
}

impl RestLists {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn create_form(params: &ListCreateParams) -> Vec<(&'static str, String)> {
        vec![
            ("name", params.name.clone()),
            ("mode", params.mode.as_str().to_owned()),
            ("description", params.description.clone()),
        ]
    }

    pub(crate) fn update_form(params: &ListUpdateParams) -> Vec<(&'static str, String)> {
        vec![
            ("list_id", params.list_id.to_string()),
            ("name", params.name.clone()),
            ("mode", params.mode.as_str().to_owned()),
            ("description", params.description.clone()),
        ]
    }

    pub(crate) fn members_query(params: &ListMembersParams) -> Vec<(&'static str, String)> {
        vec![
            ("list_id", params.list_id.to_string()),
            ("count", params.count.to_string()),
            ("include_entities", params.include_entities.to_string()),
            ("skip_status", params.skip_status.to_string()),
        ]
    }

    pub(crate) fn members_form(list_id: i64, screen_names: &[String]) -> Vec<(&'static str, String)> {
        vec![("list_id", list_id.to_string()), ("screen_name", screen_names.join(","))]
    }
}

#[async_trait]
impl ListsApi for RestLists {
    #[tracing::instrument(skip(self))]
    async fn create(&self, params: &ListCreateParams) -> Result<List, ApiError> {
        let url = self.endpoint("lists/create.json")?;
        let response = self.http.post(url).form(&Self::create_form(params)).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn show(&self, list_id: i64) -> Result<List, ApiError> {
        let url = self.endpoint("lists/show.json")?;
        let response = self.http.get(url).query(&[("list_id", list_id)]).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, params: &ListUpdateParams) -> Result<(), ApiError> {
        let url = self.endpoint("lists/update.json")?;
        let response = self.http.post(url).form(&Self::update_form(params)).send().await?;
        expect_success(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn destroy(&self, list_id: i64) -> Result<List, ApiError> {
        let url = self.endpoint("lists/destroy.json")?;
        let response = self.http.post(url).form(&[("list_id", list_id)]).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn members(&self, params: &ListMembersParams) -> Result<UserCursorPage, ApiError> {
        let url = self.endpoint("lists/members.json")?;
        let response = self.http.get(url).query(&Self::members_query(params)).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn members_create_all(&self, list_id: i64, screen_names: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint("lists/members/create_all.json")?;
        let form = Self::members_form(list_id, screen_names);
        expect_success(self.http.post(url).form(&form).send().await?).await
    }

    #[tracing::instrument(skip(self))]
    async fn members_destroy_all(&self, list_id: i64, screen_names: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint("lists/members/destroy_all.json")?;
        let form = Self::members_form(list_id, screen_names);
        expect_success(self.http.post(url).form(&form).send().await?).await
    }
}
