//! Roster REST client.
//!
//! Commands talk to the server only through [`RosterApi`], so tests can swap
//! in a fake. [`HttpRosterApi`] is the `reqwest` implementation.

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use roster_states::snapshot_state;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::activity::{ActivityQuery, RawActivityLog};
use crate::bulk::{
    ChangeBatchBody, ExtendSessionBody, MutationPayload, ReRegisterBody, StudentsBody,
};
use crate::{BusinessConfig, PageEnvelope, StudentRow, StudentsQuery};

/// One failed request. Bulk operations report a single aggregate error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API returned status: {0}")]
    Status(u16),
    #[error("failed to parse response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait RosterApi: Send + Sync + 'static {
    async fn change_batch(&self, body: &ChangeBatchBody) -> ApiResult<()>;
    async fn extend_session(&self, body: &ExtendSessionBody) -> ApiResult<()>;
    async fn re_register(&self, body: &ReRegisterBody) -> ApiResult<()>;
    async fn terminate(&self, body: &StudentsBody) -> ApiResult<()>;
    async fn delete(&self, body: &StudentsBody) -> ApiResult<()>;

    async fn fetch_students(&self, query: &StudentsQuery) -> ApiResult<PageEnvelope<StudentRow>>;
    async fn fetch_activity_logs(
        &self,
        query: &ActivityQuery,
    ) -> ApiResult<PageEnvelope<RawActivityLog>>;
}

/// Sends `payload` with the matching endpoint. Exactly one call per payload.
pub async fn submit(api: &dyn RosterApi, payload: &MutationPayload) -> ApiResult<()> {
    match payload {
        MutationPayload::ChangeBatch(body) => api.change_batch(body).await,
        MutationPayload::ExtendSession(body) => api.extend_session(body).await,
        MutationPayload::ReRegister(body) => api.re_register(body).await,
        MutationPayload::Terminate(body) => api.terminate(body).await,
        MutationPayload::Delete(body) => api.delete(body).await,
    }
}

/// Store handle to the active client.
#[derive(Clone)]
pub struct ApiState {
    api: Arc<dyn RosterApi>,
}

snapshot_state!(ApiState);

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState").finish_non_exhaustive()
    }
}

impl ApiState {
    pub fn new(api: impl RosterApi) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_arc(api: Arc<dyn RosterApi>) -> Self {
        Self { api }
    }

    pub fn http(config: &BusinessConfig) -> Self {
        Self::new(HttpRosterApi::new(config))
    }

    pub fn api(&self) -> Arc<dyn RosterApi> {
        Arc::clone(&self.api)
    }
}

#[derive(Debug, Clone)]
pub struct HttpRosterApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpRosterApi {
    pub fn new(config: &BusinessConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url().as_str().to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResult<()> {
        let url = self.url(path);
        info!("HttpRosterApi: POST {url}");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        check_status(&url, response.status().as_u16())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path);
        info!("HttpRosterApi: GET {url}");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        check_status(&url, response.status().as_u16())?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn check_status(url: &str, status: u16) -> ApiResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        error!("HttpRosterApi: {url} returned {status}");
        Err(ApiError::Status(status))
    }
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn change_batch(&self, body: &ChangeBatchBody) -> ApiResult<()> {
        self.post("/learners/change-batch", body).await
    }

    async fn extend_session(&self, body: &ExtendSessionBody) -> ApiResult<()> {
        self.post("/learners/extend-session", body).await
    }

    async fn re_register(&self, body: &ReRegisterBody) -> ApiResult<()> {
        self.post("/learners/re-register", body).await
    }

    async fn terminate(&self, body: &StudentsBody) -> ApiResult<()> {
        self.post("/learners/terminate", body).await
    }

    async fn delete(&self, body: &StudentsBody) -> ApiResult<()> {
        self.post("/learners/delete", body).await
    }

    async fn fetch_students(&self, query: &StudentsQuery) -> ApiResult<PageEnvelope<StudentRow>> {
        let mut params = vec![
            ("page_no", query.page_no.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        if !query.search.trim().is_empty() {
            params.push(("search", query.search.trim().to_string()));
        }
        self.get_json(
            &format!("/institutes/{}/learners", query.institute_id),
            &params,
        )
        .await
    }

    async fn fetch_activity_logs(
        &self,
        query: &ActivityQuery,
    ) -> ApiResult<PageEnvelope<RawActivityLog>> {
        let params = [
            ("slide_id", query.slide_id.clone()),
            ("page_no", query.page_no.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        self.get_json(&format!("/learners/{}/activity-logs", query.user_id), &params)
            .await
    }
}
