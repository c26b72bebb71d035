//! reqwest-backed implementation of [`RecoveryApi`]

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ApiError, ApiResult, RecoveryApi};
use crate::config::Config;
use crate::filter::Filter;
use crate::models::{
    Ack, Completion, CompletionStats, CompletionUpdate, Cycle, CycleUpdate, Exercise,
    ExerciseUpdate, NewCompletion, NewCycle, NewExercise, NewTask, Task, TaskCompletion,
    TaskUpdate,
};

/// Error body shape the backend uses: `{ "error": "..." }`
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the Salus backend
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    http: Client,
}

impl HttpApiClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("salus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a client for the configured backend
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, filter: Option<&Filter>) -> ApiResult<T> {
        let url = self.url(path);
        let mut request = self.http.get(&url);
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            request = request.query(filter);
        }
        self.send(Method::GET, url, request).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.http.request(method.clone(), &url).json(body);
        self.send(method, url, request).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        let request = self.http.delete(&url);
        self.send(Method::DELETE, url, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        debug!("{} {}", method, url);

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "{} {} failed",
                method,
                url
            );
            return Err(ApiError::server(url, status.as_u16(), message));
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            url,
            details: e.to_string(),
        })
    }
}

/// Extract the `error` field from a failure body, if the body has one
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
}

#[async_trait]
impl RecoveryApi for HttpApiClient {
    async fn list_cycles(&self, filter: &Filter) -> ApiResult<Vec<Cycle>> {
        self.get("/cycles", Some(filter)).await
    }

    async fn get_cycle(&self, id: i64) -> ApiResult<Cycle> {
        self.get(&format!("/cycles/{}", id), None).await
    }

    async fn create_cycle(&self, cycle: &NewCycle) -> ApiResult<Ack> {
        self.send_json(Method::POST, "/cycles", cycle).await
    }

    async fn update_cycle(&self, id: i64, update: &CycleUpdate) -> ApiResult<Ack> {
        self.send_json(Method::PUT, &format!("/cycles/{}", id), update)
            .await
    }

    async fn delete_cycle(&self, id: i64) -> ApiResult<Ack> {
        self.delete(&format!("/cycles/{}", id)).await
    }

    async fn list_tasks(&self, filter: &Filter) -> ApiResult<Vec<Task>> {
        self.get("/tasks", Some(filter)).await
    }

    async fn get_task(&self, id: i64) -> ApiResult<Task> {
        self.get(&format!("/tasks/{}", id), None).await
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Ack> {
        self.send_json(Method::POST, "/tasks", task).await
    }

    async fn update_task(&self, id: i64, update: &TaskUpdate) -> ApiResult<Ack> {
        self.send_json(Method::PUT, &format!("/tasks/{}", id), update)
            .await
    }

    async fn complete_task(&self, id: i64, completion: &TaskCompletion) -> ApiResult<Ack> {
        self.send_json(Method::POST, &format!("/tasks/{}/complete", id), completion)
            .await
    }

    async fn list_exercises(&self, filter: &Filter) -> ApiResult<Vec<Exercise>> {
        self.get("/exercises", Some(filter)).await
    }

    async fn get_exercise(&self, id: i64) -> ApiResult<Exercise> {
        self.get(&format!("/exercises/{}", id), None).await
    }

    async fn create_exercise(&self, exercise: &NewExercise) -> ApiResult<Ack> {
        self.send_json(Method::POST, "/exercises", exercise).await
    }

    async fn update_exercise(&self, id: i64, update: &ExerciseUpdate) -> ApiResult<Ack> {
        self.send_json(Method::PUT, &format!("/exercises/{}", id), update)
            .await
    }

    async fn delete_exercise(&self, id: i64) -> ApiResult<Ack> {
        self.delete(&format!("/exercises/{}", id)).await
    }

    async fn list_completions(&self, filter: &Filter) -> ApiResult<Vec<Completion>> {
        self.get("/completions", Some(filter)).await
    }

    async fn get_completion(&self, id: i64) -> ApiResult<Completion> {
        self.get(&format!("/completions/{}", id), None).await
    }

    async fn create_completion(&self, completion: &NewCompletion) -> ApiResult<Ack> {
        self.send_json(Method::POST, "/completions", completion).await
    }

    async fn update_completion(&self, id: i64, update: &CompletionUpdate) -> ApiResult<Ack> {
        self.send_json(Method::PUT, &format!("/completions/{}", id), update)
            .await
    }

    async fn delete_completion(&self, id: i64) -> ApiResult<Ack> {
        self.delete(&format!("/completions/{}", id)).await
    }

    async fn completion_stats(&self, filter: &Filter) -> ApiResult<CompletionStats> {
        self.get("/completions/stats", Some(filter)).await
    }
}
