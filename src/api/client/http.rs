//! HTTP client implementation
//!
//! This module provides a reqwest-based client for a running tasktrack server.

use reqwest::{Client as ReqwestClient, Error as ReqwestError, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::Client;
use crate::api::server::{ErrorResponse, HealthResponse, ListTasksQuery};
use crate::models::{
    IntakeRequest, IntakeSuggestion, NewProject, NewTask, Project, ProjectId, Status, Task,
    TaskId, TaskUpdate,
};

/// API client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] ReqwestError),

    #[error("{0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// API client for a tasktrack server
#[derive(Debug, Clone)]
pub struct HttpClientImpl {
    http_client: ReqwestClient,
    config: ClientConfig,
}

impl HttpClientImpl {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            http_client: ReqwestClient::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

impl Default for HttpClientImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a non-success response into a ClientError
async fn error_from(response: Response) -> ClientError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return ClientError::Http(e),
    };
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => error.detail,
        Err(_) if !body.is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown API error")
            .to_string(),
    };

    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound(message)
    } else {
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(error_from(response).await)
    }
}

#[async_trait::async_trait]
impl Client for HttpClientImpl {
    async fn health(&self) -> Result<bool, ClientError> {
        let response = self.http_client.get(self.url("/healthz")).send().await?;
        let health: HealthResponse = decode(response).await?;
        Ok(health.ok)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response = self.http_client.get(self.url("/api/projects")).send().await?;
        decode(response).await
    }

    async fn create_project(&self, name: String) -> Result<Project, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/projects"))
            .json(&NewProject { name })
            .send()
            .await?;
        decode(response).await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/projects/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/projects/{}", id)))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    async fn list_tasks(
        &self,
        project_id: ProjectId,
        status: Option<Status>,
    ) -> Result<Vec<Task>, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/projects/{}/tasks", project_id)))
            .query(&ListTasksQuery { status })
            .send()
            .await?;
        decode(response).await
    }

    async fn create_task(
        &self,
        project_id: ProjectId,
        task: NewTask,
    ) -> Result<Task, ClientError> {
        let response = self
            .http_client
            .post(self.url(&format!("/api/projects/{}/tasks", project_id)))
            .json(&task)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/tasks/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, ClientError> {
        let response = self
            .http_client
            .patch(self.url(&format!("/api/tasks/{}", id)))
            .json(&update)
            .send()
            .await?;
        decode(response).await
    }

    async fn intake(&self, input: String) -> Result<IntakeSuggestion, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/ai/intake"))
            .json(&IntakeRequest { input })
            .send()
            .await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::{router, ServerConfig};
    use crate::models::Priority;
    use crate::Core;
    use tokio::net::TcpListener;

    // Serves a fresh Core on an ephemeral port and returns a client for it
    async fn spawn_server() -> HttpClientImpl {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let app = router(Core::new(), &ServerConfig::default());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        HttpClientImpl::with_config(ClientConfig {
            base_url: format!("http://{}/", address),
        })
    }

    #[tokio::test]
    async fn test_http_client_against_server() {
        let client = spawn_server().await;
        assert!(client.health().await.unwrap());

        let project = client.create_project("Remote".to_string()).await.unwrap();
        assert_eq!(project.id, 1);
        assert_eq!(client.get_project(project.id).await.unwrap(), project);
        assert!(matches!(
            client.get_project(2).await,
            Err(ClientError::NotFound(_))
        ));

        let task = client
            .create_task(
                project.id,
                NewTask::new("Ship it", Priority::High).with_description("before friday"),
            )
            .await
            .unwrap();
        let update = TaskUpdate {
            status: Some(Status::InProgress),
            description: Some(None),
            ..Default::default()
        };
        let updated = client.update_task(task.id, update).await.unwrap();
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.description, None);

        let in_progress = client
            .list_tasks(project.id, Some(Status::InProgress))
            .await
            .unwrap();
        assert_eq!(in_progress, vec![updated.clone()]);
        assert!(client
            .list_tasks(project.id, Some(Status::Done))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(client.get_task(task.id).await.unwrap(), updated);

        let suggestion = client.intake("someday, maybe".to_string()).await.unwrap();
        assert_eq!(suggestion.priority, Priority::Low);

        client.delete_project(project.id).await.unwrap();
        assert!(client.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_client_not_found() {
        let client = spawn_server().await;
        match client.list_tasks(999, None).await {
            Err(ClientError::NotFound(message)) => assert_eq!(message, "Project 999 not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(matches!(
            client.delete_project(1).await,
            Err(ClientError::NotFound(_))
        ));
    }
}
