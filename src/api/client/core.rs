//! Core client implementation
//!
//! This module provides a client implementation that wraps Core directly,
//! providing the same interface as HttpClientImpl but without HTTP overhead.

use super::{Client, ClientError};
use crate::models::{
    IntakeSuggestion, NewTask, Project, ProjectId, Status, Task, TaskId, TaskUpdate, TrackerError,
};
use crate::Core;

/// A client implementation that wraps Core directly
#[derive(Clone, Default)]
pub struct CoreClient {
    core: Core,
}

impl CoreClient {
    /// Create a new CoreClient with the given Core instance
    pub fn new(core: Core) -> Self {
        Self { core }
    }

    /// The wrapped Core
    pub fn core(&self) -> &Core {
        &self.core
    }
}

/// Convert TrackerError to ClientError for interface compatibility
impl From<TrackerError> for ClientError {
    fn from(error: TrackerError) -> Self {
        ClientError::NotFound(error.to_string())
    }
}

#[async_trait::async_trait]
impl Client for CoreClient {
    async fn health(&self) -> Result<bool, ClientError> {
        Ok(true)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        Ok(self.core.list_projects())
    }

    async fn create_project(&self, name: String) -> Result<Project, ClientError> {
        Ok(self.core.create_project(name))
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, ClientError> {
        self.core.get_project(id).map_err(ClientError::from)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), ClientError> {
        self.core.delete_project(id).map_err(ClientError::from)
    }

    async fn list_tasks(
        &self,
        project_id: ProjectId,
        status: Option<Status>,
    ) -> Result<Vec<Task>, ClientError> {
        self.core
            .list_tasks(project_id, status)
            .map_err(ClientError::from)
    }

    async fn create_task(
        &self,
        project_id: ProjectId,
        task: NewTask,
    ) -> Result<Task, ClientError> {
        self.core
            .create_task(project_id, task)
            .map_err(ClientError::from)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ClientError> {
        self.core.get_task(id).map_err(ClientError::from)
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, ClientError> {
        self.core.update_task(id, update).map_err(ClientError::from)
    }

    async fn intake(&self, input: String) -> Result<IntakeSuggestion, ClientError> {
        Ok(self.core.intake(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[tokio::test]
    async fn test_core_client_round_trip() {
        let client = CoreClient::default();
        let project = client.create_project("Client".to_string()).await.unwrap();
        let task = client
            .create_task(project.id, NewTask::new("Write docs", Priority::Low))
            .await
            .unwrap();

        let update = TaskUpdate {
            status: Some(Status::Done),
            ..Default::default()
        };
        let updated = client.update_task(task.id, update).await.unwrap();
        assert_eq!(updated.status, Status::Done);
        assert_eq!(updated.title, "Write docs");

        let done = client
            .list_tasks(project.id, Some(Status::Done))
            .await
            .unwrap();
        assert_eq!(done, vec![updated]);
        assert_eq!(client.core().list_projects(), vec![project]);
    }

    #[tokio::test]
    async fn test_core_client_maps_not_found() {
        let client = CoreClient::default();
        let err = client.get_task(5).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref msg) if msg == "Task 5 not found"));
    }
}
