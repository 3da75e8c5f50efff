//! Client trait definition
//!
//! This module defines the `Client` trait that abstracts over different client implementations.

use super::ClientError;
use crate::models::{
    IntakeSuggestion, NewTask, Project, ProjectId, Status, Task, TaskId, TaskUpdate,
};

/// Trait defining the API client interface for the tasktrack service
#[async_trait::async_trait]
pub trait Client {
    /// Check that the service is alive
    async fn health(&self) -> Result<bool, ClientError>;

    /// List all projects in creation order
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;

    /// Create a new project
    async fn create_project(&self, name: String) -> Result<Project, ClientError>;

    /// Get a project by ID
    async fn get_project(&self, id: ProjectId) -> Result<Project, ClientError>;

    /// Delete a project and all of its tasks
    async fn delete_project(&self, id: ProjectId) -> Result<(), ClientError>;

    /// List a project's tasks, optionally filtered by status
    async fn list_tasks(
        &self,
        project_id: ProjectId,
        status: Option<Status>,
    ) -> Result<Vec<Task>, ClientError>;

    /// Create a task under a project
    async fn create_task(&self, project_id: ProjectId, task: NewTask)
        -> Result<Task, ClientError>;

    /// Get a task by ID
    async fn get_task(&self, id: TaskId) -> Result<Task, ClientError>;

    /// Apply a partial update to a task
    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, ClientError>;

    /// Ask the intake classifier for a title and priority
    async fn intake(&self, input: String) -> Result<IntakeSuggestion, ClientError>;
}
