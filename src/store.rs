//! In-memory store for projects and tasks
//!
//! `Store` is a plain repository: it assigns IDs, looks records up and
//! cascades project deletion, but never checks that a task's project exists.
//! `Core` wraps a `Store` behind a mutex, performs those existence checks and
//! is what the server and clients share.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::intake;
use crate::models::{
    IntakeSuggestion, NewTask, Project, ProjectId, Status, Task, TaskId, TaskUpdate, TrackerError,
};

/// Authoritative state for projects and tasks.
///
/// Both maps are keyed by monotonically assigned IDs, so iteration order is
/// insertion order.
#[derive(Debug)]
pub struct Store {
    projects: BTreeMap<ProjectId, Project>,
    tasks: BTreeMap<TaskId, Task>,
    next_project_id: ProjectId,
    next_task_id: TaskId,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            projects: BTreeMap::new(),
            tasks: BTreeMap::new(),
            next_project_id: 1,
            next_task_id: 1,
        }
    }

    /// Clears both collections and restarts both ID counters at 1
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn create_project(&mut self, name: String) -> Project {
        let id = self.next_project_id;
        self.next_project_id += 1;

        let project = Project { id, name };
        self.projects.insert(id, project.clone());
        project
    }

    pub fn get_project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.projects.values().cloned().collect()
    }

    /// Removes the project and every task that belongs to it.
    ///
    /// Returns false if there was no such project.
    pub fn delete_project(&mut self, id: ProjectId) -> bool {
        if self.projects.remove(&id).is_none() {
            return false;
        }
        self.tasks.retain(|_, task| task.project_id != id);
        true
    }

    /// Stores a new task under `project_id` without checking the project exists
    pub fn create_task(&mut self, project_id: ProjectId, new_task: NewTask) -> Task {
        let id = self.next_task_id;
        self.next_task_id += 1;

        let task = Task {
            id,
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            project_id,
        };
        self.tasks.insert(id, task.clone());
        task
    }

    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Tasks of a project, optionally restricted to one status
    pub fn list_tasks(&self, project_id: ProjectId, status: Option<Status>) -> Vec<Task> {
        self.tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .filter(|task| status.map_or(true, |status| task.status == status))
            .cloned()
            .collect()
    }

    pub fn update_task(&mut self, id: TaskId, update: TaskUpdate) -> Option<Task> {
        let task = self.tasks.get_mut(&id)?;
        update.apply_to(task);
        Some(task.clone())
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Shared handle to a `Store`.
///
/// Cloning is cheap; every clone sees the same state. Each method holds the
/// lock for its whole body, so check-then-act sequences are atomic.
#[derive(Clone, Default)]
pub struct Core {
    inner: Arc<Mutex<Store>>,
}

impl Core {
    pub fn new() -> Self {
        Self::with_store(Store::new())
    }

    /// Wraps an already populated store
    pub fn with_store(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn create_project(&self, name: String) -> Project {
        let project = self.store().create_project(name);
        tracing::info!(project_id = project.id, "created project");
        project
    }

    pub fn get_project(&self, id: ProjectId) -> Result<Project, TrackerError> {
        self.store()
            .get_project(id)
            .cloned()
            .ok_or(TrackerError::ProjectNotFound(id))
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.store().list_projects()
    }

    /// Deletes a project together with its tasks
    pub fn delete_project(&self, id: ProjectId) -> Result<(), TrackerError> {
        let mut store = self.store();
        let tasks_before = store.task_count();
        if !store.delete_project(id) {
            return Err(TrackerError::ProjectNotFound(id));
        }
        tracing::info!(
            project_id = id,
            removed_tasks = tasks_before - store.task_count(),
            "deleted project"
        );
        Ok(())
    }

    /// Creates a task, failing if the project does not exist
    pub fn create_task(
        &self,
        project_id: ProjectId,
        new_task: NewTask,
    ) -> Result<Task, TrackerError> {
        let mut store = self.store();
        if store.get_project(project_id).is_none() {
            return Err(TrackerError::ProjectNotFound(project_id));
        }
        let task = store.create_task(project_id, new_task);
        tracing::info!(task_id = task.id, project_id, "created task");
        Ok(task)
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task, TrackerError> {
        self.store()
            .get_task(id)
            .cloned()
            .ok_or(TrackerError::TaskNotFound(id))
    }

    /// Lists a project's tasks, failing if the project does not exist
    pub fn list_tasks(
        &self,
        project_id: ProjectId,
        status: Option<Status>,
    ) -> Result<Vec<Task>, TrackerError> {
        let store = self.store();
        if store.get_project(project_id).is_none() {
            return Err(TrackerError::ProjectNotFound(project_id));
        }
        Ok(store.list_tasks(project_id, status))
    }

    pub fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, TrackerError> {
        tracing::debug!(task_id = id, ?update, "updating task");
        self.store()
            .update_task(id, update)
            .ok_or(TrackerError::TaskNotFound(id))
    }

    pub fn intake(&self, input: &str) -> IntakeSuggestion {
        intake::classify(input)
    }

    pub fn reset(&self) {
        self.store().reset();
        tracing::debug!("store reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_project_ids_are_monotonic_and_not_reused() {
        let mut store = Store::new();
        let first = store.create_project("First".to_string());
        let second = store.create_project("Second".to_string());
        assert_eq!((first.id, second.id), (1, 2));

        assert!(store.delete_project(second.id));
        let third = store.create_project("Third".to_string());
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_delete_project_cascades_to_its_tasks_only() {
        let mut store = Store::new();
        let doomed = store.create_project("Doomed".to_string());
        let kept = store.create_project("Kept".to_string());

        let doomed_task = store.create_task(doomed.id, NewTask::new("a", Priority::Low));
        store.create_task(doomed.id, NewTask::new("b", Priority::High));
        let kept_task = store.create_task(kept.id, NewTask::new("c", Priority::Med));

        assert!(store.delete_project(doomed.id));
        assert!(store.get_project(doomed.id).is_none());
        assert!(store.get_task(doomed_task.id).is_none());
        assert!(store.list_tasks(doomed.id, None).is_empty());
        assert_eq!(store.list_tasks(kept.id, None), vec![kept_task]);
        assert_eq!(store.task_count(), 1);
    }

    #[test]
    fn test_delete_missing_project_is_a_noop() {
        let mut store = Store::new();
        store.create_project("Only".to_string());
        assert!(!store.delete_project(42));
        assert_eq!(store.project_count(), 1);
    }

    #[test]
    fn test_store_does_not_validate_project_on_create() {
        let mut store = Store::new();
        let task = store.create_task(999, NewTask::new("Orphan", Priority::Med));
        assert_eq!(task.project_id, 999);
    }

    #[test]
    fn test_update_missing_task_returns_none() {
        let mut store = Store::new();
        assert!(store.update_task(7, TaskUpdate::default()).is_none());
    }

    #[test]
    fn test_reset_restarts_counters() {
        let mut store = Store::new();
        let project = store.create_project("P".to_string());
        store.create_task(project.id, NewTask::new("T", Priority::Low));

        store.reset();
        assert_eq!(store.project_count(), 0);
        assert_eq!(store.task_count(), 0);
        assert_eq!(store.create_project("Again".to_string()).id, 1);
        assert_eq!(store.create_task(1, NewTask::new("T", Priority::Low)).id, 1);
    }

    #[test]
    fn test_core_checks_project_existence() {
        let core = Core::new();
        assert_eq!(
            core.create_task(999, NewTask::new("Task", Priority::Med)),
            Err(TrackerError::ProjectNotFound(999))
        );
        assert_eq!(
            core.list_tasks(999, None),
            Err(TrackerError::ProjectNotFound(999))
        );
        assert_eq!(
            core.delete_project(999),
            Err(TrackerError::ProjectNotFound(999))
        );
        assert_eq!(
            core.update_task(999, TaskUpdate::default()),
            Err(TrackerError::TaskNotFound(999))
        );
    }

    #[test]
    fn test_core_clones_share_state() {
        let core = Core::new();
        let other = core.clone();
        let project = core.create_project("Shared".to_string());
        assert_eq!(other.get_project(project.id), Ok(project));

        other.reset();
        assert!(core.list_projects().is_empty());
    }
}
