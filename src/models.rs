//! Core models for the tasktrack library
//!
//! This module contains the data types shared by the store, the intake
//! classifier, the API server and the clients.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a project
pub type ProjectId = u64;

/// Identifier of a task
pub type TaskId = u64;

/// Workflow state of a task
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Todo,
    #[serde(rename = "In-Progress")]
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    /// The wire label of this status
    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "Todo",
            Status::InProgress => "In-Progress",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "invalid status '{}' (expected one of: Todo, In-Progress, Done)",
                    s
                )
            })
    }
}

/// Urgency of a task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Med, Priority::High];

    /// The wire label of this priority
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Med => "Med",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid priority '{}' (expected one of: Low, Med, High)", s))
    }
}

/// A named container of tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

/// A unit of work belonging to exactly one project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub project_id: ProjectId,
}

/// Request body for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
}

/// Fields supplied when creating a task; the project comes from the path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub priority: Priority,
}

impl NewTask {
    /// Creates a `Todo` task payload without a description
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: Status::Todo,
            priority,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Partial update of a task. `None` leaves a field untouched.
///
/// `description` is doubly optional: an absent key is `None`, an explicit
/// `null` is `Some(None)` and clears the stored description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskUpdate {
    /// Returns true if no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }

    /// Applies the supplied fields to `task`, never touching its identity
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for the intake classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRequest {
    pub input: String,
}

/// Suggested title and priority for a piece of free text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeSuggestion {
    pub title: String,
    pub priority: Priority,
}

/// Errors returned by `Core` operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("Project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_wire_labels() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).unwrap(),
            json!("In-Progress")
        );
        let parsed: Status = serde_json::from_value(json!("Done")).unwrap();
        assert_eq!(parsed, Status::Done);
        assert!(serde_json::from_value::<Status>(json!("Blocked")).is_err());
        assert!(serde_json::from_value::<Priority>(json!("Medium")).is_err());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("soon".parse::<Priority>().is_err());
    }

    #[test]
    fn test_new_task_defaults_to_todo() {
        let task: NewTask =
            serde_json::from_value(json!({ "title": "Task", "priority": "Med" })).unwrap();
        assert_eq!(task, NewTask::new("Task", Priority::Med));
    }

    #[test]
    fn test_update_distinguishes_absent_and_null_description() {
        let absent: TaskUpdate = serde_json::from_value(json!({ "title": "New" })).unwrap();
        assert_eq!(absent.description, None);

        let cleared: TaskUpdate =
            serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: TaskUpdate =
            serde_json::from_value(json!({ "description": "details" })).unwrap();
        assert_eq!(set.description, Some(Some("details".to_string())));
    }

    #[test]
    fn test_update_serializes_only_supplied_fields() {
        let update = TaskUpdate {
            status: Some(Status::Done),
            description: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "description": null, "status": "Done" })
        );
        assert!(TaskUpdate::default().is_empty());
    }
}
