//! Tasks: entity, store, and service.
//!
//! Task creation checks that the referenced project and assignee exist.
//! Later deletion of either is not checked, so a stored task may point at a
//! project or user that no longer exists.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::project::ProjectStore;
use crate::storage::{Entity, EntityStore};
use crate::user::UserStore;

/// Store for [`Task`] records
pub type TaskStore = EntityStore<Task>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "todo" => Ok(TaskStatus::ToDo),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(Error::InvalidArgument(format!(
                "unknown status '{value}' (expected todo|in-progress|done)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub project_id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub assigned_user_id: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        project_id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        assigned_user_id: u32,
    ) -> Self {
        Self {
            id: 0,
            project_id,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::ToDo,
            assigned_user_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Timestamp for the next update, strictly after every earlier one
    fn next_update_time(&self) -> DateTime<Utc> {
        let floor = match self.updated_at {
            Some(updated) if updated > self.created_at => updated,
            _ => self.created_at,
        };
        let now = Utc::now();
        if now > floor {
            now
        } else {
            floor + chrono::Duration::nanoseconds(1)
        }
    }
}

impl Entity for Task {
    const NAME: &'static str = "Task";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

impl EntityStore<Task> {
    pub fn get_by_project(&self, project_id: u32) -> Vec<Task> {
        self.filter(|task| task.project_id == project_id)
    }

    pub fn get_by_user(&self, user_id: u32) -> Vec<Task> {
        self.filter(|task| task.assigned_user_id == user_id)
    }
}

/// Task lifecycle on top of the task store, with read access to the
/// project and user stores for reference checks
#[derive(Debug, Clone)]
pub struct TaskService {
    tasks: Arc<TaskStore>,
    projects: Arc<ProjectStore>,
    users: Arc<UserStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<TaskStore>, projects: Arc<ProjectStore>, users: Arc<UserStore>) -> Self {
        Self {
            tasks,
            projects,
            users,
        }
    }

    /// Create a `ToDo` task.
    ///
    /// Fails with `NotFound` before anything is written when the project or
    /// the assignee does not exist. Title and description are not validated.
    pub fn create(
        &self,
        project_id: u32,
        title: &str,
        description: &str,
        assigned_user_id: u32,
    ) -> Result<Task> {
        if self.projects.get_by_id(project_id).is_none() {
            return Err(Error::not_found("Project", project_id));
        }
        if self.users.get_by_id(assigned_user_id).is_none() {
            return Err(Error::not_found("User", assigned_user_id));
        }

        self.tasks
            .create(Task::new(project_id, title, description, assigned_user_id))
    }

    pub fn get(&self, id: u32) -> Option<Task> {
        self.tasks.get_by_id(id)
    }

    pub fn get_by_project(&self, project_id: u32) -> Vec<Task> {
        self.tasks.get_by_project(project_id)
    }

    pub fn get_by_user(&self, user_id: u32) -> Vec<Task> {
        self.tasks.get_by_user(user_id)
    }

    /// Set the status to `status`, whatever it was before.
    ///
    /// Returns `Ok(false)` for an unknown task.
    pub fn update_status(&self, task_id: u32, status: TaskStatus) -> Result<bool> {
        let Some(mut task) = self.tasks.get_by_id(task_id) else {
            return Ok(false);
        };

        task.status = status;
        task.updated_at = Some(task.next_update_time());
        self.tasks.update(task)?;
        Ok(true)
    }

    /// Replace a stored task and stamp the update time.
    ///
    /// Returns `Ok(false)` for an unknown task. The stored creation time is
    /// kept; project and assignee references are not re-checked.
    pub fn update(&self, mut task: Task) -> Result<bool> {
        let Some(existing) = self.tasks.get_by_id(task.id) else {
            return Ok(false);
        };

        task.created_at = existing.created_at;
        task.updated_at = Some(existing.next_update_time());

        match self.tasks.update(task) {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn delete(&self, id: u32) -> Result<bool> {
        self.tasks.delete(id)
    }
}
