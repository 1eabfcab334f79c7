//! Projects: entity, store, and service.
//!
//! A project owns tasks only logically, through `Task::project_id`; the task
//! list is never embedded in the project record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::{Entity, EntityStore};

/// Store for [`Project`] records; exposes only the generic contract
pub type ProjectStore = EntityStore<Project>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Project {
    const NAME: &'static str = "Project";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// Validating front for the project store
#[derive(Debug, Clone)]
pub struct ProjectService {
    projects: Arc<ProjectStore>,
}

impl ProjectService {
    pub fn new(projects: Arc<ProjectStore>) -> Self {
        Self { projects }
    }

    /// Create a project; the name must not be blank
    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Project> {
        validate_name(name)?;
        self.projects
            .create(Project::new(name, description.map(str::to_string)))
    }

    pub fn get(&self, id: u32) -> Option<Project> {
        self.projects.get_by_id(id)
    }

    pub fn get_all(&self) -> Vec<Project> {
        self.projects.get_all()
    }

    /// Replace a stored project.
    ///
    /// A blank name is a validation error; an unknown id yields `Ok(false)`.
    /// The stored creation timestamp is kept whatever the caller passes.
    pub fn update(&self, mut project: Project) -> Result<bool> {
        validate_name(&project.name)?;

        if let Some(existing) = self.projects.get_by_id(project.id) {
            project.created_at = existing.created_at;
        }

        match self.projects.update(project) {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Delete a project. Tasks referencing it are left in place.
    pub fn delete(&self, id: u32) -> Result<bool> {
        self.projects.delete(id)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(
            "project name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
