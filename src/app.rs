//! Wiring: one store per entity type, shared by the services.

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::Result;
use crate::project::{ProjectService, ProjectStore};
use crate::storage::Storage;
use crate::task::{TaskService, TaskStore};
use crate::user::UserStore;

/// The three stores, each opened exactly once
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<UserStore>,
    pub projects: Arc<ProjectStore>,
    pub tasks: Arc<TaskStore>,
}

impl Stores {
    pub fn open(storage: &Storage) -> Result<Self> {
        storage.init()?;
        Ok(Self {
            users: Arc::new(storage.open_store(storage.users_file())?),
            projects: Arc::new(storage.open_store(storage.projects_file())?),
            tasks: Arc::new(storage.open_store(storage.tasks_file())?),
        })
    }
}

/// Service layer consumed by front ends
#[derive(Debug, Clone)]
pub struct App {
    pub auth: AuthService,
    pub projects: ProjectService,
    pub tasks: TaskService,
}

impl App {
    /// Open the stores in `data_dir` and build the services on top
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage = Storage::for_dir(data_dir);
        let stores = Stores::open(&storage)?;
        Ok(Self::from_stores(&stores))
    }

    pub fn from_stores(stores: &Stores) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&stores.users)),
            projects: ProjectService::new(Arc::clone(&stores.projects)),
            tasks: TaskService::new(
                Arc::clone(&stores.tasks),
                Arc::clone(&stores.projects),
                Arc::clone(&stores.users),
            ),
        }
    }
}
