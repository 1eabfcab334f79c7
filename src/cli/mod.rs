//! Command-line interface for pms
//!
//! Non-interactive commands over the service layer. Every command except
//! `register` authenticates with `--user`/`--password` first.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::user::User;

mod account;
mod project;
mod task;

/// pms - project, task, and user tracking for small teams
#[derive(Parser, Debug)]
#[command(name = "pms")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the data files (defaults to current directory)
    #[arg(long, global = true, env = "PMS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Username to act as
    #[arg(short, long, global = true, env = "PMS_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(short, long, global = true, env = "PMS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register yourself as a manager (uses --password)
    Register {
        /// Username to register
        username: String,
    },

    /// Check credentials and show the current user
    Login,

    /// Change your password (old password is --password)
    Passwd {
        /// New password
        #[arg(long = "new")]
        new_password: String,
    },

    /// User management (managers only)
    #[command(subcommand)]
    User(UserCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Username for the new user
        username: String,

        /// Password for the new user
        #[arg(long = "user-password")]
        user_password: String,

        /// Role: employee or manager
        #[arg(long, default_value = "employee")]
        role: String,
    },

    /// List all users
    List,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Create {
        /// Project name
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all projects
    List,

    /// Show one project and its tasks
    Show {
        /// Project ID
        id: u32,
    },

    /// Edit a project's name or description
    Update {
        /// Project ID
        id: u32,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a project (its tasks are kept)
    Delete {
        /// Project ID
        id: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task (managers only)
    Create {
        /// Project the task belongs to
        #[arg(long)]
        project: u32,

        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// ID of the assigned user
        #[arg(long)]
        assignee: u32,
    },

    /// Show one task
    Show {
        /// Task ID
        id: u32,
    },

    /// List tasks of a project or a user (default: your own)
    List {
        /// Filter by project ID
        #[arg(long, conflicts_with = "assignee")]
        project: Option<u32>,

        /// Filter by assigned user ID
        #[arg(long)]
        assignee: Option<u32>,
    },

    /// Set a task's status: todo, in-progress, done
    Status {
        /// Task ID
        id: u32,

        /// New status
        status: String,
    },

    /// Edit a task's fields
    Update {
        /// Task ID
        id: u32,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New assignee ID
        #[arg(long)]
        assignee: Option<u32>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u32,
    },
}

/// Global flags shared by every command
#[derive(Debug, Clone)]
pub(crate) struct GlobalArgs {
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub output: OutputOptions,
}

impl GlobalArgs {
    pub(crate) fn open_app(&self) -> Result<App> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        App::open(data_dir)
    }

    pub(crate) fn password(&self) -> Result<&str> {
        self.password
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("--password is required".to_string()))
    }
}

/// An opened app plus the authenticated caller
pub(crate) struct Session {
    pub app: App,
    pub user: User,
}

impl Session {
    pub(crate) fn start(globals: &GlobalArgs) -> Result<Self> {
        let app = globals.open_app()?;
        let (Some(username), Some(password)) = (globals.user.as_deref(), globals.password.as_deref())
        else {
            return Err(Error::AuthenticationFailed);
        };

        let user = app
            .auth
            .authenticate(username, password)
            .ok_or(Error::AuthenticationFailed)?;
        Ok(Self { app, user })
    }

    pub(crate) fn require_manager(&self, action: &str) -> Result<()> {
        if self.user.is_manager() {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{action} requires the manager role"
            )))
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = GlobalArgs {
            data_dir: self.data_dir,
            user: self.user,
            password: self.password,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };

        match self.command {
            Commands::Register { username } => account::run_register(&globals, &username),
            Commands::Login => account::run_login(&globals),
            Commands::Passwd { new_password } => account::run_passwd(&globals, &new_password),
            Commands::User(cmd) => match cmd {
                UserCommands::Add {
                    username,
                    user_password,
                    role,
                } => account::run_add(
                    &globals,
                    account::AddOptions {
                        username,
                        password: user_password,
                        role,
                    },
                ),
                UserCommands::List => account::run_list(&globals),
            },
            Commands::Project(cmd) => match cmd {
                ProjectCommands::Create { name, description } => {
                    project::run_create(&globals, &name, description.as_deref())
                }
                ProjectCommands::List => project::run_list(&globals),
                ProjectCommands::Show { id } => project::run_show(&globals, id),
                ProjectCommands::Update {
                    id,
                    name,
                    description,
                } => project::run_update(
                    &globals,
                    project::UpdateOptions {
                        id,
                        name,
                        description,
                    },
                ),
                ProjectCommands::Delete { id } => project::run_delete(&globals, id),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Create {
                    project,
                    title,
                    description,
                    assignee,
                } => task::run_create(
                    &globals,
                    task::CreateOptions {
                        project,
                        title,
                        description,
                        assignee,
                    },
                ),
                TaskCommands::Show { id } => task::run_show(&globals, id),
                TaskCommands::List { project, assignee } => {
                    task::run_list(&globals, project, assignee)
                }
                TaskCommands::Status { id, status } => task::run_status(&globals, id, &status),
                TaskCommands::Update {
                    id,
                    title,
                    description,
                    assignee,
                } => task::run_update(
                    &globals,
                    task::UpdateOptions {
                        id,
                        title,
                        description,
                        assignee,
                    },
                ),
                TaskCommands::Delete { id } => task::run_delete(&globals, id),
            },
        }
    }
}
