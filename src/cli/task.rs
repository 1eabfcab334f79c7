//! pms task command implementations.

use crate::cli::{GlobalArgs, Session};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::task::{Task, TaskStatus};

/// Options for `pms task create`
pub struct CreateOptions {
    pub project: u32,
    pub title: String,
    pub description: String,
    pub assignee: u32,
}

/// Options for `pms task update`
pub struct UpdateOptions {
    pub id: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<u32>,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_user_id: Option<u32>,
    total: usize,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct TaskChangeOutput {
    id: u32,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

pub fn run_create(globals: &GlobalArgs, options: CreateOptions) -> Result<()> {
    let session = Session::start(globals)?;
    session.require_manager("creating tasks")?;

    let task = session.app.tasks.create(
        options.project,
        &options.title,
        &options.description,
        options.assignee,
    )?;

    let mut human = HumanOutput::new(format!("Task created with ID {}", task.id));
    push_task_summary(&mut human, &task);
    human.push_next_step(format!("pms task status {} in-progress", task.id));
    emit_success(globals.output, "task create", &task, Some(&human))
}

pub fn run_show(globals: &GlobalArgs, id: u32) -> Result<()> {
    let session = Session::start(globals)?;
    let task = session
        .app
        .tasks
        .get(id)
        .ok_or_else(|| Error::not_found("Task", id))?;

    let mut human = HumanOutput::new(format!("Task {}", task.title));
    push_task_summary(&mut human, &task);
    if session.app.projects.get(task.project_id).is_none() {
        human.push_warning(format!("project {} no longer exists", task.project_id));
    }
    if session.app.auth.user(task.assigned_user_id).is_none() {
        human.push_warning(format!("user {} no longer exists", task.assigned_user_id));
    }
    emit_success(globals.output, "task show", &task, Some(&human))
}

pub fn run_list(globals: &GlobalArgs, project: Option<u32>, assignee: Option<u32>) -> Result<()> {
    let session = Session::start(globals)?;

    let (header, output) = match project {
        Some(project_id) => {
            let tasks = session.app.tasks.get_by_project(project_id);
            (
                format!("Tasks in project {project_id}: {}", tasks.len()),
                TaskListOutput {
                    project_id: Some(project_id),
                    assigned_user_id: None,
                    total: tasks.len(),
                    tasks,
                },
            )
        }
        None => {
            let user_id = assignee.unwrap_or(session.user.id);
            let tasks = session.app.tasks.get_by_user(user_id);
            (
                format!("Tasks assigned to user {user_id}: {}", tasks.len()),
                TaskListOutput {
                    project_id: None,
                    assigned_user_id: Some(user_id),
                    total: tasks.len(),
                    tasks,
                },
            )
        }
    };

    let mut human = HumanOutput::new(header);
    for task in &output.tasks {
        human.push_detail(format!(
            "{} [{}] {} (project {}, user {})",
            task.id, task.status, task.title, task.project_id, task.assigned_user_id
        ));
    }
    emit_success(globals.output, "task list", &output, Some(&human))
}

pub fn run_status(globals: &GlobalArgs, id: u32, status: &str) -> Result<()> {
    let status: TaskStatus = status.parse()?;
    let session = Session::start(globals)?;
    let changed = session.app.tasks.update_status(id, status)?;

    let output = TaskChangeOutput {
        id,
        changed,
        status: changed.then_some(status),
    };
    let mut human = HumanOutput::new(if changed {
        format!("Task {id} is now {status}")
    } else {
        format!("Task {id} not found")
    });
    if !changed {
        human.push_next_step("pms task list");
    }
    emit_success(globals.output, "task status", &output, Some(&human))
}

pub fn run_update(globals: &GlobalArgs, options: UpdateOptions) -> Result<()> {
    let session = Session::start(globals)?;
    let mut task = session
        .app
        .tasks
        .get(options.id)
        .ok_or_else(|| Error::not_found("Task", options.id))?;

    if let Some(title) = options.title {
        task.title = title;
    }
    if let Some(description) = options.description {
        task.description = description;
    }
    if let Some(assignee) = options.assignee {
        task.assigned_user_id = assignee;
    }

    let changed = session.app.tasks.update(task)?;
    let output = TaskChangeOutput {
        id: options.id,
        changed,
        status: None,
    };
    let human = HumanOutput::new(if changed {
        format!("Task {} updated", options.id)
    } else {
        format!("Task {} not found", options.id)
    });
    emit_success(globals.output, "task update", &output, Some(&human))
}

pub fn run_delete(globals: &GlobalArgs, id: u32) -> Result<()> {
    let session = Session::start(globals)?;
    let changed = session.app.tasks.delete(id)?;

    let output = TaskChangeOutput {
        id,
        changed,
        status: None,
    };
    let human = HumanOutput::new(if changed {
        format!("Task {id} deleted")
    } else {
        format!("Task {id} not found")
    });
    emit_success(globals.output, "task delete", &output, Some(&human))
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Project", task.project_id.to_string());
    human.push_summary("Title", task.title.clone());
    if !task.description.is_empty() {
        human.push_summary("Description", task.description.clone());
    }
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Assignee", task.assigned_user_id.to_string());
    human.push_summary("Created", task.created_at.to_rfc3339());
    if let Some(updated) = task.updated_at {
        human.push_summary("Updated", updated.to_rfc3339());
    }
}
