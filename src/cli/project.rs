//! pms project command implementations.

use crate::cli::{GlobalArgs, Session};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::project::Project;
use crate::task::Task;

/// Options for `pms project update`
pub struct UpdateOptions {
    pub id: u32,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(serde::Serialize)]
struct ProjectListOutput {
    total: usize,
    projects: Vec<Project>,
}

#[derive(serde::Serialize)]
struct ProjectShowOutput {
    project: Project,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct ProjectChangeOutput {
    id: u32,
    changed: bool,
}

pub fn run_create(globals: &GlobalArgs, name: &str, description: Option<&str>) -> Result<()> {
    let session = Session::start(globals)?;
    let project = session.app.projects.create(name, description)?;

    let mut human = HumanOutput::new(format!("Project created with ID {}", project.id));
    push_project_summary(&mut human, &project);
    human.push_next_step(format!(
        "pms task create --project {} --title <title> --assignee <user-id>",
        project.id
    ));
    emit_success(globals.output, "project create", &project, Some(&human))
}

pub fn run_list(globals: &GlobalArgs) -> Result<()> {
    let session = Session::start(globals)?;
    let projects = session.app.projects.get_all();

    let mut human = HumanOutput::new(format!("Projects: {}", projects.len()));
    for project in &projects {
        human.push_detail(match &project.description {
            Some(description) if !description.is_empty() => {
                format!("{} {}: {}", project.id, project.name, description)
            }
            _ => format!("{} {}", project.id, project.name),
        });
    }

    let output = ProjectListOutput {
        total: projects.len(),
        projects,
    };
    emit_success(globals.output, "project list", &output, Some(&human))
}

pub fn run_show(globals: &GlobalArgs, id: u32) -> Result<()> {
    let session = Session::start(globals)?;
    let project = session
        .app
        .projects
        .get(id)
        .ok_or_else(|| Error::not_found("Project", id))?;
    let tasks = session.app.tasks.get_by_project(id);

    let mut human = HumanOutput::new(format!("Project {}", project.name));
    push_project_summary(&mut human, &project);
    human.push_summary("Tasks", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(format!("{} [{}] {}", task.id, task.status, task.title));
    }

    let output = ProjectShowOutput { project, tasks };
    emit_success(globals.output, "project show", &output, Some(&human))
}

pub fn run_update(globals: &GlobalArgs, options: UpdateOptions) -> Result<()> {
    let session = Session::start(globals)?;
    let mut project = session
        .app
        .projects
        .get(options.id)
        .ok_or_else(|| Error::not_found("Project", options.id))?;

    if let Some(name) = options.name {
        project.name = name;
    }
    if let Some(description) = options.description {
        project.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
    }

    let changed = session.app.projects.update(project)?;
    let output = ProjectChangeOutput {
        id: options.id,
        changed,
    };
    let mut human = HumanOutput::new(if changed {
        "Project updated"
    } else {
        "Project not found"
    });
    human.push_summary("ID", options.id.to_string());
    emit_success(globals.output, "project update", &output, Some(&human))
}

pub fn run_delete(globals: &GlobalArgs, id: u32) -> Result<()> {
    let session = Session::start(globals)?;
    let orphaned = session.app.tasks.get_by_project(id).len();
    let changed = session.app.projects.delete(id)?;

    let output = ProjectChangeOutput { id, changed };
    let mut human = HumanOutput::new(if changed {
        "Project deleted"
    } else {
        "Project not found"
    });
    human.push_summary("ID", id.to_string());
    if changed && orphaned > 0 {
        human.push_warning(format!("{orphaned} task(s) still reference project {id}"));
    }
    emit_success(globals.output, "project delete", &output, Some(&human))
}

fn push_project_summary(human: &mut HumanOutput, project: &Project) {
    human.push_summary("ID", project.id.to_string());
    human.push_summary("Name", project.name.clone());
    if let Some(description) = &project.description {
        human.push_summary("Description", description.clone());
    }
    human.push_summary("Created", project.created_at.to_rfc3339());
}
