mod support;

use pms::auth::hash_password;
use pms::error::Error;
use pms::task::TaskStatus;
use pms::user::Role;
use support::TestData;

#[test]
fn task_with_unknown_project_is_rejected_before_write() {
    let data = TestData::new();
    let app = data.app();
    let user = app.auth.register("bob", "pw", Role::Employee).unwrap();
    let before = data.read("tasks.json");

    let result = app.tasks.create(42, "t", "", user.id);
    assert!(matches!(
        result,
        Err(Error::NotFound {
            entity: "Project",
            id: 42
        })
    ));
    assert!(app.tasks.get_by_user(user.id).is_empty());
    assert_eq!(data.read("tasks.json"), before);
}

#[test]
fn task_with_unknown_assignee_is_rejected_before_write() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", None).unwrap();

    let result = app.tasks.create(project.id, "t", "", 7);
    assert!(matches!(
        result,
        Err(Error::NotFound {
            entity: "User",
            id: 7
        })
    ));
    assert!(app.tasks.get_by_project(project.id).is_empty());
    assert!(app.tasks.get(1).is_none());
}

#[test]
fn task_title_and_description_may_be_empty() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", None).unwrap();
    let user = app.auth.register("bob", "pw", Role::Employee).unwrap();

    let task = app.tasks.create(project.id, "", "", user.id).unwrap();
    assert_eq!(task.title, "");
    assert_eq!(task.status, TaskStatus::ToDo);
}

#[test]
fn project_update_with_blank_name_leaves_project_unchanged() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", Some("desc")).unwrap();
    let before = data.read("projects.json");

    let mut edited = project.clone();
    edited.name = "  ".to_string();
    edited.description = Some("changed".to_string());
    assert!(matches!(app.projects.update(edited), Err(Error::Validation(_))));

    assert_eq!(app.projects.get(project.id).unwrap(), project);
    assert_eq!(data.read("projects.json"), before);
}

#[test]
fn project_update_of_unknown_id_returns_false() {
    let data = TestData::new();
    let app = data.app();
    let mut project = app.projects.create("Alpha", None).unwrap();
    project.id = 99;

    assert!(!app.projects.update(project).unwrap());
    assert_eq!(app.projects.get_all().len(), 1);
}

#[test]
fn duplicate_username_adds_no_user() {
    let data = TestData::new();
    let app = data.app();
    app.auth.register("bob", "pw", Role::Employee).unwrap();

    let result = app.auth.register("bob", "other", Role::Manager);
    assert!(matches!(result, Err(Error::Duplicate(name)) if name == "bob"));
    assert_eq!(app.auth.list_users().len(), 1);

    // Usernames are case-sensitive.
    assert!(app.auth.register("Bob", "pw", Role::Employee).is_ok());
    assert_eq!(app.auth.list_users().len(), 2);
}

#[test]
fn authenticate_failures_are_indistinguishable() {
    let data = TestData::new();
    let app = data.app();
    app.auth.register("bob", "secret", Role::Employee).unwrap();

    let unknown_user = app.auth.authenticate("alice", "secret");
    let wrong_password = app.auth.authenticate("bob", "nope");
    assert_eq!(unknown_user, wrong_password);
    assert!(unknown_user.is_none());

    let user = app.auth.authenticate("bob", "secret").unwrap();
    assert_eq!(user.username, "bob");
    assert_eq!(user.password_hash, hash_password("secret"));
}

#[test]
fn update_status_on_unknown_task_is_false_and_writes_nothing() {
    let data = TestData::new();
    let app = data.app();
    let before = data.read("tasks.json");

    assert!(!app.tasks.update_status(5, TaskStatus::Done).unwrap());
    assert_eq!(data.read("tasks.json"), before);
}

#[test]
fn status_transitions_are_unrestricted() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", None).unwrap();
    let user = app.auth.register("bob", "pw", Role::Employee).unwrap();
    let task = app.tasks.create(project.id, "t", "", user.id).unwrap();

    let mut last = task.created_at;
    for status in [
        TaskStatus::Done,
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::InProgress,
        TaskStatus::ToDo,
    ] {
        assert!(app.tasks.update_status(task.id, status).unwrap());
        let stored = app.tasks.get(task.id).unwrap();
        assert_eq!(stored.status, status);
        let updated = stored.updated_at.unwrap();
        assert!(updated > last);
        last = updated;
    }
}

#[test]
fn full_task_update_stamps_time_and_keeps_creation() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", None).unwrap();
    let user = app.auth.register("bob", "pw", Role::Employee).unwrap();
    let task = app.tasks.create(project.id, "t", "", user.id).unwrap();

    let mut edited = task.clone();
    edited.title = "renamed".to_string();
    edited.status = TaskStatus::Done;
    edited.created_at = task.created_at - chrono::Duration::days(1);
    edited.updated_at = None;
    assert!(app.tasks.update(edited).unwrap());

    let stored = app.tasks.get(task.id).unwrap();
    assert_eq!(stored.title, "renamed");
    assert_eq!(stored.status, TaskStatus::Done);
    assert_eq!(stored.created_at, task.created_at);
    assert!(stored.updated_at.unwrap() > task.created_at);

    let mut ghost = task;
    ghost.id = 50;
    assert!(!app.tasks.update(ghost).unwrap());
}

#[test]
fn deleting_referenced_entities_leaves_dangling_tasks() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", None).unwrap();
    let user = app.auth.register("bob", "pw", Role::Employee).unwrap();
    let task = app.tasks.create(project.id, "t", "", user.id).unwrap();

    assert!(app.projects.delete(project.id).unwrap());
    assert!(app.projects.get(project.id).is_none());

    let stored = app.tasks.get(task.id).unwrap();
    assert_eq!(stored.project_id, project.id);
    assert_eq!(app.tasks.get_by_project(project.id).len(), 1);

    // Still updatable; references are only checked at creation.
    assert!(app.tasks.update_status(task.id, TaskStatus::Done).unwrap());
    assert!(app.tasks.create(project.id, "again", "", user.id).is_err());
}

#[test]
fn filters_keep_insertion_order() {
    let data = TestData::new();
    let app = data.app();
    let alpha = app.projects.create("Alpha", None).unwrap();
    let beta = app.projects.create("Beta", None).unwrap();
    let bob = app.auth.register("bob", "pw", Role::Employee).unwrap();
    let ann = app.auth.register("ann", "pw", Role::Employee).unwrap();

    app.tasks.create(alpha.id, "a1", "", bob.id).unwrap();
    app.tasks.create(beta.id, "b1", "", ann.id).unwrap();
    app.tasks.create(alpha.id, "a2", "", ann.id).unwrap();
    app.tasks.create(alpha.id, "a3", "", bob.id).unwrap();

    let titles = |tasks: Vec<pms::task::Task>| -> Vec<String> {
        tasks.into_iter().map(|task| task.title).collect()
    };
    assert_eq!(titles(app.tasks.get_by_project(alpha.id)), ["a1", "a2", "a3"]);
    assert_eq!(titles(app.tasks.get_by_user(ann.id)), ["b1", "a2"]);
    assert!(app.tasks.get_by_project(99).is_empty());
}

#[test]
fn task_delete_reports_whether_anything_was_removed() {
    let data = TestData::new();
    let app = data.app();
    let project = app.projects.create("Alpha", None).unwrap();
    let user = app.auth.register("bob", "pw", Role::Employee).unwrap();
    let task = app.tasks.create(project.id, "t", "", user.id).unwrap();

    assert!(app.tasks.delete(task.id).unwrap());
    assert!(!app.tasks.delete(task.id).unwrap());
    assert!(app.tasks.get(task.id).is_none());
}

#[test]
fn end_to_end_scenario() {
    let data = TestData::new();
    let app = data.app();

    let project = app.projects.create("Alpha", None).unwrap();
    assert_eq!(project.id, 1);

    let bob = app.auth.register("bob", "pw", Role::Employee).unwrap();
    assert_eq!(bob.id, 1);
    assert_eq!(bob.role, Role::Employee);

    let task = app.tasks.create(1, "Write spec", "", 1).unwrap();
    assert_eq!(task.id, 1);
    assert_eq!(task.status, TaskStatus::ToDo);
    assert!(task.updated_at.is_none());

    assert!(app.tasks.update_status(1, TaskStatus::InProgress).unwrap());
    let started = app.tasks.get(1).unwrap();
    assert_eq!(started.status, TaskStatus::InProgress);
    assert!(started.updated_at.unwrap() > started.created_at);

    let snapshot = data.read("tasks.json");
    assert!(!app.tasks.update_status(99, TaskStatus::Done).unwrap());
    assert_eq!(app.tasks.get(1).unwrap(), started);
    assert_eq!(data.read("tasks.json"), snapshot);
}
