mod support;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use support::TestData;

fn json_of(cmd: &mut assert_cmd::Command) -> Value {
    let output = cmd.arg("--json").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json output")
}

/// A data dir with manager `ann` (id 1) and employee `bob` (id 2)
fn seeded() -> TestData {
    let data = TestData::new();
    data.pms()
        .args(["register", "ann", "--password", "annpw"])
        .assert()
        .success();
    data.pms_as("ann", "annpw")
        .args(["user", "add", "bob", "--user-password", "bobpw", "--role", "employee"])
        .assert()
        .success();
    data
}

#[test]
fn pms_help_works() {
    Command::cargo_bin("pms")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Usage"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["register", "login", "passwd", "user", "project", "task"] {
        Command::cargo_bin("pms")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn register_creates_manager_and_login_hides_hash() {
    let data = seeded();

    let value = json_of(data.pms_as("ann", "annpw").arg("login"));
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["id"], 1);
    assert_eq!(value["data"]["role"], "Manager");
    assert!(value["data"].get("password_hash").is_none());
}

#[test]
fn bad_credentials_give_one_message() {
    let data = seeded();

    let unknown = data
        .pms_as("nobody", "annpw")
        .arg("login")
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    let wrong = data
        .pms_as("ann", "wrong")
        .arg("login")
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    assert_eq!(unknown, wrong);
    assert!(String::from_utf8_lossy(&wrong).contains("Invalid username or password"));
}

#[test]
fn employees_cannot_create_tasks_or_manage_users() {
    let data = seeded();
    data.pms_as("ann", "annpw")
        .args(["project", "create", "Alpha"])
        .assert()
        .success();

    data.pms_as("bob", "bobpw")
        .args(["task", "create", "--project", "1", "--title", "t", "--assignee", "2"])
        .assert()
        .code(3)
        .stderr(contains("manager role"));
    data.pms_as("bob", "bobpw")
        .args(["user", "list"])
        .assert()
        .code(3);
}

#[test]
fn task_flow_through_cli() {
    let data = seeded();
    let ann = || data.pms_as("ann", "annpw");
    let bob = || data.pms_as("bob", "bobpw");

    let project = json_of(ann().args(["project", "create", "Alpha", "-d", "first"]));
    assert_eq!(project["data"]["id"], 1);

    let task = json_of(ann().args([
        "task", "create", "--project", "1", "--title", "Write spec", "--assignee", "2",
    ]));
    assert_eq!(task["data"]["id"], 1);
    assert_eq!(task["data"]["status"], "ToDo");

    let mine = json_of(bob().args(["task", "list"]));
    assert_eq!(mine["data"]["total"], 1);
    assert_eq!(mine["data"]["assigned_user_id"], 2);

    let changed = json_of(bob().args(["task", "status", "1", "in-progress"]));
    assert_eq!(changed["data"]["changed"], true);
    assert_eq!(changed["data"]["status"], "InProgress");

    let missing = json_of(bob().args(["task", "status", "99", "done"]));
    assert_eq!(missing["data"]["changed"], false);

    let shown = json_of(bob().args(["task", "show", "1"]));
    assert_eq!(shown["data"]["status"], "InProgress");
    assert!(shown["data"]["updated_at"].is_string());
}

#[test]
fn task_create_with_missing_project_reports_not_found() {
    let data = seeded();

    let output = data
        .pms_as("ann", "annpw")
        .args(["--json", "task", "create", "--project", "5", "--title", "t", "--assignee", "2"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("error json");
    assert_eq!(value["status"], "error");
    assert_eq!(value["command"], "task create");
    assert_eq!(value["error"]["kind"], "not_found");
    assert_eq!(value["error"]["details"]["entity"], "Project");
    assert_eq!(value["error"]["details"]["id"], 5);
}

#[test]
fn project_update_with_blank_name_is_validation_error() {
    let data = seeded();
    data.pms_as("ann", "annpw")
        .args(["project", "create", "Alpha"])
        .assert()
        .success();

    data.pms_as("ann", "annpw")
        .args(["project", "update", "1", "--name", "   "])
        .assert()
        .code(2)
        .stderr(contains("project name cannot be empty"));
}

#[test]
fn duplicate_registration_fails() {
    let data = seeded();

    data.pms()
        .args(["register", "bob", "--password", "x"])
        .assert()
        .code(2)
        .stderr(contains("already registered"));
}

#[test]
fn passwd_changes_credentials() {
    let data = seeded();

    data.pms_as("bob", "bobpw")
        .args(["passwd", "--new", "fresh"])
        .assert()
        .success()
        .stdout(contains("Password changed"));
    data.pms_as("bob", "bobpw").arg("login").assert().code(3);
    data.pms_as("bob", "fresh").arg("login").assert().success();
}

#[test]
fn invalid_status_is_rejected() {
    let data = seeded();

    data.pms_as("ann", "annpw")
        .args(["task", "status", "1", "blocked"])
        .assert()
        .code(2)
        .stderr(contains("unknown status"));
}
