//! pms register/login/passwd and user management commands.

use chrono::{DateTime, Utc};

use crate::cli::{GlobalArgs, Session};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::user::{Role, User};

/// Options for `pms user add`
pub struct AddOptions {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// A user as shown to callers; the password hash stays in the store
#[derive(serde::Serialize)]
struct UserView {
    id: u32,
    username: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(serde::Serialize)]
struct UserListOutput {
    total: usize,
    users: Vec<UserView>,
}

#[derive(serde::Serialize)]
struct PasswordChangeOutput {
    id: u32,
    changed: bool,
}

pub fn run_register(globals: &GlobalArgs, username: &str) -> Result<()> {
    let app = globals.open_app()?;
    let user = app.auth.register(username, globals.password()?, Role::Manager)?;

    let mut human = HumanOutput::new(format!("Registered {}", user.username));
    push_user_summary(&mut human, &user);
    human.push_next_step("pms project create <name>");
    emit_success(globals.output, "register", &UserView::from(&user), Some(&human))
}

pub fn run_login(globals: &GlobalArgs) -> Result<()> {
    let session = Session::start(globals)?;

    let mut human = HumanOutput::new(format!("Logged in as {}", session.user.username));
    push_user_summary(&mut human, &session.user);
    emit_success(
        globals.output,
        "login",
        &UserView::from(&session.user),
        Some(&human),
    )
}

pub fn run_passwd(globals: &GlobalArgs, new_password: &str) -> Result<()> {
    let session = Session::start(globals)?;
    let changed =
        session
            .app
            .auth
            .change_password(session.user.id, globals.password()?, new_password)?;

    let output = PasswordChangeOutput {
        id: session.user.id,
        changed,
    };
    let human = HumanOutput::new(if changed {
        "Password changed"
    } else {
        "Password unchanged"
    });
    emit_success(globals.output, "passwd", &output, Some(&human))
}

pub fn run_add(globals: &GlobalArgs, options: AddOptions) -> Result<()> {
    let session = Session::start(globals)?;
    session.require_manager("registering users")?;

    let role: Role = options.role.parse()?;
    let user = session
        .app
        .auth
        .register(&options.username, &options.password, role)?;

    let mut human = HumanOutput::new(format!("User created with ID {}", user.id));
    push_user_summary(&mut human, &user);
    emit_success(globals.output, "user add", &UserView::from(&user), Some(&human))
}

pub fn run_list(globals: &GlobalArgs) -> Result<()> {
    let session = Session::start(globals)?;
    session.require_manager("listing users")?;

    let users = session.app.auth.list_users();
    let mut human = HumanOutput::new(format!("Users: {}", users.len()));
    for user in &users {
        human.push_detail(format!("{} {} ({})", user.id, user.username, user.role));
    }

    let output = UserListOutput {
        total: users.len(),
        users: users.iter().map(UserView::from).collect(),
    };
    emit_success(globals.output, "user list", &output, Some(&human))
}

fn push_user_summary(human: &mut HumanOutput, user: &User) {
    human.push_summary("ID", user.id.to_string());
    human.push_summary("Username", user.username.clone());
    human.push_summary("Role", user.role.to_string());
}
