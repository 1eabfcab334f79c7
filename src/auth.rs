//! Credential hashing and the auth service.
//!
//! Passwords are stored as the standard base64 encoding of an unsalted
//! SHA-256 digest of the UTF-8 password bytes. The same password always
//! yields the same stored hash. This is a known weakness, and changing it
//! changes every stored credential.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::user::{Role, User, UserStore};

/// One-way hash of a password, as stored in `User::password_hash`
///
/// ```
/// use pms::auth::hash_password;
///
/// let hash = hash_password("password");
/// assert_eq!(hash, "XohImNooBHFR0OVvjcYpJ3NgPQ1qq73WKhHvch0VQtg=");
/// assert_eq!(hash.len(), 44);
/// ```
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    STANDARD.encode(digest)
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password).as_bytes() == stored_hash.as_bytes()
}

#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }

    /// The user whose credentials match, or `None`.
    ///
    /// An unknown username and a wrong password both give `None`.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let user = self
            .users
            .get_by_username(username)
            .filter(|user| verify_password(password, &user.password_hash));

        if user.is_none() {
            tracing::warn!("authentication failed");
        }
        user
    }

    /// Register a new user; `Duplicate` if the username is taken
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<User> {
        if self.users.get_by_username(username).is_some() {
            return Err(Error::Duplicate(username.to_string()));
        }

        self.users
            .create(User::new(username, hash_password(password), role))
    }

    /// Replace the password after checking the old one.
    ///
    /// `Ok(false)` when the user is unknown or the old password is wrong.
    pub fn change_password(
        &self,
        user_id: u32,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        let Some(mut user) = self.users.get_by_id(user_id) else {
            return Ok(false);
        };
        if !verify_password(old_password, &user.password_hash) {
            return Ok(false);
        }

        user.password_hash = hash_password(new_password);
        self.users.update(user)?;
        Ok(true)
    }

    pub fn user(&self, id: u32) -> Option<User> {
        self.users.get_by_id(id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.get_all()
    }
}
