use crate::store::{read_guard, write_guard, StoreError};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::RwLock;

/// A registered user. The password stays wrapped in `SecretString` so it
/// cannot leak through `Debug` output or tracing spans.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    password: SecretString,
}

impl User {
    fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    fn password_matches(&self, candidate: &str) -> bool {
        // Plaintext exact-string comparison, as stored. Known weakness kept
        // for compatibility with existing clients; not production grade.
        self.password.expose_secret() == candidate
    }
}

/// Username-keyed registry. Users are never mutated or deleted.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    /// Insert a new user.
    ///
    /// # Errors
    /// Returns `UserAlreadyExists` if the username is taken, regardless of
    /// the password.
    pub fn register(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let mut users = write_guard(&self.users);

        // Check and insert under the same write guard so concurrent
        // registrations cannot both pass the uniqueness check.
        if users.contains_key(username) {
            return Err(StoreError::UserAlreadyExists);
        }

        let user = User::new(username, password);
        users.insert(username.to_string(), user.clone());

        Ok(user)
    }

    #[must_use]
    pub fn lookup(&self, username: &str) -> Option<User> {
        read_guard(&self.users).get(username).cloned()
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    /// Returns `InvalidCredentials` for an unknown username or a password
    /// mismatch; the caller cannot tell which.
    pub fn verify_credentials(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let users = read_guard(&self.users);

        users
            .get(username)
            .filter(|user| user.password_matches(password))
            .cloned()
            .ok_or(StoreError::InvalidCredentials)
    }
}
