use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

pub mod comics;
pub mod tokens;
pub mod users;

pub use self::comics::{Comic, ComicStore};
pub use self::tokens::TokenStore;
pub use self::users::{User, UserStore};

/// Domain failures raised by the stores.
///
/// `Display` carries the client-facing message verbatim so the handlers can
/// pass it straight through to the response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Usuário já existe")]
    UserAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Revista já registrada")]
    ComicAlreadyRegistered,
}

/// Process-wide mutable state, shared across handlers via `Extension`.
#[derive(Debug, Default)]
pub struct AppState {
    pub users: UserStore,
    pub comics: ComicStore,
    pub tokens: TokenStore,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Resolve a Bearer token back to its owning user.
    ///
    /// Malformed or unknown tokens degrade to `None`; this is the
    /// authentication gate and must never take a request down.
    #[must_use]
    pub fn verify_token(&self, token: &str) -> Option<User> {
        let username = self.tokens.resolve(token)?;
        self.users.lookup(&username)
    }
}

// The stores hold plain data and every mutation is a single insert/push, so a
// panic mid-write cannot leave the collection inconsistent. Recover the inner
// value instead of propagating the poison.
pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
