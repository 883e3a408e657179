use crate::store::{read_guard, write_guard};
use base64ct::{Base64Unpadded, Encoding};
use std::collections::HashMap;
use std::sync::RwLock;
use ulid::Ulid;

/// Mints opaque Bearer tokens and resolves them back to usernames.
///
/// A token is the unpadded base64 of `username:ULID`, so it stays header-safe
/// and unique per login. Verification is lookup-backed: only tokens this
/// store issued resolve, a forged-but-well-formed string does not. No TTL,
/// no revocation; the table lives as long as the process.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl TokenStore {
    /// Mint a token for `username` and record it.
    #[must_use]
    pub fn issue(&self, username: &str) -> String {
        let raw = format!("{username}:{}", Ulid::new());
        let token = Base64Unpadded::encode_string(raw.as_bytes());

        write_guard(&self.tokens).insert(token.clone(), username.to_string());

        token
    }

    /// Resolve a token to the username it was minted for, if any.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<String> {
        read_guard(&self.tokens).get(token).cloned()
    }
}
