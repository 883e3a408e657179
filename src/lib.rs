//! # Gibiteca
//!
//! `gibiteca` is a small HTTP service that keeps two in-memory registries:
//! **users** and **comics**. Registering a user is open; registering a comic
//! requires a Bearer token minted at login.
//!
//! ## State & lifetime
//!
//! Both registries (and the token table) live for the lifetime of the
//! process. There is no persistence: a restart empties the stores and
//! invalidates every token. Uniqueness of usernames and comic names is
//! enforced under a write lock, since axum serves requests from a
//! multi-threaded runtime.
//!
//! ## Client contract
//!
//! Error responses are always `{"message": "..."}` with the original
//! Portuguese messages existing clients assert on. Tokens are opaque
//! strings with no expiry; verification is lookup-backed.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
