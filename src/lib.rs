//! # Soiree (event planning accounts)
//!
//! `soiree` manages registered accounts for an event-planning application:
//! credential registration and login, server-tracked sessions, and an
//! authenticated account view listing activities and guest subscriptions.
//!
//! ## Authentication
//!
//! Passwords are hashed with Argon2id and never stored or logged in
//! plaintext. Sessions are opaque random tokens carried in an `HttpOnly`
//! cookie; the database stores only a SHA-256 hash of the token together
//! with the account id and display name.
//!
//! ## Error posture
//!
//! Every authentication operation returns a typed outcome instead of
//! propagating raw errors to the caller. Login failures are surfaced with a
//! single generic message so the boundary does not reveal which emails are
//! registered; the distinction is kept in diagnostic logs only.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }
}
