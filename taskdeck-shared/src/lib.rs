//! # Taskdeck Shared Library
//!
//! This crate contains the types, database models, and business logic
//! shared by the Taskdeck API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `events`: Domain events raised by task transitions
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod events;
pub mod models;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
