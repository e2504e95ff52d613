//! linmerge - merge GitHub pull requests with a linear history
//!
//! The pull request branch is rebased onto its base, then merged with a
//! merge commit or squashed. Any failure rolls the local repository and
//! the pushed PR branch back to where they started.

pub mod auth;
pub mod config;
pub mod error;
pub mod merge;
pub mod platform;
pub mod repo;
pub mod types;
