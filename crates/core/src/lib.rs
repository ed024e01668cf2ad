//! Domain types and pure logic for the FAQ service.
//!
//! This crate is persistence-free: no sqlx, no axum. It holds the error
//! taxonomy, shared type aliases, permission levels, the materialized-path
//! encoding for the category tree, and the "what to do with orphaned notes"
//! choice shared by category and user deletion.

pub mod disposition;
pub mod error;
pub mod levels;
pub mod seed;
pub mod tree;
pub mod types;
