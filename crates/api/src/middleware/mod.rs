//! Request guards.
//!
//! - [`auth`] -- resolves the session cookie to a [`auth::CurrentUser`].
//! - [`rbac`] -- permission-level guards layered on top of it.

pub mod auth;
pub mod rbac;
