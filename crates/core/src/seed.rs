//! Well-known seeded entities.
//!
//! These must match the startup bootstrap that creates the root category
//! and default admin account.

use crate::types::DbId;

/// The protected root category; created at startup, never deletable.
pub const ROOT_CATEGORY_ID: DbId = 1;

/// Name of the seeded root category.
pub const ROOT_CATEGORY_NAME: &str = "General";

/// Tree path of the seeded root category (first top-level slot).
pub const ROOT_CATEGORY_TREE: &str = "000";

/// Id of the seeded default admin account.
pub const DEFAULT_ADMIN_ID: DbId = 1;
