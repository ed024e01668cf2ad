//! Permission level constants.
//!
//! Levels are ordered: a higher level implies every capability of the levels
//! below it. These must match the seed data in the `users` migration.

/// May browse notes and the category tree.
pub const LEVEL_VIEWER: i64 = 1;

/// May create notes and edit/delete their own.
pub const LEVEL_CONTRIBUTOR: i64 = 2;

/// May manage categories and edit/delete any note.
pub const LEVEL_CATEGORY_MANAGER: i64 = 3;

/// May manage user accounts.
pub const LEVEL_ADMIN: i64 = 4;
