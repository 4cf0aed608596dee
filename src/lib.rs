//! cadre - Interactive Org-Chart CLI
//!
//! cadre manages a small organizational dataset — departments, roles, and
//! employees — backed by MySQL. A fixed menu is presented in the terminal;
//! each choice runs a single parameterized query and prints an aligned table
//! or a one-line confirmation.
//!
//! # Architecture
//! Two strictly layered components:
//! - Data access ([`store`]): a bounded connection pool plus a fixed set of
//!   named single-statement operations returning typed records.
//! - Interaction ([`menu`], [`render`]): the menu loop, prompt handling, and
//!   table rendering.
//!
//! Control flow is a single blocking round trip per user action. Store and
//! prompt errors are logged and the menu re-presented; the explicit Quit
//! entry is the only way out.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`config`] - Connection configuration resolution
//! - [`store`] - Connection pool, typed records, named operations
//! - [`menu`] - The interactive menu loop and its handlers
//! - [`render`] - Table and confirmation output

pub mod config;
pub mod error;
pub mod menu;
pub mod render;
pub mod store;

// Re-export commonly used types for convenience
pub use config::DbConfig;
pub use error::{CadreError, Result};
pub use store::{Department, Employee, EmployeeDetail, Role, RoleDetail, Store};
