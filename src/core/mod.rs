//! core
//!
//! Domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Branch references, picker selection items, file status
//! - [`pr_ref`] - Pull-request ref parsing and labels
//! - [`config`] - Configuration schema and loading
//!
//! Nothing in this module talks to git or the terminal; everything here is
//! pure and request-scoped.

pub mod config;
pub mod pr_ref;
pub mod types;
