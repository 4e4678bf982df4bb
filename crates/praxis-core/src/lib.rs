//! praxis-core
//!
//! Pure domain types and relational-store naming conventions for the
//! assessment engine. No I/O here; this is the shared vocabulary of the
//! Praxis workspace.

pub mod error;
pub mod models;
pub mod relations;
