//! praxis-store
//!
//! The relational-store boundary of the assessment engine: the
//! [`store::AssessmentStore`] and [`store::ChangeFeed`] traits, typed store
//! errors, an in-memory store and a PostgREST-style HTTP store.

pub mod error;
pub mod feed;
pub mod memory;
pub mod rest;
pub mod store;
