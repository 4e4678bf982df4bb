//! praxis-engine
//!
//! Assessment assignment, lifecycle and synchronization. Sits between the
//! dashboard and an [`AssessmentStore`](praxis_store::store::AssessmentStore):
//! lists a therapist's instances (falling back to separate lookups when the
//! joined query fails), fans template assignments out to clients, enforces
//! the status state machine, resolves latest scores, and keeps a session
//! cache current from change notifications.

pub mod accessor;
pub mod assignment;
pub mod audit;
pub mod bridge;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod scores;
pub mod session;

pub use engine::AssessmentEngine;
pub use error::EngineError;
