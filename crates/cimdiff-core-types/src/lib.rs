//! Core types shared across the cimdiff crates
//!
//! This crate provides foundational types used by the diff engine, its
//! error facility and its logging facility:
//!
//! - **Identifiers**: ChangeId, the identity of a single change entry
//! - **Schema constants**: Canonical field keys and event names

pub mod ids;
pub mod schema;

pub use ids::ChangeId;
