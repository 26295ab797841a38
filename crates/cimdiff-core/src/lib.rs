//! cimdiff core - diff and patch engine for identified CIM records
//!
//! This crate computes and applies structural deltas between two snapshots of
//! uniquely identified, typed records:
//! - Record model with scalar, quantity, reference and collection values
//! - Schema registry with a built-in CIM physical network subset
//! - Property introspector, equality oracle and value codec
//! - Diff generator emitting creation, deletion and modification entries
//!   with undo payloads
//! - Patch applicator, inversion and undo
//! - JSON record codec with JSON Lines streams
//!
//! The central law: `apply_diff(p, get_diff(p, n)) == n`.

pub mod apply;
pub mod changes;
pub mod codec;
pub mod config;
pub mod diff;
pub mod differ;
pub mod equality;
pub mod errors;
pub mod introspect;
pub mod logging_facility;
pub mod model;
pub mod schema;

// Re-export commonly used types
pub use apply::{ApplyReport, SkippedChange};
pub use changes::{Change, ChangeEntry, PropertyModification, ReverseChange, TransportValue};
pub use cimdiff_core_types::ChangeId;
pub use config::{ApplyFailurePolicy, DifferConfig, QuantityComparison, TypeMismatchPolicy};
pub use differ::Differ;
pub use equality::EqualityOracle;
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use introspect::PropertyIntrospector;
pub use model::{
    PropertyValue, Quantity, Record, RecordSet, Scalar, TypedReference, UnitMultiplier, UnitSymbol,
};
pub use schema::{PropertyKind, SchemaRegistry};
