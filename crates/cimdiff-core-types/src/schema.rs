//! Field keys and event names of the structured log schema
//!
//! Engine operations (`get_diff`, `apply_diff`, `undo`, ...) emit a `start`
//! event and then one of `end` / `end_error`, all keyed by the fields below.

/// Module path of the emitting code
pub const FIELD_COMPONENT: &str = "component";
/// Engine operation name
pub const FIELD_OP: &str = "op";
/// Lifecycle phase, one of the `EVENT_*` names
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Record and change identity
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_RECORD_TYPE: &str = "record_type";
pub const FIELD_CHANGE_ID: &str = "change_id";
pub const FIELD_PROPERTY: &str = "property";

// Snapshot and change sequence sizes
pub const FIELD_PREVIOUS_LEN: &str = "previous_len";
pub const FIELD_NEXT_LEN: &str = "next_len";
pub const FIELD_CHANGES_LEN: &str = "changes_len";

// Attached by `log_op_error!` and skip warnings
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
