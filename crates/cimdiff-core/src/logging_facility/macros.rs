//! Operation logging macros
//!
//! Every public engine operation logs a `start` event, then either an `end`
//! event or an `end_error` event carrying the canonical error code. Extra
//! structured fields follow the required ones.

/// Log the start of an operation
///
/// ```
/// # use cimdiff_core::log_op_start;
/// log_op_start!("get_diff");
/// log_op_start!("get_diff", previous_len = 3, next_len = 4);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = cimdiff_core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use cimdiff_core::log_op_end;
/// log_op_end!("apply_diff", duration_ms = 42, next_len = 7);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = cimdiff_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError);
/// its kind and stable code are attached.
///
/// ```
/// # use cimdiff_core::{log_op_error, errors::DiffError};
/// let err = DiffError::DuplicateRecordId { record_id: "r1".to_string() };
/// log_op_error!("get_diff", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = cimdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
