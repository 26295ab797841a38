//! Structured logging for the diff engine
//!
//! `init` installs the process subscriber (once); the `log_op_*` macros give
//! every engine operation the same start/end/end_error shape, keyed by the
//! constants in `cimdiff_core_types::schema`; `test_capture` collects events
//! in memory for assertions.
//!
//! ```rust
//! use cimdiff_core::logging_facility::{init, Profile};
//!
//! // CIMDIFF_LOG_PROFILE overrides the default
//! init(Profile::from_env().unwrap_or(Profile::Development));
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile, PROFILE_ENV};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
