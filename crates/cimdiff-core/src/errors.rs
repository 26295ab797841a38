use cimdiff_core_types::ChangeId;
use thiserror::Error;

/// Result type alias using DiffError
pub type Result<T> = std::result::Result<T, DiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the diff engine. Each kind maps to a stable error code that can
/// be used for programmatic error handling, testing, and external reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Record sets
    DuplicateId,

    // Schema contract
    TypeMismatch,
    UnknownType,
    UnknownProperty,
    KindMismatch,
    IdentifierNotModifiable,

    // Apply
    MissingTarget,
    Decode,
    NotInvertible,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateId => "ERR_DUPLICATE_ID",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::UnknownType => "ERR_UNKNOWN_TYPE",
            ExErrorKind::UnknownProperty => "ERR_UNKNOWN_PROPERTY",
            ExErrorKind::KindMismatch => "ERR_KIND_MISMATCH",
            ExErrorKind::IdentifierNotModifiable => "ERR_IDENTIFIER_NOT_MODIFIABLE",
            ExErrorKind::MissingTarget => "ERR_MISSING_TARGET",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::NotInvertible => "ERR_NOT_INVERTIBLE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// Whether this kind is a violation of the record schema contract
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::TypeMismatch
                | ExErrorKind::UnknownType
                | ExErrorKind::UnknownProperty
                | ExErrorKind::KindMismatch
                | ExErrorKind::IdentifierNotModifiable
        )
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    record_id: Option<String>,
    record_type: Option<String>,
    change_id: Option<ChangeId>,
    property: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            record_id: None,
            record_type: None,
            change_id: None,
            property: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add record ID context
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Add record type context
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Add change entry context
    pub fn with_change_id(mut self, change_id: ChangeId) -> Self {
        self.change_id = Some(change_id);
        self
    }

    /// Add property name context
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the record ID context, if any
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// Get the record type context, if any
    pub fn record_type(&self) -> Option<&str> {
        self.record_type.as_deref()
    }

    /// Get the change entry context, if any
    pub fn change_id(&self) -> Option<&ChangeId> {
        self.change_id.as_ref()
    }

    /// Get the property name context, if any
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(record_type) = &self.record_type {
            write!(f, " (record_type: {})", record_type)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {})", property)?;
        }
        if let Some(change_id) = &self.change_id {
            write!(f, " (change_id: {})", change_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for diff and apply operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    // ===== Record Set Errors =====
    /// Two records in one snapshot share an id
    #[error("Duplicate record id in snapshot: {record_id}")]
    DuplicateRecordId { record_id: String },

    // ===== Schema Errors =====
    /// A record changed its type between snapshots
    #[error("Record {record_id} changed type from {previous_type} to {next_type}")]
    TypeMismatch {
        record_id: String,
        previous_type: String,
        next_type: String,
    },

    /// A record type is not declared by the schema registry
    #[error("Unknown record type: {record_type}")]
    UnknownRecordType { record_type: String },

    /// A property name is not part of the record type's contract
    #[error("Unknown property '{property}' on record type {record_type}")]
    UnknownProperty {
        record_type: String,
        property: String,
    },

    /// A property value does not fit the property's declared kind
    #[error("Property '{property}' of {record_type}/{record_id} is declared as {expected} but holds a {found}")]
    ValueKindMismatch {
        record_type: String,
        record_id: String,
        property: String,
        expected: String,
        found: String,
    },

    /// A modification tried to rewrite the identifier property
    #[error("The identifier property '{property}' of {record_type}/{record_id} cannot be modified")]
    IdentifierNotModifiable {
        record_type: String,
        record_id: String,
        property: String,
    },

    // ===== Apply Errors =====
    /// A modification targets a record that is not in the base set
    #[error("Could not find {reference_type}/{record_id} to apply change {change_id} to")]
    MissingTarget {
        reference_type: String,
        record_id: String,
        change_id: ChangeId,
    },

    /// A transport value could not be turned back into a property value
    #[error("Could not decode '{raw}' into the '{property}' property of {record_type}: {reason}")]
    Decode {
        record_type: String,
        property: String,
        raw: String,
        reason: String,
    },

    /// A change entry lacks the payload needed to build its inverse
    #[error("Change {change_id} cannot be inverted: {reason}")]
    NotInvertible { change_id: ChangeId, reason: String },

    // ===== Configuration Errors =====
    /// Invalid engine configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Integration Errors =====
    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Reading or writing a record stream failed
    #[error("I/O error: {message}")]
    Io { message: String },
}

/// Conversion from DiffError to ExError
///
/// Maps every typed error onto the canonical facility so that logging and
/// external reporting see stable codes and structured context.
impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        let message = err.to_string();
        match err {
            DiffError::DuplicateRecordId { record_id } => ExError::new(ExErrorKind::DuplicateId)
                .with_record_id(record_id)
                .with_op("build_record_set")
                .with_message(message),

            DiffError::TypeMismatch { record_id, .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_record_id(record_id)
                .with_op("get_diff")
                .with_message(message),

            DiffError::UnknownRecordType { record_type } => {
                ExError::new(ExErrorKind::UnknownType)
                    .with_record_type(record_type)
                    .with_message(message)
            }

            DiffError::UnknownProperty {
                record_type,
                property,
            } => ExError::new(ExErrorKind::UnknownProperty)
                .with_record_type(record_type)
                .with_property(property)
                .with_message(message),

            DiffError::ValueKindMismatch {
                record_type,
                record_id,
                property,
                ..
            } => ExError::new(ExErrorKind::KindMismatch)
                .with_record_type(record_type)
                .with_record_id(record_id)
                .with_property(property)
                .with_message(message),

            DiffError::IdentifierNotModifiable {
                record_type,
                record_id,
                property,
            } => ExError::new(ExErrorKind::IdentifierNotModifiable)
                .with_record_type(record_type)
                .with_record_id(record_id)
                .with_property(property)
                .with_op("apply_diff")
                .with_message(message),

            DiffError::MissingTarget {
                reference_type,
                record_id,
                change_id,
            } => ExError::new(ExErrorKind::MissingTarget)
                .with_record_type(reference_type)
                .with_record_id(record_id)
                .with_change_id(change_id)
                .with_op("apply_diff")
                .with_message(message),

            DiffError::Decode {
                record_type,
                property,
                ..
            } => ExError::new(ExErrorKind::Decode)
                .with_record_type(record_type)
                .with_property(property)
                .with_message(message),

            DiffError::NotInvertible { change_id, .. } => {
                ExError::new(ExErrorKind::NotInvertible)
                    .with_change_id(change_id)
                    .with_op("invert")
                    .with_message(message)
            }

            DiffError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            DiffError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            DiffError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to DiffError
impl From<serde_json::Error> for DiffError {
    fn from(err: serde_json::Error) -> Self {
        DiffError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from std::io::Error to DiffError
impl From<std::io::Error> for DiffError {
    fn from(err: std::io::Error) -> Self {
        DiffError::Io {
            message: err.to_string(),
        }
    }
}
