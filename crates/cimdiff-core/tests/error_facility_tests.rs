use cimdiff_core::errors::{DiffError, ExError, ExErrorKind};
use cimdiff_core::ChangeId;

#[test]
fn test_missing_target_verifiable_by_kind() {
    let err = DiffError::MissingTarget {
        reference_type: "Substation".to_string(),
        record_id: "s1".to_string(),
        change_id: ChangeId::from("c1"),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingTarget);
    assert_eq!(ex_err.code(), "ERR_MISSING_TARGET");
    assert_eq!(ex_err.record_type(), Some("Substation"));
    assert_eq!(ex_err.record_id(), Some("s1"));
    assert_eq!(ex_err.change_id(), Some(&ChangeId::from("c1")));
    assert_eq!(ex_err.op(), Some("apply_diff"));
}

#[test]
fn test_duplicate_id_structured_fields() {
    let err = DiffError::DuplicateRecordId {
        record_id: "dup".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateId);
    assert_eq!(ex_err.record_id(), Some("dup"));
    assert_eq!(ex_err.op(), Some("build_record_set"));
    assert!(ex_err.message().contains("Duplicate record id"));
}

#[test]
fn test_decode_error_keeps_property_and_type() {
    let err = DiffError::Decode {
        record_type: "ACLineSegment".to_string(),
        property: "gch".to_string(),
        raw: "153kF".to_string(),
        reason: "expected '<value> <unit>'".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("153kF"));
    assert!(text.contains("gch"));
    assert!(text.contains("ACLineSegment"));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Decode);
    assert_eq!(ex_err.property(), Some("gch"));
    assert!(!ex_err.kind().is_schema_error());
}

#[test]
fn test_value_kind_mismatch_is_schema_error() {
    let err = DiffError::ValueKindMismatch {
        record_type: "Terminal".to_string(),
        record_id: "t1".to_string(),
        property: "sequenceNumber".to_string(),
        expected: "integer".to_string(),
        found: "text".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Property 'sequenceNumber' of Terminal/t1 is declared as integer but holds a text"
    );

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.code(), "ERR_KIND_MISMATCH");
    assert!(ex_err.kind().is_schema_error());
}

#[test]
fn test_type_mismatch_and_unknown_property_are_schema_errors() {
    let mismatch: ExError = DiffError::TypeMismatch {
        record_id: "x".to_string(),
        previous_type: "Substation".to_string(),
        next_type: "Terminal".to_string(),
    }
    .into();
    assert!(mismatch.kind().is_schema_error());
    assert_eq!(mismatch.op(), Some("get_diff"));

    let unknown: ExError = DiffError::UnknownProperty {
        record_type: "Terminal".to_string(),
        property: "colour".to_string(),
    }
    .into();
    assert!(unknown.kind().is_schema_error());
    assert_eq!(unknown.property(), Some("colour"));
}

#[test]
fn test_io_and_json_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err: DiffError = io.into();
    assert!(matches!(err, DiffError::Io { .. }));
    assert_eq!(ExError::from(err).code(), "ERR_IO");

    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: DiffError = json.into();
    assert!(matches!(err, DiffError::Serialization { .. }));
    assert_eq!(ExError::from(err).code(), "ERR_SERIALIZATION");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::DuplicateId, "ERR_DUPLICATE_ID"),
        (ExErrorKind::TypeMismatch, "ERR_TYPE_MISMATCH"),
        (ExErrorKind::UnknownType, "ERR_UNKNOWN_TYPE"),
        (ExErrorKind::UnknownProperty, "ERR_UNKNOWN_PROPERTY"),
        (ExErrorKind::KindMismatch, "ERR_KIND_MISMATCH"),
        (
            ExErrorKind::IdentifierNotModifiable,
            "ERR_IDENTIFIER_NOT_MODIFIABLE",
        ),
        (ExErrorKind::MissingTarget, "ERR_MISSING_TARGET"),
        (ExErrorKind::Decode, "ERR_DECODE"),
        (ExErrorKind::NotInvertible, "ERR_NOT_INVERTIBLE"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_display_carries_code_and_change_id() {
    let ex_err: ExError = DiffError::NotInvertible {
        change_id: ChangeId::from("c9"),
        reason: "deletion carries no snapshot".to_string(),
    }
    .into();

    let text = ex_err.to_string();
    assert!(text.starts_with("[ERR_NOT_INVERTIBLE] in operation 'invert'"));
    assert!(text.contains("(change_id: c9)"));
}
