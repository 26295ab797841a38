//! Built-in subset of the CIM physical network model
//!
//! Types share the CIM inheritance chain as builder prefixes:
//! IdentifiedObject, then PowerSystemResource, then ConductingEquipment.

use super::{PropertyKind, RecordType, RecordTypeBuilder, SchemaRegistry, ID_PROPERTY};

const PHASE_CODES: &[&str] = &[
    "ABCN", "ABC", "ABN", "ACN", "BCN", "AB", "AC", "BC", "AN", "BN", "CN", "A", "B", "C", "N",
    "s1N", "s2N", "s12N", "s1", "s2", "s12",
];

const WINDING_CONNECTIONS: &[&str] = &["D", "Y", "Z", "Yn", "Zn", "A", "I"];

const PETERSEN_COIL_MODES: &[&str] = &["fixed", "manual", "automaticPositioning"];

/// Registry holding every built-in CIM type
pub fn registry() -> SchemaRegistry {
    [
        connectivity_node(),
        terminal(),
        ac_line_segment(),
        petersen_coil(),
        ratio_tap_changer(),
        power_transformer_end(),
        base_voltage(),
        substation(),
        sub_geographical_region(),
        location(),
        asset(),
        fuse(),
    ]
    .into_iter()
    .fold(SchemaRegistry::new(ID_PROPERTY), SchemaRegistry::with_type)
}

fn identified_object(name: &str) -> RecordTypeBuilder {
    RecordType::builder(name)
        .property(ID_PROPERTY, PropertyKind::text())
        .property("description", PropertyKind::text())
        .property("name", PropertyKind::text())
        .property(
            "Names",
            PropertyKind::collection_of(PropertyKind::Reference),
        )
}

fn power_system_resource(name: &str) -> RecordTypeBuilder {
    identified_object(name)
        .property("Location", PropertyKind::Reference)
        .property("PSRType", PropertyKind::text())
        .property("Assets", PropertyKind::Reference)
}

fn conducting_equipment(name: &str) -> RecordTypeBuilder {
    power_system_resource(name)
        .optional("aggregate", PropertyKind::bool())
        .property("EquipmentContainer", PropertyKind::Reference)
        .property("BaseVoltage", PropertyKind::decimal())
}

fn connectivity_node() -> RecordType {
    identified_object("ConnectivityNode")
        .property("ConnectivityNodeContainer", PropertyKind::Reference)
        .build()
}

fn terminal() -> RecordType {
    identified_object("Terminal")
        .property("phases", PropertyKind::enumeration(PHASE_CODES))
        .optional("sequenceNumber", PropertyKind::integer())
        .optional("connected", PropertyKind::bool())
        .property("ConductingEquipment", PropertyKind::Reference)
        .property("ConnectivityNode", PropertyKind::Reference)
        .build()
}

fn ac_line_segment() -> RecordType {
    let mut builder = conducting_equipment("ACLineSegment");
    for quantity in ["b0ch", "bch", "g0ch", "gch", "r", "r0", "x", "x0", "length"] {
        builder = builder.property(quantity, PropertyKind::Quantity);
    }
    builder.build()
}

fn petersen_coil() -> RecordType {
    conducting_equipment("PetersenCoil")
        .property("mode", PropertyKind::enumeration(PETERSEN_COIL_MODES))
        .property("nominalU", PropertyKind::Quantity)
        .property("offsetCurrent", PropertyKind::Quantity)
        .property("positionCurrent", PropertyKind::Quantity)
        .property("xGroundNominal", PropertyKind::Quantity)
        .build()
}

fn ratio_tap_changer() -> RecordType {
    power_system_resource("RatioTapChanger")
        .property("highStep", PropertyKind::integer())
        .property("lowStep", PropertyKind::integer())
        .property("normalStep", PropertyKind::integer())
        .property("neutralU", PropertyKind::Quantity)
        .optional("ltcFlag", PropertyKind::bool())
        .optional("stepVoltageIncrement", PropertyKind::Quantity)
        .property("TransformerEnd", PropertyKind::Reference)
        .build()
}

fn power_transformer_end() -> RecordType {
    identified_object("PowerTransformerEnd")
        .property("endNumber", PropertyKind::integer())
        .property(
            "connectionKind",
            PropertyKind::enumeration(WINDING_CONNECTIONS),
        )
        .optional("phaseAngleClock", PropertyKind::integer())
        .property("r", PropertyKind::Quantity)
        .property("x", PropertyKind::Quantity)
        .property("ratedS", PropertyKind::Quantity)
        .property("ratedU", PropertyKind::Quantity)
        .property("PowerTransformer", PropertyKind::Reference)
        .property("Terminal", PropertyKind::Reference)
        .build()
}

fn base_voltage() -> RecordType {
    identified_object("BaseVoltage")
        .property("nominalVoltage", PropertyKind::Quantity)
        .build()
}

fn substation() -> RecordType {
    power_system_resource("Substation")
        .property("Region", PropertyKind::Reference)
        .build()
}

fn sub_geographical_region() -> RecordType {
    identified_object("SubGeographicalRegion")
        .property("Region", PropertyKind::Reference)
        .property(
            "Substations",
            PropertyKind::collection_of(PropertyKind::Reference),
        )
        .build()
}

fn location() -> RecordType {
    identified_object("Location")
        .property("type", PropertyKind::text())
        .property("mainAddress", PropertyKind::text())
        .property(
            "coordinates",
            PropertyKind::collection_of(PropertyKind::decimal()),
        )
        .property("CoordinateSystem", PropertyKind::Reference)
        .build()
}

fn asset() -> RecordType {
    identified_object("Asset")
        .property("serialNumber", PropertyKind::text())
        .property("lotNumber", PropertyKind::text())
        .optional("installationDate", PropertyKind::date_time())
        .property(
            "lifecycleYears",
            PropertyKind::collection_of(PropertyKind::integer()),
        )
        .property(
            "ratings",
            PropertyKind::collection_of(PropertyKind::Quantity),
        )
        .property(
            "PowerSystemResources",
            PropertyKind::collection_of(PropertyKind::Reference),
        )
        .build()
}

fn fuse() -> RecordType {
    conducting_equipment("Fuse")
        .property("ratingCurrent", PropertyKind::Quantity)
        .optional("normalOpen", PropertyKind::bool())
        .property("retained", PropertyKind::bool())
        .property("switchOnCount", PropertyKind::integer())
        .optional("switchOnDate", PropertyKind::date_time())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarKind;

    #[test]
    fn test_registry_contains_all_types() {
        let registry = registry();
        assert_eq!(
            registry.type_names(),
            vec![
                "ACLineSegment",
                "Asset",
                "BaseVoltage",
                "ConnectivityNode",
                "Fuse",
                "Location",
                "PetersenCoil",
                "PowerTransformerEnd",
                "RatioTapChanger",
                "SubGeographicalRegion",
                "Substation",
                "Terminal",
            ]
        );
    }

    #[test]
    fn test_every_type_declares_identifier_first() {
        let registry = registry();
        for name in registry.type_names() {
            let t = registry.record_type(name).unwrap();
            assert_eq!(t.properties()[0].name, ID_PROPERTY, "type {}", name);
        }
    }

    #[test]
    fn test_petersen_coil_aggregate_has_companion() {
        let t = registry().record_type("PetersenCoil").unwrap();
        assert_eq!(t.companion_flag("aggregate"), Some("aggregateSpecified"));
        assert!(t.property("aggregateSpecified").unwrap().excluded);
    }

    #[test]
    fn test_terminal_phases_is_enumeration() {
        let t = registry().record_type("Terminal").unwrap();
        match &t.property("phases").unwrap().kind {
            PropertyKind::Scalar(ScalarKind::Enumeration(literals)) => {
                assert!(literals.iter().any(|l| l == "ABC"));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
