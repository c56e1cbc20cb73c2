use pretty_assertions::assert_eq;
use recordschema_core::{coerce, Schema, Section};
use recordschema_validator::{
    DocumentValidator, ErrorKind, ResourcePresenceCheck, ResourceTypeConfig, Status, StructuralValidator,
};
use serde_json::{json, Value};

fn patient_schema() -> Schema {
    coerce(&json!({
        "PatientBk": {"type": "string", "required": true},
        "FirstNm": {"type": "string", "required": false},
        "BirthTs": {"type": "string", "format": "date", "required": false},
        "BirthOrder": {"type": "int", "required": false},
        "WeightKg": {"type": "float", "required": false},
        "DeceasedInd": {"type": "bool", "required": false},
        "SourceTransactionTs": {"type": "string", "format": "date-time", "required": false}
    }))
    .unwrap()
}

fn encounter_schema() -> Schema {
    coerce(&json!({
        "EncounterBk": {"type": "string", "required": true},
        "AdmitTs": {"type": "string", "format": "date-time", "required": false}
    }))
    .unwrap()
}

fn validator() -> DocumentValidator {
    DocumentValidator::builder()
        .section(Section::Patient, patient_schema())
        .section(Section::Encounter, encounter_schema())
        .section(
            Section::PatientAddress,
            coerce(&json!({"City": {"type": "string", "required": true}})).unwrap(),
        )
        .section(
            Section::PatientPhone,
            coerce(&json!({"PhoneNumber": {"type": "string", "required": true}})).unwrap(),
        )
        .resource_types(ResourceTypeConfig::new(["Patient", "Encounter"]))
        .build()
        .unwrap()
}

#[test]
fn test_nested_null_object_is_distinct_condition() {
    let schema = coerce(&json!({
        "PatientAddress": {
            "type": "object",
            "required": true,
            "properties": {"City": {"type": "string", "required": true}}
        }
    }))
    .unwrap();

    let errors = StructuralValidator::default().validate(&json!({"PatientAddress": null}), &schema, "");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::SectionNull);
    assert_eq!(errors[0].message, "PatientAddress is null");
    assert!(!errors[0].message.contains("City"));
}

#[test]
fn test_date_format_property() {
    let schema = coerce(&json!({"BirthTs": {"type": "string", "format": "date", "required": false}})).unwrap();
    let validator = StructuralValidator::default();

    assert!(validator.validate(&json!({"BirthTs": "2022-01-01"}), &schema, "").is_empty());

    let errors = validator.validate(&json!({"BirthTs": "2022-13-40"}), &schema, "");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::FormatMismatch);
}

#[test]
fn test_array_of_objects_property() {
    let schema = coerce(&json!({
        "Patient": {
            "type": "array",
            "required": true,
            "items": {"PatientBk": {"type": "string", "required": true}}
        }
    }))
    .unwrap();

    let errors = StructuralValidator::default().validate(&json!({"Patient": [{"PatientBk": "A"}, {}]}), &schema, "");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::MissingRequired);
    assert_eq!(errors[0].path, "Patient[1].PatientBk");
}

#[test]
fn test_resource_presence_property() {
    let check = ResourcePresenceCheck::new(
        ResourceTypeConfig::from_value(&json!({"resource_type": ["Patient", "Encounter"]})).unwrap(),
    );

    assert!(check.check(&json!({"Encounter": [{"EncounterBk": "E1"}]})).is_success());
    assert!(!check.check(&json!({"Observation": [{"code": "x"}]})).is_success());
}

#[test]
fn test_exactly_one_missing_required_regardless_of_siblings() {
    let siblings = [
        json!({}),
        json!({"FirstNm": null}),
        json!({"FirstNm": 42, "BirthOrder": "x", "BirthTs": "not-a-date"}),
        json!({"FirstNm": "Ann", "BirthOrder": 3, "BirthTs": "2022-01-01"}),
    ];

    for patient in siblings {
        let report = validator().validate_document(&json!({"Patient": [patient]}));
        let missing: Vec<_> = report
            .errors_of_kind(ErrorKind::MissingRequired)
            .filter(|error| error.path == "Patient[0].PatientBk")
            .collect();
        assert_eq!(missing.len(), 1, "{:?}", report.errors);
    }
}

#[test]
fn test_well_typed_fields_produce_no_errors() {
    let report = validator().validate_document(&json!({
        "Patient": [{
            "PatientBk": "BK123",
            "FirstNm": "Ann",
            "BirthTs": "1990-02-28",
            "BirthOrder": 1,
            "WeightKg": 61.5,
            "DeceasedInd": false,
            "SourceTransactionTs": "2023-12-25T10:30:00",
            "PatientAddress": {"City": "Springfield"},
            "PatientPhone": [{"PhoneNumber": "555-0100"}, {"PhoneNumber": "555-0101"}]
        }],
        "Encounter": [{"EncounterBk": "E1", "AdmitTs": "2023-12-25T08:00:00"}]
    }));

    assert!(report.ok, "{:?}", report.errors);
    assert_eq!(
        serde_json::to_value(report.to_status()).unwrap(),
        json!({"status": "success", "message": "JSON is valid against the schema."})
    );
}

#[test]
fn test_failed_status_joins_messages() {
    let report = validator().validate_document(&json!({
        "Patient": [{"BirthOrder": "2", "PatientAddress": null, "PatientPhone": []}]
    }));

    let status = report.to_status();
    assert_eq!(status.status, Status::Failed);
    assert_eq!(
        status.message,
        "Missing required field: Patient[0].PatientBk; \
         Field Patient[0].BirthOrder should be int, found string; \
         Patient[0].PatientAddress is null"
    );
}

#[test]
fn test_strict_types_never_coerce() {
    let report = validator().validate_document(&json!({
        "Patient": [{
            "PatientBk": 123,
            "BirthOrder": 1.5,
            "WeightKg": 70,
            "DeceasedInd": "false",
            "PatientAddress": {"City": "Springfield"},
            "PatientPhone": []
        }]
    }));

    let paths: Vec<&str> = report.errors.iter().map(|error| error.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "Patient[0].PatientBk",
            "Patient[0].BirthOrder",
            "Patient[0].WeightKg",
            "Patient[0].DeceasedInd",
        ]
    );
    assert!(report.errors.iter().all(|error| error.kind == ErrorKind::TypeMismatch));
}

#[test]
fn test_malformed_documents_become_errors() {
    let documents: Vec<Value> = vec![
        json!(null),
        json!("Patient"),
        json!({"Patient": 7}),
        json!({"Patient": [null, [], "x"]}),
        json!({"Patient": [{"PatientAddress": "1 Main St", "PatientPhone": {"PhoneNumber": 5}}]}),
        json!({"Encounter": {"EncounterBk": ["E1"]}}),
    ];

    let validator = validator();
    for document in documents {
        let report = validator.validate_document(&document);
        assert!(!report.ok, "{document}");
        assert_eq!(report.to_status().status, Status::Failed);
    }
}

#[test]
fn test_legacy_schema_shapes_validate_the_same() {
    let template = coerce(&json!({
        "Patient": [{"PatientBk": {"type": "string", "required": true}}]
    }))
    .unwrap();
    let explicit = coerce(&json!({
        "Patient": {
            "type": "array",
            "items": {"PatientBk": {"type": "string", "required": true}}
        }
    }))
    .unwrap();

    let document = json!({"Patient": [{"PatientBk": "A"}, {"PatientBk": ""}]});
    let validator = StructuralValidator::default();
    assert_eq!(
        validator.validate(&document, &template, ""),
        validator.validate(&document, &explicit, "")
    );
}

#[test]
fn test_patient_without_address_fails() {
    let report = validator().validate_document(&json!({
        "Patient": [{"PatientBk": "A", "PatientPhone": []}]
    }));

    assert!(!report.ok);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ErrorKind::SectionMissing);
    assert_eq!(report.errors[0].message, "Missing section: Patient[0].PatientAddress");
}

#[test]
fn test_patient_needs_one_populated_contact_key() {
    let validator = DocumentValidator::builder()
        .section(Section::Patient, patient_schema())
        .entry_keys(
            Section::Patient,
            ResourceTypeConfig::new(["Info", "Address", "Identification", "Email", "Phone"]),
        )
        .build()
        .unwrap();

    assert!(validator
        .validate_document(&json!({"Patient": [{"PatientBk": "A", "Identification": {"Ssn": "x"}}]}))
        .ok);

    let report = validator.validate_document(&json!({"Patient": {"PatientBk": "A", "Email": ""}}));
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ErrorKind::EntryKeysMissing);
    assert_eq!(report.errors[0].path, "Patient");
}
