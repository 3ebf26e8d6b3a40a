//! Schema Codec Tests
//!
//! Wire-format behavior of the schema codec:
//! - Canonical documents re-serialize byte for byte
//! - Self-references stay bare names
//! - Malformed documents fail with INVALID_SCHEMA, unknown types with
//!   UNSUPPORTED_TYPE
//! - Union shapes the value codec cannot read still parse

use avroscan::codec::{encode_native, SqlValue};
use avroscan::schema::{self, FieldSchema, Primitive, RecordSchema, Schema};

// =============================================================================
// Helper Functions
// =============================================================================

fn roundtrip(text: &str) -> String {
    let parsed = schema::parse_str(text, &[]).unwrap();
    String::from_utf8(schema::serialize(&parsed).unwrap()).unwrap()
}

fn parse_err_code(text: &str) -> &'static str {
    schema::parse_str(text, &[]).unwrap_err().code()
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// Every canonical document comes back unchanged.
#[test]
fn test_canonical_documents_roundtrip() {
    let documents = [
        r#""string""#,
        r#"["null","int","string"]"#,
        r#"{"type":"map","values":{"type":"array","items":"string"}}"#,
        r#"{"type":"enum","namespace":"cards","name":"Suit","doc":"suits","symbols":["SPADES","HEARTS"]}"#,
        r#"{"type":"fixed","name":"md5","size":16}"#,
        r#"{"type":"fixed","logicalType":"duration","name":"span","size":12}"#,
        r#"{"type":"bytes","logicalType":"decimal","precision":10,"scale":2}"#,
        r#"{"type":"bytes","logicalType":"decimal","precision":4}"#,
        r#"{"type":"int","logicalType":"date"}"#,
        r#"{"type":"int","logicalType":"time"}"#,
        r#"{"type":"long","logicalType":"timestamp"}"#,
        r#"{"type":"int","logicalType":"timestamp","representation":"wallclock"}"#,
        r#"{"type":"record","name":"r","fields":[{"name":"a","aliases":["A"],"doc":"first","type":"int","default":0,"order":"descending"}]}"#,
        r#"{"type":"record","name":"m","fields":[{"name":"weights","type":{"type":"map","values":"int"},"default":{"b":1,"a":2}}]}"#,
    ];
    for doc in documents {
        assert_eq!(roundtrip(doc), doc);
    }
}

/// A record referring to itself serializes the reference as a bare name.
#[test]
fn test_self_reference_stays_a_name() {
    let doc = r#"{"type":"record","namespace":"lists","name":"LongList","aliases":["LinkedLongs"],"fields":[{"name":"value","type":"long"},{"name":"next","type":["null","LongList"],"default":null}]}"#;
    let parsed = schema::parse_str(doc, &[]).unwrap();

    let record = parsed.as_record().unwrap();
    match &record.fields()[1].schema {
        Schema::Union(branches) => assert_eq!(branches[1], Schema::Reference("LongList".into())),
        other => panic!("expected union, got {:?}", other),
    }
    assert_eq!(roundtrip(doc), doc);
}

/// The namespaced full name also resolves.
#[test]
fn test_full_name_reference() {
    let doc = r#"{"type":"record","namespace":"lists","name":"Node","fields":[{"name":"next","type":["null","lists.Node"]}]}"#;
    assert_eq!(roundtrip(doc), doc);
}

/// Names passed in as ancestors resolve in a nested document.
#[test]
fn test_ancestor_names() {
    let parsed = schema::parse_str(r#""Parent""#, &["Parent".to_string()]).unwrap();
    assert_eq!(parsed, Schema::Reference("Parent".into()));
}

/// A primitive in object form has the bare name as its canonical form.
#[test]
fn test_primitive_object_form_normalizes() {
    assert_eq!(schema::parse_str(r#"{"type":"int"}"#, &[]).unwrap(), Primitive::Int.into());
    assert_eq!(roundtrip(r#"{"type":"int"}"#), r#""int""#);
    assert_eq!(
        roundtrip(r#"{"type":"record","name":"r","fields":[{"name":"a","type":{"type":"string"}}]}"#),
        r#"{"type":"record","name":"r","fields":[{"name":"a","type":"string"}]}"#
    );
}

/// Records are only built through checked constructors and read through
/// accessors.
#[test]
fn test_record_accessors() {
    assert_eq!(
        RecordSchema::new("", Vec::new()).unwrap_err().code(),
        "INVALID_SCHEMA"
    );

    let record = RecordSchema::new("t", vec![FieldSchema::new("id", Primitive::Int.into())])
        .unwrap()
        .with_namespace("db")
        .with_aliases(vec!["T-1".to_string()])
        .with_doc("table t");
    assert_eq!(record.name(), "t");
    assert_eq!(record.namespace(), Some("db"));
    assert_eq!(record.aliases(), ["T-1".to_string()]);
    assert_eq!(record.doc(), Some("table t"));
    assert_eq!(record.fields().len(), 1);
    assert_eq!(record.sql_name(), "T-1");

    let parsed = schema::parse_str(r#"{"type":"record","name":"","fields":[]}"#, &[]);
    assert_eq!(parsed.unwrap_err().code(), "INVALID_SCHEMA");
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// Decimal parameters are validated.
#[test]
fn test_decimal_validation() {
    for doc in [
        r#"{"type":"bytes","logicalType":"decimal","precision":-1}"#,
        r#"{"type":"bytes","logicalType":"decimal"}"#,
        r#"{"type":"bytes","logicalType":"decimal","precision":4,"scale":-1}"#,
    ] {
        assert_eq!(parse_err_code(doc), "INVALID_SCHEMA", "{}", doc);
    }
}

/// Durations are exactly twelve bytes.
#[test]
fn test_duration_size() {
    let doc = r#"{"type":"fixed","logicalType":"duration","name":"span","size":16}"#;
    assert_eq!(parse_err_code(doc), "INVALID_SCHEMA");
}

/// Structural problems and unknown types are told apart.
#[test]
fn test_error_taxonomy() {
    assert_eq!(parse_err_code(r#"{"name":"x"}"#), "INVALID_SCHEMA");
    assert_eq!(parse_err_code("[]"), "INVALID_SCHEMA");
    assert_eq!(parse_err_code("{not json"), "INVALID_SCHEMA");
    assert_eq!(parse_err_code(r#"{"type":"record","fields":[]}"#), "INVALID_SCHEMA");
    assert_eq!(parse_err_code(r#""tuple""#), "UNSUPPORTED_TYPE");
    assert_eq!(parse_err_code(r#"{"type":"tuple"}"#), "UNSUPPORTED_TYPE");
}

// =============================================================================
// Union Shape Tests
// =============================================================================

/// Unions the value codec cannot read parse fine but fail at encoding time.
#[test]
fn test_union_shapes_rejected_only_by_value_codec() {
    for doc in [r#"["null","int","string"]"#, r#"["null",["null","int"]]"#] {
        let parsed = schema::parse_str(doc, &[]).unwrap();
        let err = encode_native(&parsed, SqlValue::Int(1)).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_TYPE_FOR_SQL", "{}", doc);
    }
}
