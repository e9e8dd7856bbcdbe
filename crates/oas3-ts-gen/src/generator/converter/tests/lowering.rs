use std::collections::BTreeSet;

use serde_json::{Value, json};

use crate::generator::{
  CodegenConfig, NameAffixes,
  ast::{Field, Literal, PrimitiveKind, TypeExpr},
  converter::{FieldSource, LoweringContext, LoweringError, LoweringOutput, MAX_LOWERING_DEPTH, node_description},
  document::{Document, SchemaNode},
  metrics::GenerationWarning,
  schema_registry::SchemaRegistry,
};

fn schemas_document(schemas: Value) -> Document {
  let value = json!({
    "openapi": "3.1.0",
    "info": { "title": "Lowering", "version": "1" },
    "components": { "schemas": schemas }
  });
  Document::from_value(value, None).unwrap()
}

fn lower_with(config: &CodegenConfig, node: Value) -> (TypeExpr, LoweringOutput) {
  let doc = schemas_document(json!({
    "Base": { "type": "object", "properties": { "id": { "type": "string" } } },
    "Pet": { "type": "object" }
  }));
  let mut warnings = vec![];
  let registry = SchemaRegistry::new(&doc, config, &mut warnings);
  let mut lowering = LoweringContext::new(&registry, config, "Subject");
  let ty = lowering.lower(&SchemaNode::from_value(node)).unwrap();
  (ty, lowering.finish())
}

fn lower(node: Value) -> TypeExpr {
  lower_with(&CodegenConfig::default(), node).0
}

fn primitive(kind: PrimitiveKind) -> TypeExpr {
  TypeExpr::Primitive(kind)
}

fn string_literal(text: &str) -> TypeExpr {
  TypeExpr::Literal(Literal::String(text.to_string()))
}

fn field(name: &str, ty: TypeExpr, required: bool) -> Field {
  Field {
    name: name.to_string(),
    ty,
    required,
    description: None,
    deprecated: false,
  }
}

#[test]
fn test_primitive_types() {
  let cases = [
    (json!({ "type": "string" }), primitive(PrimitiveKind::String)),
    (json!({ "type": "number", "format": "double" }), primitive(PrimitiveKind::Number)),
    (json!({ "type": "integer" }), primitive(PrimitiveKind::Integer)),
    (json!({ "type": "boolean" }), primitive(PrimitiveKind::Boolean)),
    (json!({ "type": "null" }), TypeExpr::Null),
    (json!({ "type": "file" }), TypeExpr::UNKNOWN),
    (json!({ "minLength": 3 }), TypeExpr::UNKNOWN),
    (json!(false), TypeExpr::UNKNOWN),
  ];
  for (input, expected) in cases {
    assert_eq!(lower(input.clone()), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_enum_and_const() {
  let cases = [
    (
      json!({ "type": "string", "enum": ["a", "b"] }),
      TypeExpr::Union(vec![string_literal("a"), string_literal("b")]),
    ),
    (json!({ "const": "only" }), string_literal("only")),
    (
      json!({ "enum": [1, 2] }),
      TypeExpr::Union(vec![
        TypeExpr::Literal(Literal::Number(1.into())),
        TypeExpr::Literal(Literal::Number(2.into())),
      ]),
    ),
    (
      json!({ "enum": ["a", { "nested": true }] }),
      TypeExpr::Union(vec![string_literal("a"), TypeExpr::UNKNOWN]),
    ),
    (json!({ "type": "string", "enum": [] }), primitive(PrimitiveKind::String)),
  ];
  for (input, expected) in cases {
    assert_eq!(lower(input.clone()), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_composition() {
  let base = TypeExpr::Reference("Base".to_string());
  let cases = [
    (
      json!({
        "allOf": [{ "$ref": "#/components/schemas/Base" }],
        "properties": { "extra": { "type": "boolean" } }
      }),
      TypeExpr::Intersection(vec![
        base.clone(),
        TypeExpr::Object(vec![field("extra", primitive(PrimitiveKind::Boolean), false)]),
      ]),
    ),
    (json!({ "allOf": [{ "$ref": "#/components/schemas/Base" }] }), base.clone()),
    (
      json!({
        "oneOf": [{ "$ref": "#/components/schemas/Base" }, { "type": "string" }],
        "properties": { "ignored": { "type": "string" } }
      }),
      TypeExpr::Union(vec![base.clone(), primitive(PrimitiveKind::String)]),
    ),
    (
      json!({ "anyOf": [{ "type": "string" }, { "type": "string" }] }),
      primitive(PrimitiveKind::String),
    ),
  ];
  for (input, expected) in cases {
    assert_eq!(lower(input.clone()), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_objects_and_arrays() {
  let cases = [
    (
      json!({
        "type": "object",
        "required": ["id"],
        "properties": { "id": { "type": "integer" } },
        "additionalProperties": { "type": "string" }
      }),
      TypeExpr::Intersection(vec![
        TypeExpr::Object(vec![field("id", primitive(PrimitiveKind::Integer), true)]),
        TypeExpr::Record(Box::new(primitive(PrimitiveKind::String))),
      ]),
    ),
    (
      json!({ "properties": { "a": { "type": "string" } }, "additionalProperties": false }),
      TypeExpr::Object(vec![field("a", primitive(PrimitiveKind::String), false)]),
    ),
    (
      json!({ "type": "object", "additionalProperties": true }),
      TypeExpr::Record(Box::new(TypeExpr::UNKNOWN)),
    ),
    (json!({ "type": "array" }), TypeExpr::Array(Box::new(TypeExpr::UNKNOWN))),
    (
      json!({ "type": "array", "prefixItems": [{ "type": "string" }, { "type": "integer" }] }),
      TypeExpr::Array(Box::new(TypeExpr::Union(vec![
        primitive(PrimitiveKind::String),
        primitive(PrimitiveKind::Integer),
      ]))),
    ),
  ];
  for (input, expected) in cases {
    assert_eq!(lower(input.clone()), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_references_record_dependencies() {
  let config = CodegenConfig::builder().affixes(NameAffixes::new("I", "")).build();
  let (ty, output) = lower_with(
    &config,
    json!({
      "type": "object",
      "properties": {
        "pet": { "$ref": "#/components/schemas/Pet", "description": "The pet" },
        "bases": { "type": "array", "items": { "$ref": "#/components/schemas/Base" } }
      }
    }),
  );

  assert_eq!(
    output.dependencies,
    ["IBase", "IPet"].into_iter().map(String::from).collect::<BTreeSet<_>>()
  );
  let TypeExpr::Object(fields) = ty else {
    panic!("expected an object");
  };
  assert_eq!(fields[0].ty, TypeExpr::Reference("IPet".to_string()));
  assert_eq!(fields[0].description.as_deref(), Some("The pet"));
  assert!(output.warnings.is_empty());
}

#[test]
fn test_unresolved_and_malformed_nodes_warn() {
  let cases = [
    (
      json!({ "$ref": "#/components/schemas/Nope" }),
      GenerationWarning::UnresolvedReference {
        owner: "Subject".to_string(),
        ref_path: "#/components/schemas/Nope".to_string(),
      },
    ),
    (
      json!({ "required": "id" }),
      GenerationWarning::MalformedSchema {
        owner: "Subject".to_string(),
        reason: "`required` must be a list, found a string".to_string(),
      },
    ),
  ];
  for (input, expected) in cases {
    let (ty, output) = lower_with(&CodegenConfig::default(), input.clone());
    assert_eq!(ty, TypeExpr::UNKNOWN, "failed for input {input:?}");
    assert_eq!(output.warnings, vec![expected], "failed for input {input:?}");
    assert!(output.dependencies.is_empty(), "failed for input {input:?}");
  }
}

#[test]
fn test_lower_fields_builds_an_object() {
  let doc = schemas_document(json!({ "Pet": { "type": "object" } }));
  let config = CodegenConfig::default();
  let mut warnings = vec![];
  let registry = SchemaRegistry::new(&doc, &config, &mut warnings);
  let limit = SchemaNode::from_value(json!({ "type": "integer" }));

  let mut lowering = LoweringContext::new(&registry, &config, "ListPetsQueryParams");
  let ty = lowering
    .lower_fields([
      FieldSource {
        name: "limit",
        node: Some(&limit),
        required: false,
        description: Some("Page size"),
        deprecated: false,
      },
      FieldSource {
        name: "cursor",
        node: None,
        required: true,
        description: None,
        deprecated: true,
      },
    ])
    .unwrap();

  assert_eq!(
    ty,
    TypeExpr::Object(vec![
      Field {
        name: "limit".to_string(),
        ty: primitive(PrimitiveKind::Integer),
        required: false,
        description: Some("Page size".to_string()),
        deprecated: false,
      },
      Field {
        name: "cursor".to_string(),
        ty: TypeExpr::UNKNOWN,
        required: true,
        description: None,
        deprecated: true,
      },
    ])
  );
}

#[test]
fn test_nesting_beyond_limit_fails() {
  let mut node = json!({ "type": "string" });
  for _ in 0..=MAX_LOWERING_DEPTH {
    node = json!({ "type": "array", "items": node });
  }

  let doc = schemas_document(json!({ "Pet": { "type": "object" } }));
  let config = CodegenConfig::default();
  let mut warnings = vec![];
  let registry = SchemaRegistry::new(&doc, &config, &mut warnings);
  let mut lowering = LoweringContext::new(&registry, &config, "Deep");

  assert_eq!(
    lowering.lower(&SchemaNode::from_value(node)),
    Err(LoweringError::DepthExceeded {
      limit: MAX_LOWERING_DEPTH
    })
  );
}

#[test]
fn test_node_description() {
  let cases = [
    (json!({ "type": "string", "description": "inline" }), Some("inline")),
    (json!({ "$ref": "#/components/schemas/Pet", "description": "sibling" }), Some("sibling")),
    (json!({ "$ref": "#/components/schemas/Pet" }), None),
    (json!(true), None),
  ];
  for (input, expected) in cases {
    let node = SchemaNode::from_value(input.clone());
    assert_eq!(node_description(&node), expected, "failed for input {input:?}");
  }
}
