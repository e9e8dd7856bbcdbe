use serde_json::json;

use crate::generator::ast::{Field, Literal, PrimitiveKind, TypeExpr};

fn string() -> TypeExpr {
  TypeExpr::Primitive(PrimitiveKind::String)
}

fn reference(name: &str) -> TypeExpr {
  TypeExpr::Reference(name.to_string())
}

fn literal(text: &str) -> TypeExpr {
  TypeExpr::Literal(Literal::String(text.to_string()))
}

#[test]
fn test_nullable_adds_null_exactly_once() {
  let cases = [
    (string(), TypeExpr::Union(vec![string(), TypeExpr::Null])),
    (TypeExpr::Null, TypeExpr::Null),
    (
      TypeExpr::Union(vec![string(), reference("Pet")]),
      TypeExpr::Union(vec![string(), reference("Pet"), TypeExpr::Null]),
    ),
    (
      TypeExpr::Union(vec![string(), TypeExpr::Null]),
      TypeExpr::Union(vec![string(), TypeExpr::Null]),
    ),
    (
      TypeExpr::Array(Box::new(string())),
      TypeExpr::Union(vec![TypeExpr::Array(Box::new(string())), TypeExpr::Null]),
    ),
  ];
  for (input, expected) in cases {
    let actual = input.clone().nullable();
    assert_eq!(actual, expected, "failed for input {input:?}");
    assert_eq!(actual.null_count(), 1, "failed for input {input:?}");
    assert_eq!(actual.clone().nullable(), actual, "failed for input {input:?}");
  }
}

#[test]
fn test_union_flattens_and_collapses() {
  assert_eq!(TypeExpr::union([string()]), string());
  assert_eq!(TypeExpr::union(Vec::<TypeExpr>::new()), TypeExpr::UNKNOWN);
  assert_eq!(
    TypeExpr::union([string(), TypeExpr::Union(vec![reference("A"), string()])]),
    TypeExpr::Union(vec![string(), reference("A")])
  );
}

#[test]
fn test_intersection_flattens_and_collapses() {
  assert_eq!(TypeExpr::intersection([reference("A")]), reference("A"));
  assert_eq!(
    TypeExpr::intersection([
      reference("A"),
      TypeExpr::Intersection(vec![reference("B"), reference("C")])
    ]),
    TypeExpr::Intersection(vec![reference("A"), reference("B"), reference("C")])
  );
}

#[test]
fn test_strip_null() {
  assert_eq!(TypeExpr::Union(vec![string(), TypeExpr::Null]).strip_null(), Some(string()));
  assert_eq!(string().strip_null(), None);
  assert_eq!(TypeExpr::Null.strip_null(), None);
}

#[test]
fn test_enum_literals() {
  let enum_type = TypeExpr::Union(vec![literal("a"), literal("b"), TypeExpr::Null]);
  let (literals, nullable) = enum_type.enum_literals().expect("enum literals");
  assert_eq!(literals.len(), 2);
  assert!(nullable);

  assert!(TypeExpr::Union(vec![literal("a"), string()]).enum_literals().is_none());
  assert!(string().enum_literals().is_none());
  assert!(TypeExpr::Null.enum_literals().is_none());
}

#[test]
fn test_literal_from_value() {
  let cases = [
    (json!("on"), Some(Literal::String("on".to_string()))),
    (json!(true), Some(Literal::Boolean(true))),
    (json!(null), None),
    (json!({"a": 1}), None),
  ];
  for (input, expected) in cases {
    assert_eq!(Literal::from_value(&input), expected, "failed for input {input:?}");
  }
  assert_eq!(Literal::from_value(&json!(3)).map(|l| l.member_source()).as_deref(), Some("3"));
}

#[test]
fn test_references_walks_nested_types() {
  let ty = TypeExpr::Object(vec![
    Field {
      name: "owner".to_string(),
      ty: reference("User"),
      required: true,
      description: None,
      deprecated: false,
    },
    Field {
      name: "tags".to_string(),
      ty: TypeExpr::Array(Box::new(TypeExpr::Union(vec![reference("Tag"), TypeExpr::Null]))),
      required: false,
      description: None,
      deprecated: false,
    },
  ]);
  let names = ty.references().into_iter().collect::<Vec<_>>();
  assert_eq!(names, ["Tag", "User"]);
}
