
use crate::generator::ast::{Declaration, DeclarationOrigin, Field, Literal, PrimitiveKind, TypeExpr};

pub(super) fn declaration(name: &str, ty: TypeExpr) -> Declaration {
  Declaration {
    name: name.to_string(),
    ty,
    description: None,
    deprecated: false,
    circular: false,
    origin: DeclarationOrigin::Schema {
      raw_name: name.to_string(),
    },
  }
}

pub(super) fn field(name: &str, ty: TypeExpr, required: bool) -> Field {
  Field {
    name: name.to_string(),
    ty,
    required,
    description: None,
    deprecated: false,
  }
}

pub(super) fn primitive(kind: PrimitiveKind) -> TypeExpr {
  TypeExpr::Primitive(kind)
}

pub(super) fn reference(name: &str) -> TypeExpr {
  TypeExpr::Reference(name.to_string())
}

pub(super) fn literal(text: &str) -> TypeExpr {
  TypeExpr::Literal(Literal::String(text.to_string()))
}

#[test]
fn test_join_blocks() {
  let cases: [(Vec<&str>, &str); 4] = [
    (vec![], ""),
    (vec!["", "\n"], ""),
    (vec!["a"], "a\n"),
    (vec!["a\n\n", "", "b\n"], "a\n\nb\n"),
  ];
  for (input, expected) in cases {
    let joined = super::join_blocks(input.iter().map(|block| block.to_string()));
    assert_eq!(joined, expected, "failed for input {input:?}");
  }
}
