use std::collections::BTreeSet;

use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
  String,
  Number,
  Integer,
  Boolean,
  /// Open type for anything the compiler cannot describe more precisely.
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
  String(String),
  Number(Number),
  Boolean(bool),
}

impl Literal {
  /// Converts an `enum`/`const` entry. `null` and structured values have no literal form.
  pub fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::String(text) => Some(Self::String(text.clone())),
      Value::Number(number) => Some(Self::Number(number.clone())),
      Value::Bool(flag) => Some(Self::Boolean(*flag)),
      Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
  }

  /// The source text an enum member name is derived from.
  pub fn member_source(&self) -> String {
    match self {
      Self::String(text) => text.clone(),
      Self::Number(number) => number.to_string(),
      Self::Boolean(flag) => flag.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
  pub name: String,
  pub ty: TypeExpr,
  pub required: bool,
  pub description: Option<String>,
  pub deprecated: bool,
}

/// The lowered form of a schema node, shared by every emitter.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
  Primitive(PrimitiveKind),
  Literal(Literal),
  Reference(String),
  Array(Box<TypeExpr>),
  Object(Vec<Field>),
  Union(Vec<TypeExpr>),
  Intersection(Vec<TypeExpr>),
  Record(Box<TypeExpr>),
  Null,
}

impl TypeExpr {
  pub const UNKNOWN: Self = Self::Primitive(PrimitiveKind::Unknown);

  /// Builds a union, flattening nested unions and dropping duplicate members.
  /// One member collapses to itself; no members is the open type.
  pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
    let mut flat: Vec<TypeExpr> = vec![];
    for member in members {
      let nested = match member {
        Self::Union(inner) => inner,
        other => vec![other],
      };
      for ty in nested {
        if !flat.contains(&ty) {
          flat.push(ty);
        }
      }
    }

    match flat.len() {
      0 => Self::UNKNOWN,
      1 => flat.remove(0),
      _ => Self::Union(flat),
    }
  }

  /// Builds an intersection, flattening nested intersections. One member collapses to itself.
  pub fn intersection(members: impl IntoIterator<Item = TypeExpr>) -> Self {
    let mut flat: Vec<TypeExpr> = vec![];
    for member in members {
      match member {
        Self::Intersection(inner) => flat.extend(inner),
        other => flat.push(other),
      }
    }

    match flat.len() {
      0 => Self::UNKNOWN,
      1 => flat.remove(0),
      _ => Self::Intersection(flat),
    }
  }

  /// The nullability modifier: adds `Null` as a union member exactly once.
  /// `Null` itself is left alone.
  #[must_use]
  pub fn nullable(self) -> Self {
    match self {
      Self::Null => Self::Null,
      other => Self::union([other, Self::Null]),
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  pub fn is_object(&self) -> bool {
    matches!(self, Self::Object(_))
  }

  /// Number of `Null` members at the top level.
  pub fn null_count(&self) -> usize {
    match self {
      Self::Null => 1,
      Self::Union(members) => members.iter().filter(|member| member.is_null()).count(),
      _ => 0,
    }
  }

  /// This type with its top-level `Null` member removed, if it had one and
  /// something else remains.
  pub fn strip_null(&self) -> Option<Self> {
    match self {
      Self::Union(members) if members.iter().any(Self::is_null) => {
        Some(Self::union(members.iter().filter(|member| !member.is_null()).cloned()))
      }
      _ => None,
    }
  }

  /// Literal members when this is an enum: only literals, plus at most an optional `Null`.
  pub fn enum_literals(&self) -> Option<(Vec<&Literal>, bool)> {
    let members = match self {
      Self::Literal(literal) => return Some((vec![literal], false)),
      Self::Union(members) => members,
      _ => return None,
    };

    let mut literals = vec![];
    let mut nullable = false;
    for member in members {
      match member {
        Self::Literal(literal) => literals.push(literal),
        Self::Null => nullable = true,
        _ => return None,
      }
    }
    (!literals.is_empty()).then_some((literals, nullable))
  }

  /// Every type name this expression refers to.
  pub fn references(&self) -> BTreeSet<&str> {
    let mut names = BTreeSet::new();
    let mut stack = vec![self];
    while let Some(ty) = stack.pop() {
      match ty {
        Self::Reference(name) => {
          names.insert(name.as_str());
        }
        Self::Array(inner) | Self::Record(inner) => stack.push(inner),
        Self::Object(fields) => stack.extend(fields.iter().map(|field| &field.ty)),
        Self::Union(members) | Self::Intersection(members) => stack.extend(members),
        Self::Primitive(_) | Self::Literal(_) | Self::Null => {}
      }
    }
    names
  }
}
