use std::collections::BTreeSet;

use tracing::debug;

use super::{INDENT, literal_source};
use crate::generator::{
  EnumStyle,
  ast::{Declaration, Literal},
  metrics::GenerationWarning,
  naming::identifiers::normalize_enum_member,
};

/// Renders a literal-only declaration in the configured enum style.
///
/// Returns `None` when the declaration is not an enum, when the style is a
/// plain union, or when a nominal enum cannot express the members; the caller
/// then emits a type alias.
pub(super) fn render_enum(
  declaration: &Declaration,
  style: EnumStyle,
  warnings: &mut Vec<GenerationWarning>,
) -> Option<String> {
  let (literals, nullable) = declaration.ty.enum_literals()?;

  match style {
    EnumStyle::Union => None,
    EnumStyle::Enum => match nominal_obstacle(&literals, nullable) {
      Some(reason) => {
        debug!(name = %declaration.name, reason, "enum declared as a union");
        warnings.push(GenerationWarning::EnumStyleFallback {
          type_name: declaration.name.clone(),
          reason: reason.to_string(),
        });
        None
      }
      None => Some(nominal_enum(&declaration.name, &literals)),
    },
    EnumStyle::ConstObject => Some(const_object(&declaration.name, &literals, nullable)),
  }
}

fn nominal_obstacle(literals: &[&Literal], nullable: bool) -> Option<&'static str> {
  if nullable {
    return Some("null cannot be an enum member");
  }
  if literals.iter().any(|literal| matches!(literal, Literal::Boolean(_))) {
    return Some("boolean values cannot be enum members");
  }
  None
}

/// Member names paired with their value source, de-duplicated in order.
fn members<'l>(literals: &[&'l Literal]) -> Vec<(String, &'l Literal)> {
  let mut used = BTreeSet::new();
  literals
    .iter()
    .map(|literal| (normalize_enum_member(&literal.member_source(), &mut used), *literal))
    .collect()
}

fn nominal_enum(name: &str, literals: &[&Literal]) -> String {
  let mut lines = vec![format!("export enum {name} {{")];
  lines.extend(
    members(literals)
      .into_iter()
      .map(|(member, literal)| format!("{INDENT}{member} = {},", literal_source(literal))),
  );
  lines.push("}".to_string());
  lines.join("\n")
}

fn const_object(name: &str, literals: &[&Literal], nullable: bool) -> String {
  let mut lines = vec![format!("export const {name} = {{")];
  lines.extend(
    members(literals)
      .into_iter()
      .map(|(member, literal)| format!("{INDENT}{member}: {},", literal_source(literal))),
  );
  lines.push("} as const;".to_string());

  let null_member = if nullable { " | null" } else { "" };
  lines.push(format!("export type {name} = (typeof {name})[keyof typeof {name}]{null_member};"));
  lines.join("\n")
}
