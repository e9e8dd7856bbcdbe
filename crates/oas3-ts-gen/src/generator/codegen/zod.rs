use std::collections::BTreeSet;

use super::{EmittedCode, INDENT, join_blocks, literal_source};
use crate::{
  generator::{
    CodegenConfig,
    ast::{Declaration, Field, Literal, PrimitiveKind, TypeExpr},
  },
  utils::text::{doc_comment_lines, js_string, property_key},
};

const ZOD_IMPORT: &str = r#"import { z } from "zod";"#;
const SCHEMA_SUFFIX: &str = "Schema";
/// Type annotation that lets a schema constant refer to itself.
const LAZY_ANNOTATION: &str = ": z.ZodTypeAny";

/// Name of the constant holding the schema for `type_name`.
pub(crate) fn schema_const_name(type_name: &str) -> String {
  format!("{type_name}{SCHEMA_SUFFIX}")
}

/// Renders declarations as Zod schema constants.
///
/// Constants cannot be read before they are initialized, so every reference
/// to a circular schema goes through `z.lazy`.
pub(crate) struct ZodEmitter<'a> {
  config: &'a CodegenConfig,
  circular: &'a BTreeSet<String>,
}

impl<'a> ZodEmitter<'a> {
  pub fn new(config: &'a CodegenConfig, circular: &'a BTreeSet<String>) -> Self {
    Self { config, circular }
  }

  pub fn emit(&self, declarations: &[Declaration]) -> EmittedCode {
    let blocks = std::iter::once(ZOD_IMPORT.to_string())
      .chain(declarations.iter().map(|declaration| self.declaration(declaration)))
      .collect::<Vec<_>>();

    EmittedCode {
      code: join_blocks(blocks),
      warnings: vec![],
    }
  }

  fn declaration(&self, declaration: &Declaration) -> String {
    let mut lines = self.docs(declaration.description.as_deref(), declaration.deprecated, "");
    let annotation = if declaration.circular { LAZY_ANNOTATION } else { "" };
    lines.push(format!(
      "export const {}{annotation} = {};",
      schema_const_name(&declaration.name),
      self.render(&declaration.ty, 0)
    ));
    lines.join("\n")
  }

  fn docs(&self, description: Option<&str>, deprecated: bool, indent: &str) -> Vec<String> {
    if !self.config.include_descriptions {
      return vec![];
    }
    doc_comment_lines(description, deprecated, indent)
  }

  pub(crate) fn render(&self, ty: &TypeExpr, depth: usize) -> String {
    if let Some(inner) = ty.strip_null() {
      return format!("{}.nullable()", self.render(&inner, depth));
    }

    match ty {
      TypeExpr::Primitive(kind) => primitive(*kind).to_string(),
      TypeExpr::Literal(literal) => format!("z.literal({})", literal_source(literal)),
      TypeExpr::Reference(name) if self.circular.contains(name) => {
        format!("z.lazy(() => {})", schema_const_name(name))
      }
      TypeExpr::Reference(name) => schema_const_name(name),
      TypeExpr::Array(inner) => format!("z.array({})", self.render(inner, depth)),
      TypeExpr::Object(fields) if fields.is_empty() => "z.object({}).strict()".to_string(),
      TypeExpr::Object(fields) => self.object(fields, depth),
      TypeExpr::Union(members) => self.union(members, depth),
      TypeExpr::Intersection(members) => {
        let mut rendered = members.iter().map(|member| self.render(member, depth));
        let first = rendered.next().unwrap_or_else(|| primitive(PrimitiveKind::Unknown).to_string());
        rendered.fold(first, |acc, member| format!("{acc}.and({member})"))
      }
      TypeExpr::Record(value) => format!("z.record(z.string(), {})", self.render(value, depth)),
      TypeExpr::Null => "z.null()".to_string(),
    }
  }

  fn object(&self, fields: &[Field], depth: usize) -> String {
    let indent = INDENT.repeat(depth + 1);
    let mut lines = vec!["z.object({".to_string()];
    for field in fields {
      lines.extend(self.docs(field.description.as_deref(), field.deprecated, &indent));
      let optional = if field.required { "" } else { ".optional()" };
      lines.push(format!(
        "{indent}{}: {}{optional},",
        property_key(&field.name),
        self.render(&field.ty, depth + 1)
      ));
    }
    lines.push(format!("{}}})", INDENT.repeat(depth)));
    lines.join("\n")
  }

  fn union(&self, members: &[TypeExpr], depth: usize) -> String {
    let strings = members
      .iter()
      .map(|member| match member {
        TypeExpr::Literal(Literal::String(text)) => Some(text.as_str()),
        _ => None,
      })
      .collect::<Option<Vec<_>>>();

    if let Some(values) = strings {
      let values = values.into_iter().map(js_string).collect::<Vec<_>>();
      return format!("z.enum([{}])", values.join(", "));
    }

    let rendered = members
      .iter()
      .map(|member| self.render(member, depth))
      .collect::<Vec<_>>();
    format!("z.union([{}])", rendered.join(", "))
  }
}

fn primitive(kind: PrimitiveKind) -> &'static str {
  match kind {
    PrimitiveKind::String => "z.string()",
    PrimitiveKind::Number => "z.number()",
    PrimitiveKind::Integer => "z.number().int()",
    PrimitiveKind::Boolean => "z.boolean()",
    PrimitiveKind::Unknown => "z.unknown()",
  }
}
