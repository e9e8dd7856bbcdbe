use super::{EmittedCode, INDENT, enums, join_blocks, literal_source, primitive_keyword};
use crate::{
  generator::{
    CodegenConfig,
    ast::{Declaration, Field, TypeExpr},
    metrics::GenerationWarning,
  },
  utils::text::{doc_comment_lines, property_key},
};

/// The TypeScript spelling of an object that admits no keys.
const EMPTY_OBJECT: &str = "Record<string, never>";

/// Renders declarations as TypeScript `export interface` / `export type` blocks.
pub(crate) struct TypeScriptEmitter<'a> {
  config: &'a CodegenConfig,
}

impl<'a> TypeScriptEmitter<'a> {
  pub fn new(config: &'a CodegenConfig) -> Self {
    Self { config }
  }

  pub fn emit(&self, declarations: &[Declaration]) -> EmittedCode {
    let mut warnings = vec![];
    let blocks = declarations
      .iter()
      .map(|declaration| self.declaration(declaration, &mut warnings))
      .collect::<Vec<_>>();

    EmittedCode {
      code: join_blocks(blocks),
      warnings,
    }
  }

  fn declaration(&self, declaration: &Declaration, warnings: &mut Vec<GenerationWarning>) -> String {
    let mut lines = self.docs(declaration.description.as_deref(), declaration.deprecated, "");

    let body = match enums::render_enum(declaration, self.config.enum_style, warnings) {
      Some(block) => block,
      None => match &declaration.ty {
        TypeExpr::Object(fields) if !fields.is_empty() => {
          format!("export interface {} {}", declaration.name, self.object_body(fields, 0))
        }
        ty => format!("export type {} = {};", declaration.name, self.render(ty, 0)),
      },
    };
    lines.push(body);
    lines.join("\n")
  }

  fn docs(&self, description: Option<&str>, deprecated: bool, indent: &str) -> Vec<String> {
    if !self.config.include_descriptions {
      return vec![];
    }
    doc_comment_lines(description, deprecated, indent)
  }

  /// `{ ... }` with one member per line, closed at the indentation of `depth`.
  fn object_body(&self, fields: &[Field], depth: usize) -> String {
    let indent = INDENT.repeat(depth + 1);
    let mut lines = vec!["{".to_string()];
    for field in fields {
      lines.extend(self.docs(field.description.as_deref(), field.deprecated, &indent));
      let optional = if field.required { "" } else { "?" };
      lines.push(format!(
        "{indent}{}{optional}: {};",
        property_key(&field.name),
        self.render(&field.ty, depth + 1)
      ));
    }
    lines.push(format!("{}}}", INDENT.repeat(depth)));
    lines.join("\n")
  }

  pub(crate) fn render(&self, ty: &TypeExpr, depth: usize) -> String {
    match ty {
      TypeExpr::Primitive(kind) => primitive_keyword(*kind).to_string(),
      TypeExpr::Literal(literal) => literal_source(literal),
      TypeExpr::Reference(name) => name.clone(),
      TypeExpr::Array(inner) => {
        let element = self.render(inner, depth);
        if matches!(**inner, TypeExpr::Union(_) | TypeExpr::Intersection(_)) {
          format!("({element})[]")
        } else {
          format!("{element}[]")
        }
      }
      TypeExpr::Object(fields) if fields.is_empty() => EMPTY_OBJECT.to_string(),
      TypeExpr::Object(fields) => self.object_body(fields, depth),
      TypeExpr::Union(members) => members
        .iter()
        .map(|member| self.render(member, depth))
        .collect::<Vec<_>>()
        .join(" | "),
      TypeExpr::Intersection(members) => members
        .iter()
        .map(|member| {
          let rendered = self.render(member, depth);
          if matches!(member, TypeExpr::Union(_)) {
            format!("({rendered})")
          } else {
            rendered
          }
        })
        .collect::<Vec<_>>()
        .join(" & "),
      TypeExpr::Record(value) => format!("Record<string, {}>", self.render(value, depth)),
      TypeExpr::Null => "null".to_string(),
    }
  }
}
