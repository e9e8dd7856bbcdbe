use super::{
  ast::{Literal, PrimitiveKind},
  metrics::GenerationWarning,
};
use crate::utils::text::js_string;

mod enums;
mod header;
mod typescript;
mod zod;

#[cfg(test)]
mod tests;

pub(crate) use header::{render_banner, render_stats_block};
pub(crate) use typescript::TypeScriptEmitter;
pub(crate) use zod::{ZodEmitter, schema_const_name};

pub(crate) const INDENT: &str = "  ";

/// Source text of one output file plus anything the emitter had to work around.
#[derive(Debug, Clone, Default)]
pub(crate) struct EmittedCode {
  pub code: String,
  pub warnings: Vec<GenerationWarning>,
}

/// Concatenates independently valid declaration blocks, one blank line apart.
pub(crate) fn join_blocks(blocks: impl IntoIterator<Item = String>) -> String {
  let mut code = blocks
    .into_iter()
    .map(|block| block.trim_end_matches('\n').to_string())
    .filter(|block| !block.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n");
  if !code.is_empty() {
    code.push('\n');
  }
  code
}

fn literal_source(literal: &Literal) -> String {
  match literal {
    Literal::String(text) => js_string(text),
    Literal::Number(number) => number.to_string(),
    Literal::Boolean(flag) => flag.to_string(),
  }
}

fn primitive_keyword(kind: PrimitiveKind) -> &'static str {
  match kind {
    PrimitiveKind::String => "string",
    PrimitiveKind::Number | PrimitiveKind::Integer => "number",
    PrimitiveKind::Boolean => "boolean",
    PrimitiveKind::Unknown => "unknown",
  }
}
