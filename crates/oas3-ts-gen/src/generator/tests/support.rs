use serde_json::{Value, json};

use crate::generator::{
  CodegenConfig, TypesMode, ZodMode,
  document::Document,
  orchestrator::{CompiledSpec, Orchestrator},
};

/// A 3.0 document with the given `components.schemas` and `paths`.
pub(super) fn document(schemas: Value, paths: Value) -> Document {
  document_with(json!({ "schemas": schemas }), paths)
}

pub(super) fn document_with(components: Value, paths: Value) -> Document {
  let value = json!({
    "openapi": "3.0.3",
    "info": { "title": "Test API", "version": "1.0.0" },
    "paths": paths,
    "components": components
  });
  Document::from_value(value, None).unwrap()
}

pub(super) fn compile(document: Document, config: CodegenConfig) -> CompiledSpec {
  Orchestrator::new(document, config).compile().unwrap()
}

pub(super) fn typescript(document: Document, config: CodegenConfig) -> String {
  Orchestrator::new(document, config).generate(&TypesMode).unwrap().code
}

pub(super) fn zod(document: Document, config: CodegenConfig) -> String {
  Orchestrator::new(document, config).generate(&ZodMode).unwrap().code
}

pub(super) fn declaration_names(compiled: &CompiledSpec) -> Vec<&str> {
  compiled
    .declarations
    .iter()
    .map(|declaration| declaration.name.as_str())
    .collect()
}
