use crate::generator::{
  codegen::{EmittedCode, TypeScriptEmitter, ZodEmitter},
  orchestrator::CompiledSpec,
};

/// One output flavour rendered from a compiled specification.
pub trait GenerationMode {
  /// File name used when several modes are written into one directory.
  fn file_name(&self) -> &'static str;

  fn emit(&self, compiled: &CompiledSpec) -> EmittedCode;
}

/// TypeScript type declarations.
pub struct TypesMode;

impl GenerationMode for TypesMode {
  fn file_name(&self) -> &'static str {
    "types.ts"
  }

  fn emit(&self, compiled: &CompiledSpec) -> EmittedCode {
    TypeScriptEmitter::new(&compiled.config).emit(&compiled.declarations)
  }
}

/// Zod validation schemas.
pub struct ZodMode;

impl GenerationMode for ZodMode {
  fn file_name(&self) -> &'static str {
    "schemas.ts"
  }

  fn emit(&self, compiled: &CompiledSpec) -> EmittedCode {
    ZodEmitter::new(&compiled.config, &compiled.circular).emit(&compiled.declarations)
  }
}
