use strum::Display;

use crate::generator::{ast::Declaration, filter::FilterStats};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub schemas_total: usize,
  pub types_generated: usize,
  pub interfaces_generated: usize,
  pub enums_generated: usize,
  pub type_aliases_generated: usize,
  pub operation_types_generated: usize,
  pub operations_included: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub circular_schemas: Vec<String>,
  pub filter: FilterStats,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_interface(&mut self) {
    self.interfaces_generated += 1;
    self.types_generated += 1;
  }

  pub fn record_enum(&mut self) {
    self.enums_generated += 1;
    self.types_generated += 1;
  }

  pub fn record_type_alias(&mut self) {
    self.type_aliases_generated += 1;
    self.types_generated += 1;
  }

  pub fn record_declaration(&mut self, declaration: &Declaration) {
    if declaration.origin.is_operation() {
      self.operation_types_generated += 1;
    }
    if declaration.ty.enum_literals().is_some() {
      self.record_enum();
    } else if declaration.ty.is_object() {
      self.record_interface();
    } else {
      self.record_type_alias();
    }
  }

  pub fn record_declarations<'a>(&mut self, declarations: impl IntoIterator<Item = &'a Declaration>) {
    for declaration in declarations {
      self.record_declaration(declaration);
    }
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

/// A non-fatal condition met while compiling. Never raised, only reported.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "'{owner}': unresolved reference '{ref_path}' emitted as unknown")]
  UnresolvedReference { owner: String, ref_path: String },
  #[strum(to_string = "'{owner}': malformed schema emitted as unknown: {reason}")]
  MalformedSchema { owner: String, reason: String },
  #[strum(to_string = "[{operation}] unresolved {kind} reference '{ref_path}' skipped")]
  UnresolvedComponent {
    operation: String,
    kind: String,
    ref_path: String,
  },
  #[strum(to_string = "[{operation}] malformed {kind} skipped: {reason}")]
  SkippedEntry {
    operation: String,
    kind: String,
    reason: String,
  },
  #[strum(to_string = "Schema '{raw_name}' renamed to '{type_name}' to avoid a name collision")]
  NameCollision { raw_name: String, type_name: String },
  #[strum(to_string = "Filter {rule} '{pattern}' matched no operations")]
  VacuousFilter { rule: String, pattern: String },
  #[strum(to_string = "Filter {rule} '{pattern}' is not a valid glob, matching literally: {error}")]
  InvalidFilterPattern {
    rule: String,
    pattern: String,
    error: String,
  },
  #[strum(to_string = "Enum '{type_name}' emitted as a union: {reason}")]
  EnumStyleFallback { type_name: String, reason: String },
}

impl GenerationWarning {
  pub fn is_filter_problem(&self) -> bool {
    matches!(self, Self::VacuousFilter { .. } | Self::InvalidFilterPattern { .. })
  }
}
