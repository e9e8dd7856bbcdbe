pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod converter;
pub(crate) mod cycles;
pub mod document;
pub mod errors;
pub(crate) mod filter;
pub mod metrics;
pub mod mode;
pub(crate) mod naming;
pub(crate) mod operation_registry;
pub mod orchestrator;
pub(crate) mod parameters;
pub(crate) mod resolver;
pub(crate) mod schema_registry;
pub(crate) mod sorter;
mod validation;

#[cfg(test)]
mod tests;

use serde::Deserialize;
use strum::Display;

pub use self::{
  filter::OperationFilterConfig,
  mode::{GenerationMode, TypesMode, ZodMode},
  naming::affixes::NameAffixes,
};
use self::naming::affixes::PrefixPattern;

/// How schemas whose values are a closed set of literals are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EnumStyle {
  /// `export enum Status { Active = "active" }`
  Enum,
  /// `export type Status = "active" | "inactive";`
  #[default]
  Union,
  /// `export const Status = { Active: "active" } as const;` plus a derived type.
  ConstObject,
}

/// Options consumed by the compiler and the emitters for one generation run.
#[derive(Debug, Clone, bon::Builder)]
pub struct CodegenConfig {
  #[builder(default)]
  pub enum_style: EnumStyle,
  #[builder(default = true)]
  pub include_descriptions: bool,
  /// Properties without an explicit `nullable` are treated as `nullable: true`.
  #[builder(default)]
  pub nullable_by_default: bool,
  #[builder(default)]
  pub affixes: NameAffixes,
  #[builder(default)]
  pub strip_schema_prefixes: Vec<String>,
  pub strip_path_prefix: Option<String>,
  #[builder(default = true)]
  pub prefer_operation_id: bool,
  #[builder(default)]
  pub operation_filter: OperationFilterConfig,
  #[builder(default)]
  pub stats_header: bool,
  /// Emit query/header/body/response declarations derived from operations.
  #[builder(default = true)]
  pub operation_types: bool,
}

impl Default for CodegenConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl CodegenConfig {
  pub(crate) fn schema_prefix_patterns(&self) -> Vec<PrefixPattern> {
    self
      .strip_schema_prefixes
      .iter()
      .filter(|prefix| !prefix.is_empty())
      .map(|prefix| PrefixPattern::for_names(prefix))
      .collect()
  }

  pub(crate) fn path_prefix_pattern(&self) -> Option<PrefixPattern> {
    self
      .strip_path_prefix
      .as_deref()
      .filter(|prefix| !prefix.is_empty())
      .map(PrefixPattern::for_paths)
  }
}
