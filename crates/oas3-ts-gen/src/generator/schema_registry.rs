use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use super::{
  CodegenConfig,
  document::{Document, SchemaNode},
  metrics::GenerationWarning,
  naming::{
    affixes::strip_first_prefix,
    identifiers::{avoid_reserved, ensure_unique, normalize},
  },
};
use crate::utils::parse_schema_ref_path;

/// A named entry of `components.schemas`.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEntry<'a> {
  pub raw_name: &'a str,
  pub type_name: &'a str,
  pub node: &'a SchemaNode,
}

/// The named schemas of one document, in declaration order, with their emitted names.
///
/// Names are computed once: strip configured prefixes, normalize, decorate with the
/// configured affixes, then de-duplicate with a numeric suffix.
#[derive(Debug)]
pub struct SchemaRegistry<'a> {
  document: &'a Document,
  type_names: IndexMap<&'a str, String>,
  used_names: BTreeSet<String>,
}

impl<'a> SchemaRegistry<'a> {
  pub fn new(document: &'a Document, config: &CodegenConfig, warnings: &mut Vec<GenerationWarning>) -> Self {
    let mut type_names = IndexMap::new();
    let mut used_names = BTreeSet::new();
    let prefixes = config.schema_prefix_patterns();

    for raw_name in document.components.schemas.keys() {
      let stripped = strip_first_prefix(&prefixes, raw_name);
      let base = avoid_reserved(config.affixes.decorate(&normalize(stripped)));
      let type_name = ensure_unique(&base, &used_names);

      if type_name != base {
        debug!(raw_name, %type_name, "schema name collision");
        warnings.push(GenerationWarning::NameCollision {
          raw_name: raw_name.clone(),
          type_name: type_name.clone(),
        });
      }

      used_names.insert(type_name.clone());
      type_names.insert(raw_name.as_str(), type_name);
    }

    Self {
      document,
      type_names,
      used_names,
    }
  }

  pub fn len(&self) -> usize {
    self.type_names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.type_names.is_empty()
  }

  pub fn type_name(&self, raw_name: &str) -> Option<&str> {
    self.type_names.get(raw_name).map(String::as_str)
  }

  /// The emitted name a `#/components/schemas/...` pointer refers to, if it is declared.
  pub fn type_name_for_ref(&self, ref_path: &str) -> Option<&str> {
    self.type_name(&parse_schema_ref_path(ref_path)?)
  }

  pub fn entries(&self) -> impl Iterator<Item = SchemaEntry<'_>> {
    self.type_names.iter().filter_map(|(&raw_name, type_name)| {
      self.document.schema(raw_name).map(|node| SchemaEntry {
        raw_name,
        type_name,
        node,
      })
    })
  }

  /// Names already taken by schema declarations.
  pub fn used_names(&self) -> &BTreeSet<String> {
    &self.used_names
  }
}
