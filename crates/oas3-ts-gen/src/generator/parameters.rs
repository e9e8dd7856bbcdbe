use super::{
  document::{Document, ObjectOrReference, Parameter},
  resolver::resolve_parameter,
};

/// Resolved parameters of one operation, plus the pointers that did not resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedParameters<'a> {
  pub parameters: Vec<&'a Parameter>,
  pub unresolved: Vec<String>,
}

impl<'a> MergedParameters<'a> {
  /// Adds `param`, replacing any earlier entry with the same `(name, in)` key.
  fn insert(&mut self, param: &'a Parameter) {
    self.parameters.retain(|existing| existing.merge_key() != param.merge_key());
    self.parameters.push(param);
  }
}

/// Merges path-level and operation-level parameters.
///
/// Every entry is resolved before keys are compared. An operation-level
/// parameter replaces a path-level one with the same `(name, in)` entirely.
/// Path parameters come first, then operation parameters; a replacing entry
/// takes the position of the operation-level declaration.
pub fn merge_parameters<'a>(
  path_params: Option<&'a [ObjectOrReference<Parameter>]>,
  operation_params: Option<&'a [ObjectOrReference<Parameter>]>,
  document: &'a Document,
) -> MergedParameters<'a> {
  let mut merged = MergedParameters::default();

  let sources = path_params.unwrap_or_default().iter().chain(operation_params.unwrap_or_default());
  for node in sources {
    match resolve_parameter(node, document) {
      Some(param) => merged.insert(param),
      None => merged.unresolved.push(node.ref_path().unwrap_or_default().to_string()),
    }
  }

  merged
}
