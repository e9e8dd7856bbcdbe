use std::collections::BTreeSet;

use http::Method;

use super::{
  affixes::PrefixPattern,
  identifiers::{ensure_unique, normalize},
};

pub const QUERY_PARAMS_SUFFIX: &str = "QueryParams";
pub const HEADERS_SUFFIX: &str = "Headers";
pub const REQUEST_BODY_SUFFIX: &str = "RequestBody";
pub const RESPONSE_SUFFIX: &str = "Response";

const ROOT_SEGMENT: &str = "Root";

/// Inputs that decide how an operation is named.
#[derive(Debug, Clone, Copy)]
pub struct OperationNaming<'a> {
  pub prefer_operation_id: bool,
  pub strip_path_prefix: Option<&'a PrefixPattern>,
}

/// Derives the base identifier for an operation.
///
/// With `prefer_operation_id` and an `operationId` present, that id is
/// normalized. Otherwise the name is the method followed by each path
/// segment, where `{param}` renders as `By<Param>`.
///
/// ```text
/// GET /users/{userId}/posts  =>  GetUsersByUserIdPosts
/// ```
pub fn operation_base_name(method: &Method, path: &str, operation_id: Option<&str>, naming: OperationNaming) -> String {
  if naming.prefer_operation_id
    && let Some(id) = operation_id.filter(|id| !id.trim().is_empty())
  {
    return normalize(id);
  }

  let path = naming
    .strip_path_prefix
    .and_then(|pattern| pattern.strip(path))
    .unwrap_or(path);

  let mut name = normalize(&method.as_str().to_ascii_lowercase());
  let mut has_segment = false;

  for segment in path.split('/').filter(|segment| !segment.is_empty()) {
    has_segment = true;
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(param) => {
        name.push_str("By");
        name.push_str(&normalize(param));
      }
      None => name.push_str(&normalize(segment)),
    }
  }

  if !has_segment {
    name.push_str(ROOT_SEGMENT);
  }
  name
}

/// Reserves a unique operation name, appending a numeric suffix on collision.
pub fn reserve_operation_name(base_name: &str, used_names: &mut BTreeSet<String>) -> String {
  let name = ensure_unique(base_name, used_names);
  used_names.insert(name.clone());
  name
}
