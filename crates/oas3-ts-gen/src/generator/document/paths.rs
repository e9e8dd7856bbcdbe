use http::Method;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{
  lenient::{is_extension, string_list},
  reference::ObjectOrReference,
  schema::SchemaNode,
};

/// Methods visited per path item, in emission order.
pub const METHOD_ORDER: [Method; 7] = [
  Method::GET,
  Method::POST,
  Method::PUT,
  Method::PATCH,
  Method::DELETE,
  Method::HEAD,
  Method::OPTIONS,
];

/// An entry left out of a path item or operation because it fits no known shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
  pub kind: String,
  pub reason: String,
}

impl SkippedEntry {
  fn new(kind: impl Into<String>, reason: impl ToString) -> Self {
    Self {
      kind: kind.into(),
      reason: reason.to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawPathItem")]
pub struct PathItem {
  pub summary: Option<String>,
  pub description: Option<String>,
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  pub get: Option<Operation>,
  pub put: Option<Operation>,
  pub post: Option<Operation>,
  pub delete: Option<Operation>,
  pub options: Option<Operation>,
  pub head: Option<Operation>,
  pub patch: Option<Operation>,
  pub trace: Option<Operation>,
  /// Path-level parameters that could not be read.
  pub skipped: Vec<SkippedEntry>,
}

impl PathItem {
  pub fn operation(&self, method: &Method) -> Option<&Operation> {
    match method.as_str() {
      "GET" => self.get.as_ref(),
      "POST" => self.post.as_ref(),
      "PUT" => self.put.as_ref(),
      "PATCH" => self.patch.as_ref(),
      "DELETE" => self.delete.as_ref(),
      "HEAD" => self.head.as_ref(),
      "OPTIONS" => self.options.as_ref(),
      "TRACE" => self.trace.as_ref(),
      _ => None,
    }
  }

  /// Operations of this path item in [`METHOD_ORDER`].
  pub fn methods(&self) -> impl Iterator<Item = (Method, &Operation)> {
    METHOD_ORDER
      .iter()
      .filter_map(|method| self.operation(method).map(|op| (method.clone(), op)))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawOperation")]
pub struct Operation {
  pub tags: Vec<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub operation_id: Option<String>,
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  pub request_body: Option<ObjectOrReference<RequestBody>>,
  /// Status code to response, `x-` keys excluded.
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
  pub deprecated: bool,
  /// Parameters, bodies and responses that could not be read.
  pub skipped: Vec<SkippedEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPathItem {
  summary: Option<String>,
  description: Option<String>,
  parameters: Option<Value>,
  get: Option<Operation>,
  put: Option<Operation>,
  post: Option<Operation>,
  delete: Option<Operation>,
  options: Option<Operation>,
  head: Option<Operation>,
  patch: Option<Operation>,
  trace: Option<Operation>,
}

impl From<RawPathItem> for PathItem {
  fn from(raw: RawPathItem) -> Self {
    let mut skipped = vec![];
    let parameters = read_parameters(raw.parameters, &mut skipped);
    Self {
      summary: raw.summary,
      description: raw.description,
      parameters,
      get: raw.get,
      put: raw.put,
      post: raw.post,
      delete: raw.delete,
      options: raw.options,
      head: raw.head,
      patch: raw.patch,
      trace: raw.trace,
      skipped,
    }
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOperation {
  tags: Option<Value>,
  summary: Option<String>,
  description: Option<String>,
  operation_id: Option<String>,
  parameters: Option<Value>,
  request_body: Option<Value>,
  responses: Option<Value>,
  #[serde(default)]
  deprecated: bool,
}

impl From<RawOperation> for Operation {
  fn from(raw: RawOperation) -> Self {
    let mut skipped = vec![];
    let parameters = read_parameters(raw.parameters, &mut skipped);

    let request_body = raw
      .request_body
      .and_then(|value| match ObjectOrReference::<RequestBody>::deserialize(value) {
        Ok(body) => Some(body),
        Err(error) => {
          skipped.push(SkippedEntry::new("request body", error));
          None
        }
      });

    let mut responses = IndexMap::new();
    match raw.responses {
      None => {}
      Some(Value::Object(map)) => {
        for (status, value) in map.into_iter().filter(|(status, _)| !is_extension(status)) {
          match ObjectOrReference::<Response>::deserialize(value) {
            Ok(response) => {
              responses.insert(status, response);
            }
            Err(error) => skipped.push(SkippedEntry::new(format!("response '{status}'"), error)),
          }
        }
      }
      Some(other) => skipped.push(SkippedEntry::new(
        "responses",
        format!("expected a mapping, found {}", super::value_kind(&other)),
      )),
    }

    Self {
      tags: string_list(raw.tags),
      summary: raw.summary,
      description: raw.description,
      operation_id: raw.operation_id,
      parameters,
      request_body,
      responses,
      deprecated: raw.deprecated,
      skipped,
    }
  }
}

/// Keeps the entries that read as a parameter or a `$ref`, recording the rest.
fn read_parameters(value: Option<Value>, skipped: &mut Vec<SkippedEntry>) -> Vec<ObjectOrReference<Parameter>> {
  let entries = match value {
    None => return vec![],
    Some(Value::Array(entries)) => entries,
    Some(other) => {
      skipped.push(SkippedEntry::new(
        "parameters",
        format!("expected a list, found {}", super::value_kind(&other)),
      ));
      return vec![];
    }
  };

  entries
    .into_iter()
    .enumerate()
    .filter_map(|(index, value)| {
      let label = match value.get("name").and_then(Value::as_str) {
        Some(name) => format!("parameter '{name}'"),
        None => format!("parameter #{}", index + 1),
      };
      match ObjectOrReference::<Parameter>::deserialize(value) {
        Ok(parameter) => Some(parameter),
        Err(error) => {
          skipped.push(SkippedEntry::new(label, error));
          None
        }
      }
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterIn {
  Path,
  Query,
  Header,
  Cookie,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
  pub name: String,
  #[serde(rename = "in")]
  pub location: ParameterIn,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub deprecated: bool,
  pub description: Option<String>,
  pub schema: Option<SchemaNode>,
}

impl Parameter {
  /// The identity used when path-level and operation-level parameters are merged.
  pub fn merge_key(&self) -> (&str, ParameterIn) {
    (&self.name, self.location)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
  pub description: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
  #[serde(default)]
  pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
  pub description: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaType {
  pub schema: Option<SchemaNode>,
}
