use std::{borrow::Cow, collections::BTreeSet};

use http::Method;
use indexmap::IndexMap;
use mediatype::MediaType as ParsedMediaType;
use tracing::debug;

use super::{
  CodegenConfig,
  document::{Document, MediaType, Operation, Parameter, SchemaNode},
  filter::{FilterDecision, FilterEngine, FilterStats, OperationCandidate},
  metrics::GenerationWarning,
  naming::operations::{OperationNaming, operation_base_name, reserve_operation_name},
  parameters::merge_parameters,
  resolver::{resolve_request_body, resolve_response, resolve_schema},
};

const SUCCESS_STATUS_PREFIX: char = '2';

/// A schema position inside a request body or response, kept both as written
/// (for lowering, so references stay referential) and resolved.
#[derive(Debug, Clone)]
pub struct MediaContent<'a> {
  pub media_type: &'a str,
  pub schema: Option<&'a SchemaNode>,
  pub resolved: Option<Cow<'a, SchemaNode>>,
}

#[derive(Debug, Clone)]
pub struct RequestBodyDescriptor<'a> {
  pub description: Option<&'a str>,
  pub required: bool,
  pub content: Vec<MediaContent<'a>>,
}

#[derive(Debug, Clone)]
pub struct ResponseDescriptor<'a> {
  pub status: &'a str,
  pub description: Option<&'a str>,
  pub content: Vec<MediaContent<'a>>,
}

impl ResponseDescriptor<'_> {
  pub fn is_success(&self) -> bool {
    self.status.starts_with(SUCCESS_STATUS_PREFIX)
  }
}

/// One (path, method) pair after filtering, with everything resolved.
#[derive(Debug, Clone)]
pub struct OperationDescriptor<'a> {
  /// Unique base identifier for names derived from this operation.
  pub name: String,
  pub method: Method,
  pub path: &'a str,
  pub operation_id: Option<&'a str>,
  pub tags: &'a [String],
  pub summary: Option<&'a str>,
  pub description: Option<&'a str>,
  pub deprecated: bool,
  pub parameters: Vec<&'a Parameter>,
  pub request_body: Option<RequestBodyDescriptor<'a>>,
  pub responses: Vec<ResponseDescriptor<'a>>,
}

impl<'a> OperationDescriptor<'a> {
  /// Number of 2xx responses. Error responses never count.
  pub fn success_status_count(&self) -> usize {
    self.responses.iter().filter(|response| response.is_success()).count()
  }

  pub fn has_multiple_success_statuses(&self) -> bool {
    self.success_status_count() > 1
  }

  pub fn success_responses(&self) -> impl Iterator<Item = &ResponseDescriptor<'a>> {
    self.responses.iter().filter(|response| response.is_success())
  }

  pub fn display_id(&self) -> String {
    format!("{} {}", self.method, self.path)
  }
}

/// Result of walking `paths` once.
#[derive(Debug, Clone, Default)]
pub struct ExtractedOperations<'a> {
  pub operations: Vec<OperationDescriptor<'a>>,
  pub stats: FilterStats,
  pub warnings: Vec<GenerationWarning>,
}

pub struct OperationRegistry;

impl OperationRegistry {
  /// Walks `paths` in document order and each path item in the fixed method
  /// order, keeping the operations the filter accepts.
  pub fn extract<'a>(document: &'a Document, config: &CodegenConfig) -> ExtractedOperations<'a> {
    let engine = FilterEngine::new(&config.operation_filter);
    let path_prefix = config.path_prefix_pattern();
    let naming = OperationNaming {
      prefer_operation_id: config.prefer_operation_id,
      strip_path_prefix: path_prefix.as_ref(),
    };

    let mut extracted = ExtractedOperations {
      stats: engine.new_stats(),
      warnings: engine.warnings().to_vec(),
      ..ExtractedOperations::default()
    };
    let mut used_names = BTreeSet::new();

    for (path, path_item) in &document.paths {
      for (method, operation) in path_item.methods() {
        let candidate = OperationCandidate {
          method: &method,
          path,
          operation_id: operation.operation_id.as_deref(),
          tags: &operation.tags,
          deprecated: operation.deprecated,
        };
        if engine.evaluate(&candidate, &mut extracted.stats) != FilterDecision::Included {
          continue;
        }

        let base_name = operation_base_name(&method, path, operation.operation_id.as_deref(), naming);
        let name = reserve_operation_name(&base_name, &mut used_names);

        let merged = merge_parameters(
          Some(path_item.parameters.as_slice()),
          Some(operation.parameters.as_slice()),
          document,
        );
        for ref_path in merged.unresolved {
          extracted
            .warnings
            .push(unresolved_component(&name, "parameter", ref_path));
        }
        for skipped in path_item.skipped.iter().chain(&operation.skipped) {
          extracted.warnings.push(GenerationWarning::SkippedEntry {
            operation: name.clone(),
            kind: skipped.kind.clone(),
            reason: skipped.reason.clone(),
          });
        }

        let request_body = Self::request_body(document, operation, &name, &mut extracted.warnings);
        let responses = Self::responses(document, operation, &name, &mut extracted.warnings);

        extracted.operations.push(OperationDescriptor {
          name,
          method,
          path,
          operation_id: operation.operation_id.as_deref(),
          tags: &operation.tags,
          summary: operation.summary.as_deref(),
          description: operation.description.as_deref(),
          deprecated: operation.deprecated,
          parameters: merged.parameters,
          request_body,
          responses,
        });
      }
    }

    extracted.warnings.extend(extracted.stats.vacuous_warnings());
    debug!(
      total = extracted.stats.total_operations,
      included = extracted.stats.included,
      "extracted operations"
    );
    extracted
  }

  fn request_body<'a>(
    document: &'a Document,
    operation: &'a Operation,
    name: &str,
    warnings: &mut Vec<GenerationWarning>,
  ) -> Option<RequestBodyDescriptor<'a>> {
    let node = operation.request_body.as_ref()?;
    let Some(body) = resolve_request_body(node, document) else {
      warnings.push(unresolved_component(name, "request body", node.ref_path().unwrap_or_default()));
      return None;
    };

    Some(RequestBodyDescriptor {
      description: body.description.as_deref(),
      required: body.required,
      content: media_contents(&body.content, document),
    })
  }

  fn responses<'a>(
    document: &'a Document,
    operation: &'a Operation,
    name: &str,
    warnings: &mut Vec<GenerationWarning>,
  ) -> Vec<ResponseDescriptor<'a>> {
    operation
      .responses
      .iter()
      .filter_map(|(status, node)| {
        let Some(response) = resolve_response(node, document) else {
          warnings.push(unresolved_component(name, "response", node.ref_path().unwrap_or_default()));
          return None;
        };
        Some(ResponseDescriptor {
          status,
          description: response.description.as_deref(),
          content: media_contents(&response.content, document),
        })
      })
      .collect()
  }
}

fn media_contents<'a>(content: &'a IndexMap<String, MediaType>, document: &'a Document) -> Vec<MediaContent<'a>> {
  content
    .iter()
    .map(|(media_type, media)| MediaContent {
      media_type,
      schema: media.schema.as_ref(),
      resolved: media.schema.as_ref().map(|schema| resolve_schema(schema, document)),
    })
    .collect()
}

/// The media type whose schema describes a body: the first JSON-like one, else the first.
pub(crate) fn preferred_content<'c, 'a>(content: &'c [MediaContent<'a>]) -> Option<&'c MediaContent<'a>> {
  content
    .iter()
    .find(|entry| is_json_like(entry.media_type))
    .or_else(|| content.first())
}

pub(crate) fn is_json_like(media_type: &str) -> bool {
  let Ok(parsed) = ParsedMediaType::parse(media_type) else {
    return false;
  };
  let suffix = parsed.suffix.as_ref().map(mediatype::Name::as_str);
  parsed.subty.as_str() == "json" || suffix == Some("json")
}

fn unresolved_component(operation: &str, kind: &str, ref_path: impl Into<String>) -> GenerationWarning {
  GenerationWarning::UnresolvedComponent {
    operation: operation.to_string(),
    kind: kind.to_string(),
    ref_path: ref_path.into(),
  }
}
