use std::collections::BTreeSet;

use super::lowering::{FieldSource, LoweringContext, LoweringOutput};
use crate::generator::{
  CodegenConfig,
  ast::{Declaration, DeclarationOrigin, OperationRole, TypeExpr},
  document::{ParameterIn, SchemaNode},
  errors::{ErrorContext, GeneratorError},
  metrics::GenerationWarning,
  naming::{
    identifiers::ensure_unique,
    operations::{HEADERS_SUFFIX, QUERY_PARAMS_SUFFIX, REQUEST_BODY_SUFFIX, RESPONSE_SUFFIX},
  },
  operation_registry::{OperationDescriptor, preferred_content},
  schema_registry::SchemaRegistry,
};

/// Declarations derived from one operation, in emission order.
#[derive(Debug, Default)]
pub struct OperationTypes {
  pub declarations: Vec<Declaration>,
  pub warnings: Vec<GenerationWarning>,
}

/// Lowers the inline types of operations: query parameters, headers, request
/// bodies and successful responses. Referenced bodies need no declaration.
pub struct OperationTypeBuilder<'a> {
  registry: &'a SchemaRegistry<'a>,
  config: &'a CodegenConfig,
  context: &'a ErrorContext,
  used_names: BTreeSet<String>,
}

impl<'a> OperationTypeBuilder<'a> {
  pub fn new(registry: &'a SchemaRegistry<'a>, config: &'a CodegenConfig, context: &'a ErrorContext) -> Self {
    Self {
      registry,
      config,
      context,
      used_names: registry.used_names().clone(),
    }
  }

  pub fn build(&mut self, operation: &OperationDescriptor) -> Result<OperationTypes, GeneratorError> {
    let mut types = OperationTypes::default();

    for (location, suffix, role) in [
      (ParameterIn::Query, QUERY_PARAMS_SUFFIX, OperationRole::QueryParams),
      (ParameterIn::Header, HEADERS_SUFFIX, OperationRole::Headers),
    ] {
      let fields = operation
        .parameters
        .iter()
        .filter(|param| param.location == location)
        .map(|param| FieldSource {
          name: &param.name,
          node: param.schema.as_ref(),
          required: param.required,
          description: param.description.as_deref(),
          deprecated: param.deprecated,
        })
        .collect::<Vec<_>>();
      if fields.is_empty() {
        continue;
      }

      let name = self.reserve(&format!("{}{suffix}", operation.name));
      let mut lowering = LoweringContext::new(self.registry, self.config, name.as_str());
      let ty = lowering
        .lower_fields(fields)
        .map_err(|error| self.failure(&name, operation, &error))?;
      self.push(&mut types, operation, name, role, ty, None, lowering.finish());
    }

    if let Some(body) = &operation.request_body
      && let Some(node) = inline_schema(preferred_content(&body.content).and_then(|content| content.schema))
    {
      let name = self.reserve(&format!("{}{REQUEST_BODY_SUFFIX}", operation.name));
      let (ty, output) = self.lower(&name, operation, node)?;
      self.push(&mut types, operation, name, OperationRole::RequestBody, ty, body.description, output);
    }

    let multiple = operation.has_multiple_success_statuses();
    for response in operation.success_responses() {
      let Some(node) = inline_schema(preferred_content(&response.content).and_then(|content| content.schema)) else {
        continue;
      };
      let base = if multiple {
        format!("{}{RESPONSE_SUFFIX}{}", operation.name, response.status)
      } else {
        format!("{}{RESPONSE_SUFFIX}", operation.name)
      };
      let name = self.reserve(&base);
      let (ty, output) = self.lower(&name, operation, node)?;
      self.push(&mut types, operation, name, OperationRole::Response, ty, response.description, output);
    }

    Ok(types)
  }

  fn lower(
    &self,
    name: &str,
    operation: &OperationDescriptor,
    node: &SchemaNode,
  ) -> Result<(TypeExpr, LoweringOutput), GeneratorError> {
    let mut lowering = LoweringContext::new(self.registry, self.config, name);
    let ty = lowering
      .lower(node)
      .map_err(|error| self.failure(name, operation, &error))?;
    Ok((ty, lowering.finish()))
  }

  #[allow(clippy::too_many_arguments)]
  fn push(
    &self,
    types: &mut OperationTypes,
    operation: &OperationDescriptor,
    name: String,
    role: OperationRole,
    ty: TypeExpr,
    description: Option<&str>,
    output: LoweringOutput,
  ) {
    types.warnings.extend(output.warnings);
    types.declarations.push(Declaration {
      name,
      ty,
      description: description.map(String::from),
      deprecated: operation.deprecated,
      circular: false,
      origin: DeclarationOrigin::Operation {
        operation: operation.name.clone(),
        role,
      },
    });
  }

  fn reserve(&mut self, base: &str) -> String {
    let decorated = self.config.affixes.decorate(base);
    let name = ensure_unique(&decorated, &self.used_names);
    self.used_names.insert(name.clone());
    name
  }

  fn failure(&self, name: &str, operation: &OperationDescriptor, error: &impl ToString) -> GeneratorError {
    GeneratorError::SchemaGeneration {
      schema_name: name.to_string(),
      message: error.to_string(),
      context: self
        .context
        .clone()
        .with_schema(name)
        .with_operation(operation.display_id()),
    }
  }
}

fn inline_schema(node: Option<&SchemaNode>) -> Option<&SchemaNode> {
  node.filter(|node| !node.is_ref())
}
