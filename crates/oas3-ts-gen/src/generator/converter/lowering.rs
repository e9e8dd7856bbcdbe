use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::generator::{
  CodegenConfig,
  ast::{Field, Literal, PrimitiveKind, TypeExpr},
  document::{AdditionalProperties, ObjectOrReference, ObjectSchema, Schema, SchemaNode, SchemaType, SchemaTypeSet},
  metrics::GenerationWarning,
  schema_registry::SchemaRegistry,
};

/// Nested schema positions lowered before one declaration is abandoned.
pub const MAX_LOWERING_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoweringError {
  #[error("schema nesting exceeds {limit} levels")]
  DepthExceeded { limit: usize },
}

/// What lowering one declaration produced besides its type.
#[derive(Debug, Default)]
pub struct LoweringOutput {
  /// Emitted names of the named schemas referenced by the declaration.
  pub dependencies: BTreeSet<String>,
  pub warnings: Vec<GenerationWarning>,
}

/// Lowers the schema nodes of one declaration into [`TypeExpr`]s.
///
/// References stay referential: a `$ref` to a declared schema becomes a
/// [`TypeExpr::Reference`] to its emitted name and is recorded as a dependency.
/// Shapes the compiler does not understand degrade to the open type.
pub struct LoweringContext<'a> {
  registry: &'a SchemaRegistry<'a>,
  config: &'a CodegenConfig,
  owner: String,
  output: LoweringOutput,
}

impl<'a> LoweringContext<'a> {
  pub fn new(registry: &'a SchemaRegistry<'a>, config: &'a CodegenConfig, owner: impl Into<String>) -> Self {
    Self {
      registry,
      config,
      owner: owner.into(),
      output: LoweringOutput::default(),
    }
  }

  pub fn lower(&mut self, node: &SchemaNode) -> Result<TypeExpr, LoweringError> {
    self.lower_node(node, 0)
  }

  /// Lowers a set of named positions, such as parameters, into an object type.
  pub fn lower_fields<'n>(
    &mut self,
    entries: impl IntoIterator<Item = FieldSource<'n>>,
  ) -> Result<TypeExpr, LoweringError> {
    let mut fields = vec![];
    for entry in entries {
      let ty = match entry.node {
        Some(node) => self.lower_property(node, 1)?,
        None => TypeExpr::UNKNOWN,
      };
      fields.push(Field {
        name: entry.name.to_string(),
        ty,
        required: entry.required,
        description: entry.description.map(String::from),
        deprecated: entry.deprecated,
      });
    }
    Ok(TypeExpr::Object(fields))
  }

  pub fn finish(self) -> LoweringOutput {
    self.output
  }

  fn lower_node(&mut self, node: &SchemaNode, depth: usize) -> Result<TypeExpr, LoweringError> {
    if depth > MAX_LOWERING_DEPTH {
      return Err(LoweringError::DepthExceeded {
        limit: MAX_LOWERING_DEPTH,
      });
    }

    match node {
      ObjectOrReference::Ref { ref_path, nullable, .. } => {
        let ty = self.lower_reference(ref_path);
        Ok(apply_nullable(ty, *nullable == Some(true)))
      }
      ObjectOrReference::Object(Schema::Object(schema)) => self.lower_schema(schema, depth),
      ObjectOrReference::Object(Schema::Boolean(_)) => Ok(TypeExpr::UNKNOWN),
      ObjectOrReference::Object(Schema::Malformed { reason }) => {
        debug!(owner = %self.owner, reason, "malformed schema");
        self.output.warnings.push(GenerationWarning::MalformedSchema {
          owner: self.owner.clone(),
          reason: reason.clone(),
        });
        Ok(TypeExpr::UNKNOWN)
      }
    }
  }

  fn lower_reference(&mut self, ref_path: &str) -> TypeExpr {
    if let Some(type_name) = self.registry.type_name_for_ref(ref_path) {
      self.output.dependencies.insert(type_name.to_string());
      return TypeExpr::Reference(type_name.to_string());
    }

    debug!(owner = %self.owner, ref_path, "unresolved schema reference");
    self.output.warnings.push(GenerationWarning::UnresolvedReference {
      owner: self.owner.clone(),
      ref_path: ref_path.to_string(),
    });
    TypeExpr::UNKNOWN
  }

  /// Applies the primary rule, then the schema's own `nullable` flag.
  fn lower_schema(&mut self, schema: &ObjectSchema, depth: usize) -> Result<TypeExpr, LoweringError> {
    if let Some(SchemaTypeSet::Multiple(types)) = &schema.schema_type {
      let ty = self.lower_type_list(schema, types, depth)?;
      return Ok(apply_nullable(ty, schema.nullable == Some(true)));
    }

    let ty = if schema.has_enum() {
      lower_enum(schema)
    } else if !schema.all_of.is_empty() {
      self.lower_all_of(schema, depth)?
    } else if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
      let members = schema
        .one_of
        .iter()
        .chain(&schema.any_of)
        .map(|member| self.lower_node(member, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;
      TypeExpr::union(members)
    } else if schema.has_type(&SchemaType::Object) || !schema.properties.is_empty() {
      self.lower_object(schema, depth)?
    } else if schema.has_type(&SchemaType::Array) || schema.items.is_some() || !schema.prefix_items.is_empty() {
      self.lower_array(schema, depth)?
    } else {
      lower_primitive(schema)
    };

    Ok(apply_nullable(ty, schema.nullable == Some(true)))
  }

  /// OpenAPI 3.1 `type: [T1, T2, "null"]`: each tag lowered as if it were the only one.
  fn lower_type_list(
    &mut self,
    schema: &ObjectSchema,
    types: &[SchemaType],
    depth: usize,
  ) -> Result<TypeExpr, LoweringError> {
    let has_null = types.contains(&SchemaType::Null);
    let members = types
      .iter()
      .filter(|schema_type| **schema_type != SchemaType::Null)
      .map(|schema_type| self.lower_schema(&schema.with_single_type(schema_type.clone()), depth + 1))
      .collect::<Result<Vec<_>, _>>()?;

    if members.is_empty() {
      return Ok(TypeExpr::Null);
    }
    Ok(apply_nullable(TypeExpr::union(members), has_null))
  }

  /// Each member becomes one intersection member; sibling `properties` add one more.
  fn lower_all_of(&mut self, schema: &ObjectSchema, depth: usize) -> Result<TypeExpr, LoweringError> {
    let mut members = schema
      .all_of
      .iter()
      .map(|member| self.lower_node(member, depth + 1))
      .collect::<Result<Vec<_>, _>>()?;

    if !schema.properties.is_empty() {
      members.push(TypeExpr::Object(self.lower_properties(schema, depth)?));
    }

    Ok(TypeExpr::intersection(members))
  }

  fn lower_object(&mut self, schema: &ObjectSchema, depth: usize) -> Result<TypeExpr, LoweringError> {
    let record = match &schema.additional_properties {
      Some(AdditionalProperties::Bool(true)) => Some(TypeExpr::UNKNOWN),
      Some(AdditionalProperties::Schema(node)) => Some(self.lower_node(node, depth + 1)?),
      Some(AdditionalProperties::Bool(false)) => None,
      None if schema.properties.is_empty() => Some(TypeExpr::UNKNOWN),
      None => None,
    };
    let record = record.map(|value| TypeExpr::Record(Box::new(value)));

    if schema.properties.is_empty() {
      return Ok(record.unwrap_or(TypeExpr::Object(vec![])));
    }

    let object = TypeExpr::Object(self.lower_properties(schema, depth)?);
    Ok(match record {
      Some(record) => TypeExpr::intersection([object, record]),
      None => object,
    })
  }

  fn lower_properties(&mut self, schema: &ObjectSchema, depth: usize) -> Result<Vec<Field>, LoweringError> {
    schema
      .properties
      .iter()
      .map(|(name, node)| -> Result<Field, LoweringError> {
        Ok(Field {
          name: name.clone(),
          ty: self.lower_property(node, depth + 1)?,
          required: schema.is_required(name),
          description: node_description(node).map(String::from),
          deprecated: node_deprecated(node),
        })
      })
      .collect()
  }

  /// Property positions additionally honour `nullable_by_default` when no flag is written.
  fn lower_property(&mut self, node: &SchemaNode, depth: usize) -> Result<TypeExpr, LoweringError> {
    let ty = self.lower_node(node, depth)?;
    let defaulted = self.config.nullable_by_default && node.nullable_flag().is_none();
    Ok(apply_nullable(ty, defaulted))
  }

  fn lower_array(&mut self, schema: &ObjectSchema, depth: usize) -> Result<TypeExpr, LoweringError> {
    let mut members = schema
      .prefix_items
      .iter()
      .map(|member| self.lower_node(member, depth + 1))
      .collect::<Result<Vec<_>, _>>()?;

    if let Some(items) = &schema.items {
      members.push(self.lower_node(items, depth + 1)?);
    }

    Ok(TypeExpr::Array(Box::new(TypeExpr::union(members))))
  }
}

/// One named position handed to [`LoweringContext::lower_fields`].
#[derive(Debug, Clone, Copy)]
pub struct FieldSource<'n> {
  pub name: &'n str,
  pub node: Option<&'n SchemaNode>,
  pub required: bool,
  pub description: Option<&'n str>,
  pub deprecated: bool,
}

/// The single nullability step every rule goes through.
fn apply_nullable(ty: TypeExpr, nullable: bool) -> TypeExpr {
  if nullable { ty.nullable() } else { ty }
}

fn lower_enum(schema: &ObjectSchema) -> TypeExpr {
  TypeExpr::union(schema.enum_like_values().into_iter().map(|value| {
    if value.is_null() {
      return TypeExpr::Null;
    }
    Literal::from_value(value).map_or(TypeExpr::UNKNOWN, TypeExpr::Literal)
  }))
}

fn lower_primitive(schema: &ObjectSchema) -> TypeExpr {
  let Some(SchemaTypeSet::Single(schema_type)) = &schema.schema_type else {
    return TypeExpr::UNKNOWN;
  };

  match schema_type {
    SchemaType::String => TypeExpr::Primitive(PrimitiveKind::String),
    SchemaType::Number => TypeExpr::Primitive(PrimitiveKind::Number),
    SchemaType::Integer => TypeExpr::Primitive(PrimitiveKind::Integer),
    SchemaType::Boolean => TypeExpr::Primitive(PrimitiveKind::Boolean),
    SchemaType::Null => TypeExpr::Null,
    SchemaType::Object | SchemaType::Array | SchemaType::Other(_) => TypeExpr::UNKNOWN,
  }
}

pub(crate) fn node_description(node: &SchemaNode) -> Option<&str> {
  match node {
    ObjectOrReference::Ref { description, .. } => description.as_deref(),
    ObjectOrReference::Object(schema) => schema.as_object_schema()?.description.as_deref(),
  }
}

pub(crate) fn node_deprecated(node: &SchemaNode) -> bool {
  node
    .as_object()
    .and_then(Schema::as_object_schema)
    .is_some_and(|schema| schema.deprecated)
}
