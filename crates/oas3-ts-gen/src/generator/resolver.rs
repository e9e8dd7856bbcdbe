use std::borrow::Cow;

use tracing::{debug, trace};

use super::document::{
  Components, Document, ObjectOrReference, Parameter, RequestBody, Response, Schema, SchemaNode,
};
use crate::utils::refs::{ComponentCollection, ComponentRef};

/// Hop limit for `$ref` chains. Chains longer than this are treated as cycles.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// An object that can sit behind a `#/components/<collection>/<name>` pointer.
pub trait Resolvable: Sized {
  const COLLECTION: ComponentCollection;

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a ObjectOrReference<Self>>;
}

impl Resolvable for Schema {
  const COLLECTION: ComponentCollection = ComponentCollection::Schemas;

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a ObjectOrReference<Self>> {
    components.schemas.get(name)
  }
}

impl Resolvable for Parameter {
  const COLLECTION: ComponentCollection = ComponentCollection::Parameters;

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a ObjectOrReference<Self>> {
    components.parameters.get(name)
  }
}

impl Resolvable for RequestBody {
  const COLLECTION: ComponentCollection = ComponentCollection::RequestBodies;

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a ObjectOrReference<Self>> {
    components.request_bodies.get(name)
  }
}

impl Resolvable for Response {
  const COLLECTION: ComponentCollection = ComponentCollection::Responses;

  fn lookup<'a>(components: &'a Components, name: &str) -> Option<&'a ObjectOrReference<Self>> {
    components.responses.get(name)
  }
}

/// Follows `$ref` hops until an inline object is reached.
///
/// An unresolvable pointer hands back `node` itself, still a reference. When
/// `max_depth` hops are spent the last node reached is returned as is, which
/// may also still be a reference. Neither case is an error.
pub fn resolve<'a, T: Resolvable>(
  node: &'a ObjectOrReference<T>,
  document: &'a Document,
  max_depth: usize,
) -> &'a ObjectOrReference<T> {
  let mut current = node;
  let mut remaining = max_depth;

  while let ObjectOrReference::Ref { ref_path, .. } = current {
    if remaining == 0 {
      trace!(ref_path, max_depth, "reference chain hit the depth limit");
      return current;
    }

    let Some(target) = lookup::<T>(ref_path, document) else {
      debug!(ref_path, "unresolved reference");
      return node;
    };

    current = target;
    remaining -= 1;
  }

  current
}

fn lookup<'a, T: Resolvable>(ref_path: &str, document: &'a Document) -> Option<&'a ObjectOrReference<T>> {
  let component = ref_path.parse::<ComponentRef>().ok()?;
  if component.collection != T::COLLECTION {
    return None;
  }
  T::lookup(&document.components, &component.name)
}

/// Resolves a schema position and re-applies the referencing node's own
/// `nullable: true`, which substitution would otherwise lose.
pub fn resolve_schema<'a>(node: &'a SchemaNode, document: &'a Document) -> Cow<'a, SchemaNode> {
  let resolved = resolve(node, document, DEFAULT_MAX_DEPTH);

  match (node.nullable_flag(), resolved) {
    (Some(true), ObjectOrReference::Object(Schema::Object(schema))) if node.is_ref() && schema.nullable != Some(true) => {
      let mut schema = (**schema).clone();
      schema.nullable = Some(true);
      Cow::Owned(SchemaNode::from(schema))
    }
    _ => Cow::Borrowed(resolved),
  }
}

pub fn resolve_parameter<'a>(node: &'a ObjectOrReference<Parameter>, document: &'a Document) -> Option<&'a Parameter> {
  resolve(node, document, DEFAULT_MAX_DEPTH).as_object()
}

pub fn resolve_request_body<'a>(
  node: &'a ObjectOrReference<RequestBody>,
  document: &'a Document,
) -> Option<&'a RequestBody> {
  resolve(node, document, DEFAULT_MAX_DEPTH).as_object()
}

pub fn resolve_response<'a>(node: &'a ObjectOrReference<Response>, document: &'a Document) -> Option<&'a Response> {
  resolve(node, document, DEFAULT_MAX_DEPTH).as_object()
}
