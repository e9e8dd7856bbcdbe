use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};
use tracing::debug;

use super::document::{AdditionalProperties, Document, ObjectOrReference, Schema, SchemaNode};
use crate::utils::parse_schema_ref_path;

/// Result of cycle detection, keyed by declared schema names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
  pub circular: BTreeSet<String>,
  /// Each strongly connected component that forms a cycle, in declaration order.
  pub cycles: Vec<Vec<String>>,
}

impl CycleReport {
  pub fn is_circular(&self, raw_name: &str) -> bool {
    self.circular.contains(raw_name)
  }
}

pub struct CircularReferenceDetector;

impl CircularReferenceDetector {
  /// Marks every named schema that can reach itself through one or more reference hops.
  pub fn detect(document: &Document) -> CycleReport {
    let graph = Self::reference_graph(document);
    let report = Self::detect_in(&graph);
    if !report.cycles.is_empty() {
      debug!(cycles = ?report.cycles, "detected circular schemas");
    }
    report
  }

  /// Named schema → named schemas referenced anywhere inside it. Targets that
  /// are not declared in `components.schemas` are dropped.
  pub fn reference_graph(document: &Document) -> IndexMap<String, BTreeSet<String>> {
    let schemas = &document.components.schemas;
    schemas
      .iter()
      .map(|(name, node)| {
        let targets = collect_schema_refs(node)
          .into_iter()
          .filter(|target| schemas.contains_key(target))
          .collect();
        (name.clone(), targets)
      })
      .collect()
  }

  pub fn detect_in(graph: &IndexMap<String, BTreeSet<String>>) -> CycleReport {
    let mut digraph = DiGraphMap::<&str, ()>::new();
    for (node, targets) in graph {
      digraph.add_node(node.as_str());
      for target in targets {
        digraph.add_edge(node.as_str(), target.as_str(), ());
      }
    }

    let position = graph
      .keys()
      .enumerate()
      .map(|(index, name)| (name.as_str(), index))
      .collect::<HashMap<_, _>>();
    let order = |name: &&str| position.get(name).copied().unwrap_or(usize::MAX);

    let mut cycles = kosaraju_scc(&digraph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || digraph.contains_edge(scc[0], scc[0]))
      .map(|mut scc| {
        scc.sort_by_key(order);
        scc
      })
      .collect::<Vec<_>>();
    cycles.sort_by_key(|scc| order(&scc[0]));

    let cycles = cycles
      .into_iter()
      .map(|scc| scc.into_iter().map(String::from).collect::<Vec<_>>())
      .collect::<Vec<_>>();
    let circular = cycles.iter().flatten().cloned().collect();

    CycleReport { circular, cycles }
  }
}

/// Collects the schema names referenced from `root`, walking nested positions
/// with an explicit stack.
pub(crate) fn collect_schema_refs(root: &SchemaNode) -> BTreeSet<String> {
  let mut refs = BTreeSet::new();
  let mut stack = vec![root];

  while let Some(node) = stack.pop() {
    let schema = match node {
      ObjectOrReference::Ref { ref_path, .. } => {
        if let Some(name) = parse_schema_ref_path(ref_path) {
          refs.insert(name);
        }
        continue;
      }
      ObjectOrReference::Object(Schema::Object(schema)) => schema,
      ObjectOrReference::Object(Schema::Boolean(_) | Schema::Malformed { .. }) => continue,
    };

    stack.extend(schema.properties.values());
    stack.extend(&schema.all_of);
    stack.extend(&schema.one_of);
    stack.extend(&schema.any_of);
    stack.extend(&schema.prefix_items);
    if let Some(items) = &schema.items {
      stack.push(items);
    }
    if let Some(AdditionalProperties::Schema(additional)) = &schema.additional_properties {
      stack.push(additional);
    }
  }

  refs
}
