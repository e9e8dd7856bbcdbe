use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::trace;

/// Orders named declarations so each follows the declarations it depends on.
pub struct TopologicalSorter;

impl TopologicalSorter {
  /// Returns every key of `graph` exactly once.
  ///
  /// A node becomes eligible once each dependency is emitted, is itself, is
  /// not a node of the graph, or sits with it in the circular set. Among
  /// eligible nodes the earliest declared wins, so equal inputs give equal
  /// orders.
  pub fn sort(graph: &IndexMap<String, BTreeSet<String>>, circular: &BTreeSet<String>) -> Vec<String> {
    let mut emitted: HashSet<&str> = HashSet::with_capacity(graph.len());
    let mut order = Vec::with_capacity(graph.len());

    let is_satisfied = |node: &str, dependency: &str, emitted: &HashSet<&str>| {
      dependency == node
        || emitted.contains(dependency)
        || !graph.contains_key(dependency)
        || (circular.contains(node) && circular.contains(dependency))
    };

    while order.len() < graph.len() {
      let pending = graph.iter().filter(|(name, _)| !emitted.contains(name.as_str()));

      let mut next = None;
      let mut first_pending = None;
      for (name, dependencies) in pending {
        first_pending.get_or_insert(name);
        if dependencies
          .iter()
          .all(|dependency| is_satisfied(name, dependency, &emitted))
        {
          next = Some(name);
          break;
        }
      }

      // Only reachable with an inconsistent circular set.
      let Some(name) = next.or(first_pending) else {
        break;
      };
      trace!(name, "emitting declaration");
      emitted.insert(name.as_str());
      order.push(name.clone());
    }

    order
  }
}
