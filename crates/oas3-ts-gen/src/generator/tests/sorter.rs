use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::generator::sorter::TopologicalSorter;

fn names(values: &[&str]) -> BTreeSet<String> {
  values.iter().map(|value| (*value).to_string()).collect()
}

fn graph(edges: &[(&str, &[&str])]) -> IndexMap<String, BTreeSet<String>> {
  edges
    .iter()
    .map(|(node, targets)| ((*node).to_string(), names(targets)))
    .collect()
}

#[test]
fn test_dependencies_come_first() {
  let cases: [(&[(&str, &[&str])], &[&str], &[&str]); 5] = [
    (&[("A", &[]), ("B", &[])], &[], &["A", "B"]),
    (&[("Pet", &["Owner"]), ("Owner", &[])], &[], &["Owner", "Pet"]),
    (
      &[("A", &["B", "C"]), ("B", &["C"]), ("C", &[]), ("D", &[])],
      &[],
      &["C", "B", "A", "D"],
    ),
    (&[("A", &["Unknown"]), ("B", &[])], &[], &["A", "B"]),
    (&[("Node", &["Node"]), ("Tree", &["Node"])], &["Node"], &["Node", "Tree"]),
  ];
  for (input, circular, expected) in cases {
    let order = TopologicalSorter::sort(&graph(input), &names(circular));
    assert_eq!(order, expected, "failed for input {input:?}");
  }
}

#[test]
fn test_cycle_members_are_emitted_once() {
  let graph = graph(&[("A", &["B"]), ("B", &["A"]), ("C", &["A"])]);
  let order = TopologicalSorter::sort(&graph, &names(&["A", "B"]));

  assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_inconsistent_circular_set_still_terminates() {
  let graph = graph(&[("A", &["B"]), ("B", &["A"])]);
  let order = TopologicalSorter::sort(&graph, &BTreeSet::new());

  assert_eq!(order.len(), 2);
  assert_eq!(names(&order.iter().map(String::as_str).collect::<Vec<_>>()), names(&["A", "B"]));
}

#[test]
fn test_order_is_deterministic() {
  let graph = graph(&[("E", &["D"]), ("D", &[]), ("C", &["E"]), ("B", &["A"]), ("A", &[])]);
  let first = TopologicalSorter::sort(&graph, &BTreeSet::new());
  let second = TopologicalSorter::sort(&graph, &BTreeSet::new());

  assert_eq!(first, vec!["D", "E", "C", "A", "B"]);
  assert_eq!(first, second);
}
