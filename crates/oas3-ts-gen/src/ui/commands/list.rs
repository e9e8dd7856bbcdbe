use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use crossterm::style::Stylize;

use crate::{
  generator::{
    CodegenConfig, OperationFilterConfig,
    operation_registry::{OperationDescriptor, OperationRegistry},
  },
  ui::{Colors, colors::Role, term_width},
  utils::spec::SpecLoader,
};

/// Prints the operations that survive `filter`, in document order, followed
/// by the filter counters when any rule is configured.
pub async fn list_operations(input: &Path, filter: OperationFilterConfig, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::load(input).await?;
  let has_filter = !filter.is_empty();
  let config = CodegenConfig::builder().operation_filter(filter).build();
  let extracted = OperationRegistry::extract(&document, &config);

  println!("{}", operations_table(&extracted.operations, colors));

  if has_filter {
    let stats = &extracted.stats;
    println!();
    println!(
      "{} of {} operations included ({} excluded, {} not included)",
      stats.included.to_string().with(colors.paint(Role::Count)),
      stats.total_operations.to_string().with(colors.paint(Role::Count)),
      stats.excluded(),
      stats.not_included,
    );
    for (rule, count) in &stats.excluded_by {
      println!("  {:<24} {}", format!("{rule}:").with(colors.paint(Role::Label)), count);
    }
  }

  for warning in extracted.warnings.iter().filter(|warning| warning.is_filter_problem()) {
    eprintln!(
      "{} {}",
      "Warning:".with(colors.paint(Role::Alert)),
      warning.to_string().with(colors.paint(Role::Detail))
    );
  }

  Ok(())
}

fn operations_table(operations: &[OperationDescriptor<'_>], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["OPERATION", "METHOD", "PATH", "TAGS"] {
    row.add_cell(Cell::new(header).fg(colors.cell(Role::Label)));
  }
  table.set_header(row);

  for operation in operations {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&operation.name)
        .fg(colors.cell(Role::OperationName))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(operation.method.as_str())
        .fg(colors.method_cell(&operation.method))
        .set_alignment(CellAlignment::Right),
    );
    let path = Cell::new(operation.path).fg(colors.cell(Role::Path));
    row.add_cell(if operation.deprecated {
      path.add_attribute(Attribute::CrossedOut)
    } else {
      path
    });
    row.add_cell(Cell::new(operation.tags.join(", ")).fg(colors.cell(Role::Tag)));
    table.add_row(row);
  }

  table
}
