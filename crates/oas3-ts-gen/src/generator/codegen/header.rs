use crate::{
  generator::{metrics::GenerationStats, orchestrator::CodeMetadata},
  utils::text::line_comment,
};

const GENERATOR_NAME: &str = env!("CARGO_PKG_NAME");

/// The auto-generated banner placed at the top of every output file.
pub(crate) fn render_banner(metadata: &CodeMetadata, source_path: &str) -> String {
  let description = metadata
    .description
    .as_deref()
    .filter(|text| !text.trim().is_empty())
    .unwrap_or("No description provided");

  let text = format!(
    "AUTO-GENERATED CODE - DO NOT EDIT!\n\n{}\nSource: {source_path}\nVersion: {}\nGenerated by `{GENERATOR_NAME}`\n\n{description}",
    metadata.title, metadata.version
  );
  line_comment(&text)
}

/// Informational comment block summarizing one run.
pub(crate) fn render_stats_block(stats: &GenerationStats) -> String {
  let circular = if stats.circular_schemas.is_empty() {
    "none".to_string()
  } else {
    stats.circular_schemas.join(", ")
  };

  let mut lines = vec![
    "Generation statistics".to_string(),
    format!("  Schemas: {}", stats.schemas_total),
    format!(
      "  Declarations: {} ({} interfaces, {} enums, {} type aliases)",
      stats.types_generated, stats.interfaces_generated, stats.enums_generated, stats.type_aliases_generated
    ),
    format!("  Operation types: {}", stats.operation_types_generated),
    format!("  Circular schemas: {circular}"),
    format!(
      "  Operations: {} of {} included ({} excluded, {} not included)",
      stats.filter.included,
      stats.filter.total_operations,
      stats.filter.excluded(),
      stats.filter.not_included
    ),
  ];
  lines.extend(
    stats
      .filter
      .excluded_by
      .iter()
      .map(|(rule, count)| format!("  Excluded by {rule}: {count}")),
  );
  lines.extend(
    stats
      .filter
      .vacuous_rules()
      .into_iter()
      .map(|(rule, pattern)| format!("  Unmatched filter: {rule} '{pattern}'")),
  );

  line_comment(&lines.join("\n"))
}
