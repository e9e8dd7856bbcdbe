use std::path::{Path, PathBuf};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use num_format::{Locale, ToFormattedString};

use crate::{
  generator::{
    CodegenConfig, GenerationMode, NameAffixes, OperationFilterConfig, TypesMode, ZodMode,
    metrics::GenerationStats,
    orchestrator::{CompiledSpec, GeneratedOutput, Orchestrator},
  },
  ui::{Colors, GenerateCommand, GenerateMode, colors::Role, config::GeneratorConfigFile},
  utils::spec::SpecLoader,
};

const TYPES: &dyn GenerationMode = &TypesMode;
const ZOD: &dyn GenerationMode = &ZodMode;

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

fn format_count(count: usize) -> String {
  count.to_formatted_string(&Locale::en)
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub mode: GenerateMode,
  pub input: PathBuf,
  pub output: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
  pub codegen: CodegenConfig,
}

impl GenerateConfig {
  /// Reads the `--config` file, if any, and merges it under the command line.
  pub async fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let file = match &command.config {
      Some(path) => GeneratorConfigFile::load(path).await?,
      None => GeneratorConfigFile::default(),
    };
    Ok(Self::merge(command, file))
  }

  /// Flags given on the command line win over file values; file values win over defaults.
  pub fn merge(command: GenerateCommand, file: GeneratorConfigFile) -> Self {
    let GenerateCommand {
      mode,
      input,
      output,
      config: _,
      enum_style,
      no_descriptions,
      nullable_by_default,
      prefix,
      suffix,
      strip_schema_prefixes,
      strip_path_prefix,
      no_operation_id,
      filter,
      stats_header,
      no_operation_types,
      verbose,
      quiet,
    } = command;

    let codegen = CodegenConfig::builder()
      .enum_style(enum_style.or(file.enum_style).unwrap_or_default())
      .include_descriptions(!no_descriptions && file.include_descriptions.unwrap_or(true))
      .nullable_by_default(nullable_by_default || file.nullable_by_default.unwrap_or(false))
      .affixes(NameAffixes::new(
        prefix.or(file.prefix).unwrap_or_default(),
        suffix.or(file.suffix).unwrap_or_default(),
      ))
      .strip_schema_prefixes(prefer_cli(strip_schema_prefixes, file.strip_schema_prefixes))
      .maybe_strip_path_prefix(strip_path_prefix.or(file.strip_path_prefix))
      .prefer_operation_id(!no_operation_id && file.prefer_operation_id.unwrap_or(true))
      .operation_filter(merge_filters(filter.into(), file.filter))
      .stats_header(stats_header || file.stats_header.unwrap_or(false))
      .operation_types(!no_operation_types && file.operation_types.unwrap_or(true))
      .build();

    Self {
      mode,
      input,
      output,
      verbose,
      quiet,
      codegen,
    }
  }

  /// Target files for the selected mode.
  fn targets(&self) -> Vec<(PathBuf, &'static dyn GenerationMode)> {
    match self.mode {
      GenerateMode::Types => vec![(self.output.clone(), TYPES)],
      GenerateMode::Zod => vec![(self.output.clone(), ZOD)],
      GenerateMode::All => [TYPES, ZOD]
        .into_iter()
        .map(|mode| (self.output.join(mode.file_name()), mode))
        .collect(),
    }
  }
}

fn prefer_cli(cli: Vec<String>, file: Vec<String>) -> Vec<String> {
  if cli.is_empty() { file } else { cli }
}

fn merge_filters(cli: OperationFilterConfig, file: OperationFilterConfig) -> OperationFilterConfig {
  OperationFilterConfig {
    include_tags: prefer_cli(cli.include_tags, file.include_tags),
    exclude_tags: prefer_cli(cli.exclude_tags, file.exclude_tags),
    include_paths: prefer_cli(cli.include_paths, file.include_paths),
    exclude_paths: prefer_cli(cli.exclude_paths, file.exclude_paths),
    include_methods: prefer_cli(cli.include_methods, file.include_methods),
    exclude_methods: prefer_cli(cli.exclude_methods, file.exclude_methods),
    include_operation_ids: prefer_cli(cli.include_operation_ids, file.include_operation_ids),
    exclude_operation_ids: prefer_cli(cli.exclude_operation_ids, file.exclude_operation_ids),
    exclude_deprecated: cli.exclude_deprecated || file.exclude_deprecated,
  }
}

async fn write_output(path: &Path, code: &str) -> anyhow::Result<()> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(path, code).await?;
  Ok(())
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.paint(Role::Timestamp)));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.paint(Role::Label)),
        value.with(self.colors.paint(Role::Count))
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.paint(Role::Progress))
        .to_string(),
    );
  }

  fn log_generating(&self) {
    let message = match self.config.mode {
      GenerateMode::Types => "Generating TypeScript types...",
      GenerateMode::Zod => "Generating Zod schemas...",
      GenerateMode::All => "Generating TypeScript types and Zod schemas...",
    };
    self.info(&message.with(self.colors.paint(Role::Progress)).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Schemas:", format_count(stats.schemas_total));
    self.stat("Types generated:", format_count(stats.types_generated));
    self.stat("", format!("{} interfaces", format_count(stats.interfaces_generated)));
    self.stat("", format!("{} enums", format_count(stats.enums_generated)));
    self.stat("", format!("{} type aliases", format_count(stats.type_aliases_generated)));
    if stats.operation_types_generated > 0 {
      self.stat(
        "",
        format!("{} from operations", format_count(stats.operation_types_generated)),
      );
    }
    self.stat(
      "Operations included:",
      format!(
        "{} of {}",
        format_count(stats.filter.included),
        format_count(stats.filter.total_operations)
      ),
    );
    if self.config.verbose {
      for (rule, count) in &stats.filter.excluded_by {
        self.stat("", format!("{} excluded by {rule}", format_count(*count)));
      }
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", format_count(stats.warnings.len()));
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", format_count(stats.cycles_detected));

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.paint(Role::Alert)),
          cycle.join(" -> ").with(self.colors.paint(Role::Detail))
        );
      }
    }
  }

  /// Filter problems are always shown; everything else only with `--verbose`.
  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !(warning.is_filter_problem() || self.config.verbose) {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.paint(Role::Alert)),
        format!("{warning}").with(self.colors.paint(Role::Detail))
      );
    }
  }

  fn log_writing(&self, path: &Path) {
    self.info(
      &format!("Writing to: {}", path.display())
        .with(self.colors.paint(Role::Progress))
        .to_string(),
    );
  }

  fn log_success(&self) {
    if !self.config.quiet {
      let message = match self.config.mode {
        GenerateMode::Types => "Successfully generated TypeScript types",
        GenerateMode::Zod => "Successfully generated Zod schemas",
        GenerateMode::All => "Successfully generated TypeScript types and Zod schemas",
      };
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.paint(Role::Timestamp)),
        message.with(self.colors.paint(Role::Success))
      );
    }
  }
}

fn render_targets(
  compiled: &CompiledSpec,
  targets: Vec<(PathBuf, &'static dyn GenerationMode)>,
  source_path: &str,
) -> Vec<(PathBuf, GeneratedOutput)> {
  targets
    .into_iter()
    .map(|(path, mode)| (path, compiled.render(mode, Some(source_path))))
    .collect()
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = SpecLoader::load(&config.input).await?;

  logger.log_generating();
  let orchestrator = Orchestrator::new(document, config.codegen.clone()).with_source_path(&config.input);
  let compiled = orchestrator.compile()?;
  let source_path = config.input.display().to_string();
  let outputs = render_targets(&compiled, config.targets(), &source_path);

  // Emitter warnings differ per mode; each is reported once.
  let mut stats = compiled.stats.clone();
  for (_, output) in &outputs {
    for warning in &output.stats.warnings {
      if !stats.warnings.contains(warning) {
        stats.warnings.push(warning.clone());
      }
    }
  }
  logger.print_statistics(&stats);

  for (path, output) in &outputs {
    logger.log_writing(path);
    write_output(path, &output.code).await?;
  }

  logger.log_success();
  Ok(())
}
