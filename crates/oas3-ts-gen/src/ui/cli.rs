use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::{EnumStyle, OperationFilterConfig};

#[derive(Parser, Debug)]
#[command(name = "oas3-ts-gen")]
#[command(author, version, about = "OpenAPI to TypeScript and Zod generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

impl Cli {
  pub fn is_verbose(&self) -> bool {
    matches!(&self.command, Commands::Generate(command) if command.verbose)
  }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate TypeScript declarations or Zod schemas from OpenAPI specification
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateCommand {
  /// What to generate
  #[arg(short, long, value_enum, default_value = "types")]
  pub mode: GenerateMode,

  /// Path to the OpenAPI specification file (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Output file, or output directory in `all` mode
  #[arg(short, long, value_name = "PATH")]
  pub output: PathBuf,

  /// JSON or YAML file with generator options; flags given here take precedence
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// How closed sets of literal values are declared [default: union]
  #[arg(long, value_enum)]
  pub enum_style: Option<EnumStyle>,

  /// Do not turn descriptions into documentation comments
  #[arg(long, default_value_t = false)]
  pub no_descriptions: bool,

  /// Treat properties without an explicit `nullable` as nullable
  #[arg(long, default_value_t = false)]
  pub nullable_by_default: bool,

  /// Prefix added to every generated type name
  #[arg(long, value_name = "TEXT")]
  pub prefix: Option<String>,

  /// Suffix added to every generated type name
  #[arg(long, value_name = "TEXT")]
  pub suffix: Option<String>,

  /// Literal or glob prefix removed from schema names before normalization (repeatable)
  #[arg(long = "strip-schema-prefix", value_name = "PATTERN")]
  pub strip_schema_prefixes: Vec<String>,

  /// Literal or glob prefix removed from paths before deriving operation names
  #[arg(long, value_name = "PATTERN")]
  pub strip_path_prefix: Option<String>,

  /// Name operation types after method and path even when an operationId exists
  #[arg(long, default_value_t = false)]
  pub no_operation_id: bool,

  #[command(flatten)]
  pub filter: FilterArgs,

  /// Emit a statistics comment block at the top of each file
  #[arg(long, default_value_t = false)]
  pub stats_header: bool,

  /// Skip query, header, request body and response declarations derived from operations
  #[arg(long, default_value_t = false)]
  pub no_operation_types: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

/// Operation include/exclude rules shared by `generate` and `list`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
  /// Only operations carrying one of these tags (comma-separated globs)
  #[arg(long, value_name = "TAGS", value_delimiter = ',')]
  pub include_tags: Vec<String>,

  /// Skip operations carrying one of these tags (comma-separated globs)
  #[arg(long, value_name = "TAGS", value_delimiter = ',')]
  pub exclude_tags: Vec<String>,

  /// Only operations under these paths; `/x/**` covers `/x` and its descendants
  #[arg(long, value_name = "PATHS", value_delimiter = ',')]
  pub include_paths: Vec<String>,

  /// Skip operations under these paths
  #[arg(long, value_name = "PATHS", value_delimiter = ',')]
  pub exclude_paths: Vec<String>,

  /// Only these HTTP methods
  #[arg(long, value_name = "METHODS", value_delimiter = ',')]
  pub include_methods: Vec<String>,

  /// Skip these HTTP methods
  #[arg(long, value_name = "METHODS", value_delimiter = ',')]
  pub exclude_methods: Vec<String>,

  /// Only operations whose operationId matches (comma-separated globs)
  #[arg(long, value_name = "IDS", value_delimiter = ',')]
  pub include_operation_ids: Vec<String>,

  /// Skip operations whose operationId matches (comma-separated globs)
  #[arg(long, value_name = "IDS", value_delimiter = ',')]
  pub exclude_operation_ids: Vec<String>,

  /// Skip deprecated operations
  #[arg(long, default_value_t = false)]
  pub exclude_deprecated: bool,
}

impl From<FilterArgs> for OperationFilterConfig {
  fn from(args: FilterArgs) -> Self {
    Self {
      include_tags: args.include_tags,
      exclude_tags: args.exclude_tags,
      include_paths: args.include_paths,
      exclude_paths: args.exclude_paths,
      include_methods: args.include_methods,
      exclude_methods: args.exclude_methods,
      include_operation_ids: args.include_operation_ids,
      exclude_operation_ids: args.exclude_operation_ids,
      exclude_deprecated: args.exclude_deprecated,
    }
  }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateMode {
  /// TypeScript type declarations
  Types,
  /// Zod validation schemas
  Zod,
  /// Both, written as `types.ts` and `schemas.ts` into the output directory
  All,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the operations that pass the given filters
  Operations {
    /// Path to the OpenAPI specification file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,
  },
}
