//! Orchestration for the OpenAPI to TypeScript generation pipeline.
//!
//! The `Orchestrator` owns one parsed document and one configuration. Every
//! call to [`Orchestrator::compile`] builds its registries, dependency graph
//! and cycle set from scratch, so compilations never share mutable state.
//!
//! ## Usage
//!
//! ```text
//! let document = Document::from_value(value, Some(path))?;
//! let orchestrator = Orchestrator::new(document, CodegenConfig::default());
//! let output = orchestrator.generate_with_header(&TypesMode, "openapi.json")?;
//! tokio::fs::write("types.ts", output.code).await?;
//! ```

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
  sync::Arc,
};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::generator::{
  CodegenConfig,
  ast::{Declaration, DeclarationOrigin},
  codegen::{join_blocks, render_banner, render_stats_block},
  converter::{LoweringContext, OperationTypeBuilder, node_deprecated, node_description},
  cycles::CircularReferenceDetector,
  document::Document,
  errors::{ErrorContext, GeneratorError},
  metrics::GenerationStats,
  mode::GenerationMode,
  operation_registry::OperationRegistry,
  schema_registry::SchemaRegistry,
  sorter::TopologicalSorter,
};

/// High-level entry point of the compiler.
pub struct Orchestrator {
  document: Arc<Document>,
  config: CodegenConfig,
  source_path: Option<PathBuf>,
}

/// Metadata about the OpenAPI specification for the file banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMetadata {
  /// API title from OpenAPI info object
  pub title: String,
  /// API version from OpenAPI info object
  pub version: String,
  pub description: Option<String>,
}

/// Everything the emitters need, in emission order.
#[derive(Debug, Clone)]
pub struct CompiledSpec {
  pub metadata: CodeMetadata,
  /// Named schemas in dependency order, then operation-derived declarations.
  pub declarations: Vec<Declaration>,
  /// Emitted names of the schemas on a reference cycle.
  pub circular: BTreeSet<String>,
  pub stats: GenerationStats,
  pub config: CodegenConfig,
}

/// Rendered output of one mode together with the run's statistics.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
  pub code: String,
  pub stats: GenerationStats,
}

impl Orchestrator {
  pub fn new(document: impl Into<Arc<Document>>, config: CodegenConfig) -> Self {
    Self {
      document: document.into(),
      config,
      source_path: None,
    }
  }

  /// Attaches the input path to errors raised while compiling.
  #[must_use]
  pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
    self.source_path = Some(source_path.into());
    self
  }

  pub fn source_path(&self) -> Option<&Path> {
    self.source_path.as_deref()
  }

  pub fn metadata(&self) -> CodeMetadata {
    CodeMetadata {
      title: self.document.info.title.clone(),
      version: self.document.info.version.clone(),
      description: self.document.info.description.clone(),
    }
  }

  /// Runs the pipeline:
  /// 1. names every schema in `components.schemas`
  /// 2. detects reference cycles
  /// 3. lowers each schema, recording its dependencies
  /// 4. sorts the schema declarations
  /// 5. extracts operations and lowers their inline types
  ///
  /// # Errors
  ///
  /// Returns [`GeneratorError::SchemaGeneration`] naming the schema (and
  /// operation) whose lowering was abandoned.
  pub fn compile(&self) -> Result<CompiledSpec, GeneratorError> {
    let document: &Document = &self.document;
    let context = ErrorContext::for_source(self.source_path.as_deref());
    let mut stats = GenerationStats::default();
    let mut warnings = vec![];

    let registry = SchemaRegistry::new(document, &self.config, &mut warnings);
    stats.schemas_total = registry.len();

    let report = CircularReferenceDetector::detect(document);
    let emitted_name = |raw: &str| registry.type_name(raw).unwrap_or(raw).to_string();
    let circular = report
      .circular
      .iter()
      .map(|raw| emitted_name(raw.as_str()))
      .collect::<BTreeSet<_>>();
    stats.record_cycles(
      report
        .cycles
        .iter()
        .map(|cycle| cycle.iter().map(|raw| emitted_name(raw.as_str())).collect())
        .collect(),
    );
    stats.circular_schemas = circular.iter().cloned().collect();

    let mut graph = IndexMap::with_capacity(registry.len());
    let mut schema_declarations = IndexMap::with_capacity(registry.len());
    for entry in registry.entries() {
      let mut lowering = LoweringContext::new(&registry, &self.config, entry.type_name);
      let ty = lowering
        .lower(entry.node)
        .map_err(|error| GeneratorError::SchemaGeneration {
          schema_name: entry.raw_name.to_string(),
          message: error.to_string(),
          context: context.clone().with_schema(entry.raw_name),
        })?;
      let output = lowering.finish();
      warnings.extend(output.warnings);
      graph.insert(entry.type_name.to_string(), output.dependencies);

      schema_declarations.insert(
        entry.type_name.to_string(),
        Declaration {
          name: entry.type_name.to_string(),
          ty,
          description: node_description(entry.node).map(String::from),
          deprecated: node_deprecated(entry.node),
          circular: report.is_circular(entry.raw_name),
          origin: DeclarationOrigin::Schema {
            raw_name: entry.raw_name.to_string(),
          },
        },
      );
    }

    let mut declarations = TopologicalSorter::sort(&graph, &circular)
      .into_iter()
      .filter_map(|name| schema_declarations.swap_remove(&name))
      .collect::<Vec<_>>();

    let extracted = OperationRegistry::extract(document, &self.config);
    stats.operations_included = extracted.operations.len();
    stats.filter = extracted.stats;
    warnings.extend(extracted.warnings);

    if self.config.operation_types {
      let mut builder = OperationTypeBuilder::new(&registry, &self.config, &context);
      for operation in &extracted.operations {
        let types = builder.build(operation)?;
        warnings.extend(types.warnings);
        declarations.extend(types.declarations);
      }
    }

    stats.record_declarations(&declarations);
    stats.record_warnings(warnings);
    info!(
      schemas = stats.schemas_total,
      declarations = declarations.len(),
      circular = circular.len(),
      warnings = stats.warnings.len(),
      "compiled specification"
    );

    Ok(CompiledSpec {
      metadata: self.metadata(),
      declarations,
      circular,
      stats,
      config: self.config.clone(),
    })
  }

  /// Compiles and renders one mode without the file banner.
  ///
  /// # Errors
  ///
  /// Same as [`Orchestrator::compile`].
  pub fn generate(&self, mode: &dyn GenerationMode) -> Result<GeneratedOutput, GeneratorError> {
    Ok(self.compile()?.render(mode, None))
  }

  /// Compiles and renders one mode behind the auto-generated banner.
  ///
  /// # Errors
  ///
  /// Same as [`Orchestrator::compile`].
  pub fn generate_with_header(
    &self,
    mode: &dyn GenerationMode,
    source_path: &str,
  ) -> Result<GeneratedOutput, GeneratorError> {
    Ok(self.compile()?.render(mode, Some(source_path)))
  }
}

impl CompiledSpec {
  /// Renders one mode. The banner is added when `source_path` is given, the
  /// statistics comment when the configuration asks for it.
  pub fn render(&self, mode: &dyn GenerationMode, source_path: Option<&str>) -> GeneratedOutput {
    let emitted = mode.emit(self);
    let mut stats = self.stats.clone();
    stats.record_warnings(emitted.warnings);
    debug!(file = mode.file_name(), bytes = emitted.code.len(), "rendered mode");

    let banner = source_path.map(|source| render_banner(&self.metadata, source));
    let stats_block = self.config.stats_header.then(|| render_stats_block(&stats));
    let code = join_blocks(banner.into_iter().chain(stats_block).chain([emitted.code]));

    GeneratedOutput { code, stats }
  }
}
