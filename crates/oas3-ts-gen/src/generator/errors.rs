use std::{
  fmt,
  path::{Path, PathBuf},
};

use strum::Display;
use thiserror::Error;

/// Where an error happened, without any presentation applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
  pub source_path: Option<PathBuf>,
  pub schema_name: Option<String>,
  pub operation: Option<String>,
}

impl ErrorContext {
  pub fn for_source(source_path: Option<&Path>) -> Self {
    Self {
      source_path: source_path.map(Path::to_path_buf),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn with_schema(mut self, schema_name: impl Into<String>) -> Self {
    self.schema_name = Some(schema_name.into());
    self
  }

  #[must_use]
  pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
    self.operation = Some(operation.into());
    self
  }
}

impl fmt::Display for ErrorContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(path) = &self.source_path {
      write!(f, " in {}", path.display())?;
    }
    if let Some(operation) = &self.operation {
      write!(f, " (operation {operation})")?;
    }
    Ok(())
  }
}

/// Why a document was rejected before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
  #[error("input is empty")]
  EmptyDocument,
  #[error("input could not be parsed {0}")]
  Unparseable(String),
  #[error("document root must be a mapping, found {0}")]
  NotAnObject(&'static str),
  #[error("missing `openapi` version field")]
  MissingVersion,
  #[error("unsupported OpenAPI version `{0}`, expected 3.x")]
  UnsupportedVersion(String),
  #[error("missing `components.schemas`")]
  MissingSchemas,
  #[error("`components.schemas` must be a non-empty mapping")]
  EmptySchemas,
  #[error("`paths` must be a mapping, found {0}")]
  InvalidPaths(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
  Validation,
  SchemaGeneration,
  Io,
}

#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("invalid OpenAPI document{context}: {reason}")]
  Validation {
    reason: ValidationFailure,
    context: ErrorContext,
  },
  #[error("failed to generate schema '{schema_name}'{context}: {message}")]
  SchemaGeneration {
    schema_name: String,
    message: String,
    context: ErrorContext,
  },
  #[error("failed to read '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl GeneratorError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation { .. } => ErrorKind::Validation,
      Self::SchemaGeneration { .. } => ErrorKind::SchemaGeneration,
      Self::Io { .. } => ErrorKind::Io,
    }
  }

  pub fn context(&self) -> Option<&ErrorContext> {
    match self {
      Self::Validation { context, .. } | Self::SchemaGeneration { context, .. } => Some(context),
      Self::Io { .. } => None,
    }
  }

  pub(crate) fn validation(reason: ValidationFailure, context: &ErrorContext) -> Self {
    Self::Validation {
      reason,
      context: context.clone(),
    }
  }
}
