use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
  sync::Arc,
};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::cache::{CacheKey, SpecCache};
use crate::generator::{
  document::Document,
  errors::{ErrorContext, GeneratorError, ValidationFailure},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
  /// No recognised extension: JSON first, YAML if that fails.
  Detect,
}

impl SpecFormat {
  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(OsStr::to_str) {
      Some("yaml" | "yml") => Self::Yaml,
      Some(_) => Self::Json,
      None => Self::Detect,
    }
  }
}

pub struct SpecLoader {
  path: PathBuf,
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> Result<Self, GeneratorError> {
    let file = AsyncMmapFile::open(path).await.map_err(|error| GeneratorError::Io {
      path: path.to_path_buf(),
      source: std::io::Error::other(error.to_string()),
    })?;

    Ok(Self {
      path: path.to_path_buf(),
      file,
      format: SpecFormat::from_path(path),
    })
  }

  /// Reads, validates and parses `path`, reusing the global cache when the
  /// file is unchanged.
  pub async fn load(path: &Path) -> Result<Arc<Document>, GeneratorError> {
    Self::load_with(path, SpecCache::global()).await
  }

  pub async fn load_with(path: &Path, cache: &SpecCache) -> Result<Arc<Document>, GeneratorError> {
    let loader = Self::open(path).await?;
    let modified = tokio::fs::metadata(path)
      .await
      .and_then(|metadata| metadata.modified())
      .ok();
    let key = CacheKey::new(path, modified, loader.bytes());

    if let Some(document) = cache.get(&key) {
      return Ok(document);
    }

    let document = Arc::new(loader.parse()?);
    cache.set(key, Arc::clone(&document));
    Ok(document)
  }

  pub fn bytes(&self) -> &[u8] {
    self.file.as_slice()
  }

  pub fn parse(&self) -> Result<Document, GeneratorError> {
    let value = parse_value(self.bytes(), self.format, Some(&self.path))?;
    let document = Document::from_value(value, Some(&self.path))?;
    debug!(
      path = %self.path.display(),
      format = ?self.format,
      openapi_31 = document.is_openapi_31(),
      "parsed specification"
    );
    Ok(document)
  }
}

/// Turns raw text into an untyped document without interpreting it.
pub fn parse_value(bytes: &[u8], format: SpecFormat, source_path: Option<&Path>) -> Result<Value, GeneratorError> {
  let context = ErrorContext::for_source(source_path);
  let fail = |reason| GeneratorError::validation(reason, &context);

  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Err(fail(ValidationFailure::EmptyDocument));
  }

  match format {
    SpecFormat::Json => parse_json(bytes).map_err(fail),
    SpecFormat::Yaml => parse_yaml(bytes).map_err(fail),
    SpecFormat::Detect => parse_json(bytes).or_else(|_| parse_yaml(bytes)).map_err(fail),
  }
}

fn parse_json(bytes: &[u8]) -> Result<Value, ValidationFailure> {
  serde_json::from_slice(bytes).map_err(|error| ValidationFailure::Unparseable(format!("as JSON: {error}")))
}

fn parse_yaml(bytes: &[u8]) -> Result<Value, ValidationFailure> {
  let yaml = serde_yaml::from_slice::<serde_yaml::Value>(bytes)
    .map_err(|error| ValidationFailure::Unparseable(format!("as YAML: {error}")))?;
  Ok(yaml_to_json(yaml))
}

/// YAML allows non-string keys (`200:` under `responses`); they become their text.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
  match value {
    serde_yaml::Value::Null => Value::Null,
    serde_yaml::Value::Bool(flag) => Value::Bool(flag),
    serde_yaml::Value::Number(number) => yaml_number(&number),
    serde_yaml::Value::String(text) => Value::String(text),
    serde_yaml::Value::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
    serde_yaml::Value::Mapping(mapping) => Value::Object(
      mapping
        .into_iter()
        .map(|(key, value)| (yaml_key(key), yaml_to_json(value)))
        .collect::<Map<_, _>>(),
    ),
    serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
  }
}

fn yaml_number(number: &serde_yaml::Number) -> Value {
  if let Some(int) = number.as_i64() {
    Value::Number(int.into())
  } else if let Some(uint) = number.as_u64() {
    Value::Number(uint.into())
  } else {
    number
      .as_f64()
      .and_then(Number::from_f64)
      .map_or(Value::Null, Value::Number)
  }
}

fn yaml_key(key: serde_yaml::Value) -> String {
  match key {
    serde_yaml::Value::String(text) => text,
    serde_yaml::Value::Null => "null".to_string(),
    serde_yaml::Value::Bool(flag) => flag.to_string(),
    serde_yaml::Value::Number(number) => number.to_string(),
    serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
    other @ (serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_)) => {
      serde_json::to_string(&yaml_to_json(other)).unwrap_or_default()
    }
  }
}
