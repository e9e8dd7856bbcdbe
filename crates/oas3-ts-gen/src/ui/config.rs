use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::generator::{EnumStyle, OperationFilterConfig};

/// Generator options read from `--config FILE`. Every key is optional.
///
/// ```yaml
/// enumStyle: const-object
/// stripSchemaPrefixes: ["Api.", "Legacy*"]
/// includeTags: [public]
/// excludeDeprecated: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfigFile {
  pub enum_style: Option<EnumStyle>,
  pub include_descriptions: Option<bool>,
  pub nullable_by_default: Option<bool>,
  pub prefix: Option<String>,
  pub suffix: Option<String>,
  pub strip_schema_prefixes: Vec<String>,
  pub strip_path_prefix: Option<String>,
  pub prefer_operation_id: Option<bool>,
  pub stats_header: Option<bool>,
  pub operation_types: Option<bool>,
  #[serde(flatten)]
  pub filter: OperationFilterConfig,
}

impl GeneratorConfigFile {
  pub async fn load(path: &Path) -> anyhow::Result<Self> {
    let bytes = tokio::fs::read(path)
      .await
      .with_context(|| format!("failed to read config file {}", path.display()))?;
    Self::parse(&bytes, path)
  }

  pub fn parse(bytes: &[u8], path: &Path) -> anyhow::Result<Self> {
    let is_yaml = matches!(path.extension().and_then(OsStr::to_str), Some("yaml" | "yml"));
    let parsed = if is_yaml {
      serde_yaml::from_slice(bytes).map_err(anyhow::Error::from)
    } else {
      serde_json::from_slice(bytes).map_err(anyhow::Error::from)
    };
    parsed.with_context(|| format!("invalid config file {}", path.display()))
  }
}
