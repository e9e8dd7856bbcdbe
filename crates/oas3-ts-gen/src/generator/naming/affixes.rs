use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

const GLOB_META: [char; 4] = ['*', '?', '[', ']'];

/// Prefix and suffix added to every emitted type name after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAffixes {
  #[serde(default)]
  pub prefix: String,
  #[serde(default)]
  pub suffix: String,
}

impl NameAffixes {
  pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
    Self {
      prefix: prefix.into(),
      suffix: suffix.into(),
    }
  }

  pub fn decorate(&self, name: &str) -> String {
    format!("{}{name}{}", self.prefix, self.suffix)
  }

  pub fn is_empty(&self) -> bool {
    self.prefix.is_empty() && self.suffix.is_empty()
  }
}

/// A prefix to strip, given either literally or as a shell glob.
#[derive(Debug, Clone)]
pub enum PrefixPattern {
  Literal(String),
  Glob { pattern: Pattern, options: MatchOptions },
}

impl PrefixPattern {
  /// Builds a pattern for schema names, where `*` may span any character.
  pub fn for_names(raw: &str) -> Self {
    Self::compile(raw, MatchOptions::new())
  }

  /// Builds a pattern for URL paths, where `*` stops at `/`.
  pub fn for_paths(raw: &str) -> Self {
    Self::compile(
      raw,
      MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
      },
    )
  }

  fn compile(raw: &str, options: MatchOptions) -> Self {
    if !raw.contains(GLOB_META) {
      return Self::Literal(raw.to_string());
    }
    match Pattern::new(raw) {
      Ok(pattern) => Self::Glob { pattern, options },
      Err(error) => {
        tracing::warn!(pattern = raw, %error, "invalid prefix glob, matching literally");
        Self::Literal(raw.to_string())
      }
    }
  }

  /// Strips the longest matching prefix. A match that would leave nothing is ignored.
  pub fn strip<'a>(&self, input: &'a str) -> Option<&'a str> {
    let rest = match self {
      Self::Literal(prefix) => input.strip_prefix(prefix.as_str())?,
      Self::Glob { pattern, options } => input
        .char_indices()
        .map(|(index, c)| index + c.len_utf8())
        .rev()
        .find(|&end| pattern.matches_with(&input[..end], *options))
        .map(|end| &input[end..])?,
    };
    (!rest.is_empty()).then_some(rest)
  }
}

/// Applies the first pattern in `patterns` that strips anything from `input`.
pub(crate) fn strip_first_prefix<'a>(patterns: &[PrefixPattern], input: &'a str) -> &'a str {
  patterns
    .iter()
    .find_map(|pattern| pattern.strip(input))
    .unwrap_or(input)
}
