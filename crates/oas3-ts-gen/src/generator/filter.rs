use std::collections::BTreeMap;

use glob::{MatchOptions, Pattern};
use http::Method;
use serde::Deserialize;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{trace, warn};

use super::metrics::GenerationWarning;

/// Include/exclude rules for operations. Empty lists impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationFilterConfig {
  pub include_tags: Vec<String>,
  pub exclude_tags: Vec<String>,
  pub include_paths: Vec<String>,
  pub exclude_paths: Vec<String>,
  pub include_methods: Vec<String>,
  pub exclude_methods: Vec<String>,
  pub include_operation_ids: Vec<String>,
  pub exclude_operation_ids: Vec<String>,
  pub exclude_deprecated: bool,
}

impl OperationFilterConfig {
  pub fn is_empty(&self) -> bool {
    FilterRule::iter().all(|rule| self.patterns(rule).is_empty()) && !self.exclude_deprecated
  }

  fn patterns(&self, rule: FilterRule) -> &[String] {
    match rule {
      FilterRule::IncludeTags => &self.include_tags,
      FilterRule::ExcludeTags => &self.exclude_tags,
      FilterRule::IncludePaths => &self.include_paths,
      FilterRule::ExcludePaths => &self.exclude_paths,
      FilterRule::IncludeMethods => &self.include_methods,
      FilterRule::ExcludeMethods => &self.exclude_methods,
      FilterRule::IncludeOperationIds => &self.include_operation_ids,
      FilterRule::ExcludeOperationIds => &self.exclude_operation_ids,
      FilterRule::ExcludeDeprecated => &[],
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum FilterRule {
  IncludeTags,
  ExcludeTags,
  IncludePaths,
  ExcludePaths,
  IncludeMethods,
  ExcludeMethods,
  IncludeOperationIds,
  ExcludeOperationIds,
  ExcludeDeprecated,
}

impl FilterRule {
  pub fn is_include(self) -> bool {
    matches!(
      self,
      Self::IncludeTags | Self::IncludePaths | Self::IncludeMethods | Self::IncludeOperationIds
    )
  }
}

/// The facts about one operation the filter looks at.
#[derive(Debug, Clone, Copy)]
pub struct OperationCandidate<'a> {
  pub method: &'a Method,
  pub path: &'a str,
  pub operation_id: Option<&'a str>,
  pub tags: &'a [String],
  pub deprecated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
  Included,
  /// At least one non-empty include category had no match.
  NotIncluded,
  Excluded(FilterRule),
}

/// Counters accumulated over one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
  pub total_operations: usize,
  pub included: usize,
  pub not_included: usize,
  pub excluded_by: BTreeMap<FilterRule, usize>,
  /// How many operations each configured pattern matched, whatever the final decision.
  pub pattern_matches: BTreeMap<(FilterRule, String), usize>,
}

impl FilterStats {
  pub fn excluded(&self) -> usize {
    self.excluded_by.values().sum()
  }

  /// Configured patterns that matched no operation at all.
  pub fn vacuous_rules(&self) -> Vec<(FilterRule, &str)> {
    self
      .pattern_matches
      .iter()
      .filter(|(_, count)| **count == 0)
      .map(|((rule, pattern), _)| (*rule, pattern.as_str()))
      .collect()
  }

  pub fn vacuous_warnings(&self) -> Vec<GenerationWarning> {
    self
      .vacuous_rules()
      .into_iter()
      .map(|(rule, pattern)| GenerationWarning::VacuousFilter {
        rule: rule.to_string(),
        pattern: pattern.to_string(),
      })
      .collect()
  }
}

#[derive(Debug, Clone)]
enum Matcher {
  Glob { pattern: Pattern, options: MatchOptions },
  Literal(String),
}

impl Matcher {
  fn matches(&self, candidate: &str) -> bool {
    match self {
      Self::Glob { pattern, options } => pattern.matches_with(candidate, *options),
      Self::Literal(literal) => literal == candidate,
    }
  }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
  rule: FilterRule,
  raw: String,
  matchers: Vec<Matcher>,
}

impl CompiledPattern {
  fn matches(&self, candidate: &str) -> bool {
    self.matchers.iter().any(|matcher| matcher.matches(candidate))
  }
}

/// Decides per operation whether it is generated.
///
/// Include categories are evaluated first: each non-empty category must have a
/// matching pattern (OR within a category, AND across categories). Exclude rules
/// are evaluated second and always win.
#[derive(Debug, Clone)]
pub struct FilterEngine {
  patterns: Vec<CompiledPattern>,
  exclude_deprecated: bool,
  warnings: Vec<GenerationWarning>,
}

impl FilterEngine {
  pub fn new(config: &OperationFilterConfig) -> Self {
    let mut warnings = vec![];
    let patterns = FilterRule::iter()
      .flat_map(|rule| config.patterns(rule).iter().map(move |raw| (rule, raw)))
      .map(|(rule, raw)| compile_pattern(rule, raw, &mut warnings))
      .collect();
    warnings.dedup();

    Self {
      patterns,
      exclude_deprecated: config.exclude_deprecated,
      warnings,
    }
  }

  /// Problems met while compiling the patterns.
  pub fn warnings(&self) -> &[GenerationWarning] {
    &self.warnings
  }

  /// Seeds every configured pattern with a zero count so unmatched ones are visible.
  pub fn new_stats(&self) -> FilterStats {
    let mut stats = FilterStats::default();
    for pattern in &self.patterns {
      stats.pattern_matches.insert((pattern.rule, pattern.raw.clone()), 0);
    }
    if self.exclude_deprecated {
      stats
        .pattern_matches
        .insert((FilterRule::ExcludeDeprecated, "true".to_string()), 0);
    }
    stats
  }

  pub fn evaluate(&self, candidate: &OperationCandidate, stats: &mut FilterStats) -> FilterDecision {
    stats.total_operations += 1;

    let mut include_categories: BTreeMap<FilterRule, bool> = BTreeMap::new();
    let mut excluded_by = None;

    for pattern in &self.patterns {
      let matched = pattern_matches_candidate(pattern, candidate);
      if matched {
        *stats.pattern_matches.entry((pattern.rule, pattern.raw.clone())).or_default() += 1;
      }

      if pattern.rule.is_include() {
        *include_categories.entry(pattern.rule).or_default() |= matched;
      } else if matched && excluded_by.is_none() {
        excluded_by = Some(pattern.rule);
      }
    }

    if self.exclude_deprecated && candidate.deprecated {
      *stats
        .pattern_matches
        .entry((FilterRule::ExcludeDeprecated, "true".to_string()))
        .or_default() += 1;
      excluded_by = excluded_by.or(Some(FilterRule::ExcludeDeprecated));
    }

    let decision = match excluded_by {
      Some(rule) => {
        *stats.excluded_by.entry(rule).or_default() += 1;
        FilterDecision::Excluded(rule)
      }
      None if include_categories.values().all(|matched| *matched) => {
        stats.included += 1;
        FilterDecision::Included
      }
      None => {
        stats.not_included += 1;
        FilterDecision::NotIncluded
      }
    };

    trace!(method = %candidate.method, path = candidate.path, ?decision, "filter decision");
    decision
  }
}

fn pattern_matches_candidate(pattern: &CompiledPattern, candidate: &OperationCandidate) -> bool {
  match pattern.rule {
    FilterRule::IncludeTags | FilterRule::ExcludeTags => candidate.tags.iter().any(|tag| pattern.matches(tag)),
    FilterRule::IncludePaths | FilterRule::ExcludePaths => pattern.matches(candidate.path),
    FilterRule::IncludeMethods | FilterRule::ExcludeMethods => {
      pattern.matches(&candidate.method.as_str().to_ascii_lowercase())
    }
    FilterRule::IncludeOperationIds | FilterRule::ExcludeOperationIds => {
      candidate.operation_id.is_some_and(|id| pattern.matches(id))
    }
    FilterRule::ExcludeDeprecated => candidate.deprecated,
  }
}

fn compile_pattern(rule: FilterRule, raw: &str, warnings: &mut Vec<GenerationWarning>) -> CompiledPattern {
  let is_path = matches!(rule, FilterRule::IncludePaths | FilterRule::ExcludePaths);
  let is_method = matches!(rule, FilterRule::IncludeMethods | FilterRule::ExcludeMethods);

  let source = if is_method { raw.to_ascii_lowercase() } else { raw.to_string() };
  let options = MatchOptions {
    require_literal_separator: is_path,
    ..MatchOptions::new()
  };

  let mut sources = vec![source.clone()];
  // `/x/**` also covers `/x` itself.
  if is_path && let Some(base) = source.strip_suffix("/**") {
    sources.push(if base.is_empty() { "/".to_string() } else { base.to_string() });
  }

  let matchers = sources
    .into_iter()
    .map(|source| match Pattern::new(&source) {
      Ok(pattern) => Matcher::Glob { pattern, options },
      Err(error) => {
        warn!(%rule, pattern = raw, %error, "invalid filter pattern, matching literally");
        warnings.push(GenerationWarning::InvalidFilterPattern {
          rule: rule.to_string(),
          pattern: raw.to_string(),
          error: error.to_string(),
        });
        Matcher::Literal(source)
      }
    })
    .collect();

  CompiledPattern {
    rule,
    raw: raw.to_string(),
    matchers,
  }
}
