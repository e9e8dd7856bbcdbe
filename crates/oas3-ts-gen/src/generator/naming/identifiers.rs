use std::{
  collections::{BTreeSet, HashSet},
  sync::LazyLock,
};

use any_ascii::any_ascii;
use regex::Regex;

/// Ambient TypeScript type names the emitters refer to themselves.
static RESERVED_TYPE_NAMES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  ["Array", "Boolean", "Date", "Number", "Object", "Promise", "Record", "String", "Symbol"]
    .into_iter()
    .collect()
});

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

const DESCENDING_SUFFIX: &str = "Desc";
const ASCENDING_SUFFIX: &str = "Asc";

/// Converts a raw schema, operation or enum-member name into a `PascalCase` identifier.
///
/// # Rules:
/// 1. Non-ASCII characters are transliterated.
/// 2. Without delimiters, the name is kept and only its first letter is forced uppercase.
/// 3. Otherwise it is split on `.`, `_`, `-` (and any other non-alphanumeric run);
///    each segment gets an uppercase first letter and a lowercase remainder.
/// 4. A leading digit gets a `T` prefix; an empty result becomes `Unnamed`.
///
/// The output contains no delimiters, so `normalize(normalize(x)) == normalize(x)`.
pub(crate) fn normalize(name: &str) -> String {
  let ascii = any_ascii(name);

  let mut ident = if DELIMITER_RE.is_match(&ascii) {
    DELIMITER_RE
      .split(&ascii)
      .filter(|segment| !segment.is_empty())
      .map(capitalize_segment)
      .collect::<String>()
  } else {
    uppercase_first(&ascii)
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

fn capitalize_segment(segment: &str) -> String {
  let mut chars = segment.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
  }
}

fn uppercase_first(segment: &str) -> String {
  let mut chars = segment.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
  }
}

/// Normalizes an enum member value, honouring sort-direction sentinels.
///
/// A leading `-` appends `Desc`, a leading `+` appends `Asc`. The result is
/// made unique against `used` and recorded there.
pub(crate) fn normalize_enum_member(value: &str, used: &mut BTreeSet<String>) -> String {
  let base = match value.chars().next() {
    Some('-') => format!("{}{DESCENDING_SUFFIX}", normalize(&value[1..])),
    Some('+') => format!("{}{ASCENDING_SUFFIX}", normalize(&value[1..])),
    _ => normalize(value),
  };

  let unique = ensure_unique(&base, used);
  used.insert(unique.clone());
  unique
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Appends `Type` to names that would shadow a built-in the output refers to.
pub(crate) fn avoid_reserved(name: String) -> String {
  if RESERVED_TYPE_NAMES.contains(name.as_str()) {
    format!("{name}Type")
  } else {
    name
  }
}

pub(crate) fn is_identifier(name: &str) -> bool {
  IDENTIFIER_RE.is_match(name)
}
