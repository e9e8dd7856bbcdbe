use std::{fmt, str::FromStr};

use percent_encoding::percent_decode_str;
use strum::{Display, EnumString};

const COMPONENTS_PREFIX: &str = "#/components/";

/// The `components` collection a local `$ref` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
pub enum ComponentCollection {
  #[strum(serialize = "schemas")]
  Schemas,
  #[strum(serialize = "parameters")]
  Parameters,
  #[strum(serialize = "requestBodies")]
  RequestBodies,
  #[strum(serialize = "responses")]
  Responses,
}

/// A parsed same-document component pointer, e.g. `#/components/schemas/User`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
  pub collection: ComponentCollection,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidComponentRef(pub String);

impl fmt::Display for InvalidComponentRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "not a local component reference: {}", self.0)
  }
}

impl std::error::Error for InvalidComponentRef {}

impl FromStr for ComponentRef {
  type Err = InvalidComponentRef;

  fn from_str(ref_path: &str) -> Result<Self, Self::Err> {
    let invalid = || InvalidComponentRef(ref_path.to_string());

    let rest = ref_path.strip_prefix(COMPONENTS_PREFIX).ok_or_else(invalid)?;
    let (collection, raw_name) = rest.split_once('/').ok_or_else(invalid)?;
    let collection = collection.parse::<ComponentCollection>().map_err(|_| invalid())?;

    // Nested pointers (`#/components/schemas/User/properties/id`) are not component refs.
    if raw_name.is_empty() || raw_name.contains('/') {
      return Err(invalid());
    }

    Ok(Self {
      collection,
      name: unescape_pointer_segment(raw_name),
    })
  }
}

/// Decodes percent-encoding and JSON-pointer escapes (`~1` then `~0`) in one segment.
fn unescape_pointer_segment(segment: &str) -> String {
  let decoded = percent_decode_str(segment).decode_utf8_lossy();
  decoded.replace("~1", "/").replace("~0", "~")
}

/// Extracts the component name of a `#/components/schemas/...` pointer.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  ref_path
    .parse::<ComponentRef>()
    .ok()
    .filter(|component| component.collection == ComponentCollection::Schemas)
    .map(|component| component.name)
}
