
use crate::{
  generator::document::Document,
  utils::spec::{SpecFormat, parse_value},
};

fn load(source: &str, format: SpecFormat) -> Document {
  let value = parse_value(source.as_bytes(), format, None).unwrap();
  Document::from_value(value, None).unwrap()
}
