pub mod cache;
pub mod refs;
pub mod spec;
pub mod text;

pub(crate) use refs::parse_schema_ref_path;
