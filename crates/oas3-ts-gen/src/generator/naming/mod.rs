pub mod affixes;
pub mod identifiers;
pub mod operations;
