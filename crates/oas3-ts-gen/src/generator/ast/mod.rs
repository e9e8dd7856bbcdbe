mod declarations;
mod types;

#[cfg(test)]
mod tests;

pub use declarations::{Declaration, DeclarationOrigin, OperationRole};
pub use types::{Field, Literal, PrimitiveKind, TypeExpr};
