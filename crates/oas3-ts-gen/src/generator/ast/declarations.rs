use super::types::TypeExpr;

/// Which part of an operation an operation-derived declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum OperationRole {
  #[strum(to_string = "query parameters")]
  QueryParams,
  #[strum(to_string = "headers")]
  Headers,
  #[strum(to_string = "request body")]
  RequestBody,
  #[strum(to_string = "response")]
  Response,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationOrigin {
  /// A named entry of `components.schemas`, by its declared name.
  Schema { raw_name: String },
  Operation { operation: String, role: OperationRole },
}

impl DeclarationOrigin {
  pub fn is_operation(&self) -> bool {
    matches!(self, Self::Operation { .. })
  }
}

/// One top-level emitted type.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
  pub name: String,
  pub ty: TypeExpr,
  pub description: Option<String>,
  pub deprecated: bool,
  /// Member of a reference cycle; emitters that cannot forward-reference must defer it.
  pub circular: bool,
  pub origin: DeclarationOrigin,
}
