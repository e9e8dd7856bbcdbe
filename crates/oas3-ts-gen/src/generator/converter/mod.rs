mod lowering;
mod operations;

#[cfg(test)]
mod tests;

pub(crate) use lowering::{
  FieldSource, LoweringContext, LoweringError, LoweringOutput, MAX_LOWERING_DEPTH, node_deprecated, node_description,
};
pub(crate) use operations::{OperationTypeBuilder, OperationTypes};
