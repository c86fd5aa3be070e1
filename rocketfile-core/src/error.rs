use thiserror::Error;

/// Violations of the component tree's structural rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Cannot add {child} to parent of type {parent}")]
    InvalidChild {
        parent: &'static str,
        child: &'static str,
    },

    #[error("Component does not belong to this rocket")]
    UnknownComponent,
}
