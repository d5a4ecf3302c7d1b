use thiserror::Error;

/// A structure string that the chemistry engine could not turn into a molecule.
///
/// Recoverable at the row level: the pipeline records the failure and leaves
/// that row's descriptor columns empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse structure '{input}' at position {position}: {detail}")]
pub struct MoleculeParseError {
    pub input: String,
    pub position: usize,
    pub detail: String,
}

impl MoleculeParseError {
    pub fn new(input: impl Into<String>, position: usize, detail: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            position,
            detail: detail.into(),
        }
    }
}
