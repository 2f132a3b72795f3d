//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Path {0} cannot be patched")]
  ForbiddenPatchPath(String),

  #[error("Invalid patch: {0}")]
  Patch(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
