//! Error taxonomy shared by every stage of the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong building or opening a compiled artifact.
///
/// Query paths (table lookup, translation) never return this type: a
/// lookup that finds nothing yields an empty stream, and the last error
/// observed while serving a query is recorded on the owning dictionary
/// for diagnostics instead of being propagated.
#[derive(Debug, Error)]
pub enum RimeError {
    /// The compiled artifact (table/prism/arena) does not exist on disk.
    #[error("no repository at {path}")]
    NoRepository { path: PathBuf },

    /// The artifact exists but its header, checksum, or internal offsets
    /// are inconsistent with the format this build understands.
    #[error("broken artifact at {path}: {reason}")]
    Broken { path: PathBuf, reason: String },

    /// A required record (syllable, entry, chunk) was expected during a
    /// build step but is absent from the source data.
    #[error("missing record: {0}")]
    NoRecord(String),

    /// An invariant internal to this crate was violated; this indicates a
    /// bug rather than bad input.
    #[error("internal logic error: {0}")]
    Logic(String),

    /// The underlying filesystem/OS call failed.
    #[error("system error: {0}")]
    System(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RimeError>;
