//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// A structurally invalid experiment plan.
///
/// Any of these aborts the whole estimation: totals computed from a broken
/// plan would be meaningless.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// More than one of the `aimd`, `strong` and `weak` groups is declared
    /// on a single experiment.
    #[error("experiment '{0}' contains multiple groups ('aimd', 'strong', 'weak'), only one is allowed")]
    MultipleGroups(String),

    /// `nodes_to_use` and `efficiencies` of a scaling experiment are not
    /// index-aligned.
    #[error("experiment '{title}': nodes_to_use and efficiencies must have the same length ({nodes} vs {efficiencies})")]
    SequenceLengthMismatch {
        title: String,
        nodes: usize,
        efficiencies: usize,
    },

    /// A scaling experiment with no node configurations at all.
    #[error("experiment '{0}': nodes_to_use must not be empty")]
    EmptySequence(String),

    /// The plan has no machines.
    #[error("no machines found in the plan")]
    NoMachines,

    #[error("can't read plan from file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse JSON from file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A numerically undefined operation.
///
/// Raised instead of silently propagating infinity or NaN into the totals.
#[derive(Debug, Error)]
pub enum InvalidParameterError {
    /// AIMD timestep size is used as a divisor when deriving the number of
    /// timesteps.
    #[error("experiment '{0}': timestep_size_ps is zero")]
    ZeroTimestepSize(String),

    /// Scaling efficiency is used as a divisor when deriving the per-node
    /// runtime.
    #[error("experiment '{title}': efficiency at index {index} is zero")]
    ZeroEfficiency { title: String, index: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),
}

pub type Result<T> = std::result::Result<T, Error>;
