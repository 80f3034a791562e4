//! Experiment plan configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Root of the plan document.
///
/// Plans are JSON documents written by hand or seeded with the
/// `nh-skeleton` tool.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExperimentPlan {
    /// Machines with their experiments, in document order.
    #[serde(default)]
    pub machines: Vec<MachineEntry>,
}

/// Wrapper object around each machine, preserving the document shape.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MachineEntry {
    pub machine: MachineConfig,
}

/// One machine and its planned experiments.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MachineConfig {
    pub name: String,
    /// Whether the machine charges in node hours. Informational only, the
    /// estimator never consults it.
    #[serde(default)]
    pub node_hours: bool,
    /// Multiplies the machine total to produce service units when != 1.
    #[serde(default = "default_conversion_factor")]
    pub node_hours_conversion_factor: f64,
    #[serde(default)]
    pub experiments: Vec<ExperimentConfig>,
}

/// One experiment record as it appears in the document.
///
/// The cost model is implied by the presence of the `aimd`, `strong` or
/// `weak` group; with none of them the experiment is a single-point
/// calculation using the top-level fields. Absent optional fields default
/// to 0 / empty rather than failing.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_per_experiment_seconds: Option<f64>,
    /// Used by both single-point and AIMD experiments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_runs: Option<u32>,
    /// Used by both single-point and AIMD experiments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_to_use: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aimd: Option<AimdGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong: Option<StrongGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak: Option<WeakGroup>,
}

/// Ab initio molecular dynamics: cost is driven by the number of timesteps
/// times the per-timestep latency.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AimdGroup {
    #[serde(default)]
    pub timestep_latency_seconds: f64,
    #[serde(default)]
    pub timestep_size_ps: f64,
    #[serde(default)]
    pub simulation_target_time_ps: f64,
}

/// Strong scaling: fixed problem size over increasing node counts.
/// `nodes_to_use[0]` is the baseline configuration that
/// `time_for_smallest_seconds` was measured at.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StrongGroup {
    #[serde(default)]
    pub nodes_to_use: Vec<u32>,
    #[serde(default)]
    pub time_for_smallest_seconds: f64,
    /// Index-aligned with `nodes_to_use`.
    #[serde(default)]
    pub efficiencies: Vec<f64>,
}

/// Weak scaling: problem size grows with the node count, so the expected
/// runtime is constant per configuration up to the efficiency loss.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WeakGroup {
    #[serde(default)]
    pub nodes_to_use: Vec<u32>,
    #[serde(default)]
    pub expected_time_seconds: f64,
    /// Index-aligned with `nodes_to_use`.
    #[serde(default)]
    pub efficiencies: Vec<f64>,
}

fn default_conversion_factor() -> f64 {
    1.
}

impl ExperimentPlan {
    /// Loads a plan from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigurationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
