//! Experiment cost models.

use crate::config::ExperimentConfig;
use crate::error::ConfigurationError;

/// Parameters of a single-point calculation.
#[derive(Clone, Debug)]
pub struct SinglePointParams {
    pub time_per_experiment_seconds: f64,
    pub number_of_runs: u32,
    pub nodes_to_use: f64,
}

/// Parameters of an AIMD simulation campaign.
#[derive(Clone, Debug)]
pub struct AimdParams {
    pub timestep_latency_seconds: f64,
    pub timestep_size_ps: f64,
    pub simulation_target_time_ps: f64,
    pub number_of_runs: u32,
    pub nodes_to_use: f64,
}

/// Parameters of a strong-scaling study.
#[derive(Clone, Debug)]
pub struct StrongScalingParams {
    pub nodes_to_use: Vec<u32>,
    pub time_for_smallest_seconds: f64,
    pub efficiencies: Vec<f64>,
}

/// Parameters of a weak-scaling study.
#[derive(Clone, Debug)]
pub struct WeakScalingParams {
    pub nodes_to_use: Vec<u32>,
    pub expected_time_seconds: f64,
    pub efficiencies: Vec<f64>,
}

/// The cost model declared by an experiment.
///
/// An experiment declares at most one of the `aimd`, `strong` and `weak`
/// groups; declaring none of them means a single-point calculation. The
/// invariant is enforced by [`Experiment::from_config`], the only way to
/// obtain a value of this type from a plan document.
#[derive(Clone, Debug)]
pub enum CostModel {
    SinglePoint(SinglePointParams),
    Aimd(AimdParams),
    Strong(StrongScalingParams),
    Weak(WeakScalingParams),
}

/// A validated experiment with its resolved cost model.
#[derive(Clone, Debug)]
pub struct Experiment {
    pub title: String,
    pub note: Option<String>,
    pub model: CostModel,
}

impl Experiment {
    /// Builds a validated experiment from its plan record.
    ///
    /// Fails if more than one cost-model group is declared, or if the node
    /// and efficiency sequences of a scaling experiment are empty or not
    /// index-aligned. Absent optional fields fall back to their defaults.
    pub fn from_config(config: &ExperimentConfig) -> Result<Self, ConfigurationError> {
        let title = config.title.clone();

        let groups = [config.aimd.is_some(), config.strong.is_some(), config.weak.is_some()];
        if groups.iter().filter(|&&present| present).count() > 1 {
            return Err(ConfigurationError::MultipleGroups(title));
        }

        let model = if let Some(aimd) = &config.aimd {
            CostModel::Aimd(AimdParams {
                timestep_latency_seconds: aimd.timestep_latency_seconds,
                timestep_size_ps: aimd.timestep_size_ps,
                simulation_target_time_ps: aimd.simulation_target_time_ps,
                number_of_runs: config.number_of_runs.unwrap_or(0),
                nodes_to_use: config.nodes_to_use.unwrap_or(0.),
            })
        } else if let Some(strong) = &config.strong {
            check_sequences(&title, &strong.nodes_to_use, &strong.efficiencies)?;
            CostModel::Strong(StrongScalingParams {
                nodes_to_use: strong.nodes_to_use.clone(),
                time_for_smallest_seconds: strong.time_for_smallest_seconds,
                efficiencies: strong.efficiencies.clone(),
            })
        } else if let Some(weak) = &config.weak {
            check_sequences(&title, &weak.nodes_to_use, &weak.efficiencies)?;
            CostModel::Weak(WeakScalingParams {
                nodes_to_use: weak.nodes_to_use.clone(),
                expected_time_seconds: weak.expected_time_seconds,
                efficiencies: weak.efficiencies.clone(),
            })
        } else {
            CostModel::SinglePoint(SinglePointParams {
                time_per_experiment_seconds: config.time_per_experiment_seconds.unwrap_or(0.),
                number_of_runs: config.number_of_runs.unwrap_or(0),
                nodes_to_use: config.nodes_to_use.unwrap_or(0.),
            })
        };

        Ok(Self {
            title,
            note: config.note.clone(),
            model,
        })
    }
}

fn check_sequences(title: &str, nodes: &[u32], efficiencies: &[f64]) -> Result<(), ConfigurationError> {
    if nodes.is_empty() {
        return Err(ConfigurationError::EmptySequence(title.to_string()));
    }
    if nodes.len() != efficiencies.len() {
        return Err(ConfigurationError::SequenceLengthMismatch {
            title: title.to_string(),
            nodes: nodes.len(),
            efficiencies: efficiencies.len(),
        });
    }
    Ok(())
}
