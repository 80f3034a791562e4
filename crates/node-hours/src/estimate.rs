//! Cost formulas and aggregation of estimates.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use crate::config::{ExperimentPlan, MachineConfig};
use crate::error::{ConfigurationError, InvalidParameterError, Result};
use crate::experiment::{
    AimdParams, CostModel, Experiment, SinglePointParams, StrongScalingParams, WeakScalingParams,
};

const SECONDS_PER_HOUR: f64 = 3600.;

/// Unit a machine total is charged in.
///
/// Node hours when the machine's conversion factor is 1, service units
/// otherwise.
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChargeUnit {
    NodeHours,
    ServiceUnits,
}

impl fmt::Display for ChargeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeUnit::NodeHours => write!(f, "node hours"),
            ChargeUnit::ServiceUnits => write!(f, "SUs"),
        }
    }
}

/// Result of costing one experiment, in raw node hours.
#[derive(Serialize, Clone, Debug)]
pub struct ExperimentEstimate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub node_hours: f64,
    pub breakdown: CostBreakdown,
}

/// Intermediate values behind an estimate, consumed by reporting.
#[derive(Serialize, Clone, Debug)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CostBreakdown {
    SinglePoint {
        time_per_experiment_seconds: f64,
        number_of_runs: u32,
        nodes_to_use: f64,
    },
    Aimd {
        timestep_latency_seconds: f64,
        timestep_size_ps: f64,
        simulation_target_time_ps: f64,
        n_timesteps: f64,
        experiment_time_hours: f64,
        nodes_to_use: f64,
        number_of_runs: u32,
        node_hours_per_run: f64,
    },
    Strong {
        time_for_smallest_seconds: f64,
        points: Vec<ScalingPoint>,
    },
    Weak {
        expected_time_seconds: f64,
        points: Vec<ScalingPoint>,
    },
}

/// One node configuration of a scaling experiment.
#[derive(Serialize, Clone, Debug)]
pub struct ScalingPoint {
    pub nodes: u32,
    pub efficiency: f64,
    /// Projected runtime at this node count.
    pub time_seconds: f64,
}

/// Per-model subtotals of a machine, in raw node hours.
#[derive(Serialize, Clone, Copy, Debug, Default)]
pub struct GroupTotals {
    pub single_point: f64,
    pub aimd: f64,
    pub strong: f64,
    pub weak: f64,
}

impl GroupTotals {
    pub fn combined(&self) -> f64 {
        self.single_point + self.aimd + self.strong + self.weak
    }
}

/// Aggregated estimate for one machine.
#[derive(Serialize, Clone, Debug)]
pub struct MachineEstimate {
    pub name: String,
    /// The machine's `node_hours` flag, carried through for reporting.
    pub node_hours_enabled: bool,
    pub conversion_factor: f64,
    pub experiments: Vec<ExperimentEstimate>,
    pub group_totals: GroupTotals,
    /// Combined total before unit conversion.
    pub total_node_hours: f64,
    /// Combined total after applying the conversion factor.
    pub total: f64,
    pub unit: ChargeUnit,
}

/// Final total of one machine as it appears in the plan summary.
#[derive(Serialize, Clone, Debug)]
pub struct MachineTotal {
    pub total: f64,
    pub unit: ChargeUnit,
}

/// Aggregated estimate for a whole plan.
#[derive(Serialize, Clone, Debug)]
pub struct PlanEstimate {
    pub machines: Vec<MachineEstimate>,
    /// Machine name -> final total. A repeated machine name overwrites the
    /// earlier entry, last value wins.
    pub totals: IndexMap<String, MachineTotal>,
}

impl Experiment {
    /// Computes this experiment's estimate.
    pub fn estimate(&self) -> Result<ExperimentEstimate> {
        let (node_hours, breakdown) = match &self.model {
            CostModel::SinglePoint(params) => single_point_cost(params),
            CostModel::Aimd(params) => aimd_cost(&self.title, params)?,
            CostModel::Strong(params) => strong_scaling_cost(&self.title, params)?,
            CostModel::Weak(params) => weak_scaling_cost(&self.title, params)?,
        };
        Ok(ExperimentEstimate {
            title: self.title.clone(),
            note: self.note.clone(),
            node_hours,
            breakdown,
        })
    }
}

fn single_point_cost(params: &SinglePointParams) -> (f64, CostBreakdown) {
    let node_hours = (params.time_per_experiment_seconds / SECONDS_PER_HOUR)
        * params.number_of_runs as f64
        * params.nodes_to_use;
    let breakdown = CostBreakdown::SinglePoint {
        time_per_experiment_seconds: params.time_per_experiment_seconds,
        number_of_runs: params.number_of_runs,
        nodes_to_use: params.nodes_to_use,
    };
    (node_hours, breakdown)
}

fn aimd_cost(title: &str, params: &AimdParams) -> Result<(f64, CostBreakdown)> {
    if params.timestep_size_ps == 0. {
        return Err(InvalidParameterError::ZeroTimestepSize(title.to_string()).into());
    }
    let n_timesteps = params.simulation_target_time_ps / params.timestep_size_ps;
    let experiment_time_hours = n_timesteps * params.timestep_latency_seconds / SECONDS_PER_HOUR;
    let node_hours_per_run = experiment_time_hours * params.nodes_to_use;
    let node_hours = node_hours_per_run * params.number_of_runs as f64;
    let breakdown = CostBreakdown::Aimd {
        timestep_latency_seconds: params.timestep_latency_seconds,
        timestep_size_ps: params.timestep_size_ps,
        simulation_target_time_ps: params.simulation_target_time_ps,
        n_timesteps,
        experiment_time_hours,
        nodes_to_use: params.nodes_to_use,
        number_of_runs: params.number_of_runs,
        node_hours_per_run,
    };
    Ok((node_hours, breakdown))
}

fn strong_scaling_cost(title: &str, params: &StrongScalingParams) -> Result<(f64, CostBreakdown)> {
    // Sequence alignment is checked by the experiment factory.
    let baseline = params.nodes_to_use[0] as f64;
    let mut node_hours = 0.;
    let mut points = Vec::with_capacity(params.nodes_to_use.len());
    for (i, (&nodes, &efficiency)) in params.nodes_to_use.iter().zip(params.efficiencies.iter()).enumerate() {
        if efficiency == 0. {
            return Err(InvalidParameterError::ZeroEfficiency {
                title: title.to_string(),
                index: i,
            }
            .into());
        }
        let time_seconds = (params.time_for_smallest_seconds / efficiency) * (baseline / nodes as f64);
        node_hours += (time_seconds / SECONDS_PER_HOUR) * nodes as f64;
        points.push(ScalingPoint {
            nodes,
            efficiency,
            time_seconds,
        });
    }
    let breakdown = CostBreakdown::Strong {
        time_for_smallest_seconds: params.time_for_smallest_seconds,
        points,
    };
    Ok((node_hours, breakdown))
}

fn weak_scaling_cost(title: &str, params: &WeakScalingParams) -> Result<(f64, CostBreakdown)> {
    let mut node_hours = 0.;
    let mut points = Vec::with_capacity(params.nodes_to_use.len());
    for (i, (&nodes, &efficiency)) in params.nodes_to_use.iter().zip(params.efficiencies.iter()).enumerate() {
        if efficiency == 0. {
            return Err(InvalidParameterError::ZeroEfficiency {
                title: title.to_string(),
                index: i,
            }
            .into());
        }
        let time_seconds = params.expected_time_seconds / efficiency;
        node_hours += (time_seconds / SECONDS_PER_HOUR) * nodes as f64;
        points.push(ScalingPoint {
            nodes,
            efficiency,
            time_seconds,
        });
    }
    let breakdown = CostBreakdown::Weak {
        expected_time_seconds: params.expected_time_seconds,
        points,
    };
    Ok((node_hours, breakdown))
}

/// Costs every experiment of a machine and aggregates the totals.
///
/// Per-experiment values and per-model subtotals stay in raw node hours;
/// the conversion factor applies to the combined machine total only.
pub fn estimate_machine(machine: &MachineConfig) -> Result<MachineEstimate> {
    let mut group_totals = GroupTotals::default();
    let mut experiments = Vec::with_capacity(machine.experiments.len());

    for config in machine.experiments.iter() {
        let experiment = Experiment::from_config(config)?;
        let estimate = experiment.estimate()?;
        debug!(
            "machine '{}', experiment '{}': {} node hours",
            machine.name, estimate.title, estimate.node_hours
        );
        match experiment.model {
            CostModel::SinglePoint(_) => group_totals.single_point += estimate.node_hours,
            CostModel::Aimd(_) => group_totals.aimd += estimate.node_hours,
            CostModel::Strong(_) => group_totals.strong += estimate.node_hours,
            CostModel::Weak(_) => group_totals.weak += estimate.node_hours,
        }
        experiments.push(estimate);
    }

    let total_node_hours = group_totals.combined();
    let (total, unit) = if machine.node_hours_conversion_factor != 1. {
        (
            total_node_hours * machine.node_hours_conversion_factor,
            ChargeUnit::ServiceUnits,
        )
    } else {
        (total_node_hours, ChargeUnit::NodeHours)
    };

    Ok(MachineEstimate {
        name: machine.name.clone(),
        node_hours_enabled: machine.node_hours,
        conversion_factor: machine.node_hours_conversion_factor,
        experiments,
        group_totals,
        total_node_hours,
        total,
        unit,
    })
}

/// Estimates every machine of a plan in document order.
///
/// Fails fast on the first invalid machine or experiment; no partial
/// totals are produced.
pub fn estimate_plan(plan: &ExperimentPlan) -> Result<PlanEstimate> {
    if plan.machines.is_empty() {
        return Err(ConfigurationError::NoMachines.into());
    }

    let mut machines = Vec::with_capacity(plan.machines.len());
    let mut totals = IndexMap::new();
    for entry in plan.machines.iter() {
        let machine = estimate_machine(&entry.machine)?;
        if totals.contains_key(&machine.name) {
            warn!(
                "duplicate machine name '{}', previous total is overwritten",
                machine.name
            );
        }
        totals.insert(
            machine.name.clone(),
            MachineTotal {
                total: machine.total,
                unit: machine.unit,
            },
        );
        machines.push(machine);
    }

    Ok(PlanEstimate { machines, totals })
}
