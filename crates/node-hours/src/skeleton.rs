//! Skeleton plan generation.

use crate::config::{AimdGroup, ExperimentConfig, ExperimentPlan, MachineConfig, MachineEntry, StrongGroup, WeakGroup};

/// Builds an illustrative plan with `n_machines` machines, each carrying
/// one example experiment of every cost model. All numeric fields are 1
/// and node sequences are `[1, 2]`, so the result is a valid input for the
/// estimator and a starting point for hand editing.
pub fn skeleton_plan(n_machines: usize) -> ExperimentPlan {
    let machines = (1..=n_machines)
        .map(|i| MachineEntry {
            machine: MachineConfig {
                name: format!("machine_{}", i),
                node_hours: true,
                node_hours_conversion_factor: 1.,
                experiments: vec![
                    ExperimentConfig {
                        title: format!("experiment_{}_single_point", i),
                        note: Some("This is a single point calculation".to_string()),
                        time_per_experiment_seconds: Some(1.),
                        number_of_runs: Some(1),
                        nodes_to_use: Some(1.),
                        ..Default::default()
                    },
                    ExperimentConfig {
                        title: format!("experiment_{}_aimd", i),
                        note: Some("This is an AIMD experiment.".to_string()),
                        number_of_runs: Some(1),
                        nodes_to_use: Some(1.),
                        aimd: Some(AimdGroup {
                            timestep_latency_seconds: 1.,
                            timestep_size_ps: 1.,
                            simulation_target_time_ps: 1.,
                        }),
                        ..Default::default()
                    },
                    ExperimentConfig {
                        title: format!("experiment_{}_strong", i),
                        note: Some("This is a strong scaling experiment.".to_string()),
                        strong: Some(StrongGroup {
                            nodes_to_use: vec![1, 2],
                            time_for_smallest_seconds: 1.,
                            efficiencies: vec![1., 1.],
                        }),
                        ..Default::default()
                    },
                    ExperimentConfig {
                        title: format!("experiment_{}_weak", i),
                        note: Some("This is a weak scaling experiment.".to_string()),
                        weak: Some(WeakGroup {
                            nodes_to_use: vec![1, 2],
                            expected_time_seconds: 1.,
                            efficiencies: vec![1., 1.],
                        }),
                        ..Default::default()
                    },
                ],
            },
        })
        .collect();

    ExperimentPlan { machines }
}
