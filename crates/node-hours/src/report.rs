//! Plain-text rendering of plan estimates.
//!
//! Presentation only, no calculation happens here. Callers that want
//! colored or machine-readable output can render [`PlanEstimate`]
//! themselves.

use std::fmt::{self, Write};

use itertools::Itertools;

use crate::estimate::{CostBreakdown, ExperimentEstimate, MachineEstimate, PlanEstimate, ScalingPoint};

/// Renders the full human-readable report: per-machine experiment traces,
/// machine totals and the final per-machine summary in thousands of the
/// effective unit.
pub fn render_report(estimate: &PlanEstimate) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_report(&mut out, estimate).unwrap();
    out
}

fn write_report(out: &mut impl Write, estimate: &PlanEstimate) -> fmt::Result {
    for machine in estimate.machines.iter() {
        write_machine(out, machine)?;
    }

    writeln!(out, "{}", "*".repeat(71))?;
    writeln!(out, "Per machine totals:")?;
    for (name, total) in estimate.totals.iter() {
        writeln!(out, "Machine: {}, Total k{}: {}", name, total.unit, total.total / 1000.)?;
    }
    Ok(())
}

fn write_machine(out: &mut impl Write, machine: &MachineEstimate) -> fmt::Result {
    writeln!(out, "{}", "*".repeat(79))?;
    writeln!(out)?;
    writeln!(out, "Machine: {}", machine.name)?;
    writeln!(out, "Node hours enabled: {}", machine.node_hours_enabled)?;
    if machine.conversion_factor != 1. {
        writeln!(out, "Node hours conversion factor to SUs: {}", machine.conversion_factor)?;
    }
    writeln!(out, "Number of experiments: {}", machine.experiments.len())?;
    writeln!(out)?;

    for (i, experiment) in machine.experiments.iter().enumerate() {
        writeln!(out, "{}", "-".repeat(72))?;
        writeln!(out, "Experiment {}:", i + 1)?;
        write_experiment(out, experiment)?;
    }

    writeln!(out, "{}", "-".repeat(72))?;
    writeln!(
        out,
        "Total {} for machine '{}' = {}",
        machine.unit, machine.name, machine.total
    )?;
    writeln!(out)?;
    Ok(())
}

fn write_experiment(out: &mut impl Write, experiment: &ExperimentEstimate) -> fmt::Result {
    writeln!(out, "  Title: {}", experiment.title)?;
    writeln!(out, "  Note: {}", experiment.note.as_deref().unwrap_or("No note"))?;

    match &experiment.breakdown {
        CostBreakdown::SinglePoint {
            time_per_experiment_seconds,
            number_of_runs,
            nodes_to_use,
        } => {
            writeln!(out, "  Single point calculation")?;
            writeln!(out, "    Time per experiment (seconds): {}", time_per_experiment_seconds)?;
            writeln!(out, "    Number of runs: {}", number_of_runs)?;
            writeln!(out, "    Nodes to use: {}", nodes_to_use)?;
        }
        CostBreakdown::Aimd {
            timestep_latency_seconds,
            timestep_size_ps,
            simulation_target_time_ps,
            n_timesteps,
            experiment_time_hours,
            nodes_to_use,
            number_of_runs,
            node_hours_per_run,
        } => {
            writeln!(out, "  AIMD simulation")?;
            writeln!(out, "    Timestep latency (seconds): {}", timestep_latency_seconds)?;
            writeln!(out, "    Timestep size (ps): {}", timestep_size_ps)?;
            writeln!(out, "    Number of total timesteps: {}", n_timesteps)?;
            writeln!(out, "    Simulation target time (ps): {}", simulation_target_time_ps)?;
            writeln!(out, "    Experiment time (hours): {}", experiment_time_hours)?;
            writeln!(out, "    Nodes to use: {}", nodes_to_use)?;
            writeln!(out, "    Number of runs: {}", number_of_runs)?;
            writeln!(out, "    Node hours per run: {}", node_hours_per_run)?;
        }
        CostBreakdown::Strong {
            time_for_smallest_seconds,
            points,
        } => {
            writeln!(out, "  Strong scaling")?;
            writeln!(out, "    Time for smallest (seconds): {}", time_for_smallest_seconds)?;
            write_scaling_points(out, points)?;
        }
        CostBreakdown::Weak {
            expected_time_seconds,
            points,
        } => {
            writeln!(out, "  Weak scaling")?;
            writeln!(out, "    Expected time (seconds): {}", expected_time_seconds)?;
            write_scaling_points(out, points)?;
        }
    }

    writeln!(out, "    Node hours: {}", experiment.node_hours)?;
    Ok(())
}

fn write_scaling_points(out: &mut impl Write, points: &[ScalingPoint]) -> fmt::Result {
    writeln!(out, "    Nodes to use: {}", points.iter().map(|p| p.nodes).join(", "))?;
    writeln!(
        out,
        "    Efficiencies: {}",
        points.iter().map(|p| p.efficiency).join(", ")
    )?;
    for point in points.iter() {
        writeln!(
            out,
            "    Nodes: {}, efficiency: {}, time per node: {:.2} seconds",
            point.nodes, point.efficiency, point.time_seconds
        )?;
    }
    Ok(())
}
