use node_hours::config::ExperimentPlan;
use node_hours::error::{ConfigurationError, Error};
use node_hours::estimate::{estimate_plan, ChargeUnit};
use node_hours::report::render_report;
use node_hours::skeleton::skeleton_plan;

const EPS: f64 = 1e-12;

fn assert_float_eq(x: f64, y: f64) {
    assert!((x - y).abs() < EPS, "values do not match: {:.15} vs {:.15}", x, y);
}

fn parse(json: &str) -> ExperimentPlan {
    serde_json::from_str(json).unwrap()
}

const PLAN: &str = r#"
{
    "machines": [
        {
            "machine": {
                "name": "cluster-a",
                "node_hours": true,
                "experiments": [
                    {
                        "title": "baseline",
                        "note": "reference single-point runs",
                        "time_per_experiment_seconds": 3600,
                        "number_of_runs": 2,
                        "nodes_to_use": 4
                    },
                    {
                        "title": "md-campaign",
                        "number_of_runs": 3,
                        "nodes_to_use": 4,
                        "aimd": {
                            "timestep_latency_seconds": 2,
                            "timestep_size_ps": 0.5,
                            "simulation_target_time_ps": 10
                        }
                    }
                ]
            }
        },
        {
            "machine": {
                "name": "cluster-b",
                "node_hours": true,
                "node_hours_conversion_factor": 2,
                "experiments": [
                    {
                        "title": "scaling-study",
                        "strong": {
                            "nodes_to_use": [1, 2],
                            "time_for_smallest_seconds": 3600,
                            "efficiencies": [1, 1]
                        }
                    }
                ]
            }
        }
    ]
}
"#;

#[test]
fn estimates_full_plan() {
    let plan = parse(PLAN);
    let estimate = estimate_plan(&plan).unwrap();

    assert_eq!(estimate.machines.len(), 2);

    // cluster-a: 8 node hours single-point + (40 s / 3600) * 4 nodes * 3 runs AIMD.
    let a = &estimate.machines[0];
    assert_float_eq(a.group_totals.single_point, 8.);
    assert_float_eq(a.group_totals.aimd, (40. / 3600.) * 4. * 3.);
    assert_float_eq(a.total, a.total_node_hours);
    assert_eq!(a.unit, ChargeUnit::NodeHours);

    // cluster-b: 2 raw node hours doubled into service units.
    let b = &estimate.machines[1];
    assert_float_eq(b.total_node_hours, 2.);
    assert_float_eq(b.total, 4.);
    assert_eq!(b.unit, ChargeUnit::ServiceUnits);

    let names: Vec<_> = estimate.totals.keys().cloned().collect();
    assert_eq!(names, vec!["cluster-a", "cluster-b"]);
    assert_float_eq(estimate.totals["cluster-b"].total, 4.);
    assert_eq!(estimate.totals["cluster-b"].unit, ChargeUnit::ServiceUnits);
}

#[test]
fn report_shows_totals_and_units() {
    let estimate = estimate_plan(&parse(PLAN)).unwrap();
    let report = render_report(&estimate);

    assert!(report.contains("Machine: cluster-a"));
    assert!(report.contains("Note: reference single-point runs"));
    assert!(report.contains("Node hours conversion factor to SUs: 2"));
    assert!(report.contains("Nodes: 2, efficiency: 1, time per node: 1800.00 seconds"));
    assert!(report.contains("Total SUs for machine 'cluster-b' = 4"));
    assert!(report.contains("Per machine totals:"));
    // Final summary is reported in thousands of the effective unit.
    assert!(report.contains("Machine: cluster-b, Total kSUs: 0.004"));
}

#[test]
fn estimation_is_idempotent() {
    let plan = parse(PLAN);
    let first = estimate_plan(&plan).unwrap();
    let second = estimate_plan(&plan).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn duplicate_machine_names_keep_last_total() {
    let plan = parse(
        r#"
        {
            "machines": [
                {
                    "machine": {
                        "name": "twin",
                        "experiments": [
                            { "title": "one", "time_per_experiment_seconds": 3600, "number_of_runs": 1, "nodes_to_use": 1 }
                        ]
                    }
                },
                {
                    "machine": {
                        "name": "twin",
                        "experiments": [
                            { "title": "two", "time_per_experiment_seconds": 3600, "number_of_runs": 5, "nodes_to_use": 1 }
                        ]
                    }
                }
            ]
        }
        "#,
    );
    let estimate = estimate_plan(&plan).unwrap();
    // Both machines are estimated, the summary keeps the later total.
    assert_eq!(estimate.machines.len(), 2);
    assert_eq!(estimate.totals.len(), 1);
    assert_float_eq(estimate.totals["twin"].total, 5.);
}

#[test]
fn plan_without_machines_is_rejected() {
    for json in [r#"{ "machines": [] }"#, "{}"] {
        let plan = parse(json);
        assert!(matches!(
            estimate_plan(&plan),
            Err(Error::Configuration(ConfigurationError::NoMachines))
        ));
    }
}

#[test]
fn absent_fields_fall_back_to_defaults() {
    let plan = parse(
        r#"
        {
            "machines": [
                { "machine": { "name": "minimal", "experiments": [ { "title": "empty" } ] } }
            ]
        }
        "#,
    );
    let estimate = estimate_plan(&plan).unwrap();
    let machine = &estimate.machines[0];
    assert!(!machine.node_hours_enabled);
    assert_float_eq(machine.conversion_factor, 1.);
    assert_eq!(machine.unit, ChargeUnit::NodeHours);
    assert_float_eq(machine.experiments[0].node_hours, 0.);
    assert_float_eq(machine.total, 0.);
}

#[test]
fn skeleton_plan_is_estimable() {
    let plan = skeleton_plan(3);
    assert_eq!(plan.machines.len(), 3);
    for (i, entry) in plan.machines.iter().enumerate() {
        assert_eq!(entry.machine.name, format!("machine_{}", i + 1));
        assert_eq!(entry.machine.experiments.len(), 4);
    }

    let estimate = estimate_plan(&plan).unwrap();
    for machine in estimate.machines.iter() {
        // 1/3600 single-point + 1/3600 AIMD + 2/3600 strong + 3/3600 weak.
        assert_float_eq(machine.total, 7. / 3600.);
    }
}

#[test]
fn skeleton_plan_round_trips_through_json() {
    let plan = skeleton_plan(2);
    let json = serde_json::to_string_pretty(&plan).unwrap();

    // Example experiments only carry the keys of their own cost model.
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let single_point = &value["machines"][0]["machine"]["experiments"][0];
    assert_eq!(single_point["title"], "experiment_1_single_point");
    assert!(single_point.get("aimd").is_none());
    assert!(single_point.get("strong").is_none());
    assert!(single_point.get("weak").is_none());

    let reparsed: ExperimentPlan = serde_json::from_str(&json).unwrap();
    let estimate = estimate_plan(&reparsed).unwrap();
    assert_float_eq(estimate.machines[0].total, 7. / 3600.);
}

#[test]
fn loads_plan_from_file() {
    let path = std::env::temp_dir().join(format!("node-hours-plan-{}.json", std::process::id()));
    std::fs::write(&path, PLAN).unwrap();
    let plan = ExperimentPlan::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let estimate = estimate_plan(&plan).unwrap();
    assert_float_eq(estimate.totals["cluster-b"].total, 4.);
}

#[test]
fn missing_plan_file_is_reported() {
    let missing = std::env::temp_dir().join("node-hours-definitely-missing.json");
    assert!(matches!(
        ExperimentPlan::from_file(&missing),
        Err(ConfigurationError::Io { .. })
    ));
}
