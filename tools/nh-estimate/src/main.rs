use std::io::Write;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use node_hours::config::ExperimentPlan;
use node_hours::estimate::estimate_plan;
use node_hours::report::render_report;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Estimates node hours for an experiment plan
struct Args {
    /// Path to JSON file with the experiment plan
    #[arg(short, long)]
    config: PathBuf,

    /// Path to produced JSON file with the computed estimates
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let plan = ExperimentPlan::from_file(&args.config).unwrap_or_else(|err| {
        eprintln!("{err}");
        exit(1);
    });
    let estimate = estimate_plan(&plan).unwrap_or_else(|err| {
        eprintln!("{err}");
        exit(1);
    });

    print!("{}", render_report(&estimate));

    if let Some(output) = args.output {
        std::fs::File::create(output)?.write_all(serde_json::to_string_pretty(&estimate).unwrap().as_bytes())?;
    }
    Ok(())
}
