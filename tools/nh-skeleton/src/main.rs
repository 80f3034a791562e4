use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use node_hours::skeleton::skeleton_plan;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Writes a skeleton experiment plan to fill in by hand
struct Args {
    /// Number of machines in the generated plan
    #[arg(short, long)]
    machines: usize,

    /// Path to produced JSON file
    #[arg(short, long, default_value = "experiment_skeleton.json")]
    output: PathBuf,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let plan = skeleton_plan(args.machines);
    std::fs::File::create(&args.output)?.write_all(serde_json::to_string_pretty(&plan).unwrap().as_bytes())?;
    println!("Skeleton plan created: {}", args.output.display());
    Ok(())
}
