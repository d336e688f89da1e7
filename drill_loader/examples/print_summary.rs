use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let drill = drill_loader::load_drill_json_from_path(&args.path)?;
    let summary = drill_scheduler::summarize(&drill);

    println!("id: {}", drill.id);
    println!("name: {}", drill.name);
    println!("focus: {:?}", summary.focus);
    println!("subdivision: {}", summary.subdivision);
    println!("time_sig: {}", summary.time_sig);
    println!("duration: {}", summary.duration);
    Ok(())
}
