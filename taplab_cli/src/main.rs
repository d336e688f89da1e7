mod replay;

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use taplab_core::analytics::analyze_session;
use taplab_core::config::TrainerConfig;
use taplab_core::session::recorder::ResolvedTap;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "taplab")]
#[command(about = "Rhythm timing trainer CLI", long_about = None)]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Trainer config (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a drill's summary and expected timeline.
    Schedule {
        input: PathBuf,
        /// Session start on the clock, in ms.
        #[arg(long, default_value_t = 0.0)]
        start: f64,
    },
    /// Print analytics for a recorded tap log as JSON.
    Analyze { input: PathBuf },
    /// Run a scripted tap sequence (`<ms> <key>` per line) against a drill.
    Replay {
        drill: PathBuf,
        script: PathBuf,
        #[arg(long, default_value = "local")]
        user: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => TrainerConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => TrainerConfig::default(),
    };

    match cli.command {
        Command::Schedule { input, start } => {
            let drill = drill_loader::load_drill_json_from_path(&input)?;
            print_schedule(&drill, start)
                .with_context(|| format!("schedule failed: {}", input.display()))?;
        }
        Command::Analyze { input } => {
            let json = fs::read_to_string(&input)
                .with_context(|| format!("failed to read tap log: {}", input.display()))?;
            let taps: Vec<ResolvedTap> = serde_json::from_str(&json)
                .with_context(|| format!("failed to parse tap log: {}", input.display()))?;
            let analytics = analyze_session(&taps, &config.analytics)
                .with_context(|| format!("tap log is empty: {}", input.display()))?;
            let json = serde_json::to_string_pretty(&analytics).context("failed to serialize analytics")?;
            println!("{json}");
        }
        Command::Replay { drill, script, user } => {
            let parsed = drill_loader::load_drill_json_from_path(&drill)?;
            let text = fs::read_to_string(&script)
                .with_context(|| format!("failed to read script: {}", script.display()))?;
            let taps = replay::parse_script(&text)
                .with_context(|| format!("invalid script: {}", script.display()))?;
            replay::run_replay(&parsed, &taps, &config, &user)?;
        }
    }

    Ok(())
}

fn print_schedule(drill: &drill_schema::Drill, start: f64) -> anyhow::Result<()> {
    let schedule = drill_scheduler::schedule(drill, start);
    if let Some(fatal) = schedule.issues.iter().find(|i| i.is_fatal_for_schedule()) {
        return Err(anyhow::Error::new(fatal.clone()));
    }
    for issue in &schedule.issues {
        eprintln!("warning: {issue}");
    }

    let summary = drill_scheduler::summarize(drill);
    println!("{} ({})", drill.name, drill.id);
    println!(
        "{} BPM | OD {} | {} | {} | {:?} | {}",
        summary.bpm, summary.od, summary.time_sig, summary.subdivision, summary.focus, summary.duration
    );
    println!();
    println!("   # |  Time(ms) | Bar | Pos | Channel");
    println!("-----|-----------|-----|-----|--------");
    for instant in &schedule.instants {
        println!(
            "{:4} | {:9.1} | {:3} | {:3} | {}",
            instant.index,
            instant.time_ms,
            instant.bar_index,
            instant.position,
            instant.channel.map_or("any", |c| c.as_str())
        );
    }
    println!("{} notes", schedule.len());
    if let (Some(first), Some(last)) = (schedule.first_time_ms(), schedule.last_time_ms()) {
        println!("span: {first:.1} - {last:.1} ms");
    }
    if let Some(time_map) = schedule.time_map {
        println!("length: {:.1} ms", time_map.total_ms(drill.duration_bars));
    }
    Ok(())
}
