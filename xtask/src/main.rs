use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development tasks for tile-scroll")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Format check, clippy and the full test suite
    Check,
    /// Run tests, optionally for one area only
    Test {
        /// Area to test
        #[arg(value_enum)]
        area: Option<Area>,
    },
    /// Run the criterion benchmarks
    Bench,
    /// Generate demo assets if missing and run the headless scroll demo
    Demo {
        /// Number of frames to run
        #[arg(short = 'n', long, default_value = "600")]
        frames: u64,
        #[arg(long)]
        release: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Area {
    /// Scroll buffer, controller and scheduler
    Scroller,
    /// Dispatcher, cancel listener and device mapping
    Input,
    /// Screen, palette and display modes
    Display,
    /// Session and asset integration tests
    Session,
}

impl Area {
    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            Area::Scroller => &["--lib", "scroller"],
            Area::Input => &["--lib", "input"],
            Area::Display => &["--lib", "display"],
            Area::Session => &["--test", "scroll_session", "--test", "asset_loading"],
        }
    }
}

fn main() -> Result<()> {
    let started = Instant::now();
    match Cli::parse().command {
        Task::Check => {
            step("fmt", cargo(&["fmt", "--all", "--", "--check"]))?;
            step("clippy", cargo(&["clippy", "--all-targets", "--", "-D", "warnings"]))?;
            step("test", cargo(&["test"]))?;
        }
        Task::Test { area } => {
            let mut args = vec!["test"];
            if let Some(area) = area {
                args.extend_from_slice(area.cargo_args());
            }
            step("test", cargo(&args))?;
        }
        Task::Bench => step("bench", cargo(&["bench"]))?,
        Task::Demo { frames, release } => demo(frames, release)?,
    }
    println!(
        "{} finished in {:.2}s",
        "✓".green().bold(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn demo(frames: u64, release: bool) -> Result<()> {
    if !Path::new("assets/tiles.png").exists() || !Path::new("assets/level.json").exists() {
        step("assets", cargo(&["run", "--example", "make_assets"]))?;
    }

    let frames = frames.to_string();
    let mut args = vec!["run"];
    if release {
        args.push("--release");
    }
    args.extend_from_slice(&["--example", "headless_scroll", "--", frames.as_str()]);
    step("demo", cargo(&args))
}

/// Report how task `name` went
fn step(name: &str, result: Result<()>) -> Result<()> {
    match &result {
        Ok(()) => println!("{} {}", "✓".green(), name),
        Err(e) => println!("{} {}: {}", "✗".red().bold(), name, e),
    }
    result
}

/// Run cargo with `args`, inheriting stdio
fn cargo(args: &[&str]) -> Result<()> {
    println!("{} cargo {}", "→".blue(), args.join(" ").dimmed());
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("failed to launch cargo {}", args.join(" ")))?;
    if !status.success() {
        bail!("cargo {} exited with {}", args.join(" "), status);
    }
    Ok(())
}
