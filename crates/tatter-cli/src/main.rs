//! Tatter CLI - run card destruction sessions headless

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};
use tatter_core::DestroyMode;

#[derive(Parser)]
#[command(name = "tatter")]
#[command(about = "Burn, tear, and crush cards, frame by frame", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one destruction session with scripted input
    Simulate {
        /// Destruction mode: burn, tear, or crush
        #[arg(long, short)]
        mode: DestroyMode,

        /// Seed for the session's random stream
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Card size in pixels
        #[arg(long, value_parser = parse_size, default_value = "300x400")]
        card: (u32, u32),

        /// Drawing surface size in pixels
        #[arg(long, value_parser = parse_size, default_value = "360x640")]
        viewport: (u32, u32),

        /// TOML file overriding the default tuning
        #[arg(long)]
        config: Option<String>,

        /// Write PNG frames into this directory
        #[arg(long)]
        frames_dir: Option<String>,

        /// Keep every Nth frame when writing PNGs
        #[arg(long, default_value = "10")]
        every: u32,

        /// Show the back of the card
        #[arg(long)]
        flipped: bool,

        /// Title drawn in the card header
        #[arg(long, default_value = "Daily reading")]
        title: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration, or validate a configuration file
    Config {
        /// Configuration file to validate instead of printing defaults
        #[arg(long)]
        check: Option<String>,
    },
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("invalid width: {}", e))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("invalid height: {}", e))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got {}x{}", w, h));
    }
    Ok((w, h))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Simulate {
            mode,
            seed,
            card,
            viewport,
            config,
            frames_dir,
            every,
            flipped,
            title,
            json,
        } => simulate::run(simulate::SimulateArgs {
            mode,
            seed,
            card,
            viewport,
            config,
            frames_dir,
            every,
            flipped,
            title,
            json,
        }),
        Commands::Config { check } => config::run(check.as_deref()),
    }
}
