//! Vitrine CLI: drive the motion layer of a page layout from the terminal.
//!
//! Usage:
//!   vitrine replay <LAYOUT> <EVENTS>   Replay an input script frame by frame
//!   vitrine windows <LAYOUT>           List registered entries and their trigger windows
//!   vitrine follow                     Simulate the pointer follower chasing a jump
//!   vitrine validate <LAYOUT> [EVENTS] Check a layout and optional input script

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vitrine",
    about = "Scroll-driven reveal sequencing and pointer follower simulation",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an input script against a page layout
    Replay {
        /// Path to the layout JSON
        layout: PathBuf,

        /// Path to the JSONL input script
        events: PathBuf,

        /// Emit one JSON frame report per line
        #[arg(long)]
        json: bool,

        /// Pace frames in wall-clock time
        #[arg(long)]
        realtime: bool,

        /// Seconds to keep running after the last event
        #[arg(long, default_value = "2.0")]
        tail: f64,

        /// Override the script's refresh rate
        #[arg(long)]
        hz: Option<u32>,

        /// Treat the pointer as unable to hover
        #[arg(long)]
        no_hover: bool,
    },

    /// List registered entries and their trigger windows
    Windows {
        /// Path to the layout JSON
        layout: PathBuf,
    },

    /// Simulate the pointer follower chasing a pointer jump
    Follow {
        /// Starting pointer position, "x,y"
        #[arg(long, default_value = "0,0")]
        from: String,

        /// Pointer destination, "x,y"
        #[arg(long, default_value = "500,0")]
        to: String,

        /// Number of frames to simulate
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Mark the pointer as hovering an interactive element
        #[arg(long)]
        hover: bool,
    },

    /// Check a layout and an optional input script
    Validate {
        /// Path to the layout JSON
        layout: PathBuf,

        /// Path to the JSONL input script
        events: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    vitrine_common::logging::init_logging(&commands::logging_config(&config, cli.verbose))?;

    match cli.command {
        Commands::Replay {
            layout,
            events,
            json,
            realtime,
            tail,
            hz,
            no_hover,
        } => {
            commands::replay::run(
                config,
                layout,
                events,
                commands::replay::ReplayOptions {
                    json,
                    realtime,
                    tail,
                    hz,
                    no_hover,
                },
            )
            .await
        }
        Commands::Windows { layout } => commands::windows::run(config, layout),
        Commands::Follow {
            from,
            to,
            frames,
            hover,
        } => commands::follow::run(config, &from, &to, frames, hover),
        Commands::Validate { layout, events } => commands::validate::run(config, layout, events),
    }
}
