//! merge2048 terminal host
//!
//! Plays the sliding-tile puzzle from merge2048-core on stdin/stdout.
//!
//! Usage:
//!   merge2048                          # interactive, random seed
//!   merge2048 --seed 42                # reproducible spawns
//!   merge2048 --moves "wasd" --seed 1  # play a script and print the result
//!   merge2048 --no-spawn --set 0,0,2 --set 0,1,2 --moves d
//!
//! Logging goes to stderr and is controlled by RUST_LOG.

mod config;
mod session;
mod stats;

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use crate::config::{Args, Config};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_args(Args::parse())?;
    info!(seed = ?config.seed, spawning = config.spawning, "starting game");

    let mut game = session::build_game(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let stats = match &config.script {
        Some(moves) => session::run_script(&mut game, moves, &mut out)?,
        None => {
            // Set up SIGINT handler for graceful shutdown
            let running = Arc::new(AtomicBool::new(true));
            let r = running.clone();
            ctrlc::set_handler(move || {
                r.store(false, Ordering::SeqCst);
            })
            .context("failed to set Ctrl-C handler")?;

            session::run_interactive(&mut game, &running, io::stdin().lock(), &mut out)?
        }
    };

    writeln!(out)?;
    stats.print_summary(&mut out, game.score())?;
    Ok(())
}
