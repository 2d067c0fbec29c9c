//! Driving a game from a script or from stdin.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use merge2048_core::{tile_value, Direction, Game, Pos, RandomSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::Config;
use crate::stats::SessionStats;

const PROMPT: &str = "move [w/a/s/d, n = new game, q = quit]: ";

/// Create the game described by `config`: deal the opening tiles, then
/// apply any placements on top.
pub fn build_game(config: &Config) -> Result<Game> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut game = Game::with_source(rng, config.spawning);
    game.initialize();

    for p in &config.placements {
        let pos = Pos::checked(p.row, p.col)
            .with_context(|| format!("--set {},{},{}", p.row, p.col, p.value))?;
        let value = tile_value(p.value)
            .with_context(|| format!("--set {},{},{}", p.row, p.col, p.value))?;
        game.set_tile(pos.row(), pos.col(), value)?;
    }
    Ok(game)
}

fn report_end<R: RandomSource>(game: &Game<R>, out: &mut impl Write) -> Result<()> {
    if game.is_won() {
        writeln!(out, "You reached {}!", merge2048_core::WIN_TILE)?;
    } else {
        writeln!(out, "No moves left.")?;
    }
    Ok(())
}

/// Play `moves` in order, stopping early once the game is over.
pub fn run_script<R: RandomSource>(
    game: &mut Game<R>,
    moves: &[Direction],
    out: &mut impl Write,
) -> Result<SessionStats> {
    let mut stats = SessionStats::new();
    stats.observe(game.board());

    for (i, &dir) in moves.iter().enumerate() {
        if game.is_over() {
            info!(played = i, remaining = moves.len() - i, "script stopped early");
            break;
        }
        let turn = game.play(dir);
        stats.record(&turn, game.board());
    }

    write!(out, "{}", game)?;
    if game.is_over() {
        report_end(game, out)?;
    }
    Ok(stats)
}

/// Read commands from `input` until quit, end of input, game over or
/// `running` is cleared.
pub fn run_interactive<R: RandomSource>(
    game: &mut Game<R>,
    running: &AtomicBool,
    mut input: impl BufRead,
    out: &mut impl Write,
) -> Result<SessionStats> {
    let mut stats = SessionStats::new();
    stats.observe(game.board());
    let mut line = String::new();

    loop {
        writeln!(out)?;
        write!(out, "{}", game)?;

        if game.is_over() {
            report_end(game, out)?;
            break;
        }

        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        let read = input.read_line(&mut line).context("failed to read input")?;
        if !running.load(Ordering::SeqCst) {
            writeln!(out, "\nInterrupted.")?;
            break;
        }
        if read == 0 {
            break;
        }

        match line.trim() {
            "q" | "quit" => break,
            "n" | "new" => {
                game.initialize();
                stats.restarts += 1;
                stats.observe(game.board());
            }
            "" => {}
            cmd => match Direction::from_key(cmd) {
                Some(dir) => {
                    let turn = game.play(dir);
                    stats.record(&turn, game.board());
                }
                None => {
                    warn!(input = cmd, "unrecognised command");
                    writeln!(out, "Unknown input {cmd:?}: use w/a/s/d or up/down/left/right.")?;
                }
            },
        }
    }

    Ok(stats)
}
