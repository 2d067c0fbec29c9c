//! Command line configuration.

use anyhow::{anyhow, Result};
use clap::Parser;
use merge2048_core::Direction;

#[derive(Parser, Debug)]
#[command(name = "merge2048")]
#[command(about = "Play the 2048 sliding-tile puzzle in the terminal")]
pub struct Args {
    /// Seed for tile spawns (random if omitted)
    #[arg(long, env = "MERGE2048_SEED")]
    pub seed: Option<u64>,

    /// Disable automatic tile spawning
    #[arg(long)]
    pub no_spawn: bool,

    /// Play a move script and exit, e.g. "wasd" or "up left down"
    #[arg(long, value_name = "SEQ")]
    pub moves: Option<String>,

    /// Place a tile before play starts (repeatable)
    #[arg(long = "set", value_name = "ROW,COL,VALUE", value_parser = parse_placement)]
    pub placements: Vec<Placement>,
}

/// A tile to place, exactly as typed. Validation happens in the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub row: i64,
    pub col: i64,
    pub value: i64,
}

fn parse_placement(s: &str) -> Result<Placement, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected ROW,COL,VALUE, got {s:?}"));
    }
    let num = |p: &str| p.parse::<i64>().map_err(|e| format!("{p:?}: {e}"));
    Ok(Placement {
        row: num(parts[0])?,
        col: num(parts[1])?,
        value: num(parts[2])?,
    })
}

/// Parse a move script.
///
/// Whitespace-separated direction names, or runs of `w/a/s/d` keys.
pub fn parse_script(script: &str) -> Result<Vec<Direction>> {
    let mut moves = Vec::new();
    for token in script.split_whitespace() {
        if let Some(dir) = Direction::from_key(token) {
            moves.push(dir);
            continue;
        }
        for key in token.chars() {
            let dir = Direction::from_key(key.encode_utf8(&mut [0; 4]))
                .ok_or_else(|| anyhow!("unknown move {key:?} in {token:?}"))?;
            moves.push(dir);
        }
    }
    Ok(moves)
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub seed: Option<u64>,
    pub spawning: bool,
    pub script: Option<Vec<Direction>>,
    pub placements: Vec<Placement>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let script = args.moves.as_deref().map(parse_script).transpose()?;
        Ok(Self {
            seed: args.seed,
            spawning: !args.no_spawn,
            script,
            placements: args.placements,
        })
    }
}
