//! Session statistics tracking.

use std::io::Write;
use std::time::Instant;

use merge2048_core::{Board, Turn};

/// Format a duration in seconds as `1h 02m 03s`, `2m 05s` or `4.2s`.
pub fn format_duration(secs: f64) -> String {
    let whole = secs as u64;
    if whole >= 3600 {
        format!("{}h {:02}m {:02}s", whole / 3600, (whole % 3600) / 60, whole % 60)
    } else if whole >= 60 {
        format!("{}m {:02}s", whole / 60, whole % 60)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Statistics collected while playing.
#[derive(Debug)]
pub struct SessionStats {
    /// Moves requested, including ones that changed nothing
    pub moves: u64,

    /// Moves that left the board unchanged
    pub idle_moves: u64,

    /// Points gained from merges, summed over all games
    pub points: u64,

    /// Tiles placed by the spawner, and how many of them were 4s
    pub spawns: u64,
    pub fours: u64,

    /// Games started with `n`
    pub restarts: u64,

    /// Largest tile seen on the board
    pub best_tile: u32,

    pub start_time: Instant,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            moves: 0,
            idle_moves: 0,
            points: 0,
            spawns: 0,
            fours: 0,
            restarts: 0,
            best_tile: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one move and the board it produced.
    pub fn record(&mut self, turn: &Turn, board: &Board) {
        self.moves += 1;
        if !turn.moved {
            self.idle_moves += 1;
        }
        self.points = self.points.saturating_add(turn.gained);
        if let Some(spawn) = turn.spawned {
            self.spawns += 1;
            if spawn.value == 4 {
                self.fours += 1;
            }
        }
        self.observe(board);
    }

    /// Track the largest tile on `board`.
    pub fn observe(&mut self, board: &Board) {
        self.best_tile = self.best_tile.max(board.max_tile());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print a summary to `out`.
    pub fn print_summary(&self, out: &mut impl Write, score: u64) -> std::io::Result<()> {
        writeln!(out, "=== Session Summary ===")?;
        writeln!(out, "Final score:    {}", score)?;
        writeln!(out, "Best tile:      {}", self.best_tile)?;
        writeln!(out, "Moves:          {} ({} idle)", self.moves, self.idle_moves)?;
        writeln!(out, "Merge points:   {}", self.points)?;
        writeln!(out, "Spawns:         {} ({} fours)", self.spawns, self.fours)?;
        if self.restarts > 0 {
            writeln!(out, "Restarts:       {}", self.restarts)?;
        }
        writeln!(out, "Time:           {}", format_duration(self.elapsed_secs()))?;
        Ok(())
    }
}
