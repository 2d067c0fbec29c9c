//! Game controller: board, score and spawning.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{Board, Direction, Pos, RandomSource, TileError, BOARD_SIZE};

/// One draw in `FOUR_ODDS` spawns a 4 instead of a 2.
const FOUR_ODDS: u32 = 10;

/// A tile placed by the spawner.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Spawn {
    pub pos: Pos,
    pub value: u32,
}

/// What a single move did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Turn {
    /// Score added by merges.
    pub gained: u64,
    /// Whether the collapse changed any cell (before spawning).
    pub moved: bool,
    /// The spawned tile, if one was placed.
    pub spawned: Option<Spawn>,
}

/// Board and score, for hosts that save and load games.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tiles: [[u32; BOARD_SIZE]; BOARD_SIZE],
    pub score: u64,
}

/// Place a 2 (or, one time in ten, a 4) on a uniformly chosen empty cell.
///
/// The position is drawn first, then the value. Returns `None` only when the
/// board is full. A position draw past the last empty cell lands on the last
/// empty cell.
pub fn spawn_tile<R: RandomSource + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Spawn> {
    let empty = board.empty_count();
    if empty == 0 {
        return None;
    }

    let mut nth = rng.next_below(empty as u32) as usize;
    if nth >= empty {
        warn!(draw = nth, bound = empty, "random source drew out of range");
        nth = empty - 1;
    }
    let value = if rng.next_below(FOUR_ODDS) == 0 { 4 } else { 2 };

    let pos = board.empty_cells().nth(nth)?;
    board.put(pos, value);
    Some(Spawn { pos, value })
}

/// A running game.
///
/// Owns one board, the score and the random source used for spawning.
/// Automatic spawning is fixed at construction; with it disabled the board
/// only changes through moves and [`Game::set_tile`].
pub struct Game<R = StdRng> {
    board: Board,
    score: u64,
    spawning: bool,
    rng: R,
}

impl Game<StdRng> {
    /// Empty board, spawning enabled, seeded from the OS.
    pub fn new() -> Game<StdRng> {
        Game::with_spawning(true)
    }

    pub fn with_spawning(enabled: bool) -> Game<StdRng> {
        Game::with_source(StdRng::from_os_rng(), enabled)
    }

    /// Spawning enabled, reproducible from `seed`.
    pub fn seeded(seed: u64) -> Game<StdRng> {
        Game::with_source(StdRng::seed_from_u64(seed), true)
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Game<R> {
    /// Empty board and zero score. Call [`Game::initialize`] to deal the
    /// opening tiles.
    pub fn with_source(rng: R, spawning: bool) -> Game<R> {
        Game {
            board: Board::new(),
            score: 0,
            spawning,
            rng,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn spawning_enabled(&self) -> bool {
        self.spawning
    }

    pub fn tile(&self, row: usize, col: usize) -> Result<u32, TileError> {
        self.board.tile(row, col)
    }

    pub fn set_tile(&mut self, row: usize, col: usize, value: u32) -> Result<(), TileError> {
        self.board.set_tile(row, col, value)
    }

    pub fn is_won(&self) -> bool {
        self.board.is_won()
    }

    pub fn is_over(&self) -> bool {
        self.board.is_over()
    }

    /// Clear the board, reset the score and deal two tiles.
    pub fn initialize(&mut self) {
        self.board.clear();
        self.score = 0;
        let first = self.spawn();
        let second = self.spawn();
        trace!(?first, ?second, "initialized");
    }

    /// Collapse every line toward `direction`, add merge points to the score,
    /// then attempt one spawn.
    ///
    /// The spawn is attempted even when nothing moved.
    pub fn play(&mut self, direction: Direction) -> Turn {
        let (next, gained) = self.board.slide(direction);
        let moved = next != self.board;
        self.board = next;
        self.score = self.score.saturating_add(gained);

        let spawned = self.spawn();
        debug!(%direction, gained, moved, score = self.score, "move");

        Turn {
            gained,
            moved,
            spawned,
        }
    }

    /// Spawn one tile if spawning is enabled and a cell is free.
    pub fn spawn(&mut self) -> Option<Spawn> {
        if !self.spawning {
            return None;
        }
        let spawned = spawn_tile(&mut self.board, &mut self.rng);
        trace!(?spawned, "spawn");
        spawned
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tiles: *self.board.rows(),
            score: self.score,
        }
    }

    /// Replace board and score. Nothing changes if any tile is invalid.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<(), TileError> {
        self.board = Board::from_rows(snapshot.tiles)?;
        self.score = snapshot.score;
        Ok(())
    }
}

impl<R> fmt::Display for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        write!(f, "{}", self.board)
    }
}

impl<R> fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("score", &self.score)
            .field("spawning", &self.spawning)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedSequence, WIN_TILE};

    fn quiet() -> Game<FixedSequence> {
        Game::with_source(FixedSequence::default(), false)
    }

    fn scripted(draws: &[u32]) -> Game<FixedSequence> {
        Game::with_source(FixedSequence::new(draws.to_vec()), true)
    }

    fn nonzero(game: &Game<impl RandomSource>) -> usize {
        game.board().rows().iter().flatten().filter(|&&v| v != 0).count()
    }

    #[test]
    fn test_new_game_is_empty() {
        let game = Game::with_spawning(false);
        assert_eq!(game.score(), 0);
        assert_eq!(game.board(), &Board::new());
        assert!(!game.is_over());
        assert!(!game.is_won());
    }

    #[test]
    fn test_spawn_picks_nth_empty_cell() {
        let mut board = Board::new();
        board.set_tile(0, 0, 8).unwrap();

        // Third empty cell in row-major order is (0, 3); draw 5 keeps a 2.
        let mut rng = FixedSequence::new([2u32, 5]);
        let spawn = spawn_tile(&mut board, &mut rng).unwrap();
        assert_eq!((spawn.pos.row(), spawn.pos.col()), (0, 3));
        assert_eq!(spawn.value, 2);
        assert_eq!(board.tile(0, 3), Ok(2));
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_spawn_four_on_zero_draw() {
        let mut board = Board::new();
        let mut rng = FixedSequence::new([15u32, 0]);
        let spawn = spawn_tile(&mut board, &mut rng).unwrap();
        assert_eq!(spawn.value, 4);
        assert_eq!(board.tile(3, 3), Ok(4));
    }

    #[test]
    fn test_spawn_on_full_board() {
        let mut board = Board::new();
        for pos in Pos::all() {
            board.put(pos, 2);
        }
        let mut rng = FixedSequence::new([0u32]);
        assert_eq!(spawn_tile(&mut board, &mut rng), None);
        assert_eq!(rng.draws(), 0);
    }

    /// Returns the bound itself, one past the allowed range.
    struct Overshoot;

    impl RandomSource for Overshoot {
        fn next_below(&mut self, bound: u32) -> u32 {
            bound
        }
    }

    #[test]
    fn test_spawn_clamps_out_of_range_draw() {
        let mut board = Board::new();
        let spawn = spawn_tile(&mut board, &mut Overshoot).unwrap();
        assert_eq!((spawn.pos.row(), spawn.pos.col()), (3, 3));
        assert_eq!(spawn.value, 2);
        assert_eq!(board.empty_count(), 15);

        board.set_tile(3, 2, 8).unwrap();
        board.set_tile(3, 3, 0).unwrap();
        let spawn = spawn_tile(&mut board, &mut Overshoot).unwrap();
        assert_eq!((spawn.pos.row(), spawn.pos.col()), (3, 3));
    }

    #[test]
    fn test_large_merges_keep_their_tiles() {
        let mut game = quiet();
        game.set_tile(0, 0, 1 << 31).unwrap();
        game.set_tile(0, 1, 1 << 31).unwrap();
        let turn = game.play(Direction::Left);
        assert_eq!(turn.gained, 0);
        assert!(!turn.moved);
        assert_eq!(game.tile(0, 0), Ok(1 << 31));
        assert_eq!(game.tile(0, 1), Ok(1 << 31));

        let mut game = quiet();
        for col in 0..4 {
            game.set_tile(1, col, 1 << 30).unwrap();
        }
        let turn = game.play(Direction::Left);
        assert_eq!(turn.gained, 1 << 32);
        assert_eq!(game.score(), 1 << 32);
        assert_eq!(game.tile(1, 0), Ok(1 << 31));
        assert_eq!(game.tile(1, 1), Ok(1 << 31));
        assert_eq!(game.tile(1, 2), Ok(0));

        game.play(Direction::Left);
        assert_eq!(game.score(), 1 << 32);
        assert_eq!(game.tile(1, 0), Ok(1 << 31));
    }

    #[test]
    fn test_spawn_disabled() {
        let mut game = quiet();
        assert_eq!(game.spawn(), None);
        assert_eq!(nonzero(&game), 0);
    }

    #[test]
    fn test_initialize_deals_two_tiles() {
        let mut game = scripted(&[0, 3, 0, 0]);
        game.set_tile(2, 2, 64).unwrap();
        game.initialize();

        // First spawn: cell 0 -> 2. Second: first remaining empty (0,1) -> 4.
        assert_eq!(game.tile(0, 0), Ok(2));
        assert_eq!(game.tile(0, 1), Ok(4));
        assert_eq!(game.tile(2, 2), Ok(0));
        assert_eq!(nonzero(&game), 2);
    }

    #[test]
    fn test_initialize_resets_score() {
        let mut game = quiet();
        game.set_tile(0, 0, 2).unwrap();
        game.set_tile(0, 1, 2).unwrap();
        game.play(Direction::Left);
        assert_eq!(game.score(), 4);

        game.initialize();
        assert_eq!(game.score(), 0);
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn test_play_reports_turn() {
        let mut game = scripted(&[0, 1]);
        game.set_tile(0, 2, 2).unwrap();
        game.set_tile(0, 3, 2).unwrap();

        let turn = game.play(Direction::Right);
        assert_eq!(turn.gained, 4);
        assert!(turn.moved);
        let spawn = turn.spawned.unwrap();
        assert_eq!((spawn.pos.row(), spawn.pos.col(), spawn.value), (0, 0, 2));
        assert_eq!(game.tile(0, 3), Ok(4));
    }

    #[test]
    fn test_play_spawns_even_without_movement() {
        let mut game = scripted(&[0, 1]);
        game.set_tile(0, 0, 2).unwrap();

        let turn = game.play(Direction::Left);
        assert!(!turn.moved);
        assert_eq!(turn.gained, 0);
        let spawn = turn.spawned.unwrap();
        assert_eq!((spawn.pos.row(), spawn.pos.col()), (0, 1));
        assert_eq!(nonzero(&game), 2);
    }

    #[test]
    fn test_score_accumulates_across_moves() {
        let mut game = quiet();
        game.set_tile(0, 0, 2).unwrap();
        game.set_tile(0, 1, 2).unwrap();

        game.play(Direction::Right);
        assert_eq!(game.tile(0, 3), Ok(4));
        assert_eq!(game.score(), 4);

        game.set_tile(3, 3, 4).unwrap();
        game.play(Direction::Up);
        assert_eq!(game.tile(0, 3), Ok(8));
        assert_eq!(game.score(), 12);

        game.set_tile(0, 2, 8).unwrap();
        game.play(Direction::Left);
        assert_eq!(game.tile(0, 0), Ok(16));
        assert_eq!(game.score(), 28);

        game.set_tile(2, 0, 2).unwrap();
        game.play(Direction::Down);
        assert_eq!(game.score(), 28);
    }

    #[test]
    fn test_won_game_is_over_with_empty_cells() {
        let mut game = quiet();
        game.set_tile(0, 0, WIN_TILE).unwrap();
        assert!(game.is_won());
        assert!(game.is_over());
    }

    #[test]
    fn test_win_by_merge() {
        let mut game = quiet();
        game.set_tile(1, 0, 1024).unwrap();
        game.set_tile(1, 3, 1024).unwrap();
        assert!(!game.is_won());

        game.play(Direction::Left);
        assert_eq!(game.tile(1, 0), Ok(WIN_TILE));
        assert_eq!(game.score(), u64::from(WIN_TILE));
        assert!(game.is_won());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut game = quiet();
        game.set_tile(1, 2, 16).unwrap();
        game.set_tile(1, 3, 16).unwrap();
        game.play(Direction::Left);
        let snap = game.snapshot();
        assert_eq!(snap.score, 32);
        assert_eq!(snap.tiles[1][0], 32);

        let mut other = quiet();
        other.restore(&snap).unwrap();
        assert_eq!(other.board(), game.board());
        assert_eq!(other.score(), 32);
    }

    #[test]
    fn test_restore_rejects_invalid_tile() {
        let mut game = quiet();
        game.set_tile(0, 0, 2).unwrap();
        let before = game.snapshot();

        let mut bad = before;
        bad.tiles[3][3] = 24;
        bad.score = 100;
        assert_eq!(
            game.restore(&bad),
            Err(TileError::InvalidTileValue { value: 24 })
        );
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_display_includes_score() {
        let mut game = quiet();
        game.set_tile(0, 0, 4).unwrap();
        game.set_tile(0, 3, 8).unwrap();
        game.set_tile(3, 3, 2048).unwrap();
        game.set_tile(1, 2, 16).unwrap();
        game.set_tile(2, 1, 32).unwrap();
        game.set_tile(3, 0, 2).unwrap();

        let expected = "Score: 0\n\
                        4\t\t.\t\t.\t\t8\n\
                        .\t\t.\t\t16\t\t.\n\
                        .\t\t32\t\t.\t\t.\n\
                        2\t\t.\t\t.\t\t2048\n";
        assert_eq!(game.to_string(), expected);
    }

    #[test]
    fn test_seeded_games_repeat() {
        let mut a = Game::seeded(42);
        let mut b = Game::seeded(42);
        a.initialize();
        b.initialize();
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            a.play(dir);
            b.play(dir);
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.score(), b.score());
    }
}
