use crate::game::{BoardMove, FenError, Game, MoveError};
use rayon::prelude::*;
use std::fmt;

/// Why an interactive move request failed.
#[derive(Debug)]
pub enum PlayError {
    /// The input was not coordinate notation.
    InvalidNotation(String),
    /// The rules rejected the move.
    Rejected(MoveError),
    /// There is nothing to undo.
    NoHistory,
}

impl From<MoveError> for PlayError {
    fn from(error: MoveError) -> Self {
        PlayError::Rejected(error)
    }
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::InvalidNotation(input) => write!(f, "invalid move notation '{}'", input),
            PlayError::Rejected(error) => write!(f, "{}", error),
            PlayError::NoHistory => write!(f, "no moves to undo"),
        }
    }
}

pub struct GameController {
    pub game: Game,
}

impl GameController {
    pub fn new() -> Self {
        Self { game: Game::new() }
    }

    pub fn new_game(&mut self) {
        self.game = Game::new();
    }

    pub fn new_game_from_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.game.load_fen(fen)
    }

    pub fn print(&self) {
        println!("{}", self.game);
    }

    pub fn print_fen(&self) {
        println!("{}", self.game.get_fen());
    }

    /// Applies a move given in coordinate notation ("e2e4", "e7e8q").
    pub fn try_move_piece(&mut self, notation: &str) -> Result<BoardMove, PlayError> {
        let (from, to, promotion) = BoardMove::parse_coordinates(notation)
            .ok_or_else(|| PlayError::InvalidNotation(notation.to_string()))?;

        let board_move = self.game.try_move(from, to, promotion)?;
        log::debug!("applied {}", board_move.unparse());

        Ok(board_move)
    }

    pub fn try_unmove_piece(&mut self) -> Result<BoardMove, PlayError> {
        self.game.unmake_move().ok_or(PlayError::NoHistory)
    }

    /// Number of move paths of length `depth` under each root move.
    pub fn perft(&mut self, depth: usize) -> Vec<(BoardMove, usize)> {
        let mut all_moves = vec![];

        for board_move in self.game.get_moves() {
            let move_count = self.dfs_count_moves(board_move, depth);
            all_moves.push((board_move, move_count));
        }

        all_moves
    }

    /// [`GameController::perft`] with the root moves split across threads,
    /// each worker counting on its own copy of the game.
    pub fn perft_parallel(&mut self, depth: usize) -> Vec<(BoardMove, usize)> {
        let root_moves = self.game.get_moves();
        let game = &self.game;

        root_moves
            .into_par_iter()
            .map(|board_move| {
                let mut worker = GameController { game: game.clone() };
                let move_count = worker.dfs_count_moves(board_move, depth);
                (board_move, move_count)
            })
            .collect()
    }

    fn dfs_count_moves(&mut self, initial_move: BoardMove, depth: usize) -> usize {
        if depth <= 1 {
            return 1;
        }

        if self.game.make_move(initial_move).is_err() {
            return 0;
        }

        let current_moves = self.game.get_moves();

        // Bulk counting: one level above the leaves the length is enough.
        let total_count = if depth == 2 {
            current_moves.len()
        } else {
            current_moves
                .into_iter()
                .map(|board_move| self.dfs_count_moves(board_move, depth - 1))
                .sum()
        };

        self.game.unmake_move();

        total_count
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}
