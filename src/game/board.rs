use crate::game::fen::DEFAULT_POSITION;
use crate::game::history::HistoryEntry;
use crate::game::moves::{
    BoardMove, MoveError, FLAG_BIG_PAWN, FLAG_CAPTURE, FLAG_EP_CAPTURE, FLAG_KSIDE_CASTLE,
    FLAG_PROMOTION, FLAG_QSIDE_CASTLE,
};
use crate::game::pieces::{Color, Piece};
use crate::game::square::{on_board, valid_squares, BoardSquare, BoardSquareExt};
use crate::game::tables::{
    attack_bit, ATTACKS, NEAR_KING_FORWARD, NEAR_KING_RING, NORTH, PAWN_CONTROL_DELTAS, RAYS,
    SOUTH,
};
use fxhash::FxHashMap;
use std::fmt;
use strum::{EnumCount, IntoEnumIterator};

/// Rook home squares paired with the castle right they guard. A move off or
/// a capture on one of them forfeits that right.
const ROOK_RIGHTS: [[(BoardSquare, u8); 2]; Color::COUNT] = [
    [
        (BoardSquare::A8, FLAG_QSIDE_CASTLE),
        (BoardSquare::H8, FLAG_KSIDE_CASTLE),
    ],
    [
        (BoardSquare::A1, FLAG_QSIDE_CASTLE),
        (BoardSquare::H1, FLAG_KSIDE_CASTLE),
    ],
];

/// A chess position with its rules state and the indexes the move machinery
/// keeps in sync: per-kind piece lists, king squares, the near-king zones,
/// and the pawn structure counters.
///
/// All mutation goes through [`Game::put_piece`], [`Game::remove_piece`] and
/// [`Game::relocate_piece`], so the indexes can never drift from the board.
#[derive(Debug, Clone)]
pub struct Game {
    /// Padded 8x16 board; only indexes with the `0x88` bits clear are real.
    board: [Option<(Piece, Color)>; 128],
    /// Squares per piece kind and color, kings excepted.
    piece_squares: [[Vec<BoardSquare>; Color::COUNT]; Piece::COUNT - 1],
    kings: [Option<BoardSquare>; Color::COUNT],

    pub(crate) turn: Color,
    /// Castle availability per color, encoded with the castle move flags.
    pub(crate) castling: [u8; Color::COUNT],
    pub(crate) ep_square: Option<BoardSquare>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,

    history: Vec<HistoryEntry>,

    squares_near_king: [Vec<BoardSquare>; Color::COUNT],
    /// How many pawns of a color attack each square.
    pawn_control: [FxHashMap<BoardSquare, u8>; Color::COUNT],
    pawn_counts_by_rank: [[u8; 8]; Color::COUNT],
    pawn_counts_by_file: [[u8; 8]; Color::COUNT],
}

impl Game {
    /// Standard starting position.
    pub fn new() -> Game {
        Game::from_fen(DEFAULT_POSITION).expect("default position FEN is valid")
    }

    /// No pieces, White to move, no castle rights.
    pub fn empty() -> Game {
        Game {
            board: [None; 128],
            piece_squares: Default::default(),
            kings: [None; Color::COUNT],
            turn: Color::White,
            castling: [0; Color::COUNT],
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
            squares_near_king: Default::default(),
            pawn_control: Default::default(),
            pawn_counts_by_rank: [[0; 8]; Color::COUNT],
            pawn_counts_by_file: [[0; 8]; Color::COUNT],
        }
    }

    pub fn get_piece(&self, square: BoardSquare) -> Option<(Piece, Color)> {
        self.board[square as usize]
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self, color: Color) -> u8 {
        self.castling[color as usize]
    }

    pub fn ep_square(&self) -> Option<BoardSquare> {
        self.ep_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn king_square(&self, color: Color) -> Option<BoardSquare> {
        self.kings[color as usize]
    }

    /// Squares of `color`'s pieces of one kind. Kings are tracked as
    /// scalars and reported by [`Game::king_square`] instead.
    pub fn piece_squares(&self, piece: Piece, color: Color) -> &[BoardSquare] {
        match piece {
            Piece::King => &[],
            _ => &self.piece_squares[piece as usize][color as usize],
        }
    }

    pub fn piece_count(&self, piece: Piece, color: Color) -> usize {
        match piece {
            Piece::King => self.kings[color as usize].is_some() as usize,
            _ => self.piece_squares[piece as usize][color as usize].len(),
        }
    }

    /// The king's neighborhood: its eight neighbors plus the three squares
    /// two steps toward the opponent, clipped to the board. Empty when the
    /// color has no king.
    pub fn squares_near_king(&self, color: Color) -> &[BoardSquare] {
        &self.squares_near_king[color as usize]
    }

    /// Squares attacked by `color`'s pawns, each with its attacker count.
    pub fn pawn_control(&self, color: Color) -> &FxHashMap<BoardSquare, u8> {
        &self.pawn_control[color as usize]
    }

    pub fn pawn_counts_by_rank(&self, color: Color) -> &[u8; 8] {
        &self.pawn_counts_by_rank[color as usize]
    }

    pub fn pawn_counts_by_file(&self, color: Color) -> &[u8; 8] {
        &self.pawn_counts_by_file[color as usize]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<BoardMove> {
        self.history.last().map(|entry| entry.board_move)
    }

    /// Occupied squares in board order, a8 first.
    pub fn occupied(&self) -> impl Iterator<Item = (BoardSquare, Piece, Color)> + '_ {
        valid_squares().filter_map(|square| {
            self.board[square as usize].map(|(piece, color)| (square, piece, color))
        })
    }

    /// Places a piece on an empty square and updates every index. Capturing
    /// flows remove the occupant first.
    pub fn put_piece(&mut self, piece: Piece, color: Color, square: BoardSquare) {
        self.board[square as usize] = Some((piece, color));

        match piece {
            Piece::King => {
                self.kings[color as usize] = Some(square);
                self.update_squares_near_king(color, square);
            }
            _ => {
                self.piece_squares[piece as usize][color as usize].push(square);

                if piece == Piece::Pawn {
                    self.add_pawn_control(color, square);
                    self.add_pawn_counts(color, square);
                }
            }
        }
    }

    /// Removes whatever occupies `square`, with the inverse index updates.
    /// Does nothing when the square is empty.
    pub fn remove_piece(&mut self, square: BoardSquare) {
        let Some((piece, color)) = self.board[square as usize] else {
            return;
        };

        self.board[square as usize] = None;

        match piece {
            Piece::King => {
                self.kings[color as usize] = None;
                self.squares_near_king[color as usize].clear();
            }
            _ => {
                let squares = &mut self.piece_squares[piece as usize][color as usize];
                let index = squares
                    .iter()
                    .position(|&occupied| occupied == square)
                    .expect("piece list out of sync with the board");
                squares.remove(index);

                if piece == Piece::Pawn {
                    self.remove_pawn_control(color, square);
                    self.remove_pawn_counts(color, square);
                }
            }
        }
    }

    /// Moves a piece between squares. The destination's occupant is not
    /// touched, so captures must remove the victim first. Does nothing when
    /// the origin is empty.
    pub fn relocate_piece(&mut self, from: BoardSquare, to: BoardSquare) {
        let Some((piece, color)) = self.board[from as usize] else {
            return;
        };

        self.board[from as usize] = None;
        self.board[to as usize] = Some((piece, color));

        match piece {
            Piece::King => {
                self.kings[color as usize] = Some(to);
                self.update_squares_near_king(color, to);
            }
            _ => {
                let squares = &mut self.piece_squares[piece as usize][color as usize];
                let index = squares
                    .iter()
                    .position(|&occupied| occupied == from)
                    .expect("piece list out of sync with the board");
                squares[index] = to;

                if piece == Piece::Pawn {
                    self.remove_pawn_control(color, from);
                    self.remove_pawn_counts(color, from);
                    self.add_pawn_control(color, to);
                    self.add_pawn_counts(color, to);
                }
            }
        }
    }

    fn update_squares_near_king(&mut self, color: Color, square: BoardSquare) {
        let near = &mut self.squares_near_king[color as usize];
        near.clear();

        for delta in NEAR_KING_RING {
            let target = square as i16 + delta;
            if on_board(target) {
                near.push(target as BoardSquare);
            }
        }

        for delta in NEAR_KING_FORWARD[color as usize] {
            let target = square as i16 + delta;
            if on_board(target) {
                near.push(target as BoardSquare);
            }
        }
    }

    fn add_pawn_control(&mut self, color: Color, square: BoardSquare) {
        for delta in PAWN_CONTROL_DELTAS[color as usize] {
            let target = square as i16 + delta;
            if on_board(target) {
                *self.pawn_control[color as usize]
                    .entry(target as BoardSquare)
                    .or_insert(0) += 1;
            }
        }
    }

    fn remove_pawn_control(&mut self, color: Color, square: BoardSquare) {
        for delta in PAWN_CONTROL_DELTAS[color as usize] {
            let target = square as i16 + delta;
            if !on_board(target) {
                continue;
            }

            let target = target as BoardSquare;
            if let Some(count) = self.pawn_control[color as usize].get_mut(&target) {
                *count -= 1;
                if *count == 0 {
                    self.pawn_control[color as usize].remove(&target);
                }
            }
        }
    }

    fn add_pawn_counts(&mut self, color: Color, square: BoardSquare) {
        self.pawn_counts_by_rank[color as usize][square.rank() as usize] += 1;
        self.pawn_counts_by_file[color as usize][square.file() as usize] += 1;
    }

    fn remove_pawn_counts(&mut self, color: Color, square: BoardSquare) {
        self.pawn_counts_by_rank[color as usize][square.rank() as usize] -= 1;
        self.pawn_counts_by_file[color as usize][square.file() as usize] -= 1;
    }

    /// Whether the piece on `attacker` reaches `target` given the current
    /// occupancy. False when `attacker` is empty.
    pub fn attacks_square(&self, attacker: BoardSquare, target: BoardSquare) -> bool {
        let Some((piece, color)) = self.board[attacker as usize] else {
            return false;
        };

        let difference = attacker as i16 - target as i16;
        let index = (difference + 119) as usize;

        if ATTACKS[index] & attack_bit(piece) == 0 {
            return false;
        }

        match piece {
            // The table has one bit for both pawn colors; the sign of the
            // displacement tells which color captures in that direction.
            Piece::Pawn => {
                if difference > 0 {
                    color == Color::White
                } else {
                    color == Color::Black
                }
            }
            Piece::Knight | Piece::King => true,
            _ => {
                let step = RAYS[index];
                let mut square = attacker as i16 + step;

                while square != target as i16 {
                    if self.board[square as usize].is_some() {
                        return false;
                    }
                    square += step;
                }

                true
            }
        }
    }

    /// Whether any piece of `color` attacks `target`. Scans the occupied
    /// squares afresh on every call.
    pub fn is_attacked_by(&self, color: Color, target: BoardSquare) -> bool {
        self.occupied()
            .any(|(square, _, occupant)| occupant == color && self.attacks_square(square, target))
    }

    pub fn is_king_attacked(&self, color: Color) -> bool {
        match self.kings[color as usize] {
            Some(square) => self.is_attacked_by(!color, square),
            None => false,
        }
    }

    /// Applies a move produced by the generator, or one assembled to match
    /// it. The only rejected input is an empty origin square, which leaves
    /// the state untouched.
    pub fn make_move(&mut self, board_move: BoardMove) -> Result<(), MoveError> {
        let Some((piece, _)) = self.board[board_move.from as usize] else {
            return Err(MoveError::NoPiece(board_move.from));
        };

        let us = self.turn;
        let them = !us;

        self.remove_piece(board_move.to);
        self.relocate_piece(board_move.from, board_move.to);
        self.push_history(board_move);

        // En passant captures the pawn the destination square skipped past.
        if board_move.has_flag(FLAG_EP_CAPTURE) {
            let behind = match us {
                Color::Black => board_move.to as i16 + NORTH,
                Color::White => board_move.to as i16 + SOUTH,
            };
            if on_board(behind) {
                self.remove_piece(behind as BoardSquare);
            }
        }

        if board_move.has_flag(FLAG_PROMOTION) {
            if let Some(promotion) = board_move.promotion {
                self.remove_piece(board_move.to);
                self.put_piece(promotion, us, board_move.to);
            }
        }

        if piece == Piece::King {
            let to = board_move.to as i16;
            if board_move.has_flag(FLAG_KSIDE_CASTLE) {
                self.relocate_castle_rook(to + 1, to - 1);
            } else if board_move.has_flag(FLAG_QSIDE_CASTLE) {
                self.relocate_castle_rook(to - 2, to + 1);
            }

            self.castling[us as usize] = 0;
        }

        if self.castling[us as usize] != 0 {
            for (home, flag) in ROOK_RIGHTS[us as usize] {
                if board_move.from == home && self.castling[us as usize] & flag != 0 {
                    self.castling[us as usize] ^= flag;
                    break;
                }
            }
        }

        if self.castling[them as usize] != 0 {
            for (home, flag) in ROOK_RIGHTS[them as usize] {
                if board_move.to == home && self.castling[them as usize] & flag != 0 {
                    self.castling[them as usize] ^= flag;
                    break;
                }
            }
        }

        if board_move.has_flag(FLAG_BIG_PAWN) {
            let skipped = match us {
                Color::Black => board_move.to as i16 + NORTH,
                Color::White => board_move.to as i16 + SOUTH,
            };
            self.ep_square = Some(skipped as BoardSquare);
        } else {
            self.ep_square = None;
        }

        if board_move.piece == Piece::Pawn || board_move.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.turn = them;
        Ok(())
    }

    /// Reverts the most recent not-yet-undone move, reporting it. `None`
    /// when there is nothing to undo.
    pub fn unmake_move(&mut self) -> Option<BoardMove> {
        let entry = self.history.pop()?;
        let board_move = entry.board_move;

        self.turn = entry.turn;
        self.castling = entry.castling;
        self.ep_square = entry.ep_square;
        self.halfmove_clock = entry.halfmove_clock;
        self.fullmove_number = entry.fullmove_number;

        let us = self.turn;
        let them = !us;

        self.relocate_piece(board_move.to, board_move.from);

        if board_move.has_flag(FLAG_CAPTURE) {
            if let Some(captured) = board_move.captured {
                self.put_piece(captured, them, board_move.to);
            }
        }

        if board_move.has_flag(FLAG_EP_CAPTURE) {
            let behind = match us {
                Color::Black => board_move.to as i16 + NORTH,
                Color::White => board_move.to as i16 + SOUTH,
            };
            if on_board(behind) {
                self.put_piece(Piece::Pawn, them, behind as BoardSquare);
            }
        }

        // The mover was relocated back as the promoted piece; swap the pawn
        // back in at the origin.
        if board_move.has_flag(FLAG_PROMOTION) {
            self.remove_piece(board_move.from);
            self.put_piece(board_move.piece, us, board_move.from);
        }

        if board_move.is_castle() {
            let to = board_move.to as i16;
            if board_move.has_flag(FLAG_KSIDE_CASTLE) {
                self.relocate_castle_rook(to - 1, to + 1);
            } else {
                self.relocate_castle_rook(to + 1, to - 2);
            }
        }

        Some(board_move)
    }

    fn relocate_castle_rook(&mut self, from: i16, to: i16) {
        if on_board(from) && on_board(to) {
            self.relocate_piece(from as BoardSquare, to as BoardSquare);
        }
    }

    fn push_history(&mut self, board_move: BoardMove) {
        self.history.push(HistoryEntry {
            board_move,
            turn: self.turn,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });
    }

    /// Side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_king_attacked(self.turn)
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.is_check() && self.get_moves().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.is_check() && self.get_moves().is_empty()
    }

    /// Neither side retains material that could ever force mate: bare
    /// kings, a lone minor piece, or bishops all standing on one square
    /// color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut counts = [0usize; Piece::COUNT];
        for piece in Piece::iter() {
            counts[piece as usize] =
                self.piece_count(piece, Color::White) + self.piece_count(piece, Color::Black);
        }
        let total: usize = counts.iter().sum();

        if total == 2 {
            return true;
        }

        if total == 3
            && (counts[Piece::Bishop as usize] == 1 || counts[Piece::Knight as usize] == 1)
        {
            return true;
        }

        if total == counts[Piece::Bishop as usize] + 2 {
            let mut bishops = 0usize;
            let mut dark = 0usize;

            for squares in &self.piece_squares[Piece::Bishop as usize] {
                for square in squares {
                    bishops += 1;
                    dark += square.color_parity() as usize;
                }
            }

            if dark == 0 || dark == bishops {
                return true;
            }
        }

        false
    }

    /// Always false: repetition tracking is not implemented, and draw
    /// detection never consults it.
    pub fn is_threefold_repetition(&self) -> bool {
        false
    }

    pub fn is_draw(&mut self) -> bool {
        self.is_stalemate() || self.is_insufficient_material()
    }

    /// No legal moves left, mate and stalemate alike, or dead material.
    pub fn is_game_over(&mut self) -> bool {
        self.get_moves().is_empty() || self.is_insufficient_material()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   +------------------------+")?;

        for rank in 0..8u8 {
            write!(f, " {} |", 8 - rank)?;

            for file in 0..8u8 {
                let square = BoardSquare::from_position(file, rank);
                match self.board[square as usize] {
                    Some((piece, color)) => write!(f, " {} ", piece.to_colored_char(color))?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "|")?;
        }

        writeln!(f, "   +------------------------+")?;
        write!(f, "     a  b  c  d  e  f  g  h")
    }
}
