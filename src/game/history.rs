use crate::game::moves::BoardMove;
use crate::game::pieces::Color;
use crate::game::square::BoardSquare;
use strum::EnumCount;

/// Snapshot pushed before a move mutates the scalar state, sufficient to
/// reverse the move exactly.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub board_move: BoardMove,
    /// Side that played `board_move`.
    pub turn: Color,
    pub castling: [u8; Color::COUNT],
    pub ep_square: Option<BoardSquare>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}
