use crate::game::board::Game;
use crate::game::pieces::{Color, Piece, PROMOTION_PIECES};
use crate::game::square::{
    on_board, square_from_chars, BoardSquare, BoardSquareExt, RANK_1, RANK_2, RANK_7, RANK_8,
};
use crate::game::tables::{is_slider, piece_offsets, PAWN_OFFSETS};
use std::fmt;

pub const FLAG_NORMAL: u8 = 1;
pub const FLAG_CAPTURE: u8 = 2;
pub const FLAG_BIG_PAWN: u8 = 4;
pub const FLAG_EP_CAPTURE: u8 = 8;
pub const FLAG_PROMOTION: u8 = 16;
pub const FLAG_KSIDE_CASTLE: u8 = 32;
pub const FLAG_QSIDE_CASTLE: u8 = 64;

/// A fully described move: applying one needs no extra lookups and undoing
/// one needs no move regeneration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoardMove {
    pub color: Color,
    pub from: BoardSquare,
    pub to: BoardSquare,
    pub flags: u8,
    pub piece: Piece,
    /// Kind of the captured piece; a pawn for en passant even though the
    /// destination square is empty.
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
}

impl BoardMove {
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    pub fn is_capture(&self) -> bool {
        self.has_flag(FLAG_CAPTURE | FLAG_EP_CAPTURE)
    }

    pub fn is_castle(&self) -> bool {
        self.has_flag(FLAG_KSIDE_CASTLE | FLAG_QSIDE_CASTLE)
    }

    /// Splits coordinate notation ("e2e4", "e7e8q") into its raw parts.
    pub fn parse_coordinates(string: &str) -> Option<(BoardSquare, BoardSquare, Option<Piece>)> {
        let mut chars = string.chars();

        let from = square_from_chars(chars.next()?, chars.next()?)?;
        let to = square_from_chars(chars.next()?, chars.next()?)?;
        let promotion = match chars.next() {
            Some(symbol) => Some(Piece::from_char(symbol)?),
            None => None,
        };

        match chars.next() {
            Some(_) => None,
            None => Some((from, to, promotion)),
        }
    }

    pub fn unparse(&self) -> String {
        format!(
            "{}{}{}",
            self.from.unparse(),
            self.to.unparse(),
            self.promotion
                .map(|piece| piece.to_char().to_string())
                .unwrap_or_default()
        )
    }
}

/// Why a move could not be applied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveError {
    /// The origin square holds no piece.
    NoPiece(BoardSquare),
    /// No legal move matches the requested origin and destination.
    Illegal { from: BoardSquare, to: BoardSquare },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::NoPiece(square) => write!(f, "no piece on {}", square.unparse()),
            MoveError::Illegal { from, to } => {
                write!(f, "{}{} is not a legal move", from.unparse(), to.unparse())
            }
        }
    }
}

impl std::error::Error for MoveError {}

impl Game {
    /// Pseudo-legal moves for the piece on `square`, in generation order:
    /// pawn pushes before pawn captures, castles before other king moves.
    /// Leaving the own king attacked is not checked here; see
    /// [`Game::get_moves`].
    pub fn get_piece_moves(&self, square: BoardSquare) -> Vec<BoardMove> {
        let mut moves = Vec::new();

        let Some((piece, us)) = self.get_piece(square) else {
            return moves;
        };

        match piece {
            Piece::Pawn => self.add_pawn_moves(&mut moves, us, square),
            Piece::King => {
                self.add_castle_moves(&mut moves, us);
                self.add_offset_moves(&mut moves, piece, us, square);
            }
            _ => self.add_offset_moves(&mut moves, piece, us, square),
        }

        moves
    }

    /// Legal moves for the side to move. Each candidate is validated by
    /// applying it, checking the mover's king and reverting, which is why
    /// this needs `&mut self`; the position is unchanged on return.
    pub fn get_moves(&mut self) -> Vec<BoardMove> {
        let us = self.turn();

        let mut candidates = Vec::new();
        for (square, _, color) in self.occupied() {
            if color == us {
                candidates.extend(self.get_piece_moves(square));
            }
        }

        candidates
            .into_iter()
            .filter(|board_move| {
                if self.make_move(*board_move).is_err() {
                    return false;
                }
                let legal = !self.is_king_attacked(us);
                self.unmake_move();
                legal
            })
            .collect()
    }

    /// Resolves a bare origin and destination (plus promotion choice)
    /// against the legal moves and applies the first match. Without an
    /// explicit choice a promotion resolves to the queen.
    pub fn try_move(
        &mut self,
        from: BoardSquare,
        to: BoardSquare,
        promotion: Option<Piece>,
    ) -> Result<BoardMove, MoveError> {
        let found = self.get_moves().into_iter().find(|board_move| {
            board_move.from == from
                && board_move.to == to
                && (promotion.is_none() || board_move.promotion == promotion)
        });

        match found {
            Some(board_move) => {
                self.make_move(board_move)?;
                Ok(board_move)
            }
            None => Err(MoveError::Illegal { from, to }),
        }
    }

    fn add_pawn_moves(&self, moves: &mut Vec<BoardMove>, us: Color, square: BoardSquare) {
        let offsets = &PAWN_OFFSETS[us as usize];
        let home_rank = match us {
            Color::Black => RANK_7,
            Color::White => RANK_2,
        };

        let forward = square as i16 + offsets[0];
        if on_board(forward) && self.get_piece(forward as BoardSquare).is_none() {
            self.add_move(moves, Piece::Pawn, us, square, forward as BoardSquare, FLAG_NORMAL);

            let double = square as i16 + offsets[1];
            if square.rank() == home_rank && self.get_piece(double as BoardSquare).is_none() {
                self.add_move(moves, Piece::Pawn, us, square, double as BoardSquare, FLAG_BIG_PAWN);
            }
        }

        for &offset in &offsets[2..] {
            let target = square as i16 + offset;
            if !on_board(target) {
                continue;
            }
            let target = target as BoardSquare;

            match self.get_piece(target) {
                Some((_, color)) if color != us => {
                    self.add_move(moves, Piece::Pawn, us, square, target, FLAG_CAPTURE);
                }
                None if self.ep_square() == Some(target) => {
                    self.add_move(moves, Piece::Pawn, us, square, target, FLAG_EP_CAPTURE);
                }
                _ => {}
            }
        }
    }

    /// Knight, bishop, rook, queen and plain king moves: step each
    /// direction, sliders until blocked.
    fn add_offset_moves(&self, moves: &mut Vec<BoardMove>, piece: Piece, us: Color, square: BoardSquare) {
        for &offset in piece_offsets(piece) {
            let mut target = square as i16;

            loop {
                target += offset;
                if !on_board(target) {
                    break;
                }

                match self.get_piece(target as BoardSquare) {
                    None => {
                        self.add_move(moves, piece, us, square, target as BoardSquare, FLAG_NORMAL);
                    }
                    Some((_, color)) => {
                        if color != us {
                            self.add_move(
                                moves,
                                piece,
                                us,
                                square,
                                target as BoardSquare,
                                FLAG_CAPTURE,
                            );
                        }
                        break;
                    }
                }

                if !is_slider(piece) {
                    break;
                }
            }
        }
    }

    /// Castles for `us` when the right persists, the path is clear and the
    /// king neither stands on nor crosses an attacked square.
    fn add_castle_moves(&self, moves: &mut Vec<BoardMove>, us: Color) {
        let them = !us;
        let Some(king) = self.king_square(us) else {
            return;
        };
        let from = king as i16;

        if self.castling_rights(us) & FLAG_KSIDE_CASTLE != 0 {
            let to = from + 2;
            if on_board(to)
                && self.get_piece((from + 1) as BoardSquare).is_none()
                && self.get_piece(to as BoardSquare).is_none()
                && !self.is_attacked_by(them, king)
                && !self.is_attacked_by(them, (from + 1) as BoardSquare)
                && !self.is_attacked_by(them, to as BoardSquare)
            {
                self.add_move(moves, Piece::King, us, king, to as BoardSquare, FLAG_KSIDE_CASTLE);
            }
        }

        if self.castling_rights(us) & FLAG_QSIDE_CASTLE != 0 {
            let to = from - 2;
            // The rook path reaches one square further than the king's.
            if on_board(from - 3)
                && self.get_piece((from - 1) as BoardSquare).is_none()
                && self.get_piece(to as BoardSquare).is_none()
                && self.get_piece((from - 3) as BoardSquare).is_none()
                && !self.is_attacked_by(them, king)
                && !self.is_attacked_by(them, (from - 1) as BoardSquare)
                && !self.is_attacked_by(them, to as BoardSquare)
            {
                self.add_move(moves, Piece::King, us, king, to as BoardSquare, FLAG_QSIDE_CASTLE);
            }
        }
    }

    /// Pushes the move, expanded into all four choices when a pawn reaches
    /// the last rank.
    fn add_move(
        &self,
        moves: &mut Vec<BoardMove>,
        piece: Piece,
        color: Color,
        from: BoardSquare,
        to: BoardSquare,
        flags: u8,
    ) {
        if piece == Piece::Pawn && (to.rank() == RANK_8 || to.rank() == RANK_1) {
            for promotion in PROMOTION_PIECES {
                moves.push(self.build_move(piece, color, from, to, flags, Some(promotion)));
            }
        } else {
            moves.push(self.build_move(piece, color, from, to, flags, None));
        }
    }

    fn build_move(
        &self,
        piece: Piece,
        color: Color,
        from: BoardSquare,
        to: BoardSquare,
        mut flags: u8,
        promotion: Option<Piece>,
    ) -> BoardMove {
        if promotion.is_some() {
            flags |= FLAG_PROMOTION;
        }

        let captured = match self.get_piece(to) {
            Some((occupant, _)) => Some(occupant),
            None if flags & FLAG_EP_CAPTURE != 0 => Some(Piece::Pawn),
            None => None,
        };

        BoardMove {
            color,
            from,
            to,
            flags,
            piece,
            captured,
            promotion,
        }
    }
}
