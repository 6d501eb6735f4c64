use crate::game::board::Game;
use crate::game::moves::{FLAG_KSIDE_CASTLE, FLAG_QSIDE_CASTLE};
use crate::game::pieces::{Color, Piece};
use crate::game::square::{on_board, BoardSquare, BoardSquareExt};
use std::fmt;

/// FEN of the standard starting position.
pub const DEFAULT_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Why a FEN string was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum FenError {
    MissingField(&'static str),
    InvalidPiece(char),
    /// The placement field ran past the last square.
    PlacementOverflow,
    InvalidTurn(String),
    InvalidCastling(char),
    InvalidEnPassant(String),
    InvalidClock(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingField(field) => write!(f, "missing field: {}", field),
            FenError::InvalidPiece(symbol) => write!(f, "invalid piece symbol '{}'", symbol),
            FenError::PlacementOverflow => write!(f, "piece placement runs past the board"),
            FenError::InvalidTurn(field) => write!(f, "invalid side to move '{}'", field),
            FenError::InvalidCastling(symbol) => {
                write!(f, "invalid castling symbol '{}'", symbol)
            }
            FenError::InvalidEnPassant(field) => {
                write!(f, "invalid en passant square '{}'", field)
            }
            FenError::InvalidClock(field) => write!(f, "invalid move clock '{}'", field),
        }
    }
}

impl std::error::Error for FenError {}

impl Game {
    /// Builds a game from a FEN string. The halfmove clock and fullmove
    /// number may be omitted and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        let mut game = Game::empty();
        let mut fields = fen.split_whitespace();

        let placement = fields
            .next()
            .ok_or(FenError::MissingField("piece placement"))?;

        let mut square: i16 = 0;
        for symbol in placement.chars() {
            match symbol {
                '/' => square += 8,
                '1'..='8' => square += symbol as i16 - '0' as i16,
                _ => {
                    let piece = Piece::from_char(symbol.to_ascii_lowercase())
                        .ok_or(FenError::InvalidPiece(symbol))?;
                    let color = if symbol.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };

                    if !on_board(square) {
                        return Err(FenError::PlacementOverflow);
                    }

                    game.put_piece(piece, color, square as BoardSquare);
                    square += 1;
                }
            }

            // The cursor never passes 120, one square beyond h1.
            if square > 120 {
                return Err(FenError::PlacementOverflow);
            }
        }

        game.turn = match fields.next().ok_or(FenError::MissingField("side to move"))? {
            "w" => Color::White,
            "b" => Color::Black,
            field => return Err(FenError::InvalidTurn(field.to_string())),
        };

        let castling = fields
            .next()
            .ok_or(FenError::MissingField("castling rights"))?;
        for symbol in castling.chars() {
            match symbol {
                'K' => game.castling[Color::White as usize] |= FLAG_KSIDE_CASTLE,
                'Q' => game.castling[Color::White as usize] |= FLAG_QSIDE_CASTLE,
                'k' => game.castling[Color::Black as usize] |= FLAG_KSIDE_CASTLE,
                'q' => game.castling[Color::Black as usize] |= FLAG_QSIDE_CASTLE,
                '-' => {}
                _ => return Err(FenError::InvalidCastling(symbol)),
            }
        }

        let ep = fields
            .next()
            .ok_or(FenError::MissingField("en passant square"))?;
        game.ep_square = match ep {
            "-" => None,
            _ => Some(
                BoardSquare::parse(ep).ok_or_else(|| FenError::InvalidEnPassant(ep.to_string()))?,
            ),
        };

        game.halfmove_clock = match fields.next() {
            Some(field) => field
                .parse()
                .map_err(|_| FenError::InvalidClock(field.to_string()))?,
            None => 0,
        };
        game.fullmove_number = match fields.next() {
            Some(field) => field
                .parse()
                .map_err(|_| FenError::InvalidClock(field.to_string()))?,
            None => 1,
        };

        Ok(game)
    }

    /// Replaces the position with one parsed from `fen`. The current state
    /// is untouched when parsing fails.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Game::from_fen(fen)?;
        Ok(())
    }

    /// The position in FEN.
    pub fn get_fen(&self) -> String {
        let mut placement = String::new();

        for rank in 0..8u8 {
            let mut empty = 0;

            for file in 0..8u8 {
                let square = BoardSquare::from_position(file, rank);
                match self.get_piece(square) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_colored_char(color));
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank < 7 {
                placement.push('/');
            }
        }

        let turn = match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        };

        let mut castling = String::new();
        if self.castling[Color::White as usize] & FLAG_KSIDE_CASTLE != 0 {
            castling.push('K');
        }
        if self.castling[Color::White as usize] & FLAG_QSIDE_CASTLE != 0 {
            castling.push('Q');
        }
        if self.castling[Color::Black as usize] & FLAG_KSIDE_CASTLE != 0 {
            castling.push('k');
        }
        if self.castling[Color::Black as usize] & FLAG_QSIDE_CASTLE != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.ep_square {
            Some(square) => square.unparse(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            placement, turn, castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }
}
