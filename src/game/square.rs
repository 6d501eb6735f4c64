/// A square index on the padded 8x16 board.
///
/// Only indexes whose `0x88` bits are clear name real squares; the high
/// nibble is the rank (counted from the eighth), the low nibble the file.
pub type BoardSquare = u8;

/// Rank indexes as stored in the high nibble, so rank 8 comes first.
pub const RANK_8: u8 = 0;
pub const RANK_7: u8 = 1;
pub const RANK_6: u8 = 2;
pub const RANK_5: u8 = 3;
pub const RANK_4: u8 = 4;
pub const RANK_3: u8 = 5;
pub const RANK_2: u8 = 6;
pub const RANK_1: u8 = 7;

/// Whether offset arithmetic landed on a real square.
///
/// Signed input so callers can test a square plus a negative offset without
/// wrapping first.
pub const fn on_board(square: i16) -> bool {
    square & 0x88 == 0
}

/// The 64 real squares in board order, a8 first and h1 last.
pub fn valid_squares() -> impl Iterator<Item = BoardSquare> {
    (BoardSquare::A8..=BoardSquare::H1).filter(|square| square.is_valid())
}

/// Square from its algebraic file and rank characters.
pub fn square_from_chars(file: char, rank: char) -> Option<BoardSquare> {
    match (file, rank) {
        ('a'..='h', '1'..='8') => Some(BoardSquare::from_position(
            file as u8 - b'a',
            b'8' - rank as u8,
        )),
        _ => None,
    }
}

pub trait BoardSquareExt {
    fn rank(&self) -> u8;
    fn file(&self) -> u8;
    fn is_valid(&self) -> bool;
    fn color_parity(&self) -> u8;
    fn parse(string: &str) -> Option<BoardSquare>;
    fn unparse(&self) -> String;
    fn from_position(file: u8, rank: u8) -> BoardSquare;

    const A1: BoardSquare = 112;
    const A2: BoardSquare = 96;
    const A3: BoardSquare = 80;
    const A4: BoardSquare = 64;
    const A5: BoardSquare = 48;
    const A6: BoardSquare = 32;
    const A7: BoardSquare = 16;
    const A8: BoardSquare = 0;

    const B1: BoardSquare = 113;
    const B2: BoardSquare = 97;
    const B3: BoardSquare = 81;
    const B4: BoardSquare = 65;
    const B5: BoardSquare = 49;
    const B6: BoardSquare = 33;
    const B7: BoardSquare = 17;
    const B8: BoardSquare = 1;

    const C1: BoardSquare = 114;
    const C2: BoardSquare = 98;
    const C3: BoardSquare = 82;
    const C4: BoardSquare = 66;
    const C5: BoardSquare = 50;
    const C6: BoardSquare = 34;
    const C7: BoardSquare = 18;
    const C8: BoardSquare = 2;

    const D1: BoardSquare = 115;
    const D2: BoardSquare = 99;
    const D3: BoardSquare = 83;
    const D4: BoardSquare = 67;
    const D5: BoardSquare = 51;
    const D6: BoardSquare = 35;
    const D7: BoardSquare = 19;
    const D8: BoardSquare = 3;

    const E1: BoardSquare = 116;
    const E2: BoardSquare = 100;
    const E3: BoardSquare = 84;
    const E4: BoardSquare = 68;
    const E5: BoardSquare = 52;
    const E6: BoardSquare = 36;
    const E7: BoardSquare = 20;
    const E8: BoardSquare = 4;

    const F1: BoardSquare = 117;
    const F2: BoardSquare = 101;
    const F3: BoardSquare = 85;
    const F4: BoardSquare = 69;
    const F5: BoardSquare = 53;
    const F6: BoardSquare = 37;
    const F7: BoardSquare = 21;
    const F8: BoardSquare = 5;

    const G1: BoardSquare = 118;
    const G2: BoardSquare = 102;
    const G3: BoardSquare = 86;
    const G4: BoardSquare = 70;
    const G5: BoardSquare = 54;
    const G6: BoardSquare = 38;
    const G7: BoardSquare = 22;
    const G8: BoardSquare = 6;

    const H1: BoardSquare = 119;
    const H2: BoardSquare = 103;
    const H3: BoardSquare = 87;
    const H4: BoardSquare = 71;
    const H5: BoardSquare = 55;
    const H6: BoardSquare = 39;
    const H7: BoardSquare = 23;
    const H8: BoardSquare = 7;
}

impl BoardSquareExt for u8 {
    fn rank(&self) -> u8 {
        self >> 4
    }

    fn file(&self) -> u8 {
        self & 15
    }

    fn is_valid(&self) -> bool {
        self & 0x88 == 0
    }

    /// 0 for light squares, 1 for dark ones.
    fn color_parity(&self) -> u8 {
        (self.rank() + self.file()) & 1
    }

    fn parse(string: &str) -> Option<BoardSquare> {
        let mut chars = string.chars();

        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => square_from_chars(file, rank),
            _ => None,
        }
    }

    fn unparse(&self) -> String {
        format!("{}{}", (self.file() + b'a') as char, (b'8' - self.rank()) as char)
    }

    fn from_position(file: u8, rank: u8) -> BoardSquare {
        rank * 16 + file
    }
}
