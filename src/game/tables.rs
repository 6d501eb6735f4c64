use crate::game::pieces::{Color, Piece};
use strum::EnumCount;

/// Direction steps on the padded 8x16 board. North is toward the eighth
/// rank, which lives at the low indexes.
pub const NORTH: i16 = -16;
pub const SOUTH: i16 = 16;
pub const EAST: i16 = 1;
pub const WEST: i16 = -1;
pub const NORTH_EAST: i16 = -15;
pub const NORTH_WEST: i16 = -17;
pub const SOUTH_EAST: i16 = 17;
pub const SOUTH_WEST: i16 = 15;

/// Per-color pawn offsets: push, double push, then the two capture
/// diagonals. Indexed by `Color as usize`.
pub const PAWN_OFFSETS: [[i16; 4]; Color::COUNT] = [
    [SOUTH, 2 * SOUTH, SOUTH_EAST, SOUTH_WEST],
    [NORTH, 2 * NORTH, NORTH_WEST, NORTH_EAST],
];

pub const KNIGHT_OFFSETS: [i16; 8] = [-18, -33, -31, -14, 18, 33, 31, 14];
pub const BISHOP_OFFSETS: [i16; 4] = [NORTH_WEST, NORTH_EAST, SOUTH_EAST, SOUTH_WEST];
pub const ROOK_OFFSETS: [i16; 4] = [NORTH, EAST, SOUTH, WEST];
pub const KING_OFFSETS: [i16; 8] = [
    NORTH_WEST, NORTH, NORTH_EAST, EAST, SOUTH_EAST, SOUTH, SOUTH_WEST, WEST,
];
pub const QUEEN_OFFSETS: [i16; 8] = KING_OFFSETS;

/// Movement directions for every piece but the pawn, whose offsets depend
/// on color and occupancy.
pub const fn piece_offsets(piece: Piece) -> &'static [i16] {
    match piece {
        Piece::Pawn => &[],
        Piece::Knight => &KNIGHT_OFFSETS,
        Piece::Bishop => &BISHOP_OFFSETS,
        Piece::Rook => &ROOK_OFFSETS,
        Piece::Queen => &QUEEN_OFFSETS,
        Piece::King => &KING_OFFSETS,
    }
}

/// Whether the piece keeps stepping along its directions until blocked.
pub const fn is_slider(piece: Piece) -> bool {
    matches!(piece, Piece::Bishop | Piece::Rook | Piece::Queen)
}

/// Bit identifying `piece` in an [`ATTACKS`] cell.
pub const fn attack_bit(piece: Piece) -> u8 {
    1 << piece as u8
}

/// The tables cover every displacement `attacker - target` between two
/// valid squares, shifted by 119 to stay nonnegative.
pub const ATTACK_TABLE_SIZE: usize = 239;

/// Bitmask of piece kinds that can reach across a displacement on an empty
/// board. Pawns of both colors share one bit; queries disambiguate by the
/// displacement sign.
pub const ATTACKS: [u8; ATTACK_TABLE_SIZE] = DISPLACEMENT_TABLES.0;

/// Unit step that walks an attacker toward its target along a slider line,
/// zero where no line exists.
pub const RAYS: [i16; ATTACK_TABLE_SIZE] = DISPLACEMENT_TABLES.1;

const DISPLACEMENT_TABLES: ([u8; ATTACK_TABLE_SIZE], [i16; ATTACK_TABLE_SIZE]) =
    calculate_displacement_tables();

const fn calculate_displacement_tables() -> ([u8; ATTACK_TABLE_SIZE], [i16; ATTACK_TABLE_SIZE]) {
    let mut attacks = [0u8; ATTACK_TABLE_SIZE];
    let mut rays = [0i16; ATTACK_TABLE_SIZE];

    let mut from: i16 = 0;
    while from < 120 {
        if from & 0x88 != 0 {
            from += 1;
            continue;
        }

        // One diagonal step is a potential pawn capture for one of the two
        // colors; the query resolves which by the sign of the displacement.
        let mut i = 0;
        while i < BISHOP_OFFSETS.len() {
            let to = from + BISHOP_OFFSETS[i];
            if to & 0x88 == 0 {
                attacks[(from - to + 119) as usize] |= attack_bit(Piece::Pawn);
            }
            i += 1;
        }

        let mut i = 0;
        while i < KNIGHT_OFFSETS.len() {
            let to = from + KNIGHT_OFFSETS[i];
            if to & 0x88 == 0 {
                attacks[(from - to + 119) as usize] |= attack_bit(Piece::Knight);
            }
            i += 1;
        }

        let mut i = 0;
        while i < KING_OFFSETS.len() {
            let to = from + KING_OFFSETS[i];
            if to & 0x88 == 0 {
                attacks[(from - to + 119) as usize] |= attack_bit(Piece::King);
            }
            i += 1;
        }

        // Sliders walk each direction to the board edge, recording the step
        // that retraces the line at query time.
        let mut i = 0;
        while i < BISHOP_OFFSETS.len() {
            let delta = BISHOP_OFFSETS[i];
            let mut to = from + delta;
            while to & 0x88 == 0 {
                let index = (from - to + 119) as usize;
                attacks[index] |= attack_bit(Piece::Bishop) | attack_bit(Piece::Queen);
                rays[index] = delta;
                to += delta;
            }
            i += 1;
        }

        let mut i = 0;
        while i < ROOK_OFFSETS.len() {
            let delta = ROOK_OFFSETS[i];
            let mut to = from + delta;
            while to & 0x88 == 0 {
                let index = (from - to + 119) as usize;
                attacks[index] |= attack_bit(Piece::Rook) | attack_bit(Piece::Queen);
                rays[index] = delta;
                to += delta;
            }
            i += 1;
        }

        from += 1;
    }

    (attacks, rays)
}

/// Squares a pawn of the given color attacks, relative to the pawn.
pub const PAWN_CONTROL_DELTAS: [[i16; 2]; Color::COUNT] = [
    [SOUTH_EAST, SOUTH_WEST],
    [NORTH_EAST, NORTH_WEST],
];

/// The king's eight neighbors plus three squares ahead of it, the zone the
/// near-king index tracks. The forward triple depends on color.
pub const NEAR_KING_RING: [i16; 8] = [
    NORTH, SOUTH, EAST, WEST, NORTH_WEST, NORTH_EAST, SOUTH_WEST, SOUTH_EAST,
];
pub const NEAR_KING_FORWARD: [[i16; 3]; Color::COUNT] = [
    [2 * SOUTH, SOUTH + SOUTH_EAST, SOUTH + SOUTH_WEST],
    [2 * NORTH, NORTH + NORTH_EAST, NORTH + NORTH_WEST],
];
