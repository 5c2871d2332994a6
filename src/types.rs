// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

// TableIndex is a trait for all types that can serve as an index into a table.
// It is common to use these types as indices into tables, so this trait allows
// any type implementing ToPrimitive to be used as table indices.
pub trait TableIndex {
    fn as_index(self) -> usize;
}

impl<T> TableIndex for T
where
    T: ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_usize().unwrap_or(0)
    }
}

/// A square on the 0x88 board. The board is sixteen files wide and eight
/// rows tall; only the left eight files of each row are real squares. Row 0
/// is the eighth rank, so a8 is 0 and h1 is 119.
///
/// Any square with a bit of `0x88` set is off the board, which makes it
/// possible to walk a ray by repeatedly adding an offset and stopping as soon
/// as the result leaves the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Square(u8);

impl Square {
    pub const fn new(index: u8) -> Square {
        Square(index)
    }

    /// The square on the given row (0 = rank 8) and file (0 = a-file).
    pub fn on_row(row: u8, file: u8) -> Square {
        Square(row.wrapping_mul(16).wrapping_add(file))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_on_board(self) -> bool {
        self.0 & 0x88 == 0
    }

    pub fn file(self) -> u8 {
        self.0 & 15
    }

    pub fn row(self) -> u8 {
        self.0 >> 4
    }

    /// Zero-based rank, 0 for the first rank. Only meaningful on the board.
    pub fn rank(self) -> u8 {
        7u8.wrapping_sub(self.row())
    }

    pub fn offset(self, delta: i8) -> Square {
        Square(self.0.wrapping_add(delta as u8))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + self.file()) as char)?;
        f.write_char((b'8' as i16 - i16::from(self.row())) as u8 as char)
    }
}

pub const NORTH: i8 = -16;
pub const SOUTH: i8 = 16;
pub const EAST: i8 = 1;
pub const WEST: i8 = -1;

pub const KNIGHT_OFFSETS: [i8; 8] = [-18, -33, -31, -14, 18, 33, 31, 14];
pub const BISHOP_OFFSETS: [i8; 4] = [-17, -15, 17, 15];
pub const ROOK_OFFSETS: [i8; 4] = [NORTH, EAST, SOUTH, WEST];
pub const KING_OFFSETS: [i8; 8] = [-17, NORTH, -15, EAST, 17, SOUTH, 15, WEST];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The direction this color's pawns advance in.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => NORTH,
            Color::Black => SOUTH,
        }
    }

    /// The board row holding this color's pieces at the start of a game.
    pub fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive, Serialize)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(kind)
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

pub static PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// The contents of one board slot: a piece type in the low three bits, with
/// bit 3 set for black pieces. Empty squares hold `NONE` and the padding
/// files of the 0x88 board hold `PADDING`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Piece(u8);

impl Piece {
    pub const NONE: Piece = Piece(0);
    pub const PADDING: Piece = Piece(0x10);

    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece(kind as u8 | (color as u8) << 3)
    }

    pub fn from_code(code: u8) -> Piece {
        Piece(code)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn kind(self) -> Option<PieceKind> {
        if self.0 > 15 {
            return None;
        }

        FromPrimitive::from_u8(self.0 & 7)
    }

    pub fn color(self) -> Color {
        if self.0 & 8 != 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn is_empty(self) -> bool {
        self == Piece::NONE
    }

    pub fn is_piece(self) -> bool {
        self.kind().is_some()
    }

    pub fn is(self, kind: PieceKind, color: Color) -> bool {
        self == Piece::new(kind, color)
    }

    pub fn belongs_to(self, color: Color) -> bool {
        self.is_piece() && self.color() == color
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let kind = PieceKind::from_char(c).ok_or(())?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind() {
            Some(kind) => kind,
            None => return f.write_char('.'),
        };

        let mut chr = match kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        if self.color() == Color::White {
            chr = chr.to_ascii_uppercase();
        }
        f.write_char(chr)
    }
}

/// Parses a one-character piece letter into its code. Anything else (the
/// empty string, several letters, an unknown letter) is the empty code.
pub fn piece(text: &str) -> Piece {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Piece::try_from(c).unwrap_or(Piece::NONE),
        _ => Piece::NONE,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// Slot of this castle in the four-entry castling rights array.
    pub fn index(self, color: Color) -> usize {
        color.as_index() * 2
            + match self {
                CastleSide::King => 0,
                CastleSide::Queen => 1,
            }
    }

    pub fn king_file(self) -> u8 {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }

    pub fn rook_file(self) -> u8 {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }
}

pub static CASTLE_SIDES: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

bitflags! {
    pub struct MoveFlags: u8 {
        const QUIET = 0b0000_0001;
        const CAPTURE = 0b0000_0010;
        const DOUBLE_PAWN_PUSH = 0b0000_0100;
        const EN_PASSANT = 0b0000_1000;
        const PROMOTION = 0b0001_0000;
        const KINGSIDE_CASTLE = 0b0010_0000;
        const QUEENSIDE_CASTLE = 0b0100_0000;
        const CASTLE = Self::KINGSIDE_CASTLE.bits | Self::QUEENSIDE_CASTLE.bits;
    }
}
