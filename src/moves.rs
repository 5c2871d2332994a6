// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;
use serde::Serializer;
use std::fmt::{self, Display, Write};

use crate::types::{MoveFlags, Piece, PieceKind, Square};

/// A list of moves, large enough for every legal chess position.
pub type MoveVec = ArrayVec<[Move; 256]>;

/// A move, as produced by the move generator or reconstructed from notation.
///
/// `piece` is the full code of the moving piece, while `capture` and `promote`
/// only carry piece types. For castling, `to` is either the king's destination
/// or the castling rook's square depending on how the move was generated; the
/// flags alone identify a castle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub capture: Option<PieceKind>,
    pub promote: Option<PieceKind>,
    #[serde(serialize_with = "serialize_flags")]
    pub flags: MoveFlags,
    pub score: i32,
}

fn serialize_flags<S: Serializer>(flags: &MoveFlags, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(flags.bits())
}

impl Move {
    pub fn null() -> Move {
        Move {
            from: Square::new(0),
            to: Square::new(0),
            piece: Piece::NONE,
            capture: None,
            promote: None,
            flags: MoveFlags::empty(),
            score: 0,
        }
    }

    pub fn quiet(from: Square, to: Square, piece: Piece) -> Move {
        Move {
            from,
            to,
            piece,
            flags: MoveFlags::QUIET,
            ..Move::null()
        }
    }

    pub fn capture(from: Square, to: Square, piece: Piece, captured: PieceKind) -> Move {
        Move {
            from,
            to,
            piece,
            capture: Some(captured),
            flags: MoveFlags::CAPTURE,
            ..Move::null()
        }
    }

    pub fn double_pawn_push(from: Square, to: Square, piece: Piece) -> Move {
        Move {
            from,
            to,
            piece,
            flags: MoveFlags::DOUBLE_PAWN_PUSH,
            ..Move::null()
        }
    }

    pub fn en_passant(from: Square, to: Square, piece: Piece) -> Move {
        Move {
            from,
            to,
            piece,
            capture: Some(PieceKind::Pawn),
            flags: MoveFlags::EN_PASSANT,
            ..Move::null()
        }
    }

    pub fn promotion(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<PieceKind>,
        promote: PieceKind,
    ) -> Move {
        let base = if captured.is_some() {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::QUIET
        };
        Move {
            from,
            to,
            piece,
            capture: captured,
            promote: Some(promote),
            flags: base | MoveFlags::PROMOTION,
            score: 0,
        }
    }

    pub fn castle(from: Square, to: Square, piece: Piece, flags: MoveFlags) -> Move {
        Move {
            from,
            to,
            piece,
            flags,
            ..Move::null()
        }
    }

    pub fn is_null(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn is_capture(&self) -> bool {
        self.flags
            .intersects(MoveFlags::CAPTURE | MoveFlags::EN_PASSANT)
    }

    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_double_pawn_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    pub fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    pub fn is_castle(&self) -> bool {
        self.flags.intersects(MoveFlags::CASTLE)
    }

    pub fn is_kingside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::KINGSIDE_CASTLE)
    }

    pub fn is_queenside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::QUEENSIDE_CASTLE)
    }

    pub fn is_quiet(&self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    pub fn as_uci(&self) -> String {
        self.to_string()
    }
}

impl Default for Move {
    fn default() -> Move {
        Move::null()
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }

        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promote {
            f.write_char(match kind {
                PieceKind::Knight => 'n',
                PieceKind::Bishop => 'b',
                PieceKind::Rook => 'r',
                _ => 'q',
            })?;
        }
        Ok(())
    }
}
