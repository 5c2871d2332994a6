// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp;

use crate::moves::{Move, MoveVec};
use crate::position::Position;
use crate::types::TableIndex;
use crate::types::{CastleSide, Color, MoveFlags, Piece, PieceKind, Square};
use crate::types::{BISHOP_OFFSETS, CASTLE_SIDES, COLORS, KING_OFFSETS, KNIGHT_OFFSETS};
use crate::types::{PROMOTION_KINDS, ROOK_OFFSETS};

/// Legal moves per piece type for each color, indexed by color and then by
/// piece type code. Slots 0 and 7 are always zero.
pub type Mobilities = [[u32; 8]; 2];

/// Generates pseudo-legal moves for the side to move: every move that obeys
/// the way the pieces move, whether or not it leaves the mover's king in
/// check. Castling is the exception; its check rules are enforced here
/// because they depend on squares the king only passes through.
pub struct MoveGenerator {
    chess960: bool,
    only_captures: bool,
}

impl MoveGenerator {
    pub fn new(chess960: bool, only_captures: bool) -> MoveGenerator {
        MoveGenerator {
            chess960,
            only_captures,
        }
    }

    pub fn generate_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let us = pos.side_to_move();
        for idx in 0..128u8 {
            let from = Square::new(idx);
            if !from.is_on_board() {
                continue;
            }

            let piece = pos.piece_at(from);
            if !piece.belongs_to(us) {
                continue;
            }

            match piece.kind() {
                Some(PieceKind::Pawn) => self.generate_pawn_moves(pos, from, piece, moves),
                Some(PieceKind::Knight) => {
                    self.generate_step_moves(pos, from, piece, &KNIGHT_OFFSETS, moves)
                }
                Some(PieceKind::Bishop) => {
                    self.generate_slider_moves(pos, from, piece, &BISHOP_OFFSETS, moves)
                }
                Some(PieceKind::Rook) => {
                    self.generate_slider_moves(pos, from, piece, &ROOK_OFFSETS, moves)
                }
                Some(PieceKind::Queen) => {
                    self.generate_slider_moves(pos, from, piece, &KING_OFFSETS, moves)
                }
                Some(PieceKind::King) => {
                    self.generate_step_moves(pos, from, piece, &KING_OFFSETS, moves);
                    if !self.only_captures {
                        self.generate_castling_moves(pos, from, piece, moves);
                    }
                }
                None => {}
            }
        }
    }

    fn generate_pawn_moves(&self, pos: &Position, from: Square, pawn: Piece, moves: &mut MoveVec) {
        let us = pawn.color();
        let forward = us.forward();
        let promotion_row = us.toggle().home_row();
        let start_row = match us {
            Color::White => 6,
            Color::Black => 1,
        };

        let one = from.offset(forward);
        if !self.only_captures && pos.piece_at(one).is_empty() {
            if one.row() == promotion_row {
                for &kind in &PROMOTION_KINDS {
                    push(moves, Move::promotion(from, one, pawn, None, kind));
                }
            } else {
                push(moves, Move::quiet(from, one, pawn));
                let two = one.offset(forward);
                if from.row() == start_row && pos.piece_at(two).is_empty() {
                    push(moves, Move::double_pawn_push(from, two, pawn));
                }
            }
        }

        for &side in &[forward - 1, forward + 1] {
            let to = from.offset(side);
            let target = pos.piece_at(to);
            if let Some(captured) = target.kind().filter(|_| target.color() != us) {
                if to.row() == promotion_row {
                    for &kind in &PROMOTION_KINDS {
                        push(moves, Move::promotion(from, to, pawn, Some(captured), kind));
                    }
                } else {
                    push(moves, Move::capture(from, to, pawn, captured));
                }
            } else if target.is_empty() && pos.en_passant_square() == Some(to) {
                // the pawn being taken sits beside us, behind the target square
                let victim = pos.piece_at(to.offset(-forward));
                if victim.is(PieceKind::Pawn, us.toggle()) {
                    push(moves, Move::en_passant(from, to, pawn));
                }
            }
        }
    }

    fn generate_step_moves(
        &self,
        pos: &Position,
        from: Square,
        piece: Piece,
        offsets: &[i8],
        moves: &mut MoveVec,
    ) {
        for &offset in offsets {
            let to = from.offset(offset);
            self.add_move_to(pos, from, to, piece, moves);
        }
    }

    fn generate_slider_moves(
        &self,
        pos: &Position,
        from: Square,
        piece: Piece,
        offsets: &[i8],
        moves: &mut MoveVec,
    ) {
        for &offset in offsets {
            let mut to = from.offset(offset);
            while pos.piece_at(to).is_empty() {
                if !self.only_captures {
                    push(moves, Move::quiet(from, to, piece));
                }
                to = to.offset(offset);
            }

            self.add_move_to(pos, from, to, piece, moves);
        }
    }

    /// Adds a quiet move or a capture, depending on what stands on `to`.
    /// Padding and our own pieces stop the move.
    fn add_move_to(&self, pos: &Position, from: Square, to: Square, piece: Piece, moves: &mut MoveVec) {
        let target = pos.piece_at(to);
        if target.is_empty() {
            if !self.only_captures {
                push(moves, Move::quiet(from, to, piece));
            }
        } else if let Some(captured) = target.kind().filter(|_| target.color() != piece.color()) {
            push(moves, Move::capture(from, to, piece, captured));
        }
    }

    fn generate_castling_moves(&self, pos: &Position, from: Square, king: Piece, moves: &mut MoveVec) {
        let us = king.color();
        let them = us.toggle();
        if from.row() != us.home_row() {
            return;
        }

        for &side in &CASTLE_SIDES {
            let (king_to, rook_from, rook_to) = match pos.castle_squares(us, side) {
                Some(squares) => squares,
                None => continue,
            };

            if !pos.piece_at(rook_from).is(PieceKind::Rook, us) {
                continue;
            }

            // Everything between the outermost squares the king and rook
            // start on or land on must be empty, except the two of them.
            let ends = [from, king_to, rook_from, rook_to];
            let lo = ends.iter().min().map_or(from, |&sq| sq).index();
            let hi = ends.iter().max().map_or(from, |&sq| sq).index();
            let blocked = (lo..=hi)
                .map(|idx| Square::new(idx as u8))
                .any(|sq| sq != from && sq != rook_from && !pos.piece_at(sq).is_empty());
            if blocked {
                continue;
            }

            // The king may not castle out of, through, or into check.
            let (path_lo, path_hi) = (cmp::min(from, king_to), cmp::max(from, king_to));
            let attacked = (path_lo.index()..=path_hi.index())
                .map(|idx| Square::new(idx as u8))
                .any(|sq| pos.attacked(them, sq));
            if attacked {
                continue;
            }

            let flags = match side {
                CastleSide::King => MoveFlags::KINGSIDE_CASTLE,
                CastleSide::Queen => MoveFlags::QUEENSIDE_CASTLE,
            };
            let on_home_square = from.file() == 4;
            let to = if self.chess960 || !on_home_square {
                rook_from
            } else {
                king_to
            };
            push(moves, Move::castle(from, to, king, flags));
        }
    }
}

fn push(moves: &mut MoveVec, mov: Move) {
    if moves.try_push(mov).is_err() {
        warn!("move list full, dropping {}", mov);
    }
}

//
// Legality, attacks and mobility
//

impl Position {
    /// The legal moves for the side to move. With `chess960`, castles are
    /// written as the king capturing its own rook.
    pub fn moves(&mut self, chess960: bool, only_captures: bool) -> MoveVec {
        let mut moves = MoveVec::default();
        MoveGenerator::new(chess960, only_captures).generate_moves(self, &mut moves);
        moves.retain(|&mut mov| self.is_legal_given_pseudolegal(mov));
        moves
    }

    /// Whether a pseudo-legal move leaves the mover's king safe, found by
    /// playing the move and taking it back.
    pub fn is_legal_given_pseudolegal(&mut self, mov: Move) -> bool {
        let us = self.side_to_move();
        if !self.apply_move(mov) {
            return false;
        }

        let legal = !self.checked(us);
        self.undo();
        legal
    }

    /// Whether any piece of `color` attacks `square`. Squares off the board
    /// are never attacked.
    pub fn attacked(&self, color: Color, square: Square) -> bool {
        if !square.is_on_board() {
            return false;
        }

        let back = -color.forward();
        for &side in &[back - 1, back + 1] {
            if self.piece_at(square.offset(side)).is(PieceKind::Pawn, color) {
                return true;
            }
        }

        for &offset in &KNIGHT_OFFSETS {
            if self.piece_at(square.offset(offset)).is(PieceKind::Knight, color) {
                return true;
            }
        }

        for &offset in &KING_OFFSETS {
            if self.piece_at(square.offset(offset)).is(PieceKind::King, color) {
                return true;
            }
        }

        let queen = Piece::new(PieceKind::Queen, color);
        let rays = [
            (&BISHOP_OFFSETS, Piece::new(PieceKind::Bishop, color)),
            (&ROOK_OFFSETS, Piece::new(PieceKind::Rook, color)),
        ];
        for &(offsets, slider) in rays.iter() {
            for &offset in offsets.iter() {
                let mut sq = square.offset(offset);
                while self.piece_at(sq).is_empty() {
                    sq = sq.offset(offset);
                }

                let blocker = self.piece_at(sq);
                if blocker == slider || blocker == queen {
                    return true;
                }
            }
        }

        false
    }

    /// Whether `color`'s king is attacked. A side without a king is never in
    /// check.
    pub fn checked(&self, color: Color) -> bool {
        self.king_square(color)
            .map_or(false, |king| self.attacked(color.toggle(), king))
    }

    pub fn mobilities(&mut self) -> Mobilities {
        let mut counts = [[0; 8]; 2];
        for &color in &COLORS {
            let moves = self.with_side_to_move(color, |pos| pos.moves(false, false));
            for mov in moves.iter() {
                // one destination, however many promotion choices it offers
                if mov.promote.map_or(false, |kind| kind != PieceKind::Queen) {
                    continue;
                }

                if let Some(kind) = mov.piece.kind() {
                    counts[color.as_index()][kind.as_index()] += 1;
                }
            }
        }

        counts
    }
}
