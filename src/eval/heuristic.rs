// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Positional terms of the heuristic evaluator. Every term is computed for
//! white and black separately and reported as white minus black.
use crate::analysis::Analysis;
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square};
use crate::types::COLORS;

const DOUBLED_PAWN: i32 = -15;
const ISOLATED_PAWN: i32 = -10;
const BACKWARD_PAWN: i32 = -8;
const PAWN_SHIELD: i32 = 10;

// Tables are laid out as seen from white, eighth rank first.
#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

fn table_entry(table: &[i32; 64], color: Color, square: Square) -> i32 {
    let row = match color {
        Color::White => square.row(),
        Color::Black => 7 - square.row(),
    };
    table[(row * 8 + square.file()) as usize]
}

fn placement(pos: &Position, color: Color) -> i32 {
    let mut total = 0;
    for &(kind, table) in &[
        (PieceKind::Knight, &KNIGHT_TABLE),
        (PieceKind::Bishop, &BISHOP_TABLE),
        (PieceKind::King, &KING_TABLE),
    ] {
        total += pos
            .squares_of(Piece::new(kind, color))
            .map(|sq| table_entry(table, color, sq))
            .sum::<i32>();
    }
    total
}

fn pawn_structure(analysis: &Analysis, color: Color) -> i32 {
    DOUBLED_PAWN * analysis.doubled_pawns(color).len() as i32
        + ISOLATED_PAWN * analysis.isolated_pawns(color).len() as i32
        + BACKWARD_PAWN * analysis.backward_pawns(color).len() as i32
}

/// Own pawns on the three squares directly in front of the king.
fn king_shield(pos: &Position, color: Color) -> i32 {
    let king = match pos.king_square(color) {
        Some(king) => king,
        None => return 0,
    };

    let pawn = Piece::new(PieceKind::Pawn, color);
    let ahead = king.offset(color.forward());
    let shield = [ahead.offset(-1), ahead, ahead.offset(1)]
        .iter()
        .filter(|&&sq| pos.piece_at(sq) == pawn)
        .count();
    PAWN_SHIELD * shield as i32
}

/// Piece placement, pawn structure and king safety, as white minus black.
pub fn positional(pos: &Position) -> i32 {
    let analysis = Analysis::new(pos);
    let mut score = 0;
    for &color in &COLORS {
        let side = placement(pos, color) + pawn_structure(&analysis, color) + king_shield(pos, color);
        score += match color {
            Color::White => side,
            Color::Black => -side,
        };
    }
    score
}
