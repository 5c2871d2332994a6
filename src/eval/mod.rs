// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;
use crate::types::TableIndex;
use crate::types::{Color, Piece, PieceKind, PIECE_KINDS};

mod heuristic;
mod score;

pub use score::{is_mate_score, mated, DisplayScore, DRAW_SCORE, INFINITY, MATE_SCORE};

/// Weight of one legal move, indexed by the moving piece's type code.
const MOBILITY_WEIGHTS: [i32; 8] = [0, 1, 4, 3, 3, 2, 0, 0];

/// The static evaluation strategies. All of them score a position from the
/// point of view of the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluator {
    /// Every position is level.
    Null,
    /// Material balance.
    Material,
    /// Weighted difference of legal move counts.
    Mobility,
    /// Material, mobility, piece placement, pawn structure and king safety.
    Heuristic,
}

impl Evaluator {
    /// Looks up an evaluator by its option name. `qui` names the heuristic
    /// evaluator too; it additionally turns on quiescence search, which is
    /// the configuration's business.
    pub fn from_name(name: &str) -> Option<Evaluator> {
        let eval = match name {
            "null" => Evaluator::Null,
            "mat" => Evaluator::Material,
            "mob" => Evaluator::Mobility,
            "hce" | "qui" => Evaluator::Heuristic,
            _ => return None,
        };
        Some(eval)
    }

    /// Scores `pos` for its side to move. Mobility is recomputed from the
    /// position every time, which is why the position is borrowed mutably;
    /// it is left as it was found.
    pub fn evaluate(self, pos: &mut Position) -> i32 {
        match self {
            Evaluator::Null => 0,
            Evaluator::Material => material_balance(pos),
            Evaluator::Mobility => mobility_score(pos),
            Evaluator::Heuristic => {
                let positional = match pos.side_to_move() {
                    Color::White => heuristic::positional(pos),
                    Color::Black => -heuristic::positional(pos),
                };
                material_balance(pos) + mobility_score(pos) + positional
            }
        }
    }
}

impl Default for Evaluator {
    fn default() -> Evaluator {
        Evaluator::Material
    }
}

pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight | PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

impl Position {
    /// Total value of `color`'s pieces.
    pub fn material(&self, color: Color) -> i32 {
        PIECE_KINDS
            .iter()
            .map(|&kind| {
                piece_value(kind) * self.squares_of(Piece::new(kind, color)).count() as i32
            })
            .sum()
    }
}

fn material_balance(pos: &Position) -> i32 {
    let us = pos.side_to_move();
    pos.material(us) - pos.material(us.toggle())
}

/// Weighted mobility of the side to move minus that of its opponent.
pub fn mobility_score(pos: &mut Position) -> i32 {
    let us = pos.side_to_move();
    let counts = pos.mobilities();
    let weighted = |color: Color| -> i32 {
        counts[color.as_index()]
            .iter()
            .zip(MOBILITY_WEIGHTS.iter())
            .map(|(&count, &weight)| count as i32 * weight)
            .sum()
    };

    weighted(us) - weighted(us.toggle())
}
