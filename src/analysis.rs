// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square};

/// Pawn structure queries on a static position, for use by the heuristic
/// evaluator. The pawns of each color are collected once up front.
pub struct Analysis {
    pawns: [Vec<Square>; 2],
}

impl Analysis {
    pub fn new(pos: &Position) -> Analysis {
        let pawns_of = |color| {
            pos.squares_of(Piece::new(PieceKind::Pawn, color))
                .collect::<Vec<_>>()
        };

        Analysis {
            pawns: [pawns_of(Color::White), pawns_of(Color::Black)],
        }
    }

    fn pawns(&self, color: Color) -> &[Square] {
        match color {
            Color::White => &self.pawns[0],
            Color::Black => &self.pawns[1],
        }
    }

    fn on_file(&self, color: Color, file: u8) -> impl Iterator<Item = &Square> {
        self.pawns(color).iter().filter(move |sq| sq.file() == file)
    }

    fn on_adjacent_files(&self, color: Color, file: u8) -> impl Iterator<Item = &Square> {
        self.pawns(color)
            .iter()
            .filter(move |sq| sq.file() + 1 == file || sq.file() == file + 1)
    }

    /// Pawns sharing their file with another pawn of the same color.
    pub fn doubled_pawns(&self, color: Color) -> Vec<Square> {
        self.pawns(color)
            .iter()
            .filter(|sq| self.on_file(color, sq.file()).count() > 1)
            .cloned()
            .collect()
    }

    /// Pawns with no friendly pawn on either neighboring file.
    pub fn isolated_pawns(&self, color: Color) -> Vec<Square> {
        self.pawns(color)
            .iter()
            .filter(|sq| self.on_adjacent_files(color, sq.file()).next().is_none())
            .cloned()
            .collect()
    }

    /// Pawns that trail every friendly pawn on the neighboring files. Walking
    /// up the board from the color's own side, a file's pawn is backward if it
    /// is reached before any pawn on the adjacent files.
    pub fn backward_pawns(&self, color: Color) -> Vec<Square> {
        // how far up the board a row is, from this color's point of view
        let advance = |sq: &Square| match color {
            Color::White => 7 - sq.row(),
            Color::Black => sq.row(),
        };

        let mut answer = Vec::new();
        for file in 0..8 {
            let rearmost = match self.on_file(color, file).min_by_key(|sq| advance(*sq)) {
                Some(sq) => *sq,
                None => continue,
            };

            let supported = self
                .on_adjacent_files(color, file)
                .any(|sq| advance(sq) <= advance(&rearmost));
            if !supported && self.on_adjacent_files(color, file).next().is_some() {
                answer.push(rearmost);
            }
        }

        answer
    }
}

#[cfg(test)]
mod tests {
    use super::Analysis;

    use crate::notation::an_to_square;
    use crate::position::Position;
    use crate::types::{Color, Square};

    fn sq(an: &str) -> Square {
        an_to_square(an).unwrap()
    }

    #[test]
    fn doubled_pawn_smoke() {
        let pos = Position::from_fen("8/6P1/2P5/4P3/2P2P2/PP1P2P1/P7/8 w - - 0 1").unwrap();
        let analysis = Analysis::new(&pos);
        let doubled_pawns = analysis.doubled_pawns(Color::White);

        assert!(doubled_pawns.contains(&sq("a2")));
        assert!(doubled_pawns.contains(&sq("a3")));

        assert!(!doubled_pawns.contains(&sq("b3")));

        assert!(doubled_pawns.contains(&sq("c4")));
        assert!(doubled_pawns.contains(&sq("c6")));

        assert!(!doubled_pawns.contains(&sq("d3")));
        assert!(!doubled_pawns.contains(&sq("e5")));
        assert!(!doubled_pawns.contains(&sq("f4")));

        assert!(doubled_pawns.contains(&sq("g3")));
        assert!(doubled_pawns.contains(&sq("g7")));
        assert_eq!(6, doubled_pawns.len());
    }

    #[test]
    fn backward_pawn_smoke() {
        let pos = Position::from_fen("8/8/8/8/8/2P1P3/3P4/8 w - - 0 1").unwrap();
        let analysis = Analysis::new(&pos);
        assert_eq!(vec![sq("d2")], analysis.backward_pawns(Color::White));
    }

    #[test]
    fn backward_pawn_smoke_black() {
        let pos = Position::from_fen("8/3p4/2p1p3/8/8/8/8/8 b - - 0 1").unwrap();
        let analysis = Analysis::new(&pos);
        assert_eq!(vec![sq("d7")], analysis.backward_pawns(Color::Black));
    }

    #[test]
    fn level_pawns_are_not_backward() {
        let pos = Position::from_start_position();
        let analysis = Analysis::new(&pos);
        assert!(analysis.backward_pawns(Color::White).is_empty());
        assert!(analysis.backward_pawns(Color::Black).is_empty());
    }

    #[test]
    fn isolated_pawn_smoke() {
        let pos = Position::from_fen("8/8/8/8/8/3P1P2/6P1/8 w - - 0 1").unwrap();
        let analysis = Analysis::new(&pos);
        assert_eq!(vec![sq("d3")], analysis.isolated_pawns(Color::White));
        assert!(analysis.isolated_pawns(Color::Black).is_empty());
    }
}
