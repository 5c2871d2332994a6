// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt::Write;

use crate::position::{FenParseError, Position};

/// Counts the leaves of the legal move tree `depth` plies deep. A depth of
/// zero counts nothing.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 0;
    }

    leaves(pos, depth, false)
}

fn leaves(pos: &mut Position, depth: u32, chess960: bool) -> u64 {
    let moves = pos.moves(chess960, false);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut count = 0;
    for &mov in moves.iter() {
        pos.apply_move(mov);
        count += leaves(pos, depth - 1, chess960);
        pos.undo();
    }
    count
}

/// Tallies the nodes found on each ply below `pos`; `counts[0]` is the first
/// ply.
fn tally(pos: &mut Position, chess960: bool, counts: &mut [u64]) {
    let moves = pos.moves(chess960, false);
    counts[0] += moves.len() as u64;
    if counts.len() == 1 {
        return;
    }

    for &mov in moves.iter() {
        pos.apply_move(mov);
        tally(pos, chess960, &mut counts[1..]);
        pos.undo();
    }
}

/// A perft report: the node count of every ply up to `depth`, then the leaf
/// count below each root move, sorted by the move's UCI name.
///
/// ```text
/// 1=5 2=39 a4a3:8 a4a5:7 b5b6:8 h2h3:8 h2h4:8
/// ```
pub fn divide(pos: &mut Position, depth: u32, chess960: bool) -> String {
    if depth == 0 {
        return "0=0".to_string();
    }

    let mut counts = vec![0; depth as usize];
    let last = counts.len() - 1;
    let moves = pos.moves(chess960, false);
    counts[0] = moves.len() as u64;

    // a root move's leaves are whatever it adds to the deepest ply
    let mut roots: Vec<(String, u64)> = Vec::with_capacity(moves.len());
    for &mov in moves.iter() {
        let before = counts[last];
        pos.apply_move(mov);
        if depth > 1 {
            tally(pos, chess960, &mut counts[1..]);
        }
        pos.undo();

        let count = if depth == 1 { 1 } else { counts[last] - before };
        roots.push((mov.as_uci(), count));
    }
    roots.sort();

    let mut report = String::new();
    for (ply, count) in counts.iter().enumerate() {
        let _ = write!(report, "{}={} ", ply + 1, count);
    }
    for (uci, count) in &roots {
        let _ = write!(report, "{}:{} ", uci, count);
    }
    report.truncate(report.trim_end().len());
    report
}

impl Position {
    /// Loads `fen` and returns its perft report. Castles are named the
    /// Chess960 way when the FEN names castling rooks by file.
    pub fn perft_fen(fen: &str, depth: u32) -> Result<String, FenParseError> {
        let mut pos = Position::from_fen(fen)?;
        let chess960 = pos.uses_file_castling();
        Ok(divide(&mut pos, depth, chess960))
    }
}
