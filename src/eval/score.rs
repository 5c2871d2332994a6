// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scores are plain centipawn integers, relative to the side to move. Mates
//! are encoded beyond `MATE_SCORE` so that they compare above (or below)
//! every material score, with quicker mates scoring further out.
use std::fmt;

/// Base score of a checkmate. A side that is mated with `d` plies of search
/// left scores `-(MATE_SCORE + d)`, so mates found sooner are preferred.
pub const MATE_SCORE: i32 = 32_000;

pub const DRAW_SCORE: i32 = 0;

/// Bound of every search window; no evaluation reaches it.
pub const INFINITY: i32 = 1_000_000;

/// The deepest search whose mate scores are still recognized.
const MAX_MATE_DEPTH: i32 = 1_000;

/// The score of being checkmated with `remaining_depth` plies left to search.
pub fn mated(remaining_depth: u32) -> i32 {
    -(MATE_SCORE + remaining_depth as i32)
}

pub fn is_mate_score(score: i32) -> bool {
    let magnitude = score.abs();
    magnitude >= MATE_SCORE && magnitude < MATE_SCORE + MAX_MATE_DEPTH
}

/// Formats a score for people: centipawns, or `#` followed by the signed
/// depth surplus for mates.
pub struct DisplayScore(pub i32);

impl fmt::Display for DisplayScore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let score = self.0;
        if !is_mate_score(score) {
            return write!(f, "{}", score);
        }

        let surplus = score.abs() - MATE_SCORE;
        if score > 0 {
            write!(f, "#{}", surplus)
        } else {
            write!(f, "#-{}", surplus)
        }
    }
}
