// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine with Chess960 support: FEN, SAN and UCI notation,
//! legal move generation, move application with undo, static evaluation,
//! minimax and alpha-beta search, and perft.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate pest_derive;

mod analysis;
mod chess960;
pub mod config;
pub mod eval;
mod move_generator;
mod moves;
mod notation;
mod perft;
mod position;
pub mod search;
mod types;

pub use chess960::{back_rank, fen960, POSITION_COUNT, STANDARD_INDEX};
pub use config::{Config, SearchKind};
pub use eval::Evaluator;
pub use move_generator::{Mobilities, MoveGenerator};
pub use moves::{Move, MoveVec};
pub use notation::{an_to_square, clean_san, ply_from_fen, square_to_an, MoveRecord};
pub use perft::{divide, perft};
pub use position::{FenParseError, Position, START_FEN};
pub use search::Searcher;
pub use types::{piece, CastleSide, Color, MoveFlags, Piece, PieceKind, Square};
