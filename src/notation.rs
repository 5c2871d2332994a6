// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move notation: SAN, UCI and PGN movetext.
//!
//! SAN parsing works by rendering every legal move in SAN and comparing, so
//! whatever this module writes it can also read. The sloppy mode additionally
//! accepts long algebraic moves (`b2b4`), over-disambiguated moves (`Nge7`)
//! and lowercase promotion letters (`d8=q`).
use pest::Parser;
use regex::Regex;

use crate::moves::Move;
use crate::position::Position;
use crate::types::{CastleSide, PieceKind, Square};

#[derive(Parser)]
#[grammar = "movetext.pest"]
struct MovetextParser;

lazy_static! {
    static ref SLOPPY_SAN: Regex =
        Regex::new(r"^([PNBRQK])?([a-h])?([1-8])?x?-?([a-h][1-8])([QRBNqrbn])?$")
            .expect("sloppy SAN pattern should compile");
}

/// A move that has been played, along with how it was written and the
/// position it led to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    #[serde(rename = "move")]
    pub mov: Move,
    pub san: String,
    pub fen: String,
    pub ply: i32,
}

/// Parses algebraic notation such as `e4` into a square. Files run past `h`
/// and ranks down to 0 so that padding squares have names too: `i8` is 8 and
/// `a0` is 128.
pub fn an_to_square(an: &str) -> Option<Square> {
    let bytes = an.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let file = bytes[0].checked_sub(b'a').filter(|&file| file < 16)?;
    let rank = bytes[1].checked_sub(b'0').filter(|&rank| rank <= 8)?;
    Some(Square::on_row(8 - rank, file))
}

/// Names a square. With `strict`, squares off the board have no name.
pub fn square_to_an(square: Square, strict: bool) -> String {
    if strict && !square.is_on_board() {
        return String::new();
    }

    square.to_string()
}

/// Strips check, mate, annotation and promotion punctuation from a SAN move.
pub fn clean_san(san: &str) -> String {
    san.chars().filter(|c| !"+#!?=".contains(*c)).collect()
}

/// The ply of the move that produced `fen`, counting white's first move as
/// ply 0. `None` if the side to move is missing or the ply does not fit.
pub fn ply_from_fen(fen: &str) -> Option<i32> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let fullmove = match fields.get(5) {
        Some(field) => field.parse::<i32>().ok()?,
        None => 1,
    };

    let ply = fullmove.checked_mul(2)?.checked_sub(2)?;
    match fields.get(1) {
        Some(&"b") => Some(ply),
        Some(&"w") => ply.checked_sub(1),
        _ => None,
    }
}

fn san_letter(kind: PieceKind) -> char {
    match kind {
        PieceKind::Pawn => 'P',
        PieceKind::Knight => 'N',
        PieceKind::Bishop => 'B',
        PieceKind::Rook => 'R',
        PieceKind::Queen => 'Q',
        PieceKind::King => 'K',
    }
}

fn is_move_number(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn is_result(token: &str) -> bool {
    match token {
        "1-0" | "0-1" | "1/2-1/2" | "*" => true,
        _ => false,
    }
}

//
// SAN
//

impl Position {
    /// Renders a move in SAN, disambiguating against `moves` (normally the
    /// legal moves of this position). No check or mate suffix is added.
    pub fn move_to_san(&self, mov: &Move, moves: &[Move]) -> String {
        if mov.is_kingside_castle() {
            return "O-O".to_string();
        }
        if mov.is_queenside_castle() {
            return "O-O-O".to_string();
        }

        let kind = match mov.piece.kind() {
            Some(kind) => kind,
            None => return String::new(),
        };

        let mut san = String::new();
        if kind == PieceKind::Pawn {
            if mov.is_capture() {
                san.push((b'a' + mov.from.file()) as char);
                san.push('x');
            }
            san.push_str(&mov.to.to_string());
            if let Some(promote) = mov.promote {
                san.push('=');
                san.push(san_letter(promote));
            }
            return san;
        }

        san.push(san_letter(kind));
        san.push_str(&disambiguator(mov, moves));
        if mov.is_capture() {
            san.push('x');
        }
        san.push_str(&mov.to.to_string());
        san
    }

    /// Finds the move in `moves` written as `san`. Check marks, annotations
    /// and the `=` of promotions are ignored.
    pub fn san_to_move(&self, san: &str, moves: &[Move], sloppy: bool) -> Option<Move> {
        let clean = clean_san(san);
        if clean.is_empty() {
            return None;
        }

        let exact = moves
            .iter()
            .find(|mov| clean_san(&self.move_to_san(mov, moves)) == clean);
        if let Some(mov) = exact {
            return Some(*mov);
        }

        if sloppy {
            self.sloppy_san_to_move(&clean, moves)
        } else {
            None
        }
    }

    fn sloppy_san_to_move(&self, clean: &str, moves: &[Move]) -> Option<Move> {
        let castle = match clean {
            "0-0" => Some(CastleSide::King),
            "0-0-0" => Some(CastleSide::Queen),
            _ => None,
        };
        if let Some(side) = castle {
            return moves
                .iter()
                .find(|mov| match side {
                    CastleSide::King => mov.is_kingside_castle(),
                    CastleSide::Queen => mov.is_queenside_castle(),
                })
                .cloned();
        }

        let caps = SLOPPY_SAN.captures(clean)?;
        let first_char = |idx: usize| caps.get(idx).and_then(|m| m.as_str().chars().next());
        let kind = first_char(1)
            .and_then(PieceKind::from_char)
            .unwrap_or(PieceKind::Pawn);
        let file = first_char(2).map(|c| c as u8 - b'a');
        let row = first_char(3).map(|c| b'8' - c as u8);
        let to = an_to_square(caps.get(4)?.as_str())?;
        let promote = first_char(5).and_then(PieceKind::from_char);

        let mut candidates = moves.iter().filter(|mov| {
            !mov.is_castle()
                && mov.piece.kind() == Some(kind)
                && mov.to == to
                && file.map_or(true, |file| mov.from.file() == file)
                && row.map_or(true, |row| mov.from.row() == row)
                && mov.promote == promote
        });

        let found = candidates.next()?;
        if candidates.next().is_some() {
            debug!("sloppy move {} is ambiguous", clean);
            return None;
        }
        Some(*found)
    }

    /// Renders a move in SAN with a `+` or `#` suffix when it gives check or
    /// mate.
    pub fn decorate(&mut self, mov: &Move) -> String {
        let moves = self.moves(false, false);
        let mut san = self.move_to_san(mov, &moves);
        if self.apply_move(*mov) {
            if let Some(suffix) = self.check_suffix() {
                san.push(suffix);
            }
            self.undo();
        }
        san
    }

    fn check_suffix(&mut self) -> Option<char> {
        let side = self.side_to_move();
        if !self.checked(side) {
            return None;
        }

        if self.moves(false, false).is_empty() {
            Some('#')
        } else {
            Some('+')
        }
    }

    /// Plays the move written as `san`, returning what was played, or `None`
    /// (leaving the position alone) if no legal move matches.
    pub fn move_san(
        &mut self,
        san: &str,
        chess960: bool,
        decorate: bool,
        sloppy: bool,
    ) -> Option<MoveRecord> {
        let moves = self.moves(chess960, false);
        let mov = self.san_to_move(san, &moves, sloppy)?;
        Some(self.commit(mov, &moves, decorate))
    }

    /// Plays a sequence of SAN moves written as PGN movetext, stopping at the
    /// first move that is not legal and returning the moves played so far.
    /// Move numbers, comments and the result are skipped; a comment that is
    /// never closed swallows the rest of the text.
    pub fn multi_san(&mut self, movetext: &str, chess960: bool, sloppy: bool) -> Vec<MoveRecord> {
        let mut records = Vec::new();
        let pairs = match MovetextParser::parse(Rule::movetext, movetext) {
            Ok(pairs) => pairs,
            Err(err) => {
                warn!("unreadable movetext: {}", err);
                return records;
            }
        };

        for pair in pairs.flatten().filter(|pair| pair.as_rule() == Rule::san) {
            match self.move_san(pair.as_str(), chess960, true, sloppy) {
                Some(record) => records.push(record),
                None => {
                    debug!("stopping at unplayable move {}", pair.as_str());
                    break;
                }
            }
        }

        records
    }

    fn commit(&mut self, mov: Move, moves: &[Move], decorate: bool) -> MoveRecord {
        let mut san = self.move_to_san(&mov, moves);
        self.apply_move(mov);
        if decorate {
            if let Some(suffix) = self.check_suffix() {
                san.push(suffix);
            }
        }

        let fen = self.fen();
        let ply = ply_from_fen(&fen).unwrap_or(0);
        MoveRecord { mov, san, fen, ply }
    }
}

/// The file, rank or square needed to tell `mov` apart from other moves of
/// the same kind of piece to the same square.
fn disambiguator(mov: &Move, moves: &[Move]) -> String {
    let rivals: Vec<&Move> = moves
        .iter()
        .filter(|other| {
            other.piece == mov.piece
                && other.to == mov.to
                && other.from != mov.from
                && !other.is_castle()
        })
        .collect();
    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|other| other.from.file() == mov.from.file());
    let shares_row = rivals.iter().any(|other| other.from.row() == mov.from.row());
    let square = mov.from.to_string();
    if !shares_file {
        square[..1].to_string()
    } else if !shares_row {
        square[1..].to_string()
    } else {
        square
    }
}

//
// UCI
//

impl Position {
    /// Finds the move in `moves` written in UCI notation. A castle may be
    /// written with the king's destination or as the king taking its rook. A
    /// promotion letter on a move that does not promote is ignored.
    pub fn uci_to_move(&self, uci: &str, moves: &[Move]) -> Option<Move> {
        if uci.len() > 5 {
            return None;
        }

        let from = an_to_square(uci.get(0..2)?).filter(|sq| sq.is_on_board())?;
        let to = an_to_square(uci.get(2..4)?).filter(|sq| sq.is_on_board())?;
        let promote = uci
            .get(4..)
            .and_then(|rest| rest.chars().next())
            .and_then(PieceKind::from_char);

        let exact = moves.iter().find(|mov| {
            !mov.is_castle()
                && mov.from == from
                && mov.to == to
                && (mov.promote.is_none() || mov.promote == promote)
        });
        if let Some(mov) = exact {
            return Some(*mov);
        }

        moves
            .iter()
            .find(|mov| mov.is_castle() && mov.from == from && self.is_castle_target(mov, to))
            .cloned()
    }

    fn is_castle_target(&self, mov: &Move, to: Square) -> bool {
        let side = if mov.is_kingside_castle() {
            CastleSide::King
        } else {
            CastleSide::Queen
        };

        match self.castle_squares(mov.piece.color(), side) {
            Some((king_to, rook_from, _)) => to == king_to || to == rook_from,
            None => false,
        }
    }

    /// Plays the move written as `uci`, returning what was played, or `None`
    /// (leaving the position alone) if no legal move matches.
    pub fn move_uci(&mut self, uci: &str, chess960: bool, decorate: bool) -> Option<MoveRecord> {
        let moves = self.moves(chess960, false);
        let mov = self.uci_to_move(uci, &moves)?;
        Some(self.commit(mov, &moves, decorate))
    }

    /// Plays whitespace-separated UCI moves, stopping at the first move that
    /// is not legal. Move numbers and results are skipped.
    pub fn multi_uci(&mut self, text: &str, chess960: bool) -> Vec<MoveRecord> {
        let mut records = Vec::new();
        for token in text.split_whitespace() {
            if is_move_number(token) || is_result(token) {
                continue;
            }

            match self.move_uci(token, chess960, true) {
                Some(record) => records.push(record),
                None => {
                    debug!("stopping at unplayable move {}", token);
                    break;
                }
            }
        }

        records
    }
}
