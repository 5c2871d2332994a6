// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};

use crate::moves::Move;
use crate::notation::an_to_square;
use crate::types::TableIndex;
use crate::types::{CastleSide, Color, Piece, PieceKind, Square};
use crate::types::{CASTLE_SIDES, COLORS};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedEnd,
    WrongRankCount,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece(char),
    InvalidSideToMove,
    InvalidCastle(char),
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of FEN"),
            FenParseError::WrongRankCount => write!(f, "piece placement does not have 8 ranks"),
            FenParseError::InvalidDigit => write!(f, "empty square count must be 1 through 8"),
            FenParseError::FileDoesNotSumToEight => write!(f, "rank does not sum to 8 files"),
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece '{}'", c),
            FenParseError::InvalidSideToMove => write!(f, "side to move must be 'w' or 'b'"),
            FenParseError::InvalidCastle(c) => write!(f, "invalid castling character '{}'", c),
            FenParseError::InvalidEnPassant => write!(f, "invalid en passant square"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove number"),
        }
    }
}

impl Error for FenParseError {}

/// Everything `undo` needs to put the board back exactly as it was before a
/// move was applied.
#[derive(Clone, Debug)]
struct Undo {
    mov: Move,
    moved: Piece,
    captured: Piece,
    captured_square: Square,
    king_to: Square,
    rook_squares: Option<(Square, Square)>,
    castling: [Option<Square>; 4],
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_clock: u32,
    kings: [Option<Square>; 2],
}

/// A chess position on a 0x88 board, together with the history of moves
/// applied to it.
///
/// Castling rights are stored as the square of the rook each castle would
/// use, which covers both standard chess and Chess960 with one model. The
/// slots are white king side, white queen side, black king side and black
/// queen side, in that order.
#[derive(Clone, Debug)]
pub struct Position {
    board: [Piece; 128],
    side_to_move: Color,
    castling: [Option<Square>; 4],
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_clock: u32,
    kings: [Option<Square>; 2],
    file_castling: bool,
    history: Vec<Undo>,
}

//
// Board state getters
//

impl Position {
    pub fn new() -> Position {
        let mut board = [Piece::PADDING; 128];
        for (idx, slot) in board.iter_mut().enumerate() {
            if Square::new(idx as u8).is_on_board() {
                *slot = Piece::NONE;
            }
        }

        Position {
            board,
            side_to_move: Color::White,
            castling: [None; 4],
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
            kings: [None; 2],
            file_castling: false,
            history: Vec::new(),
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    /// Castling rook squares: white king side, white queen side, black king
    /// side, black queen side.
    pub fn castling(&self) -> [Option<Square>; 4] {
        self.castling
    }

    pub fn castle_rook(&self, color: Color, side: CastleSide) -> Option<Square> {
        self.castling[side.index(color)]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.as_index()]
    }

    pub fn board(&self) -> &[Piece; 128] {
        &self.board
    }

    /// The piece on a square. Squares off the board read as padding.
    pub fn piece_at(&self, square: Square) -> Piece {
        if square.is_on_board() {
            self.board[square.index()]
        } else {
            Piece::PADDING
        }
    }

    /// Every square holding `piece`, in board order.
    pub fn squares_of(&self, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter(move |&(_, &slot)| slot == piece)
            .map(|(idx, _)| Square::new(idx as u8))
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether the castling field was read with rook file letters.
    pub fn uses_file_castling(&self) -> bool {
        self.file_castling
    }

    /// The king destination, rook origin and rook destination of a castle,
    /// if `color` still has the right to castle on that side.
    pub fn castle_squares(&self, color: Color, side: CastleSide) -> Option<(Square, Square, Square)> {
        let rook_from = self.castle_rook(color, side)?;
        let row = color.home_row();
        Some((
            Square::on_row(row, side.king_file()),
            rook_from,
            Square::on_row(row, side.rook_file()),
        ))
    }
}

//
// Move application and board manipulation
//

impl Position {
    /// Empties the board and resets every field to its default.
    pub fn clear(&mut self) {
        *self = Position::new();
    }

    pub fn reset(&mut self) {
        *self = Position::from_start_position();
    }

    /// Places a piece on a square, replacing whatever was there. Returns false
    /// and leaves the board alone for off-board squares or non-piece codes.
    pub fn put(&mut self, piece: Piece, square: Square) -> bool {
        if !square.is_on_board() || !piece.is_piece() {
            return false;
        }

        self.remove(square);
        self.board[square.index()] = piece;
        if piece.kind() == Some(PieceKind::King) {
            self.kings[piece.color().as_index()] = Some(square);
        }
        true
    }

    /// Removes and returns the piece on a square.
    pub fn remove(&mut self, square: Square) -> Piece {
        if !square.is_on_board() {
            return Piece::NONE;
        }

        let piece = self.board[square.index()];
        self.board[square.index()] = Piece::NONE;
        if piece.kind() == Some(PieceKind::King) {
            let slot = &mut self.kings[piece.color().as_index()];
            if *slot == Some(square) {
                *slot = None;
            }
        }
        piece
    }

    /// Runs `f` as if `color` were to move. An en passant target only belongs
    /// to the real side to move, so it is hidden while the other side looks.
    pub(crate) fn with_side_to_move<T, F>(&mut self, color: Color, f: F) -> T
    where
        F: FnOnce(&mut Position) -> T,
    {
        let side_to_move = self.side_to_move;
        let en_passant_square = self.en_passant_square;
        if color != side_to_move {
            self.side_to_move = color;
            self.en_passant_square = None;
        }

        let result = f(self);
        self.side_to_move = side_to_move;
        self.en_passant_square = en_passant_square;
        result
    }

    /// Applies a move without checking that it is legal and records how to
    /// reverse it. Returns false, changing nothing, if there is no piece on the
    /// move's origin square or the castle it describes is no longer available.
    pub fn apply_move(&mut self, mov: Move) -> bool {
        let from = mov.from;
        let to = mov.to;
        if !from.is_on_board() || !to.is_on_board() {
            debug!("refusing off-board move {}", mov);
            return false;
        }

        let moved = self.board[from.index()];
        let color = match moved.kind() {
            Some(_) => moved.color(),
            None => {
                debug!("refusing move {} from an empty square", mov);
                return false;
            }
        };

        let mut undo = Undo {
            mov,
            moved,
            captured: Piece::NONE,
            captured_square: to,
            king_to: to,
            rook_squares: None,
            castling: self.castling,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_clock: self.fullmove_clock,
            kings: self.kings,
        };

        let side = if mov.is_kingside_castle() {
            Some(CastleSide::King)
        } else if mov.is_queenside_castle() {
            Some(CastleSide::Queen)
        } else {
            None
        };

        if let Some(side) = side {
            let (king_to, rook_from, rook_to) = match self.castle_squares(color, side) {
                Some(squares) => squares,
                None => {
                    debug!("refusing castle {} without castling rights", mov);
                    return false;
                }
            };

            // In Chess960 the king and rook may land on each other's squares,
            // so both come off the board before either goes back on.
            self.board[from.index()] = Piece::NONE;
            self.board[rook_from.index()] = Piece::NONE;
            self.board[king_to.index()] = moved;
            self.board[rook_to.index()] = Piece::new(PieceKind::Rook, color);
            undo.king_to = king_to;
            undo.rook_squares = Some((rook_from, rook_to));
        } else {
            let captured_square = if mov.is_en_passant() {
                to.offset(-color.forward())
            } else {
                to
            };

            if captured_square.is_on_board() {
                undo.captured = self.board[captured_square.index()];
                self.board[captured_square.index()] = Piece::NONE;
            }
            undo.captured_square = captured_square;

            let placed = match mov.promote {
                Some(kind) => Piece::new(kind, color),
                None => moved,
            };
            self.board[from.index()] = Piece::NONE;
            self.board[to.index()] = placed;
        }

        if moved.kind() == Some(PieceKind::King) {
            self.kings[color.as_index()] = Some(undo.king_to);
            for &side in &CASTLE_SIDES {
                self.castling[side.index(color)] = None;
            }
        }

        if undo.captured.kind() == Some(PieceKind::King) {
            self.kings[undo.captured.color().as_index()] = None;
        }

        // A right dies with its rook, whether the rook moved or was captured.
        for slot in self.castling.iter_mut() {
            if *slot == Some(from) || *slot == Some(undo.captured_square) {
                *slot = None;
            }
        }

        self.en_passant_square = if mov.is_double_pawn_push() {
            Some(Square::new(((from.index() + to.index()) / 2) as u8))
        } else {
            None
        };

        if moved.kind() == Some(PieceKind::Pawn) || undo.captured.is_piece() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if self.side_to_move == Color::Black {
            self.fullmove_clock = self.fullmove_clock.saturating_add(1);
        }

        self.side_to_move = self.side_to_move.toggle();
        self.history.push(undo);
        true
    }

    /// Reverses the most recently applied move. Does nothing if no move has
    /// been applied since the position was loaded.
    pub fn undo(&mut self) {
        let undo = match self.history.pop() {
            Some(undo) => undo,
            None => return,
        };

        let mov = undo.mov;
        if let Some((rook_from, rook_to)) = undo.rook_squares {
            let rook = self.board[rook_to.index()];
            self.board[undo.king_to.index()] = Piece::NONE;
            self.board[rook_to.index()] = Piece::NONE;
            self.board[rook_from.index()] = rook;
            self.board[mov.from.index()] = undo.moved;
        } else {
            self.board[mov.to.index()] = Piece::NONE;
            if undo.captured_square.is_on_board() {
                self.board[undo.captured_square.index()] = undo.captured;
            }
            self.board[mov.from.index()] = undo.moved;
        }

        self.castling = undo.castling;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_clock = undo.fullmove_clock;
        self.kings = undo.kings;
        self.side_to_move = self.side_to_move.toggle();
    }
}

//
// FEN parsing and generation.
//
// Castling rights may be written either as KQkq, meaning the outermost rook on
// that side of the king, or as the files of the castling rooks (X-FEN and
// Shredder-FEN, used for Chess960).
//

impl Position {
    pub fn from_start_position() -> Position {
        let mut pos = Position::new();
        let _ = pos.load(START_FEN);
        pos
    }

    /// Constructs a new position from a FEN representation of a board position.
    /// The castling, en passant and clock fields may be omitted.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        fn eat_placement(pos: &mut Position, field: &str) -> Result<(), FenParseError> {
            let ranks: Vec<&str> = field.split('/').collect();
            if ranks.len() != 8 {
                return Err(FenParseError::WrongRankCount);
            }

            for (row, rank) in ranks.iter().enumerate() {
                let mut file = 0u8;
                for c in rank.chars() {
                    // digits 1 through 8 indicate empty squares.
                    if let Some(digit) = c.to_digit(10) {
                        if digit < 1 || digit > 8 {
                            return Err(FenParseError::InvalidDigit);
                        }

                        file += digit as u8;
                    } else {
                        let piece =
                            Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                        if file >= 8 {
                            return Err(FenParseError::FileDoesNotSumToEight);
                        }

                        pos.put(piece, Square::on_row(row as u8, file));
                        file += 1;
                    }

                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }
                }

                if file != 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }
            }

            Ok(())
        }

        fn eat_side_to_move(field: &str) -> Result<Color, FenParseError> {
            match field {
                "w" => Ok(Color::White),
                "b" => Ok(Color::Black),
                _ => Err(FenParseError::InvalidSideToMove),
            }
        }

        fn eat_castle_status(pos: &mut Position, field: &str) -> Result<(), FenParseError> {
            if field == "-" {
                return Ok(());
            }

            for c in field.chars() {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let rook = Piece::new(PieceKind::Rook, color);
                let row = color.home_row();
                let lower = c.to_ascii_lowercase();
                if lower != 'k' && lower != 'q' && (lower < 'a' || lower > 'h') {
                    return Err(FenParseError::InvalidCastle(c));
                }

                let king = match pos.king_square(color) {
                    Some(king) if king.row() == row => king,
                    _ => {
                        debug!("ignoring castling right '{}' without a king at home", c);
                        continue;
                    }
                };

                let found = match lower {
                    'k' => (king.file() + 1..8)
                        .rev()
                        .map(|file| Square::on_row(row, file))
                        .find(|&sq| pos.piece_at(sq) == rook),
                    'q' => (0..king.file())
                        .map(|file| Square::on_row(row, file))
                        .find(|&sq| pos.piece_at(sq) == rook),
                    _ => {
                        pos.file_castling = true;
                        let sq = Square::on_row(row, lower as u8 - b'a');
                        if pos.piece_at(sq) == rook && sq != king {
                            Some(sq)
                        } else {
                            None
                        }
                    }
                };

                match found {
                    Some(sq) => {
                        let side = if sq.file() > king.file() {
                            CastleSide::King
                        } else {
                            CastleSide::Queen
                        };
                        pos.castling[side.index(color)] = Some(sq);
                    }
                    None => debug!("ignoring castling right '{}' without a rook", c),
                }
            }

            Ok(())
        }

        fn eat_en_passant(field: &str) -> Result<Option<Square>, FenParseError> {
            if field == "-" {
                return Ok(None);
            }

            match an_to_square(field) {
                Some(sq) if sq.is_on_board() => Ok(Some(sq)),
                _ => Err(FenParseError::InvalidEnPassant),
            }
        }

        fn eat_clock(field: &str, err: FenParseError) -> Result<u32, FenParseError> {
            field.parse::<u32>().map_err(|_| err)
        }

        let mut pos = Position::new();
        let mut fields = fen.as_ref().split_whitespace();
        let placement = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        eat_placement(&mut pos, placement)?;
        let side = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        pos.side_to_move = eat_side_to_move(side)?;
        eat_castle_status(&mut pos, fields.next().unwrap_or("-"))?;
        pos.en_passant_square = eat_en_passant(fields.next().unwrap_or("-"))?;
        pos.halfmove_clock = eat_clock(fields.next().unwrap_or("0"), FenParseError::InvalidHalfmove)?;
        pos.fullmove_clock = eat_clock(fields.next().unwrap_or("1"), FenParseError::InvalidFullmove)?;
        Ok(pos)
    }

    /// Replaces this position with the one described by `fen`. On failure the
    /// position is left untouched.
    pub fn load(&mut self, fen: &str) -> Result<(), FenParseError> {
        *self = Position::from_fen(fen)?;
        Ok(())
    }

    pub fn fen(&self) -> String {
        let mut buf = String::new();
        for row in 0..8 {
            let mut empty_squares = 0;
            for file in 0..8 {
                let piece = self.piece_at(Square::on_row(row, file));
                if piece.is_piece() {
                    if empty_squares != 0 {
                        let _ = write!(&mut buf, "{}", empty_squares);
                    }
                    let _ = write!(&mut buf, "{}", piece);
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                let _ = write!(&mut buf, "{}", empty_squares);
            }

            if row != 7 {
                buf.push('/');
            }
        }

        let _ = write!(&mut buf, " {} {} ", self.side_to_move, self.castling_field());
        match self.en_passant_square {
            Some(ep_square) => {
                let _ = write!(&mut buf, "{}", ep_square);
            }
            None => buf.push('-'),
        }
        let _ = write!(&mut buf, " {} {}", self.halfmove_clock, self.fullmove_clock);
        buf
    }

    /// The FEN of the position as it stands now, castling field included in
    /// whichever notation the current rights need.
    pub fn current_fen(&self) -> String {
        self.fen()
    }

    fn castling_field(&self) -> String {
        // KQkq can only name outermost rooks; anything else needs rook files.
        let by_file = self.file_castling
            || self
                .castling
                .iter()
                .flatten()
                .any(|sq| sq.file() != 0 && sq.file() != 7);

        let mut field = String::new();
        for &color in &COLORS {
            for &side in &CASTLE_SIDES {
                let rook = match self.castle_rook(color, side) {
                    Some(rook) => rook,
                    None => continue,
                };

                let c = if by_file {
                    (b'a' + rook.file()) as char
                } else if side == CastleSide::King {
                    'k'
                } else {
                    'q'
                };
                field.push(match color {
                    Color::White => c.to_ascii_uppercase(),
                    Color::Black => c,
                });
            }
        }

        if field.is_empty() {
            field.push('-');
        }
        field
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8 {
            for file in 0..8 {
                write!(f, " {} ", self.piece_at(Square::on_row(row, file)))?;
            }

            writeln!(f, "| {}", 8 - row)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 0..8u8 {
            write!(f, " {} ", (b'a' + file) as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

#[cfg(test)]
mod tests {
    mod fen {
        use crate::position::{FenParseError, Position, START_FEN};
        use crate::types::{Color, PieceKind, Square};

        #[test]
        fn fen_smoke() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();

            // white's turn to move.
            assert_eq!(Color::White, pos.side_to_move());

            // no castling.
            assert_eq!([None; 4], pos.castling());

            // no en passant.
            assert!(pos.en_passant_square().is_none());

            // both clocks as given.
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(1, pos.fullmove_clock());
        }

        #[test]
        fn start_position_round_trip() {
            let pos = Position::from_start_position();
            assert_eq!(START_FEN, pos.fen());
            assert_eq!(
                [
                    Some(Square::new(119)),
                    Some(Square::new(112)),
                    Some(Square::new(7)),
                    Some(Square::new(0))
                ],
                pos.castling()
            );
            assert_eq!(Some(Square::new(116)), pos.king_square(Color::White));
            assert_eq!(Some(Square::new(4)), pos.king_square(Color::Black));
        }

        #[test]
        fn missing_clocks_default() {
            let pos =
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
            assert_eq!(START_FEN, pos.fen());
        }

        #[test]
        fn padding_is_distinct_from_empty() {
            let pos = Position::new();
            let board = pos.board();
            assert!(board[0].is_empty());
            assert!(!board[8].is_empty());
            assert!(!board[8].is_piece());
            assert!(!pos.piece_at(Square::new(123)).is_empty());
        }

        #[test]
        fn pieces_land_on_their_squares() {
            let pos = Position::from_start_position();
            let d1 = pos.piece_at(Square::new(115));
            assert_eq!(Some(PieceKind::Queen), d1.kind());
            assert_eq!(Color::White, d1.color());

            let e8 = pos.piece_at(Square::new(4));
            assert_eq!(Some(PieceKind::King), e8.kind());
            assert_eq!(Color::Black, e8.color());
        }

        #[test]
        fn chess960_outer_rooks_written_as_files() {
            let pos = Position::from_fen("rknrbqnb/pppppppp/8/8/8/8/PPPPPPPP/RKNRBQNB w KQkq - 0 1")
                .unwrap();
            assert_eq!(
                "rknrbqnb/pppppppp/8/8/8/8/PPPPPPPP/RKNRBQNB w DAda - 0 1",
                pos.fen()
            );
            assert_eq!(
                [
                    Some(Square::new(115)),
                    Some(Square::new(112)),
                    Some(Square::new(3)),
                    Some(Square::new(0))
                ],
                pos.castling()
            );
        }

        #[test]
        fn classical_rights_stay_classical() {
            let fen = "rbqk3r/8/8/8/8/8/8/R3K2R b KQkq - 2 10";
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(fen, pos.fen());
        }

        #[test]
        fn file_letters_stay_file_letters() {
            let fen = "r3k2r/8/8/8/8/8/8/R3K2R w ha - 0 1";
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(fen, pos.fen());
            assert_eq!(
                [None, None, Some(Square::new(7)), Some(Square::new(0))],
                pos.castling()
            );
            assert!(pos.uses_file_castling());
        }

        #[test]
        fn inner_rook_by_file() {
            let fen = "1r2k1r1/8/8/8/8/8/8/1R2K1R1 w GBgb - 0 1";
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(fen, pos.fen());
            assert_eq!(Some(Square::new(118)), pos.castling()[0]);
            assert_eq!(Some(Square::new(113)), pos.castling()[1]);
        }

        #[test]
        fn castle_letter_without_rook_is_skipped() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1").unwrap();
            assert_eq!([Some(Square::new(119)), None, None, None], pos.castling());
        }

        #[test]
        fn en_passant_square() {
            let pos = Position::from_fen(
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            )
            .unwrap();
            assert_eq!(Some(Square::new(84)), pos.en_passant_square());
        }

        #[test]
        fn errors() {
            let cases = [
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
                    FenParseError::WrongRankCount,
                ),
                (
                    "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                    FenParseError::InvalidDigit,
                ),
                (
                    "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                    FenParseError::FileDoesNotSumToEight,
                ),
                (
                    "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                    FenParseError::FileDoesNotSumToEight,
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
                    FenParseError::UnknownPiece('X'),
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
                    FenParseError::UnexpectedEnd,
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
                    FenParseError::InvalidSideToMove,
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KZkq - 0 1",
                    FenParseError::InvalidCastle('Z'),
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1",
                    FenParseError::InvalidEnPassant,
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
                    FenParseError::InvalidHalfmove,
                ),
                (
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 -1",
                    FenParseError::InvalidFullmove,
                ),
            ];

            for (fen, err) in cases.iter() {
                assert_eq!(Err(*err), Position::from_fen(fen).map(|_| ()), "{}", fen);
            }
        }

        #[test]
        fn failed_load_keeps_position() {
            let mut pos = Position::from_start_position();
            assert!(pos.load("not a fen").is_err());
            assert_eq!(START_FEN, pos.fen());
        }
    }

    mod board {
        use crate::position::{Position, START_FEN};
        use crate::types::{piece, Color, Square};

        #[test]
        fn clear_empties_everything() {
            let mut pos = Position::from_start_position();
            pos.clear();
            assert_eq!("8/8/8/8/8/8/8/8 w - - 0 1", pos.fen());
            assert_eq!(None, pos.king_square(Color::White));
            pos.reset();
            assert_eq!(START_FEN, pos.fen());
        }

        #[test]
        fn put_and_remove() {
            let mut pos = Position::new();
            assert!(pos.put(piece("q"), Square::new(3)));
            assert_eq!("3q4/8/8/8/8/8/8/8 w - - 0 1", pos.fen());

            // off the board, nothing happens
            assert!(!pos.put(piece("Q"), Square::new(123)));
            assert!(!pos.put(piece("T"), Square::new(0)));
            assert_eq!("3q4/8/8/8/8/8/8/8 w - - 0 1", pos.fen());

            assert!(pos.put(piece("K"), Square::new(116)));
            assert_eq!(Some(Square::new(116)), pos.king_square(Color::White));
            assert_eq!(piece("K"), pos.remove(Square::new(116)));
            assert_eq!(None, pos.king_square(Color::White));
            assert!(pos.remove(Square::new(116)).is_empty());
        }

        #[test]
        fn put_keeps_castling() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
            pos.put(piece("q"), Square::new(3));
            assert_eq!("3qk3/8/8/8/8/8/8/R3K2R w KQ - 0 1", pos.fen());
        }
    }

    mod apply {
        use crate::moves::Move;
        use crate::position::{Position, START_FEN};
        use crate::types::{Color, MoveFlags, Piece, PieceKind, Square};

        fn white(kind: PieceKind) -> Piece {
            Piece::new(kind, Color::White)
        }

        fn black(kind: PieceKind) -> Piece {
            Piece::new(kind, Color::Black)
        }

        #[test]
        fn double_pawn_push() {
            let mut pos = Position::from_start_position();
            let mov = Move::double_pawn_push(Square::new(100), Square::new(68), white(PieceKind::Pawn));
            assert!(pos.apply_move(mov));
            assert_eq!(
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
                pos.fen()
            );
            assert_eq!(1, pos.history_len());

            pos.undo();
            assert_eq!(START_FEN, pos.fen());
            assert_eq!(0, pos.history_len());
        }

        #[test]
        fn undo_without_history_is_noop() {
            let mut pos = Position::from_start_position();
            pos.undo();
            assert_eq!(START_FEN, pos.fen());
        }

        #[test]
        fn empty_origin_is_refused() {
            let mut pos = Position::from_start_position();
            let mov = Move::quiet(Square::new(68), Square::new(52), white(PieceKind::Pawn));
            assert!(!pos.apply_move(mov));
            assert_eq!(START_FEN, pos.fen());
            assert_eq!(0, pos.history_len());
        }

        #[test]
        fn quiet_move_ticks_clocks() {
            let mut pos = Position::from_start_position();
            let knight = Move::quiet(Square::new(118), Square::new(85), white(PieceKind::Knight));
            pos.apply_move(knight);
            let reply = Move::quiet(Square::new(6), Square::new(37), black(PieceKind::Knight));
            pos.apply_move(reply);
            assert_eq!(
                "rnbqkb1r/pppppppp/5n2/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 2 2",
                pos.fen()
            );
        }

        #[test]
        fn en_passant_capture() {
            let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
            let mut pos = Position::from_fen(fen).unwrap();
            let mov = Move::en_passant(Square::new(67), Square::new(84), black(PieceKind::Pawn));
            assert!(pos.apply_move(mov));
            assert_eq!(
                "rnbqkbnr/ppp1pppp/8/8/8/4p3/PPPP1PPP/RNBQKBNR w KQkq - 0 4",
                pos.fen()
            );

            pos.undo();
            assert_eq!(fen, pos.fen());
        }

        #[test]
        fn capture_promotion_kills_castle() {
            let fen = "r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1";
            let mut pos = Position::from_fen(fen).unwrap();
            let mov = Move::promotion(
                Square::new(17),
                Square::new(0),
                white(PieceKind::Pawn),
                Some(PieceKind::Rook),
                PieceKind::Queen,
            );
            assert!(pos.apply_move(mov));
            assert_eq!("Q3k3/8/8/8/8/8/8/4K3 b - - 0 1", pos.fen());

            pos.undo();
            assert_eq!(fen, pos.fen());
        }

        #[test]
        fn chess960_castle_and_undo() {
            let fen = "rbqk3r/8/8/8/8/8/8/R3K2R b KQkq - 2 10";
            let mut pos = Position::from_fen(fen).unwrap();
            let mov = Move::castle(
                Square::new(3),
                Square::new(7),
                black(PieceKind::King),
                MoveFlags::KINGSIDE_CASTLE,
            );
            assert!(pos.apply_move(mov));
            assert_eq!("rbq2rk1/8/8/8/8/8/8/R3K2R w KQ - 3 11", pos.fen());
            assert_eq!(Some(Square::new(6)), pos.king_square(Color::Black));

            pos.undo();
            assert_eq!(fen, pos.fen());
            assert_eq!(Some(Square::new(3)), pos.king_square(Color::Black));
        }

        #[test]
        fn king_lands_on_rook_square() {
            // king f1, rook g1: castling king side swaps them onto g1 and f1
            let fen = "4k3/8/8/8/8/8/8/5KR1 w G - 0 1";
            let mut pos = Position::from_fen(fen).unwrap();
            let mov = Move::castle(
                Square::new(117),
                Square::new(118),
                white(PieceKind::King),
                MoveFlags::KINGSIDE_CASTLE,
            );
            assert!(pos.apply_move(mov));
            assert_eq!("4k3/8/8/8/8/8/8/5RK1 b - - 1 1", pos.fen());

            pos.undo();
            assert_eq!(fen, pos.fen());
        }

        #[test]
        fn rook_move_drops_one_right() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            let mov = Move::quiet(Square::new(119), Square::new(118), white(PieceKind::Rook));
            pos.apply_move(mov);
            assert_eq!("r3k2r/8/8/8/8/8/8/R3K1R1 b Qkq - 1 1", pos.fen());
        }

        #[test]
        fn castle_without_right_is_refused() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
            let mov = Move::castle(
                Square::new(116),
                Square::new(118),
                white(PieceKind::King),
                MoveFlags::KINGSIDE_CASTLE,
            );
            assert!(!pos.apply_move(mov));
        }
    }
}
