// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Chess960 starting positions, numbered the way Scharnagl numbers them.
use crate::types::PieceKind;

/// The number of distinct Chess960 starting positions.
pub const POSITION_COUNT: i32 = 960;

/// Index of the standard chess starting position.
pub const STANDARD_INDEX: i32 = 518;

const KNIGHT_PLACEMENTS: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

/// The back rank of the Chess960 starting position `index`, a-file first.
pub fn back_rank(index: i32) -> Option<[PieceKind; 8]> {
    if index < 0 || index >= POSITION_COUNT {
        return None;
    }

    let mut rank: [Option<PieceKind>; 8] = [None; 8];
    let mut n = index as usize;

    rank[2 * (n % 4) + 1] = Some(PieceKind::Bishop);
    n /= 4;
    rank[2 * (n % 4)] = Some(PieceKind::Bishop);
    n /= 4;

    place_on_empty(&mut rank, n % 6, PieceKind::Queen);
    n /= 6;

    // the second knight goes in first so the first one's index still counts
    // the same empty squares
    let (first, second) = KNIGHT_PLACEMENTS[n];
    place_on_empty(&mut rank, second, PieceKind::Knight);
    place_on_empty(&mut rank, first, PieceKind::Knight);

    for &kind in &[PieceKind::Rook, PieceKind::King, PieceKind::Rook] {
        place_on_empty(&mut rank, 0, kind);
    }

    let mut pieces = [PieceKind::Pawn; 8];
    for (slot, piece) in pieces.iter_mut().zip(rank.iter()) {
        *slot = (*piece)?;
    }
    Some(pieces)
}

fn place_on_empty(rank: &mut [Option<PieceKind>; 8], nth: usize, kind: PieceKind) {
    if let Some(slot) = rank.iter_mut().filter(|slot| slot.is_none()).nth(nth) {
        *slot = Some(kind);
    }
}

/// The FEN of the Chess960 starting position `index`, or `None` outside
/// `0..960`. Castling rights are written with rook files.
pub fn fen960(index: i32) -> Option<String> {
    let rank = back_rank(index)?;
    let black: String = rank.iter().map(|kind| kind.to_string()).collect();
    let white = black.to_ascii_uppercase();

    let rook_files: Vec<char> = rank
        .iter()
        .enumerate()
        .filter(|&(_, &kind)| kind == PieceKind::Rook)
        .map(|(file, _)| (b'a' + file as u8) as char)
        .rev()
        .collect();
    let black_castle: String = rook_files.iter().collect();
    let white_castle = black_castle.to_ascii_uppercase();

    Some(format!(
        "{}/pppppppp/8/8/8/8/PPPPPPPP/{} w {}{} - 0 1",
        black, white, white_castle, black_castle
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, START_FEN};

    #[test]
    fn known_positions() {
        assert_eq!(
            "bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w HFhf - 0 1",
            fen960(0).unwrap()
        );
        assert_eq!(
            "nqbrnbkr/pppppppp/8/8/8/8/PPPPPPPP/NQBRNBKR w HDhd - 0 1",
            fen960(118).unwrap()
        );
        assert_eq!(
            "rbbnkrqn/pppppppp/8/8/8/8/PPPPPPPP/RBBNKRQN w FAfa - 0 1",
            fen960(644).unwrap()
        );
        assert_eq!(
            "rkrnnqbb/pppppppp/8/8/8/8/PPPPPPPP/RKRNNQBB w CAca - 0 1",
            fen960(959).unwrap()
        );
    }

    #[test]
    fn standard_array() {
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1",
            fen960(STANDARD_INDEX).unwrap()
        );

        let pos = Position::from_fen(fen960(STANDARD_INDEX).unwrap()).unwrap();
        assert_eq!(Position::from_fen(START_FEN).unwrap().board()[..], pos.board()[..]);
    }

    #[test]
    fn out_of_range() {
        assert_eq!(None, fen960(-1));
        assert_eq!(None, fen960(POSITION_COUNT));
        assert_eq!(None, back_rank(i32::max_value()));
    }

    #[test]
    fn every_position_is_well_formed() {
        for index in 0..POSITION_COUNT {
            let rank = back_rank(index).unwrap();
            let files_of = |wanted: PieceKind| -> Vec<usize> {
                rank.iter()
                    .enumerate()
                    .filter(|&(_, &kind)| kind == wanted)
                    .map(|(file, _)| file)
                    .collect()
            };

            let bishops = files_of(PieceKind::Bishop);
            assert_eq!(2, bishops.len());
            assert_ne!(bishops[0] % 2, bishops[1] % 2, "index {}", index);

            let rooks = files_of(PieceKind::Rook);
            let king = files_of(PieceKind::King);
            assert_eq!(1, king.len());
            assert!(rooks[0] < king[0] && king[0] < rooks[1], "index {}", index);

            assert_eq!(2, files_of(PieceKind::Knight).len());
            assert_eq!(1, files_of(PieceKind::Queen).len());

            let fen = fen960(index).unwrap();
            let pos = Position::from_fen(&fen).unwrap();
            assert_eq!(fen, pos.fen());
        }
    }
}
