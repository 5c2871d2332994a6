// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use fischer::{fen960, Color, Position};

/// Plays every legal move two plies deep and checks that undoing each one
/// restores the position exactly.
fn undo_restores(fen: &str, chess960: bool) {
    let mut pos = Position::from_fen(fen).unwrap();
    let start = pos.fen();
    for &first in pos.clone().moves(chess960, false).iter() {
        assert!(pos.apply_move(first));
        let after_first = pos.fen();
        for &second in pos.clone().moves(chess960, false).iter() {
            assert!(pos.apply_move(second));
            pos.undo();
            assert_eq!(after_first, pos.fen(), "undo of {} after {}", second, first);
        }
        pos.undo();
        assert_eq!(start, pos.fen(), "undo of {}", first);
    }
    assert_eq!(0, pos.history_len());
}

#[test]
fn undo_round_trips() {
    undo_restores("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", false);
    undo_restores(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        false,
    );
    undo_restores("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w HAha - 0 1", true);
    undo_restores("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", false);
    undo_restores("8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1", false);
}

#[test]
fn undo_round_trips_chess960() {
    for &index in &[0, 118, 644, 959] {
        let fen = fen960(index).unwrap();
        undo_restores(&fen, true);
    }
}

#[test]
fn played_sequence_unwinds() {
    let fen = "r1b1kb1r/p1pp1ppp/1p2pn2/7q/1nPPP3/BP1B1N1P/P4PP1/RN1Q1RK1 b ha - 0 1";
    let mut pos = Position::from_fen(fen).unwrap();
    let mut fens = vec![pos.fen()];
    for san in &["Nxd3", "Bxf8", "Nb2", "Qc2", "Rxf8", "Qxb2", "Nxe4"] {
        assert!(pos.move_san(san, true, false, false).is_some(), "{}", san);
        fens.push(pos.fen());
    }

    assert_eq!(7, pos.history_len());
    while let Some(expected) = fens.pop() {
        assert_eq!(expected, pos.fen());
        pos.undo();
    }
    assert_eq!(fen, pos.fen());
}

#[test]
fn check_matches_attack_on_king() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "4k3/8/8/8/8/8/4r3/4K3 w - - 0 1",
        "3r2r1/pp3p1k/8/7P/4q2K/1P5P/P7/3R4 w - - 0 30",
        "8/5Np1/3k4/p2p4/6P1/7P/1Pn2K2/8 b - - 6 47",
    ];
    for fen in fens.iter() {
        let pos = Position::from_fen(fen).unwrap();
        for &color in &[Color::White, Color::Black] {
            let king = pos.king_square(color).unwrap();
            assert_eq!(pos.checked(color), pos.attacked(color.toggle(), king), "{}", fen);
        }
    }
}

#[test]
fn fen_round_trips() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "2r3k1/7p/4pQpP/1R2Pq2/3P1P2/PR6/1K6/8 b - - 0 42",
        "rknrbqnb/pppppppp/8/8/8/8/PPPPPPPP/RKNRBQNB w DAda - 0 1",
        "8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1",
        "4k1r1/p2rbpp1/1q2p1n1/2pb3p/5P1P/1PB1P1P1/2Q1BN2/R3K1R1 w Gg - 2 21",
    ];
    for fen in fens.iter() {
        assert_eq!(*fen, Position::from_fen(fen).unwrap().fen());
    }
}
