// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp::{self, Reverse};
use std::time::Instant;

use crate::config::{Config, SearchKind};
use crate::eval::{mated, piece_value, DisplayScore, DRAW_SCORE, INFINITY};
use crate::moves::Move;
use crate::position::Position;
use crate::types::PieceKind;

/// A negamax game tree searcher. Scores are always relative to the side to
/// move at the node being scored.
pub struct Searcher {
    config: Config,
    nodes: u64,
    start_time: Instant,
    stopped: bool,
}

impl Searcher {
    pub fn new(config: Config) -> Searcher {
        Searcher {
            config,
            nodes: 0,
            start_time: Instant::now(),
            stopped: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Nodes visited by the last search: every static evaluation and every
    /// checkmate or stalemate reached.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether the last search ran out of nodes or time before finishing.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Searches each of `moves` (the legal moves of `pos`) to the configured
    /// depth and returns them with their scores filled in. `mask` optionally
    /// restricts the search to a space-separated list of UCI moves.
    ///
    /// Under alpha-beta only the best score is exact; the others are upper
    /// bounds. If the search runs out of budget, only the moves that were
    /// searched completely are returned. At depth 0 nothing is searched and
    /// the moves come back unscored.
    ///
    /// Positions at the horizon get their static score without a look at
    /// whether they are mate, so a mate found by the last ply of the search
    /// scores as an ordinary position.
    pub fn search(&mut self, pos: &mut Position, moves: &[Move], mask: &str) -> Vec<Move> {
        self.nodes = 0;
        self.stopped = false;
        self.start_time = Instant::now();

        let masked: Vec<&str> = mask.split_whitespace().collect();
        let mut root: Vec<Move> = moves
            .iter()
            .filter(|mov| masked.is_empty() || masked.contains(&mov.as_uci().as_str()))
            .cloned()
            .collect();

        let depth = self.config.max_depth;
        if depth == 0 || root.is_empty() {
            return root;
        }

        let alpha_beta = self.config.search == SearchKind::AlphaBeta;
        if alpha_beta {
            order(&mut root);
        }

        info!(
            "searching {} moves to depth {} with {:?}/{:?}",
            root.len(),
            depth,
            self.config.search,
            self.config.evaluator
        );

        let mut alpha = -INFINITY;
        let mut searched = Vec::with_capacity(root.len());
        for mut mov in root {
            if !pos.apply_move(mov) {
                continue;
            }

            let score = if alpha_beta {
                -self.alpha_beta(pos, -INFINITY, -alpha, depth - 1)
            } else {
                -self.minimax(pos, depth - 1)
            };
            pos.undo();

            if self.stopped {
                info!("search stopped after {} nodes", self.nodes);
                break;
            }

            debug!("root move {} scored {}", mov, DisplayScore(score));
            mov.score = score;
            alpha = cmp::max(alpha, score);
            searched.push(mov);
        }

        if let Some(best) = best_move(&searched) {
            info!(
                "best move {} ({}), {} nodes in {:?}",
                best,
                DisplayScore(best.score),
                self.nodes,
                self.start_time.elapsed()
            );
        }
        searched
    }

    fn minimax(&mut self, pos: &mut Position, depth: u32) -> i32 {
        if self.out_of_budget() {
            return 0;
        }

        if depth == 0 {
            return self.leaf(pos, -INFINITY, INFINITY);
        }

        let moves = pos.moves(self.config.chess960, false);
        if moves.is_empty() {
            return self.terminal(pos, depth);
        }

        let mut best = -INFINITY;
        for &mov in moves.iter() {
            pos.apply_move(mov);
            let score = -self.minimax(pos, depth - 1);
            pos.undo();
            if self.stopped {
                return 0;
            }

            best = cmp::max(best, score);
        }

        best
    }

    fn alpha_beta(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, depth: u32) -> i32 {
        if self.out_of_budget() {
            return 0;
        }

        if depth == 0 {
            return self.leaf(pos, alpha, beta);
        }

        let mut moves = pos.moves(self.config.chess960, false);
        if moves.is_empty() {
            return self.terminal(pos, depth);
        }

        order(&mut moves);
        let mut best = -INFINITY;
        for &mov in moves.iter() {
            pos.apply_move(mov);
            let score = -self.alpha_beta(pos, -beta, -alpha, depth - 1);
            pos.undo();
            if self.stopped {
                return 0;
            }

            best = cmp::max(best, score);
            alpha = cmp::max(alpha, score);
            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// Scores a node at the nominal search horizon. Checkmate and stalemate
    /// are not detected here.
    fn leaf(&mut self, pos: &mut Position, alpha: i32, beta: i32) -> i32 {
        if self.config.quiescence > 0 {
            return self.quiesce(pos, alpha, beta, self.config.quiescence);
        }

        self.nodes += 1;
        self.config.evaluator.evaluate(pos)
    }

    /// Extends the search through captures. The side to move may always
    /// decline to capture, so the static evaluation is a floor on the score.
    fn quiesce(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, depth: u32) -> i32 {
        if self.out_of_budget() {
            return 0;
        }

        self.nodes += 1;
        let stand_pat = self.config.evaluator.evaluate(pos);
        if depth == 0 {
            return stand_pat;
        }

        let prune = self.config.search == SearchKind::AlphaBeta;
        if prune {
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = cmp::max(alpha, stand_pat);
        }

        let mut captures = pos.moves(self.config.chess960, true);
        if prune {
            order(&mut captures);
        }

        let mut best = stand_pat;
        for &mov in captures.iter() {
            pos.apply_move(mov);
            let score = -self.quiesce(pos, -beta, -alpha, depth - 1);
            pos.undo();
            if self.stopped {
                return 0;
            }

            best = cmp::max(best, score);
            if prune {
                alpha = cmp::max(alpha, score);
                if alpha >= beta {
                    break;
                }
            }
        }

        best
    }

    /// Scores a position with no legal moves.
    fn terminal(&mut self, pos: &Position, depth: u32) -> i32 {
        self.nodes += 1;
        if pos.checked(pos.side_to_move()) {
            mated(depth)
        } else {
            DRAW_SCORE
        }
    }

    fn out_of_budget(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        let out_of_nodes = self.nodes >= self.config.max_nodes;
        let out_of_time = self
            .config
            .max_time
            .map_or(false, |budget| self.start_time.elapsed() > budget);
        if out_of_nodes || out_of_time {
            debug!("out of budget after {} nodes", self.nodes);
            self.stopped = true;
        }

        self.stopped
    }
}

fn order_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 1000,
        kind => piece_value(kind),
    }
}

fn order_key(mov: &Move) -> i32 {
    if let Some(victim) = mov.capture {
        let attacker = mov.piece.kind().map_or(0, order_value);
        return 10_000 + 10 * order_value(victim) - attacker;
    }

    match mov.promote {
        // bishops go ahead of knights even though they are worth the same
        Some(kind) => 5_000 + piece_value(kind) + kind as i32,
        None if mov.is_castle() => 1_000,
        None => 0,
    }
}

/// Sorts moves so that the likeliest to cause a cutoff come first: captures
/// of valuable pieces by cheap ones, then promotions, then castles, then
/// everything else in its original order.
pub fn order(moves: &mut [Move]) {
    moves.sort_by_key(|mov| Reverse(order_key(mov)));
}

/// The highest scoring move, the first one on ties.
pub fn best_move(moves: &[Move]) -> Option<Move> {
    moves.iter().fold(None, |best: Option<Move>, &mov| match best {
        Some(best) if best.score >= mov.score => Some(best),
        _ => Some(mov),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{is_mate_score, Evaluator};

    fn run(fen: &str, options: &str, depth: i32, mask: &str) -> (Vec<Move>, Searcher) {
        let mut pos = Position::from_fen(fen).unwrap();
        let config = Config::parse(false, options, depth);
        let moves = pos.moves(false, false);
        let mut searcher = Searcher::new(config);
        let results = searcher.search(&mut pos, &moves, mask);
        assert_eq!(fen, pos.fen());
        (results, searcher)
    }

    fn score_of(results: &[Move], uci: &str) -> i32 {
        results
            .iter()
            .find(|mov| mov.as_uci() == uci)
            .map(|mov| mov.score)
            .unwrap()
    }

    #[test]
    fn ordering() {
        let mut pos = Position::from_fen("8/1PP5/4k3/8/6Pp/4pK2/8/8 w - - 0 47").unwrap();
        let mut moves = pos.moves(false, false);
        order(&mut moves);
        let ucis: Vec<String> = moves.iter().map(|mov| mov.as_uci()).collect();
        assert_eq!(
            "f3e3 b7b8q c7c8q b7b8r c7c8r b7b8b c7c8b b7b8n c7c8n g4g5 f3e4 f3f4 f3g2 f3e2",
            ucis.join(" ")
        );
    }

    #[test]
    fn castles_follow_captures() {
        let fen = "bn2r1rn/p2pk1p1/1p1p1pp1/1q6/1PP1P1B1/3P4/6RP/4RK1N w E - 0 18";
        let mut pos = Position::from_fen(fen).unwrap();
        let mut moves = pos.moves(true, false);
        order(&mut moves);
        let ucis: Vec<String> = moves.iter().take(3).map(|mov| mov.as_uci()).collect();
        assert_eq!(vec!["c4b5", "g4d7", "f1e1"], ucis);
        assert!(moves[3..].iter().all(|mov| mov.is_quiet() && !mov.is_castle()));

        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let mut moves = pos.moves(false, false);
        order(&mut moves);
        let ucis: Vec<String> = moves.iter().take(2).map(|mov| mov.as_uci()).collect();
        assert_eq!(vec!["e1g1", "e1c1"], ucis);
    }

    #[test]
    fn ordering_prefers_cheap_attackers() {
        let mut pos = Position::from_fen("4k3/8/8/3r4/2P5/8/3Q4/4K3 w - - 0 1").unwrap();
        let mut moves = pos.moves(false, false);
        order(&mut moves);
        assert_eq!("c4d5", moves[0].as_uci());
        assert_eq!("d2d5", moves[1].as_uci());
    }

    #[test]
    fn horizon_mates_score_statically() {
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        let (results, _) = run(fen, "d=1 e=mat", 4, "a1a8");
        assert_eq!(500, results[0].score);
        assert!(!is_mate_score(results[0].score));

        let (results, _) = run(fen, "d=2 e=mat", 4, "a1a8");
        assert!(is_mate_score(results[0].score));
    }

    #[test]
    fn minimax_nodes_match_perft() {
        for &(depth, nodes) in &[(1, 20), (2, 400), (3, 8902)] {
            let (results, searcher) =
                run(crate::position::START_FEN, "s=mm e=null", depth, "");
            assert_eq!(20, results.len());
            assert_eq!(nodes, searcher.nodes(), "depth {}", depth);
            assert!(!searcher.stopped());
        }
    }

    #[test]
    fn alpha_beta_agrees_with_minimax() {
        let fens = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4nk2/7Q/8/4p1N1/r3P3/q1P1NPP1/4K3/6R1 w - - 2 73",
        ];
        for fen in fens.iter() {
            let (mm, mm_searcher) = run(fen, "d=3 s=mm e=mat", 4, "");
            let (ab, ab_searcher) = run(fen, "d=3 s=ab e=mat", 4, "");
            assert_eq!(
                best_move(&mm).map(|mov| mov.score),
                best_move(&ab).map(|mov| mov.score),
                "{}",
                fen
            );
            assert!(ab_searcher.nodes() <= mm_searcher.nodes(), "{}", fen);
        }
    }

    #[test]
    fn material_scores() {
        let fen = "rnbqkbnr/p3ppQp/1p1p4/1N6/8/8/PPP1PPPP/R1B1KBNR b KQkq - 0 5";
        let (results, _) = run(fen, "", 1, "");
        let best = best_move(&results).unwrap();
        assert_eq!("f8g7", best.as_uci());
        assert_eq!(800, best.score);

        let (results, _) = run(fen, "", 1, "b8c6");
        assert_eq!(1, results.len());
        assert_eq!(-100, results[0].score);

        let (results, _) = run(fen, "", 2, "b8c6");
        assert_eq!(-600, results[0].score);
    }

    #[test]
    fn finds_mate_and_stalemate() {
        let (results, _) = run("8/6Q1/7p/7k/4P3/P2P2K1/8/8 w - - 0 75", "d=2 e=mat s=mm", 4, "");
        let best = best_move(&results).unwrap();
        assert!(is_mate_score(best.score));
        assert!(best.score > 0);
        assert_eq!(best.score, score_of(&results, "g7g4"));
        assert_eq!(0, score_of(&results, "g3h3"));
    }

    #[test]
    fn back_rank_mate() {
        let (results, _) = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "", 2, "");
        let best = best_move(&results).unwrap();
        assert_eq!("a1a8", best.as_uci());
        assert_eq!(-mated(1), best.score);
    }

    #[test]
    fn mate_scores_grow_with_remaining_depth() {
        let (shallow, _) = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "s=mm", 2, "a1a8");
        let (deep, _) = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "s=mm", 4, "a1a8");
        assert!(deep[0].score > shallow[0].score);
    }

    #[test]
    fn quiescence_sees_recapture() {
        let fen = "rn1qkbnr/pp2pppp/8/2pp4/1P5P/2PQ1P2/P3P1P1/RNB1KBNR w KQkq c6 0 7";
        let (results, _) = run(fen, "d=1 e=mat", 4, "d3h7");
        assert_eq!(300, results[0].score);

        for &options in &["d=1 e=mat q=1 s=ab", "d=1 e=mat q=1 s=mm"] {
            let (results, _) = run(fen, options, 4, "d3h7");
            assert_eq!(-600, results[0].score, "{}", options);
        }
    }

    #[test]
    fn depth_zero_scores_nothing() {
        let (results, searcher) = run(crate::position::START_FEN, "d=0", 4, "");
        assert_eq!(20, results.len());
        assert!(results.iter().all(|mov| mov.score == 0));
        assert_eq!(0, searcher.nodes());
    }

    #[test]
    fn node_budget_stops_search() {
        let (results, searcher) = run(crate::position::START_FEN, "d=3 n=500 s=mm", 4, "");
        assert!(searcher.stopped());
        assert_eq!(1, results.len());
        assert!(searcher.nodes() <= 500);
    }

    #[test]
    fn mask_restricts_root() {
        let (results, _) = run(crate::position::START_FEN, "d=2", 4, "e2e4 d2d4 a1a2");
        let mut ucis: Vec<String> = results.iter().map(|mov| mov.as_uci()).collect();
        ucis.sort();
        assert_eq!(vec!["d2d4", "e2e4"], ucis);
    }

    #[test]
    fn searcher_keeps_config() {
        let config = Config::parse(true, "e=hce", 3);
        let searcher = Searcher::new(config.clone());
        assert_eq!(&config, searcher.config());
        assert_eq!(Evaluator::Heuristic, searcher.config().evaluator);
    }
}
