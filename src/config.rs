// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search configuration, read from a string of `key=value` options:
//!
//! | key | meaning                                              |
//! |-----|------------------------------------------------------|
//! | `d` | depth; `-N` keeps the depth and allows N seconds      |
//! | `e` | evaluator: `null`, `mat`, `mob`, `hce` or `qui`      |
//! | `n` | node budget                                          |
//! | `s` | search: `mm` (minimax) or `ab` (alpha-beta)          |
//! | `t` | time budget in seconds, 0 for none                   |
//! | `q` | quiescence: `on`, `off` or a depth                   |
//!
//! Unknown keys and values that do not parse are skipped.
use std::time::Duration;

use crate::eval::Evaluator;

pub const DEFAULT_DEPTH: u32 = 8;
pub const DEFAULT_MAX_NODES: u64 = 1_000_000_000;
pub const DEFAULT_QUIESCENCE_DEPTH: u32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Minimax,
    AlphaBeta,
}

impl SearchKind {
    pub fn from_name(name: &str) -> Option<SearchKind> {
        match name {
            "mm" => Some(SearchKind::Minimax),
            "ab" => Some(SearchKind::AlphaBeta),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Config {
    pub chess960: bool,
    pub search: SearchKind,
    pub evaluator: Evaluator,
    pub max_depth: u32,
    pub max_nodes: u64,
    pub max_time: Option<Duration>,
    /// Plies of capture-only search past the nominal depth; 0 disables it.
    pub quiescence: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            chess960: false,
            search: SearchKind::AlphaBeta,
            evaluator: Evaluator::default(),
            max_depth: DEFAULT_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            max_time: None,
            quiescence: 0,
        }
    }
}

impl Config {
    /// Builds a configuration from an option string. `depth` is the depth to
    /// use when the options do not name one; a negative value selects the
    /// built-in default.
    pub fn parse(chess960: bool, options: &str, depth: i32) -> Config {
        let default_depth = if depth < 0 {
            DEFAULT_DEPTH
        } else {
            depth as u32
        };

        let mut config = Config {
            chess960,
            max_depth: default_depth,
            ..Config::default()
        };

        let mut quiescence = None;
        let mut wants_quiescence = false;
        for token in options.split_whitespace() {
            let mut parts = token.splitn(2, '=');
            let (key, value) = match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => (key, value),
                _ => {
                    debug!("ignoring option `{}`", token);
                    continue;
                }
            };

            let understood = match key {
                "d" => value.parse::<i64>().ok().map(|d| {
                    if d < 0 {
                        config.max_time = Some(Duration::from_secs(d.unsigned_abs()));
                    } else {
                        config.max_depth = d.min(i64::from(u32::max_value())) as u32;
                    }
                }),
                "e" => Evaluator::from_name(value).map(|eval| {
                    config.evaluator = eval;
                    wants_quiescence = value == "qui";
                }),
                "n" => parse_count(value).map(|nodes| config.max_nodes = nodes),
                "s" => SearchKind::from_name(value).map(|search| config.search = search),
                "t" => value
                    .parse::<f64>()
                    .ok()
                    .filter(|secs| secs.is_finite() && *secs >= 0.0)
                    .map(|secs| {
                        config.max_time = if secs > 0.0 {
                            Some(Duration::from_secs_f64(secs))
                        } else {
                            None
                        };
                    }),
                "q" => parse_quiescence(value).map(|depth| quiescence = Some(depth)),
                _ => None,
            };

            if understood.is_none() {
                debug!("ignoring option `{}`", token);
            }
        }

        config.quiescence = match quiescence {
            Some(depth) => depth,
            None if wants_quiescence => DEFAULT_QUIESCENCE_DEPTH,
            None => 0,
        };
        config
    }
}

/// Node counts may be written in scientific notation (`1e6`).
fn parse_count(value: &str) -> Option<u64> {
    if let Ok(count) = value.parse::<u64>() {
        return Some(count);
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|count| count.is_finite() && *count >= 0.0)
        .map(|count| count as u64)
}

fn parse_quiescence(value: &str) -> Option<u32> {
    match value {
        "on" => Some(DEFAULT_QUIESCENCE_DEPTH),
        "off" => Some(0),
        _ => value.parse::<u32>().ok(),
    }
}
