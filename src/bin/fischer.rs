// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::process;
use std::time::Instant;

use clap::{App, Arg, ArgMatches, SubCommand};
use fischer::eval::DisplayScore;
use fischer::search::best_move;
use fischer::{divide, fen960, perft, Config, Position, Searcher, POSITION_COUNT, START_FEN};
use rand::Rng;

fn fen_arg() -> Arg<'static, 'static> {
    Arg::with_name("FEN")
        .help("FEN string for a board position")
        .index(1)
}

fn frc_arg() -> Arg<'static, 'static> {
    Arg::with_name("frc")
        .help("Name castles the Chess960 way, king takes rook")
        .long("--frc")
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("divide")
                        .help("Print the leaf count below every root move")
                        .long("--divide"),
                )
                .arg(frc_arg()),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Search a board position and score its moves")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("options")
                        .help("Search options, such as \"d=4 e=hce s=ab\"")
                        .value_name("OPTIONS")
                        .short("-o")
                        .long("--options")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth to search when the options do not name one")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("mask")
                        .help("Only search these UCI moves")
                        .value_name("MOVES")
                        .short("-m")
                        .long("--mask")
                        .takes_value(true),
                )
                .arg(frc_arg()),
        )
        .subcommand(
            SubCommand::with_name("fen960")
                .about("Print a Chess960 starting position")
                .arg(
                    Arg::with_name("INDEX")
                        .help("Position number from 0 to 959; random if omitted")
                        .index(1),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a sequence of moves and print each one as JSON")
                .arg(
                    Arg::with_name("MOVES")
                        .help("SAN movetext, or UCI moves with --uci")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("fen")
                        .help("Starting position")
                        .value_name("FEN")
                        .long("--fen")
                        .takes_value(true),
                )
                .arg(Arg::with_name("uci").help("Read UCI moves").long("--uci"))
                .arg(
                    Arg::with_name("sloppy")
                        .help("Accept loosely written SAN")
                        .long("--sloppy"),
                )
                .arg(frc_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("search", Some(matches)) => run_search(matches),
        ("fen960", Some(matches)) => run_fen960(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => {
            println!("{}", matches.usage());
            process::exit(1);
        }
    }
}

fn load(fen: &str) -> Position {
    match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap_or(START_FEN);
    let depth = value_t!(matches, "depth", u32).unwrap_or(4);
    let mut pos = load(fen);
    let chess960 = matches.is_present("frc") || pos.uses_file_castling();

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    if matches.is_present("divide") {
        println!("{}", divide(&mut pos, depth, chess960));
        process::exit(0);
    }

    for i in 1..=depth {
        let start = Instant::now();
        let results = perft(&mut pos, i);
        let duration = start.elapsed();
        let ms = duration.as_secs() * 1000 + u64::from(duration.subsec_millis());
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn run_search(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap_or(START_FEN);
    let depth = value_t!(matches, "depth", i32).unwrap_or(-1);
    let options = matches.value_of("options").unwrap_or("");
    let mask = matches.value_of("mask").unwrap_or("");
    let mut pos = load(fen);
    let chess960 = matches.is_present("frc") || pos.uses_file_castling();

    let config = Config::parse(chess960, options, depth);
    println!("fen:    {}", fen);
    println!("config: {:?}", config);
    println!();

    let moves = pos.moves(chess960, false);
    let mut searcher = Searcher::new(config);
    let mut results = searcher.search(&mut pos, &moves, mask);
    results.sort_by_key(|mov| -mov.score);
    for mov in &results {
        println!("{:>6} {}", mov.as_uci(), DisplayScore(mov.score));
    }

    println!();
    match best_move(&results) {
        Some(best) => println!("best move: {}", best),
        None => println!("best move: none"),
    }
    println!("    nodes: {}", searcher.nodes());
    if searcher.stopped() {
        println!("  stopped: out of budget");
    }
    process::exit(0);
}

fn run_fen960(matches: &ArgMatches) -> ! {
    let index = match matches.value_of("INDEX") {
        Some(_) => value_t_or_exit!(matches, "INDEX", i32),
        None => rand::thread_rng().gen_range(0, POSITION_COUNT),
    };

    match fen960(index) {
        Some(fen) => {
            println!("{} {}", index, fen);
            process::exit(0);
        }
        None => {
            println!("no Chess960 position numbered {}", index);
            process::exit(1);
        }
    }
}

fn run_play(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("fen").unwrap_or(START_FEN);
    let moves = matches.value_of("MOVES").unwrap_or("");
    let mut pos = load(fen);
    let chess960 = matches.is_present("frc") || pos.uses_file_castling();

    let records = if matches.is_present("uci") {
        pos.multi_uci(moves, chess960)
    } else {
        pos.multi_san(moves, chess960, matches.is_present("sloppy"))
    };

    match serde_json::to_string_pretty(&records) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            println!("failed to serialize moves: {}", err);
            process::exit(1);
        }
    }
    println!("{}", pos.fen());
    process::exit(0);
}
