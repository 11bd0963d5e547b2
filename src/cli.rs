use std::io;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::data::federation::federation_name;
use crate::data::{load_roster, LoadedRoster, Player};
use crate::index::PlayerIndex;
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Search,
    Get,
    Top,
    Parse,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("search") => Some(Command::Search),
        Some("get") => Some(Command::Get),
        Some("top") => Some(Command::Top),
        Some("parse") => Some(Command::Parse),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = Config::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Search) => handle_search(&config, args),
        Some(Command::Get) => handle_get(&config, args),
        Some(Command::Top) => handle_top(&config, args),
        Some(Command::Parse) => handle_parse(&config, args),
        None => {
            eprintln!("usage: fide_lookup <serve|search|get|top|parse>");
            2
        }
    }
}

fn handle_serve(config: &Config) -> i32 {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };
    match runtime.block_on(server::run_server(config)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_search(config: &Config, args: &[String]) -> i32 {
    let as_table = args.iter().any(|arg| arg == "--table");
    let query = args
        .iter()
        .skip(2)
        .filter(|arg| *arg != "--table")
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    if query.trim().is_empty() {
        eprintln!("usage: fide_lookup search <name or id> [--table]");
        return 2;
    }

    let Some(index) = load_index(config) else {
        return 1;
    };
    let results = index.search(&query);
    if as_table {
        print_table(&results);
        0
    } else {
        print_json(&results)
    }
}

fn handle_get(config: &Config, args: &[String]) -> i32 {
    let Some(id) = args.get(2) else {
        eprintln!("usage: fide_lookup get <fide-id>");
        return 2;
    };
    let Some(index) = load_index(config) else {
        return 1;
    };
    match index.get(id) {
        Ok(player) => print_json(player),
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn handle_top(config: &Config, args: &[String]) -> i32 {
    let limit = parse_usize_arg(args.get(2), "limit", 5);
    let Some(index) = load_index(config) else {
        return 1;
    };
    print_json(&index.top_rated(limit, 0))
}

fn handle_parse(config: &Config, args: &[String]) -> i32 {
    let as_csv = args.iter().any(|arg| arg == "--csv");
    let path = args
        .iter()
        .skip(2)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| config.roster_path.clone());

    let loaded = match load_roster(&path, &config.worker_pool()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("parse failed: {err}");
            return 1;
        }
    };

    if as_csv {
        return match write_csv(&loaded.roster.players, io::stdout().lock()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        };
    }

    println!(
        "parsed players={} dropped={} source='{}'",
        loaded.roster.players.len(),
        loaded.roster.dropped,
        loaded.source.display()
    );
    0
}

fn load_index(config: &Config) -> Option<PlayerIndex> {
    match load_roster(&config.roster_path, &config.worker_pool()) {
        Ok(LoadedRoster { roster, .. }) => Some(PlayerIndex::build(roster.players)),
        Err(err) => {
            eprintln!("failed to load roster: {err}");
            None
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

fn print_table(players: &[&Player]) {
    println!("id\tname\ttitle\tfederation\tstandard\trapid\tblitz\tbirth_year");
    for player in players {
        let federation = federation_name(&player.federation).unwrap_or(player.federation.as_str());
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            player.id,
            player.name,
            player.title_str(),
            federation,
            player.standard_rating.rating,
            player.rapid_rating.rating,
            player.blitz_rating.rating,
            player.birth_year
        );
    }
}

/// Flat row for CSV export; the nested ratings become nine columns.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    federation: &'a str,
    sex: &'a str,
    title: &'static str,
    standard_rating: u32,
    standard_games: u32,
    standard_k: u32,
    rapid_rating: u32,
    rapid_games: u32,
    rapid_k: u32,
    blitz_rating: u32,
    blitz_games: u32,
    blitz_k: u32,
    birth_year: &'a str,
}

impl<'a> From<&'a Player> for CsvRow<'a> {
    fn from(player: &'a Player) -> Self {
        Self {
            id: &player.id,
            name: &player.name,
            federation: &player.federation,
            sex: &player.sex,
            title: player.title_str(),
            standard_rating: player.standard_rating.rating,
            standard_games: player.standard_rating.games,
            standard_k: player.standard_rating.k_factor,
            rapid_rating: player.rapid_rating.rating,
            rapid_games: player.rapid_rating.games,
            rapid_k: player.rapid_rating.k_factor,
            blitz_rating: player.blitz_rating.rating,
            blitz_games: player.blitz_rating.games,
            blitz_k: player.blitz_rating.k_factor,
            birth_year: &player.birth_year,
        }
    }
}

fn write_csv<W: io::Write>(players: &[Player], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    for player in players {
        writer.serialize(CsvRow::from(player))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
