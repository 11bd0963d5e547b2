use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;

use fide_lookup::data::{load_roster, parse_lines, RatingRecord, RosterLines, Title};
use fide_lookup::index::PlayerIndex;
use fide_lookup::parallel::WorkerPool;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/players_list.txt")
}

fn fixture_index() -> PlayerIndex {
    let loaded = load_roster(fixture_path(), &WorkerPool::default()).expect("fixture should load");
    PlayerIndex::build(loaded.roster.players)
}

fn ids(index: &PlayerIndex, query: &str) -> Vec<String> {
    index.search(query).iter().map(|p| p.id.clone()).collect()
}

#[test]
fn fixture_yields_one_player_per_record_line() {
    let loaded = load_roster(fixture_path(), &WorkerPool::with_workers(2)).expect("fixture should load");
    let ids: Vec<&str> = loaded.roster.players.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["1503014", "2020009", "13300474", "2503014", "150300", "24116068"]
    );
    assert_eq!(loaded.roster.dropped, 2);
}

#[test]
fn streaming_and_sharded_loads_agree() {
    let file = File::open(fixture_path()).expect("fixture should open");
    let streamed = parse_lines(RosterLines::new(BufReader::new(file))).expect("stream parse");
    let sharded = load_roster(fixture_path(), &WorkerPool::with_workers(3)).expect("sharded parse");
    assert_eq!(streamed, sharded.roster);
}

#[test]
fn crlf_and_lf_sources_parse_identically() {
    let crlf = std::fs::read(fixture_path()).expect("fixture should read");
    let lf: Vec<u8> = String::from_utf8(crlf.clone())
        .expect("fixture is utf-8")
        .replace("\r\n", "\n")
        .into_bytes();
    let from_crlf = parse_lines(RosterLines::new(Cursor::new(crlf))).expect("crlf parse");
    let from_lf = parse_lines(RosterLines::new(Cursor::new(lf))).expect("lf parse");
    assert_eq!(from_crlf, from_lf);
}

#[test]
fn record_fields_follow_roster_columns() {
    let index = fixture_index();
    let magnus = index.get("1503014").expect("carlsen should be present");
    assert_eq!(magnus.name, "Carlsen, Magnus");
    assert_eq!(magnus.federation, "NOR");
    assert_eq!(magnus.sex, "M");
    assert_eq!(magnus.title, Some(Title::Gm));
    assert_eq!(magnus.blitz_rating, RatingRecord { rating: 2886, games: 12, k_factor: 10 });
    assert_eq!(magnus.birth_year, "1990");

    let ana = index.get("150300").expect("garcia should be present");
    assert_eq!(ana.title, Some(Title::Wim));
    assert_eq!(ana.rapid_rating, RatingRecord::default());
    assert_eq!(ana.birth_year, "w");
}

#[test]
fn unrated_standard_column_shifts_the_window_to_the_next_rating() {
    let index = fixture_index();
    let henrik = index.get("13300474").expect("henrik should be present");
    assert_eq!(henrik.name, "Carlsen, Henrik Albert");
    assert_eq!(henrik.title, None);
    assert_eq!(henrik.standard_rating, RatingRecord { rating: 1504, games: 5, k_factor: 40 });
    assert_eq!(henrik.rapid_rating.rating, 1963);
    assert_eq!(henrik.blitz_rating, RatingRecord::default());
}

#[test]
fn search_over_fixture_ranks_as_expected() {
    let index = fixture_index();
    assert_eq!(ids(&index, "carlsen"), vec!["1503014", "13300474"]);
    assert_eq!(ids(&index, "Magnus"), vec!["1503014", "2503014"]);
    assert_eq!(ids(&index, "ca"), vec!["1503014", "2020009", "13300474"]);
    assert_eq!(ids(&index, "1503"), vec!["1503014", "150300"]);
    assert_eq!(ids(&index, "503014"), vec!["1503014", "2503014"]);
    assert!(ids(&index, "kasparov").is_empty());
}
