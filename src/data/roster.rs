//! Parser for the FIDE `players_list.txt` roster.
//!
//! The roster is nominally fixed-width, but column widths drift between
//! releases and with title/federation length, so everything except the name
//! column is recovered from whitespace tokens. The rating block is found with
//! [`locate_rating_window`]; the rest of record assembly does not depend on
//! how that index was found.

use std::fmt;
use std::io;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::data::player::{Player, RatingRecord, Title};
use crate::parallel::{batch_ranges, WorkerPool};

/// Lines at the top of the source that are always discarded.
pub const HEADER_LINES: usize = 1;

/// Tokens before this index are identity columns and never start the rating block.
const MIN_RATING_FIELD_INDEX: usize = 4;

/// Character range of the name column.
const NAME_START: usize = 15;
const NAME_END: usize = 75;

/// Shards handed to each worker thread; more than one evens out uneven line lengths.
const SHARDS_PER_THREAD: usize = 4;

#[derive(Debug)]
pub enum RosterError {
    Open { path: PathBuf, source: io::Error },
    Source(io::Error),
    ReloadInProgress,
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open roster '{}': {source}", path.display())
            }
            Self::Source(err) => write!(f, "failed to read roster: {err}"),
            Self::ReloadInProgress => write!(f, "a roster reload is already running"),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Source(err) => Some(err),
            Self::ReloadInProgress => None,
        }
    }
}

/// Players recovered from one pass, in source order, plus the count of record
/// lines that did not look like a player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoster {
    pub players: Vec<Player>,
    pub dropped: usize,
}

impl ParsedRoster {
    pub fn record_lines(&self) -> usize {
        self.players.len() + self.dropped
    }

    fn push_line(&mut self, line: &str) {
        match parse_record(line) {
            Some(player) => self.players.push(player),
            None => self.dropped += 1,
        }
    }

    fn extend(&mut self, other: ParsedRoster) {
        self.players.extend(other.players);
        self.dropped += other.dropped;
    }
}

/// Sequential parse of a line source. The first line is the header and is
/// skipped without inspection. An I/O error from the source aborts the pass;
/// malformed record lines are only counted.
pub fn parse_lines<I>(lines: I) -> Result<ParsedRoster, RosterError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut roster = ParsedRoster::default();
    for (line_no, line) in lines.into_iter().enumerate() {
        let line = line.map_err(RosterError::Source)?;
        if line_no < HEADER_LINES {
            continue;
        }
        roster.push_line(&line);
    }
    Ok(roster)
}

/// Parse already-read source lines (header included) across the worker pool.
/// Shards are contiguous line ranges and are concatenated in range order, so
/// the result is identical to [`parse_lines`] over the same input.
pub fn parse_shards(lines: &[String], pool: &WorkerPool) -> ParsedRoster {
    let body = lines.get(HEADER_LINES..).unwrap_or(&[]);

    pool.install(|| {
        let shard_count = rayon::current_num_threads().max(1) * SHARDS_PER_THREAD;
        let shards: Vec<ParsedRoster> = batch_ranges(body.len(), shard_count)
            .into_par_iter()
            .map(|(start, end)| {
                let mut shard = ParsedRoster::default();
                for line in &body[start..end] {
                    shard.push_line(line);
                }
                shard
            })
            .collect();

        shards.into_iter().fold(ParsedRoster::default(), |mut acc, shard| {
            acc.extend(shard);
            acc
        })
    })
}

/// Index of the first standard-rating field: the first token past the identity
/// columns that is exactly four ASCII digits.
pub fn locate_rating_window(fields: &[&str]) -> Option<usize> {
    fields
        .iter()
        .enumerate()
        .skip(MIN_RATING_FIELD_INDEX)
        .find(|(_, field)| is_four_digits(field))
        .map(|(index, _)| index)
}

/// Build a player from one record line, or `None` when the line has no rating block.
pub fn parse_record(line: &str) -> Option<Player> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split_whitespace().collect();
    let window = locate_rating_window(&fields)?;
    let id = *fields.first()?;

    let rating = |offset: usize| RatingRecord {
        rating: numeric_field(&fields, window + offset),
        games: numeric_field(&fields, window + offset + 1),
        k_factor: numeric_field(&fields, window + offset + 2),
    };

    Some(Player {
        id: id.to_string(),
        name: name_column(line),
        // TODO: the fallback to field 0 copies the id into federation/sex; replace
        // it once a stricter field-count check lands in locate_rating_window.
        federation: field_or_first(&fields, 3).to_string(),
        sex: field_or_first(&fields, 4).to_string(),
        title: fields.iter().find_map(|field| Title::from_token(field)),
        standard_rating: rating(0),
        rapid_rating: rating(3),
        blitz_rating: rating(6),
        birth_year: fields.last().copied().unwrap_or_default().to_string(),
    })
}

fn is_four_digits(field: &str) -> bool {
    field.len() == 4 && field.bytes().all(|b| b.is_ascii_digit())
}

fn name_column(line: &str) -> String {
    line.chars()
        .skip(NAME_START)
        .take(NAME_END - NAME_START)
        .collect::<String>()
        .trim()
        .to_string()
}

fn field_or_first<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields
        .get(index)
        .or_else(|| fields.first())
        .copied()
        .unwrap_or_default()
}

/// Leading ASCII digits of the field as a number; anything else is 0.
fn numeric_field(fields: &[&str], index: usize) -> u32 {
    let Some(field) = fields.get(index) else {
        return 0;
    };
    let digits = field
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .map_or(*field, |end| &field[..end]);
    digits.parse().unwrap_or(0)
}
