//! Reads the extracted roster text file and hands its lines to the parser.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::data::roster::{parse_shards, ParsedRoster, RosterError};
use crate::parallel::WorkerPool;

pub const DEFAULT_ROSTER_PATH: &str = "data/players_list.txt";

/// Line iterator that tolerates non-UTF-8 bytes and both LF and CRLF endings.
///
/// Invalid byte sequences are replaced rather than failing the line, so only
/// a genuine read error ends the iteration with `Err`.
pub struct RosterLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> RosterLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
        }
    }
}

impl<R: BufRead> Iterator for RosterLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Result of one full load from disk.
#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub roster: ParsedRoster,
    pub source: PathBuf,
    pub elapsed: Duration,
}

/// Read and parse the roster at `path`. Lines are read sequentially, then
/// parsed in order-preserving shards on `pool`.
pub fn load_roster(path: impl AsRef<Path>, pool: &WorkerPool) -> Result<LoadedRoster, RosterError> {
    let path = path.as_ref();
    let started = Instant::now();

    let file = File::open(path).map_err(|source| RosterError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let lines = RosterLines::new(BufReader::new(file))
        .collect::<io::Result<Vec<String>>>()
        .map_err(RosterError::Source)?;

    let roster = parse_shards(&lines, pool);
    let elapsed = started.elapsed();

    tracing::info!(
        source = %path.display(),
        players = roster.players.len(),
        dropped = roster.dropped,
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "roster parsed"
    );

    Ok(LoadedRoster {
        roster,
        source: path.to_path_buf(),
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lines_strip_lf_and_crlf() {
        let lines: Vec<String> = RosterLines::new(Cursor::new(b"head\r\none\ntwo\r\nthree".to_vec()))
            .collect::<io::Result<_>>()
            .expect("in-memory read");
        assert_eq!(lines, vec!["head", "one", "two", "three"]);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let lines: Vec<String> = RosterLines::new(Cursor::new(b"head\nM\xfcller\n".to_vec()))
            .collect::<io::Result<_>>()
            .expect("lossy decode");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with('M'));
        assert!(lines[1].ends_with("ller"));
    }

    #[test]
    fn blank_lines_are_kept_for_the_parser_to_drop() {
        let lines: Vec<String> = RosterLines::new(Cursor::new(b"head\n\n\n".to_vec()))
            .collect::<io::Result<_>>()
            .expect("in-memory read");
        assert_eq!(lines, vec!["head", "", ""]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_roster("definitely/not/here/players_list.txt", &WorkerPool::default())
            .expect_err("missing file should fail");
        assert!(matches!(err, RosterError::Open { .. }));
        assert!(err.to_string().contains("players_list.txt"));
    }

    #[test]
    fn fixture_load_reports_source_and_counts() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/players_list.txt");
        let loaded = load_roster(&path, &WorkerPool::with_workers(2)).expect("fixture should load");
        assert_eq!(loaded.source, path);
        assert_eq!(loaded.roster.players.len(), 6);
        assert_eq!(loaded.roster.dropped, 2);
        assert!(u64::try_from(loaded.elapsed.as_millis()).is_ok());
    }
}
