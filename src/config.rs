//! Environment-driven settings for the server and the CLI.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::data::DEFAULT_ROSTER_PATH;
use crate::parallel::WorkerPool;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `FIDE_BIND`
    pub bind_addr: String,
    /// `FIDE_ROSTER_PATH`
    pub roster_path: PathBuf,
    /// `FIDE_PARSE_WORKERS`; 0 uses every core.
    pub parse_workers: usize,
    /// `FIDE_REFRESH_SECS`; unset or 0 disables periodic reloads.
    pub refresh_interval: Option<Duration>,
    /// `FIDE_STATIC_DIR`
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            roster_path: PathBuf::from(DEFAULT_ROSTER_PATH),
            parse_workers: 0,
            refresh_interval: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("FIDE_BIND").unwrap_or(defaults.bind_addr),
            roster_path: lookup("FIDE_ROSTER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.roster_path),
            parse_workers: parse_number(&lookup, "FIDE_PARSE_WORKERS", 0),
            refresh_interval: match parse_number(&lookup, "FIDE_REFRESH_SECS", 0) {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            static_dir: lookup("FIDE_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.parse_workers)
    }
}

fn parse_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, %default, "invalid setting, using default");
        default
    })
}
