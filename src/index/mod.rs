//! In-memory player index and the search/lookup queries served from it.
//! An index is built once from a full parse and never mutated afterwards.

pub mod ranking;
pub mod store;

use std::fmt;

use crate::data::Player;
use ranking::{search_order, standard_rating_desc, Candidate};

pub use store::{IndexStats, RosterStore, Snapshot};

/// Maximum number of players returned by any query.
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    PlayerNotFound(String),
    IndexNotReady,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerNotFound(id) => write!(f, "player not found: {id}"),
            Self::IndexNotReady => write!(f, "player index is still loading"),
        }
    }
}

impl std::error::Error for QueryError {}

/// How a normalized query selects candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchQuery<'q> {
    /// All digits: substring match on the id.
    Id(&'q str),
    /// Every term must occur in the lower-cased name.
    Name(Vec<&'q str>),
}

impl<'q> SearchQuery<'q> {
    fn parse(normalized: &'q str) -> Self {
        if !normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit()) {
            SearchQuery::Id(normalized)
        } else {
            SearchQuery::Name(normalized.split_whitespace().collect())
        }
    }

    fn matches(&self, player: &Player, name_lower: &str) -> bool {
        match self {
            SearchQuery::Id(digits) => player.id.contains(digits),
            SearchQuery::Name(terms) => terms.iter().all(|term| name_lower.contains(term)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    players: Vec<Player>,
    names_lower: Vec<String>,
}

impl PlayerIndex {
    /// Duplicate ids are kept; [`get`](Self::get) resolves to the first in source order.
    pub fn build(players: Vec<Player>) -> Self {
        let names_lower = players.iter().map(|p| p.name.to_lowercase()).collect();
        Self {
            players,
            names_lower,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Player, QueryError> {
        self.players
            .iter()
            .find(|player| player.id == id)
            .ok_or_else(|| QueryError::PlayerNotFound(id.to_string()))
    }

    /// Up to [`SEARCH_LIMIT`] players matching `query`, best first.
    ///
    /// An all-digit query matches ids containing it; anything else is split
    /// into whitespace terms that must all appear in the player's name. No
    /// minimum length is enforced here, and an empty query matches everyone.
    pub fn search(&self, query: &str) -> Vec<&Player> {
        let normalized = query.trim().to_lowercase();
        let query = SearchQuery::parse(&normalized);

        let mut candidates: Vec<Candidate<'_>> = self
            .players
            .iter()
            .zip(&self.names_lower)
            .filter(|(player, name_lower)| query.matches(player, name_lower))
            .map(|(player, name_lower)| Candidate {
                player,
                name_lower,
            })
            .collect();

        candidates.sort_by(search_order);
        candidates
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|candidate| candidate.player)
            .collect()
    }

    /// Highest standard ratings strictly above `min_rating`, at most
    /// [`SEARCH_LIMIT`] regardless of `limit`.
    pub fn top_rated(&self, limit: usize, min_rating: u32) -> Vec<&Player> {
        let mut rated: Vec<&Player> = self
            .players
            .iter()
            .filter(|player| player.standard_rating.rating > min_rating)
            .collect();
        rated.sort_by(|a, b| standard_rating_desc(a, b));
        rated.truncate(limit.min(SEARCH_LIMIT));
        rated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RatingRecord, Title};

    fn player(id: &str, name: &str, title: Option<Title>, rating: u32) -> Player {
        Player {
            id: id.to_string(),
            name: name.to_string(),
            federation: "FID".to_string(),
            sex: "M".to_string(),
            title,
            standard_rating: RatingRecord {
                rating,
                games: 0,
                k_factor: 20,
            },
            rapid_rating: RatingRecord::default(),
            blitz_rating: RatingRecord::default(),
            birth_year: "1990".to_string(),
        }
    }

    fn ids(players: &[&Player]) -> Vec<String> {
        players.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn get_returns_first_exact_match() {
        let index = PlayerIndex::build(vec![
            player("150301", "Prefix, Not", None, 1500),
            player("1503014", "Carlsen, Magnus", Some(Title::Gm), 2831),
            player("1503014", "Duplicate, Later", None, 1200),
        ]);
        let found = index.get("1503014").expect("player should exist");
        assert_eq!(found.name, "Carlsen, Magnus");
        assert_eq!(
            index.get("no-such-id"),
            Err(QueryError::PlayerNotFound("no-such-id".to_string()))
        );
        assert!(index.get("15030").is_err());
    }

    #[test]
    fn numeric_query_matches_id_substrings_by_rating() {
        let index = PlayerIndex::build(vec![
            player("1503014", "Low, Rated", None, 1800),
            player("2503014", "High, Rated", None, 2400),
            player("150300", "Other, Player", None, 2700),
        ]);
        assert_eq!(ids(&index.search("503014")), vec!["2503014", "1503014"]);
        assert_eq!(ids(&index.search("1503")), vec!["150300", "1503014"]);
        assert_eq!(ids(&index.search("  150300 ")), vec!["150300"]);
    }

    #[test]
    fn name_query_requires_every_term_in_any_order() {
        let index = PlayerIndex::build(vec![
            player("1", "Carlsen, Magnus", Some(Title::Gm), 2831),
            player("2", "Carlsen, Henrik", None, 0),
            player("3", "Magnusson, Karl", None, 2100),
        ]);
        assert_eq!(ids(&index.search("magnus carlsen")), vec!["1"]);
        assert_eq!(ids(&index.search("CARLSEN")), vec!["1", "2"]);
        assert!(index.search("kasparov").is_empty());
    }

    #[test]
    fn pinned_player_is_first_among_titled_peers() {
        let index = PlayerIndex::build(vec![
            player("10", "Carlsen, Other", Some(Title::Gm), 2850),
            player("1503014", "Carlsen, Magnus", Some(Title::Gm), 2831),
            player("11", "Carlsenov, Ivan", Some(Title::Gm), 2860),
        ]);
        let results = index.search("carlsen");
        assert_eq!(results[0].id, "1503014");
        assert_eq!(ids(&results[1..]), vec!["11", "10"]);
    }

    #[test]
    fn titled_players_precede_untitled_regardless_of_rating() {
        let index = PlayerIndex::build(vec![
            player("1", "Smith, A", None, 2600),
            player("2", "Smith, B", Some(Title::Wcm), 1700),
            player("3", "Smith, C", None, 0),
            player("4", "Smith, D", Some(Title::Im), 2400),
        ]);
        assert_eq!(ids(&index.search("smith")), vec!["4", "2", "1", "3"]);
    }

    #[test]
    fn full_ties_keep_source_order() {
        let index = PlayerIndex::build(vec![
            player("1", "Twin, A", None, 2000),
            player("2", "Twin, B", None, 2000),
            player("3", "Twin, C", None, 2000),
        ]);
        assert_eq!(ids(&index.search("twin")), vec!["1", "2", "3"]);
    }

    #[test]
    fn search_never_returns_more_than_limit() {
        let players = (0..250)
            .map(|i| player(&format!("{}", 100_000 + i), &format!("Common, Name{i}"), None, i))
            .collect();
        let index = PlayerIndex::build(players);
        let results = index.search("common");
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0].standard_rating.rating, 249);
        assert_eq!(index.search("1").len(), SEARCH_LIMIT);
        assert_eq!(index.search("").len(), SEARCH_LIMIT);
    }

    #[test]
    fn top_rated_filters_and_caps() {
        let index = PlayerIndex::build(vec![
            player("1", "A", None, 2690),
            player("2", "B", None, 2750),
            player("3", "C", None, 2810),
            player("4", "D", None, 2700),
        ]);
        assert_eq!(ids(&index.top_rated(5, 2700)), vec!["3", "2"]);
        assert_eq!(ids(&index.top_rated(1, 0)), vec!["3"]);
        assert_eq!(index.top_rated(100, 0).len(), 4);
    }

    #[test]
    fn empty_index_answers_queries() {
        let index = PlayerIndex::default();
        assert!(index.is_empty());
        assert!(index.search("anything").is_empty());
        assert!(index.get("1").is_err());
    }
}
