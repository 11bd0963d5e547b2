//! Result ordering for name and id searches.
//!
//! Keys, in order: the pinned player, titled before untitled, then standard
//! rating descending. Callers sort stably, so complete ties keep source order.

use std::cmp::Ordering;

use crate::data::Player;

/// Lower-cased name that always ranks first when it is among the matches.
/// Kept as its own key so it can be dropped without touching the others.
pub const PINNED_PLAYER_NAME: &str = "carlsen, magnus";

/// A search match together with its pre-lowered name.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub player: &'a Player,
    pub name_lower: &'a str,
}

pub fn search_order(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    pinned_first(a, b)
        .then_with(|| titled_first(a.player, b.player))
        .then_with(|| standard_rating_desc(a.player, b.player))
}

fn pinned_first(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    is_pinned(b).cmp(&is_pinned(a))
}

fn is_pinned(candidate: &Candidate<'_>) -> bool {
    candidate.name_lower == PINNED_PLAYER_NAME
}

fn titled_first(a: &Player, b: &Player) -> Ordering {
    b.is_titled().cmp(&a.is_titled())
}

/// Unrated players carry 0 and therefore sink to the end.
pub fn standard_rating_desc(a: &Player, b: &Player) -> Ordering {
    b.standard_rating.rating.cmp(&a.standard_rating.rating)
}
