pub mod federation;
pub mod player;
pub mod roster;
pub mod source;

pub use player::{Player, RatingRecord, Title};
pub use roster::{locate_rating_window, parse_lines, parse_record, parse_shards, ParsedRoster, RosterError};
pub use source::{load_roster, LoadedRoster, RosterLines, DEFAULT_ROSTER_PATH};
