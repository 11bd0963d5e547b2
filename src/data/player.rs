use std::fmt;

use serde::{Serialize, Serializer};

/// FIDE titles kept on a player record. Anything else found on a roster line
/// (arbiter and trainer titles, honorary markers) is not a playing title here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Title {
    Gm,
    Im,
    Fm,
    Cm,
    Wgm,
    Wim,
    Wfm,
    Wcm,
}

impl Title {
    pub const ALL: [Title; 8] = [
        Title::Gm,
        Title::Im,
        Title::Fm,
        Title::Cm,
        Title::Wgm,
        Title::Wim,
        Title::Wfm,
        Title::Wcm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Title::Gm => "GM",
            Title::Im => "IM",
            Title::Fm => "FM",
            Title::Cm => "CM",
            Title::Wgm => "WGM",
            Title::Wim => "WIM",
            Title::Wfm => "WFM",
            Title::Wcm => "WCM",
        }
    }

    /// Exact, case-sensitive match against the roster spelling.
    pub fn from_token(token: &str) -> Option<Title> {
        Title::ALL.into_iter().find(|title| title.as_str() == token)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating, game count and K-factor for one time control. Zero means "not rated".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub rating: u32,
    pub games: u32,
    pub k_factor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub federation: String,
    pub sex: String,
    #[serde(serialize_with = "serialize_title")]
    pub title: Option<Title>,
    pub standard_rating: RatingRecord,
    pub rapid_rating: RatingRecord,
    pub blitz_rating: RatingRecord,
    pub birth_year: String,
}

impl Player {
    pub fn is_titled(&self) -> bool {
        self.title.is_some()
    }

    pub fn title_str(&self) -> &'static str {
        self.title.map(Title::as_str).unwrap_or("")
    }
}

// Untitled players serialize as "" so clients can test the field for truthiness.
fn serialize_title<S>(title: &Option<Title>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(title.map(Title::as_str).unwrap_or(""))
}
