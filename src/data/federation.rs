//! Country names for the federation codes shown in CLI tables. Display only;
//! parsed records keep the raw code.

const FEDERATION_NAMES: &[(&str, &str)] = &[
    ("ESP", "Spain"),
    ("ES", "Spain"),
    ("SP", "Spain"),
    ("NOR", "Norway"),
    ("NO", "Norway"),
    ("USA", "United States"),
    ("US", "United States"),
    ("RUS", "Russia"),
    ("RU", "Russia"),
    ("GER", "Germany"),
    ("DE", "Germany"),
    ("FRA", "France"),
    ("FR", "France"),
    ("ENG", "England"),
    ("EN", "England"),
    ("CHN", "China"),
    ("CN", "China"),
    ("IND", "India"),
    ("IN", "India"),
];

pub fn federation_name(code: &str) -> Option<&'static str> {
    FEDERATION_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|&(_, name)| name)
}
