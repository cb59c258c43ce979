//! MusicBrainz identifier matching

use std::sync::LazyLock;

use regex::Regex;

/// Pattern of a MusicBrainz identifier (lowercase UUID)
pub const MBID_PATTERN: &str = "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}";

static MBID_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", MBID_PATTERN)).expect("MBID pattern is valid"));

static MBID_ANYWHERE: LazyLock<Regex> = LazyLock::new(|| Regex::new(MBID_PATTERN).expect("MBID pattern is valid"));

/// Check that the whole string is an MBID
pub fn is_mbid(s: &str) -> bool {
    MBID_EXACT.is_match(s)
}

/// Find the first MBID embedded in a string, e.g. an entity URL
pub fn find_mbid(s: &str) -> Option<&str> {
    MBID_ANYWHERE.find(s).map(|m| m.as_str())
}
