//! Free-text location → DataForSEO region code.
//!
//! Canadian province and territory codes are tested first, as whole words,
//! because a trailing `", ON"` is a stronger signal than a country name
//! buried elsewhere in the string. Country names are tested next in a fixed
//! order, and anything unrecognised falls back to the United States.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const UNITED_STATES: u32 = 2840;
pub const CANADA: u32 = 2124;
pub const UNITED_KINGDOM: u32 = 2826;
pub const AUSTRALIA: u32 = 2036;

pub const DEFAULT_LOCATION_CODE: u32 = UNITED_STATES;

const CANADIAN_SUBDIVISIONS: [&str; 13] = [
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

static SUBDIVISION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CANADIAN_SUBDIVISIONS
        .iter()
        .map(|code| Regex::new(&format!(r"\b{code}\b")).expect("valid regex"))
        .collect()
});

/// A country marker. Short abbreviations must match as whole words so that
/// `MILWAUKEE` never reads as `UK`.
enum Marker {
    Substring(&'static str),
    Word(&'static str),
}

/// Checked in order; the first country with a matching marker wins.
/// Australia precedes the UK so `NEW SOUTH WALES` is not read as Wales.
static COUNTRY_MARKERS: [(u32, &[Marker]); 3] = [
    (CANADA, &[Marker::Substring("CANADA")]),
    (
        AUSTRALIA,
        &[
            Marker::Substring("AUSTRALIA"),
            Marker::Substring("NEW SOUTH WALES"),
            Marker::Word("AUS"),
            Marker::Word("NSW"),
        ],
    ),
    (
        UNITED_KINGDOM,
        &[
            Marker::Substring("UNITED KINGDOM"),
            Marker::Substring("ENGLAND"),
            Marker::Substring("SCOTLAND"),
            Marker::Substring("WALES"),
            Marker::Word("UK"),
            Marker::Word("GB"),
        ],
    ),
];

static WORD_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    COUNTRY_MARKERS
        .iter()
        .flat_map(|(_, markers)| markers.iter())
        .filter_map(|marker| match marker {
            Marker::Word(word) => Some((
                *word,
                Regex::new(&format!(r"\b{word}\b")).expect("valid regex"),
            )),
            Marker::Substring(_) => None,
        })
        .collect()
});

/// Region code plus the country name DataForSEO expects for `location_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocationTarget {
    pub code: u32,
    pub country: &'static str,
}

impl LocationTarget {
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        Self {
            code,
            country: country_name(code),
        }
    }
}

/// Classifies a free-text location such as `"Hamilton, ON"` or
/// `"Denver, CO"`.
#[must_use]
pub fn classify_location(location: &str) -> LocationTarget {
    LocationTarget::from_code(location_code(location))
}

/// Resolves only the region code; see [`classify_location`].
#[must_use]
pub fn location_code(location: &str) -> u32 {
    let upper = location.to_uppercase();

    if SUBDIVISION_PATTERNS.iter().any(|re| re.is_match(&upper)) {
        return CANADA;
    }

    COUNTRY_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| marker_matches(m, &upper)))
        .map_or(DEFAULT_LOCATION_CODE, |(code, _)| *code)
}

fn marker_matches(marker: &Marker, upper: &str) -> bool {
    match marker {
        Marker::Substring(needle) => upper.contains(needle),
        Marker::Word(word) => WORD_PATTERNS
            .iter()
            .find(|(w, _)| w == word)
            .is_some_and(|(_, re)| re.is_match(upper)),
    }
}

/// Country name for a region code. Unknown codes resolve to the default
/// country's name.
#[must_use]
pub fn country_name(code: u32) -> &'static str {
    match code {
        CANADA => "Canada",
        UNITED_KINGDOM => "United Kingdom",
        AUSTRALIA => "Australia",
        _ => "United States",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn province_code_resolves_to_canada() {
        assert_eq!(location_code("Hamilton, ON"), CANADA);
        assert_eq!(location_code("vancouver bc"), CANADA);
        assert_eq!(location_code("Halifax, NS B3H"), CANADA);
    }

    #[test]
    fn us_state_falls_back_to_default() {
        assert_eq!(location_code("Denver, CO"), UNITED_STATES);
        assert_eq!(location_code("Austin, TX"), UNITED_STATES);
    }

    #[test]
    fn province_code_must_be_a_whole_word() {
        // "ON" appears inside ONTARIO and LONDON; "NS" inside JOHNSON.
        assert_eq!(location_code("London"), UNITED_STATES);
        assert_eq!(location_code("Johnson City"), UNITED_STATES);
        assert_eq!(location_code("Ontario, California"), UNITED_STATES);
    }

    #[test]
    fn subdivision_takes_precedence_over_country_names() {
        assert_eq!(location_code("London, ON, near Australia St"), CANADA);
        assert_eq!(location_code("Windsor ON (not England)"), CANADA);
    }

    #[test]
    fn country_names_are_checked_in_order() {
        assert_eq!(location_code("Toronto, Canada"), CANADA);
        assert_eq!(location_code("London, UK"), UNITED_KINGDOM);
        assert_eq!(location_code("Manchester, England"), UNITED_KINGDOM);
        assert_eq!(location_code("Sydney, Australia"), AUSTRALIA);
        assert_eq!(location_code("Newcastle, New South Wales"), AUSTRALIA);
        assert_eq!(location_code("Cardiff, Wales"), UNITED_KINGDOM);
    }

    #[test]
    fn short_abbreviations_need_word_boundaries() {
        assert_eq!(location_code("Milwaukee, WI"), UNITED_STATES);
        assert_eq!(location_code("Duke Street"), UNITED_STATES);
    }

    #[test]
    fn unrecognised_location_defaults_to_united_states() {
        assert_eq!(location_code(""), DEFAULT_LOCATION_CODE);
        assert_eq!(location_code("somewhere nice"), DEFAULT_LOCATION_CODE);
    }

    #[test]
    fn country_name_is_derived_from_the_code() {
        let target = classify_location("Calgary, AB");
        assert_eq!(target, LocationTarget { code: CANADA, country: "Canada" });
        assert_eq!(country_name(UNITED_STATES), "United States");
        assert_eq!(country_name(9999), "United States");
        assert_eq!(classify_location("Perth, Australia").country, "Australia");
    }
}
