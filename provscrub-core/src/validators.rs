// File: provscrub-core/src/validators.rs
//! Programmatic validation functions for built-in detection rules.
//!
//! Regular expressions alone over-match: `\d{10,13}` hits phone numbers and order ids,
//! a dotted quad hits version strings, a slash-separated run hits dates. The checks
//! here look at the matched text (and, for paths, the character before it) to
//! reduce those false positives.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::ops::Range;

use crate::config::ValidatorKind;

/// 2001-09-09T01:46:40Z, the first 10-digit epoch second.
const MIN_EPOCH_SECONDS: i64 = 1_000_000_000;
/// 2100-01-01T00:00:00Z.
const MAX_EPOCH_SECONDS: i64 = 4_102_444_800;

/// Punctuation that glues a slash run onto a preceding token (`v1.2/x`, `a_b/c`, `-I/usr`).
static PATH_GLUE_CHARS: Lazy<HashSet<char>> = Lazy::new(|| ['_', '.', '-'].into_iter().collect());

/// Runs the validator named by `kind` against `text[span]`.
pub fn validate(kind: ValidatorKind, text: &str, span: &Range<usize>) -> bool {
    let matched = &text[span.clone()];
    match kind {
        ValidatorKind::Epoch => is_plausible_epoch(matched),
        ValidatorKind::CalendarDatetime => is_valid_calendar_datetime(matched),
        ValidatorKind::Ipv4 => is_valid_ipv4(matched),
        ValidatorKind::PathBoundary => is_path_boundary(text, span.start),
    }
}

/// Checks that a 10 to 13 digit integer lands inside a believable epoch window.
///
/// The digit count decides the unit: 10 digits are seconds, 13 are milliseconds,
/// 11 and 12 are tenths and hundredths of a second.
pub fn is_plausible_epoch(digits: &str) -> bool {
    if !(10..=13).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(value) = digits.parse::<i64>() else {
        return false;
    };
    let divisor = 10_i64.pow((digits.len() - 10) as u32);
    let seconds = value / divisor;
    (MIN_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&seconds)
}

/// Accepts ISO-8601 and log-style date-times whose fields form a real calendar instant.
pub fn is_valid_calendar_datetime(s: &str) -> bool {
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    // Offsets without a colon (+0200) and naive forms.
    if DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok() {
        return true;
    }
    let naive = s.trim_end_matches('Z').replacen(',', ".", 1);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(&naive, fmt).is_ok())
}

/// Every octet must fit in a byte, with no leading zeros beyond a lone `0`.
pub fn is_valid_ipv4(s: &str) -> bool {
    let octets: Vec<&str> = s.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|o| {
            !o.is_empty()
                && o.len() <= 3
                && !(o.len() > 1 && o.starts_with('0'))
                && o.parse::<u8>().is_ok()
        })
}

/// A POSIX path must start its own token: the character before it may not be a word
/// character or one of `_ . -`.
///
/// A preceding `:` is fine (`PATH=/a/b:/c/d`, `file:/x/y`). A preceding `/` is only
/// fine when it completes an empty URL authority, as in `file:///home/alice`; after
/// `https:/` the run is the host and path of a URL, and after a date digit it is
/// the rest of `2024/01/02`.
pub fn is_path_boundary(text: &str, start: usize) -> bool {
    let before = &text[..start];
    match before.chars().next_back() {
        None => true,
        Some('/') => before.ends_with("://"),
        Some(c) => !(c.is_alphanumeric() || PATH_GLUE_CHARS.contains(&c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_and_millis() {
        assert!(is_plausible_epoch("1700000000"));
        assert!(is_plausible_epoch("1700000000123"));
        assert!(!is_plausible_epoch("0000000001"));
        assert!(!is_plausible_epoch("9999999999"));
        assert!(!is_plausible_epoch("170000000"));
        assert!(!is_plausible_epoch("17000000001234"));
    }

    #[test]
    fn test_calendar_datetime_forms() {
        assert!(is_valid_calendar_datetime("2024-03-01T12:30:00Z"));
        assert!(is_valid_calendar_datetime("2024-03-01T12:30:00.123+02:00"));
        assert!(is_valid_calendar_datetime("2024-03-01T12:30:00+0200"));
        assert!(is_valid_calendar_datetime("2024-03-01T12:30:00"));
        assert!(is_valid_calendar_datetime("2024-03-01 12:30:00"));
        assert!(is_valid_calendar_datetime("2024-03-01 12:30:00,123456"));
        assert!(!is_valid_calendar_datetime("2024-13-01 12:30:00"));
        assert!(!is_valid_calendar_datetime("2023-02-30T00:00:00Z"));
    }

    #[test]
    fn test_ipv4_octets() {
        assert!(is_valid_ipv4("10.0.0.1"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(!is_valid_ipv4("256.1.1.1"));
        assert!(!is_valid_ipv4("01.2.3.4"));
        assert!(!is_valid_ipv4("1.2.3"));
    }

    #[test]
    fn test_path_boundary() {
        let text = "see /var/log/app.log and 2024/01/02";
        assert!(is_path_boundary(text, 4));
        let date_slash = text.find("/01").unwrap();
        assert!(!is_path_boundary(text, date_slash));
        assert!(is_path_boundary("/etc/hosts", 0));
        assert!(!is_path_boundary("https://x/y", 7));
    }

    #[test]
    fn test_path_boundary_after_list_separator_and_file_scheme() {
        let list = "PATH=/usr/local/bin:/home/alice/bin";
        assert!(is_path_boundary(list, 5));
        assert!(is_path_boundary(list, list.find(":/home").unwrap() + 1));

        let url = "open file:///home/alice/data.csv";
        assert!(is_path_boundary(url, url.find("/home").unwrap()));
        assert!(!is_path_boundary("see https://host/a/b", "see https:/".len()));
        assert!(!is_path_boundary("a//b/c", 2));
    }

    #[test]
    fn test_validate_dispatch() {
        let text = "ip=10.1.2.3";
        assert!(validate(ValidatorKind::Ipv4, text, &(3..11)));
        assert!(!validate(ValidatorKind::Epoch, text, &(3..11)));
    }
}
