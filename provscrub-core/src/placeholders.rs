// File: provscrub-core/src/placeholders.rs

//! placeholders.rs - Realistic-looking, meaningless replacement values.
//!
//! Each category has a replacement shape that downstream parsers will still accept:
//! a timestamp becomes another valid timestamp of the same family, a Windows path
//! stays a Windows path with the same depth, a dotted host keeps its label count
//! and top-level label.
//!
//! The default strategy is deterministic. Every replacement is derived from an
//! HMAC-SHA256 over the run seed, the category and the original text, so the same
//! original maps to the same placeholder everywhere in a run and a re-run with the
//! same seed reproduces the output byte for byte.
//!
//! license: MIT OR Apache-2.0

use anyhow::anyhow;
use chrono::DateTime;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

use crate::config::Category;

type HmacSha256 = Hmac<Sha256>;

// A fixed salt used to derive run seeds from user-supplied seed text.
const SEED_GENERATION_SALT: &[u8] = b"provscrub-run-seed-generation-v1-salt";

/// 2001-01-01T00:00:00Z
const PLACEHOLDER_EPOCH_FLOOR: i64 = 978_307_200;
/// About thirty years of seconds.
const PLACEHOLDER_EPOCH_SPAN: u64 = 946_080_000;

/// A pluggable generator of replacement text, keyed by category.
pub trait PlaceholderStrategy: Send + Sync + fmt::Debug {
    /// Produces the replacement for `original`. An `Err` means the original had a shape
    /// this strategy cannot mimic; the redactor treats that as a rule-level failure.
    fn generate(&self, category: Category, original: &str) -> anyhow::Result<String>;

    /// A short identifier of the strategy's seed, for reports. Empty when unseeded.
    fn fingerprint(&self) -> String {
        String::new()
    }
}

/// Derives the 32-byte run seed from free-form seed text.
pub fn compute_run_seed(seed_text: &str) -> anyhow::Result<Vec<u8>> {
    let normalized = seed_text.trim();
    let mut mac = HmacSha256::new_from_slice(SEED_GENERATION_SALT)
        .map_err(|e| anyhow!("Failed to create HMAC: {}", e))?;
    mac.update(normalized.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Short, non-reversible identifier of a run seed, safe to print in reports.
pub fn seed_fingerprint(run_seed: &[u8]) -> String {
    hex::encode(&run_seed[..run_seed.len().min(6)])
}

/// The default, HMAC-seeded placeholder strategy.
#[derive(Clone)]
pub struct SeededPlaceholders {
    run_seed: Vec<u8>,
    custom_token: String,
}

impl fmt::Debug for SeededPlaceholders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededPlaceholders")
            .field("seed", &seed_fingerprint(&self.run_seed))
            .field("custom_token", &self.custom_token)
            .finish()
    }
}

impl SeededPlaceholders {
    pub fn new(seed_text: &str, custom_token: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            run_seed: compute_run_seed(seed_text)?,
            custom_token: custom_token.into(),
        })
    }

    fn digest(&self, category: Category, original: &str) -> anyhow::Result<[u8; 32]> {
        let mut mac = HmacSha256::new_from_slice(&self.run_seed)
            .map_err(|e| anyhow!("Failed to create HMAC from run seed: {}", e))?;
        mac.update(category.as_str().as_bytes());
        mac.update(b":");
        mac.update(original.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }

    fn timestamp(&self, original: &str, d: &[u8; 32]) -> anyhow::Result<String> {
        if original.bytes().all(|b| b.is_ascii_digit()) {
            return epoch_like(original.len(), d);
        }
        // YYYY-MM-DD?HH:MM:SS then an optional fraction and zone suffix.
        let bytes = original.as_bytes();
        if original.len() < 19 || !original.is_ascii() || bytes[4] != b'-' || bytes[13] != b':' {
            return Err(anyhow!("unrecognised timestamp shape"));
        }
        let separator = bytes[10] as char;
        let mut rest = &original[19..];
        let mut fraction = String::new();
        if let Some(sep) = rest.chars().next().filter(|c| *c == '.' || *c == ',') {
            let digits = rest[1..].bytes().take_while(|b| b.is_ascii_digit()).count();
            fraction.push(sep);
            fraction.push_str(&decimal_digits(&d[8..], digits));
            rest = &rest[1 + digits..];
        }

        let offset = u64_from(&d[..8]) % PLACEHOLDER_EPOCH_SPAN;
        let secs = PLACEHOLDER_EPOCH_FLOOR + offset as i64;
        let instant = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| anyhow!("placeholder instant {} out of range", secs))?;
        Ok(format!(
            "{}{}{}{}{}",
            instant.format("%Y-%m-%d"),
            separator,
            instant.format("%H:%M:%S"),
            fraction,
            rest
        ))
    }

    fn file_path(&self, original: &str, d: &[u8; 32]) -> String {
        if let Some(unc) = original.strip_prefix("\\\\") {
            // The host is replaced wholesale; only the share path keeps its depth.
            let rest: Vec<&str> = unc.split('\\').skip(1).collect();
            return format!(
                "\\\\fs{}\\{}",
                hex_window(d, 30),
                anonymize_components(&rest, '\\', d)
            );
        }
        let bytes = original.as_bytes();
        if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\' {
            let rest: Vec<&str> = original[3..].split('\\').collect();
            return format!("{}\\{}", &original[..2], anonymize_components(&rest, '\\', d));
        }
        let rest: Vec<&str> = original.trim_start_matches('/').split('/').collect();
        format!("/{}", anonymize_components(&rest, '/', d))
    }

    fn server_name(&self, original: &str, d: &[u8; 32]) -> String {
        let looks_ipv4 = original.split('.').count() == 4
            && original.bytes().all(|b| b.is_ascii_digit() || b == b'.');
        if looks_ipv4 {
            // RFC 5737 documentation range.
            return format!("192.0.2.{}", 1 + d[0] % 254);
        }
        if original.contains('.') {
            let labels: Vec<&str> = original.split('.').collect();
            let last = labels.len() - 1;
            return labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    if i == last {
                        (*label).to_string()
                    } else {
                        format!("h{}", hex_window(d, i * 3))
                    }
                })
                .collect::<Vec<_>>()
                .join(".");
        }
        if let Some((prefix, digits)) = original.rsplit_once('-') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return format!("{}-{}", prefix, decimal_digits(d, digits.len()));
            }
        }
        format!("host-{}", hex_window(d, 0))
    }
}

impl PlaceholderStrategy for SeededPlaceholders {
    fn generate(&self, category: Category, original: &str) -> anyhow::Result<String> {
        if category == Category::Custom {
            return Ok(self.custom_token.clone());
        }
        let d = self.digest(category, original)?;
        match category {
            Category::Timestamp => self.timestamp(original, &d),
            Category::FilePath => Ok(self.file_path(original, &d)),
            Category::ServerName => Ok(self.server_name(original, &d)),
            Category::Custom => Ok(self.custom_token.clone()),
        }
    }

    fn fingerprint(&self) -> String {
        seed_fingerprint(&self.run_seed)
    }
}

fn u64_from(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Six hex characters taken from a wrapping window of the digest.
fn hex_window(d: &[u8; 32], offset: usize) -> String {
    let window: Vec<u8> = (0..3).map(|i| d[(offset + i) % d.len()]).collect();
    hex::encode(window)
}

/// `count` decimal digits derived from `bytes`, cycling when more are needed.
fn decimal_digits(bytes: &[u8], count: usize) -> String {
    (0..count)
        .map(|i| char::from(b'0' + bytes[i % bytes.len()] % 10))
        .collect()
}

/// An epoch integer with `len` digits whose seconds part falls in 2001..2033.
fn epoch_like(len: usize, d: &[u8; 32]) -> anyhow::Result<String> {
    if !(10..=13).contains(&len) {
        return Err(anyhow!("epoch literal of {} digits has no placeholder shape", len));
    }
    let seconds = 1_000_000_000 + u64_from(&d[..8]) % 1_000_000_000;
    let sub_second = decimal_digits(&d[8..], len - 10);
    Ok(format!("{}{}", seconds, sub_second))
}

fn anonymize_components(components: &[&str], separator: char, d: &[u8; 32]) -> String {
    let last = components.len().saturating_sub(1);
    components
        .iter()
        .enumerate()
        .map(|(i, component)| {
            if component.is_empty() {
                String::new()
            } else if i == last {
                format!("file{}{}", &hex_window(d, i * 2)[..4], extension_of(component))
            } else {
                format!("dir{}", &hex_window(d, i * 2)[..4])
            }
        })
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

/// The trailing `.ext` of a file name, if it looks like an extension.
fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = &name[pos..];
            if ext.len() > 1 && ext.len() <= 9 && ext[1..].chars().all(|c| c.is_ascii_alphanumeric()) {
                ext
            } else {
                ""
            }
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{is_plausible_epoch, is_valid_calendar_datetime, is_valid_ipv4};

    fn strategy() -> SeededPlaceholders {
        SeededPlaceholders::new("unit-test-seed", "[REDACTED]").unwrap()
    }

    #[test]
    fn test_same_original_same_placeholder() {
        let s = strategy();
        let a = s.generate(Category::ServerName, "db1.prod.example.com").unwrap();
        let b = s.generate(Category::ServerName, "db1.prod.example.com").unwrap();
        assert_eq!(a, b);
        let other = SeededPlaceholders::new("another-seed", "[REDACTED]").unwrap();
        assert_ne!(a, other.generate(Category::ServerName, "db1.prod.example.com").unwrap());
    }

    #[test]
    fn test_timestamp_shapes_are_preserved() {
        let s = strategy();
        let iso = s.generate(Category::Timestamp, "2024-03-01T12:30:00.123Z").unwrap();
        assert_eq!(iso.len(), "2024-03-01T12:30:00.123Z".len());
        assert_eq!(&iso[10..11], "T");
        assert!(iso.ends_with('Z'));
        assert!(is_valid_calendar_datetime(&iso));

        let log = s.generate(Category::Timestamp, "2024-03-01 12:30:00,456789").unwrap();
        assert_eq!(&log[10..11], " ");
        assert_eq!(&log[19..20], ",");
        assert!(is_valid_calendar_datetime(&log));

        let offset = s.generate(Category::Timestamp, "2024-03-01T12:30:00+02:00").unwrap();
        assert!(offset.ends_with("+02:00"));
        assert!(is_valid_calendar_datetime(&offset));
    }

    #[test]
    fn test_epoch_keeps_digit_count() {
        let s = strategy();
        for original in ["1700000000", "1700000000123"] {
            let out = s.generate(Category::Timestamp, original).unwrap();
            assert_eq!(out.len(), original.len());
            assert!(is_plausible_epoch(&out), "{} is not plausible", out);
        }
    }

    #[test]
    fn test_unrecognised_timestamp_is_an_error() {
        assert!(strategy().generate(Category::Timestamp, "yesterday").is_err());
    }

    #[test]
    fn test_path_flavors() {
        let s = strategy();
        let posix = s.generate(Category::FilePath, "/home/alice/reports/q3.csv").unwrap();
        assert!(posix.starts_with('/'));
        assert_eq!(posix.matches('/').count(), 4);
        assert!(posix.ends_with(".csv"));
        assert!(!posix.contains("alice"));

        let win = s.generate(Category::FilePath, "C:\\Users\\alice\\notes.txt").unwrap();
        assert!(win.starts_with("C:\\"));
        assert_eq!(win.matches('\\').count(), 3);
        assert!(win.ends_with(".txt"));

        let unc = s.generate(Category::FilePath, "\\\\fileserver\\share\\dir").unwrap();
        assert!(unc.starts_with("\\\\fs"));
        assert!(!unc.contains("fileserver"));
        assert_eq!(unc.matches('\\').count(), 4);
    }

    #[test]
    fn test_server_name_shapes() {
        let s = strategy();
        let fqdn = s.generate(Category::ServerName, "db1.prod.example.com").unwrap();
        assert_eq!(fqdn.split('.').count(), 4);
        assert!(fqdn.ends_with(".com"));

        let internal = s.generate(Category::ServerName, "build01.internal").unwrap();
        assert!(internal.ends_with(".internal"));

        let numbered = s.generate(Category::ServerName, "host-042").unwrap();
        assert!(numbered.starts_with("host-"));
        assert_eq!(numbered.len(), "host-042".len());

        let ip = s.generate(Category::ServerName, "10.20.30.40").unwrap();
        assert!(ip.starts_with("192.0.2."));
        assert!(is_valid_ipv4(&ip));
    }

    #[test]
    fn test_custom_uses_fixed_token() {
        let s = SeededPlaceholders::new("seed", "<gone>").unwrap();
        assert_eq!(s.generate(Category::Custom, "anything").unwrap(), "<gone>");
    }

    #[test]
    fn test_compute_run_seed_trims() {
        assert_eq!(compute_run_seed(" abc ").unwrap(), compute_run_seed("abc").unwrap());
        assert_eq!(compute_run_seed("abc").unwrap().len(), 32);
    }
}
