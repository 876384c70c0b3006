//! # Artifact Versions
//!
//! Content packages are versioned the Maven way: `1`, `1.0`, `1.0.3`,
//! `2.1-SNAPSHOT`, `1.0.0.beta`. This module turns those strings into a
//! comparable `Version` so the merge processor can apply its
//! highest-version-wins rule and the plan builder can detect snapshots.
//!
//! ## Parsing
//!
//! 1.  **Strict**: the string is first handed to `semver::Version::parse`.
//!     Build metadata is dropped; the pre-release becomes the qualifier.
//!
//! 2.  **Lenient**: up to three leading dot-separated numeric segments are
//!     read (missing segments are `0`); whatever follows the last numeric
//!     segment after a `-` or `.` is the qualifier. A version with no leading
//!     number is `0.0.0` qualified by the whole string.
//!
//! ## Ordering
//!
//! Versions compare the OSGi way: by `major`, `minor`, `patch`, then the
//! qualifier as a plain string. An empty qualifier sorts lowest, so a release
//! sorts before any qualified version with the same numbers and
//! `1.0 < 1.0-SNAPSHOT`. `1`, `1.0` and `1.0.0` are equal.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const SNAPSHOT_QUALIFIER: &str = "SNAPSHOT";

/// A parsed, comparable package version
#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    qualifier: String,
    raw: String,
}

impl Version {
    /// Parse a version string. Parsing never fails; see the module docs for
    /// how non-semver strings are normalized.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(strict) = semver::Version::parse(trimmed) {
            return Self {
                major: strict.major,
                minor: strict.minor,
                patch: strict.patch,
                qualifier: strict.pre.as_str().to_string(),
                raw: raw.to_string(),
            };
        }

        let mut numbers = [0u64; 3];
        let mut rest = trimmed;
        let mut index = 0;
        while index < numbers.len() {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                break;
            }
            match rest[..digits].parse::<u64>() {
                Ok(value) => numbers[index] = value,
                Err(_) => break,
            }
            rest = &rest[digits..];
            index += 1;
            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) && index < 3 => {
                    rest = next
                }
                _ => break,
            }
        }

        let qualifier = if index == 0 {
            trimmed
        } else {
            rest.strip_prefix(['-', '.']).unwrap_or(rest)
        };

        Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            qualifier: qualifier.to_string(),
            raw: raw.to_string(),
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The qualifier (pre-release) part; empty for releases.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The version exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is a mutable snapshot version (`1.0-SNAPSHOT`).
    pub fn is_snapshot(&self) -> bool {
        is_snapshot(&self.raw)
    }

    fn key(&self) -> (u64, u64, u64, &str) {
        (self.major, self.minor, self.patch, self.qualifier.as_str())
    }
}

/// Returns true if a raw version string denotes a snapshot version.
pub fn is_snapshot(raw: &str) -> bool {
    let raw = raw.trim();
    raw == SNAPSHOT_QUALIFIER
        || raw
            .strip_suffix(SNAPSHOT_QUALIFIER)
            .is_some_and(|head| head.ends_with('-'))
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
