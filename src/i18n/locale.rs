//! Locale identifiers: normalized, case-insensitive language tags.
//!
//! This module provides `LocaleId`, a value type for tags such as "de" or
//! "de-DE", plus the `NeutralLocale` and `SpecificLocale` wrappers that encode
//! whether a region subtag is present.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::LocaleError;

// Language subtag followed by any number of alphanumeric subtags
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,8}(?:-[A-Za-z0-9]{1,8})*$").expect("Invalid tag regex")
    })
}

/// A validated language tag.
///
/// The tag is stored in its normalized casing ("de-DE", "zh-Hans", "es-419").
/// Equality, hashing and ordering ignore ASCII case, so "DE-de" and "de-DE"
/// are the same locale.
#[derive(Debug, Clone)]
pub struct LocaleId {
    tag: String,
}

impl LocaleId {
    /// Parse and normalize a language tag.
    ///
    /// Surrounding whitespace is trimmed and `_` separators are accepted.
    ///
    /// # Example
    /// ```
    /// use culture_overrides::i18n::LocaleId;
    ///
    /// let locale = LocaleId::parse("de_de").unwrap();
    /// assert_eq!(locale.as_str(), "de-DE");
    /// ```
    pub fn parse(raw: &str) -> Result<LocaleId, LocaleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::Empty);
        }

        let candidate = trimmed.replace('_', "-");
        if !tag_regex().is_match(&candidate) {
            return Err(LocaleError::InvalidTag(trimmed.to_string()));
        }

        let tag = candidate
            .split('-')
            .enumerate()
            .map(|(index, subtag)| normalize_subtag(index, subtag))
            .collect::<Vec<_>>()
            .join("-");

        Ok(LocaleId { tag })
    }

    /// The normalized tag string.
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The primary language subtag (e.g. "de" for "de-DE").
    pub fn language(&self) -> &str {
        self.subtags().next().unwrap_or(self.tag.as_str())
    }

    /// The region subtag, if the tag carries one.
    pub fn region(&self) -> Option<&str> {
        self.subtags().skip(1).find(|subtag| is_region(subtag))
    }

    /// The last subtag of the tag ("CH" for "de-CH", "de" for "de").
    pub fn last_subtag(&self) -> &str {
        self.subtags().last().unwrap_or(self.tag.as_str())
    }

    /// A neutral locale has no region subtag.
    pub fn is_neutral(&self) -> bool {
        self.region().is_none()
    }

    fn subtags(&self) -> impl Iterator<Item = &str> {
        self.tag.split('-')
    }
}

fn normalize_subtag(index: usize, subtag: &str) -> String {
    if index == 0 {
        return subtag.to_ascii_lowercase();
    }

    if is_region(subtag) {
        subtag.to_ascii_uppercase()
    } else if subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()) {
        // Script subtag, e.g. "Hans"
        let lower = subtag.to_ascii_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => lower,
        }
    } else {
        subtag.to_ascii_lowercase()
    }
}

fn is_region(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
}

impl PartialEq for LocaleId {
    fn eq(&self, other: &Self) -> bool {
        self.tag.eq_ignore_ascii_case(&other.tag)
    }
}

impl Eq for LocaleId {}

impl Hash for LocaleId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.tag.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl Ord for LocaleId {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.tag.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.tag.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for LocaleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for LocaleId {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocaleId::parse(s)
    }
}

impl Serialize for LocaleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag)
    }
}

/// A locale without a region subtag (e.g. "de", "zh-Hans").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NeutralLocale(LocaleId);

impl NeutralLocale {
    /// Parse a tag and require it to be neutral.
    pub fn parse(raw: &str) -> Result<NeutralLocale, LocaleError> {
        NeutralLocale::try_from(LocaleId::parse(raw)?)
    }

    pub fn id(&self) -> &LocaleId {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<LocaleId> for NeutralLocale {
    type Error = LocaleError;

    fn try_from(id: LocaleId) -> Result<Self, Self::Error> {
        if id.is_neutral() {
            Ok(NeutralLocale(id))
        } else {
            Err(LocaleError::NotNeutral(id.tag))
        }
    }
}

impl fmt::Display for NeutralLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NeutralLocale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NeutralLocale::parse(s)
    }
}

/// A locale with a region subtag (e.g. "de-DE", "es-419").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpecificLocale(LocaleId);

impl SpecificLocale {
    /// Parse a tag and require it to carry a region.
    pub fn parse(raw: &str) -> Result<SpecificLocale, LocaleError> {
        SpecificLocale::try_from(LocaleId::parse(raw)?)
    }

    pub fn id(&self) -> &LocaleId {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The region subtag ("DE" for "de-DE").
    pub fn region(&self) -> &str {
        self.0.region().unwrap_or_default()
    }

    /// The neutral locale formed by the language subtag alone.
    pub fn language_parent(&self) -> NeutralLocale {
        NeutralLocale(LocaleId {
            tag: self.0.language().to_string(),
        })
    }
}

impl TryFrom<LocaleId> for SpecificLocale {
    type Error = LocaleError;

    fn try_from(id: LocaleId) -> Result<Self, Self::Error> {
        if id.is_neutral() {
            Err(LocaleError::NotSpecific(id.tag))
        } else {
            Ok(SpecificLocale(id))
        }
    }
}

impl fmt::Display for SpecificLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SpecificLocale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpecificLocale::parse(s)
    }
}
