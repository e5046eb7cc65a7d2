//! Override table and its persisted string form.
//!
//! Overrides are stored as a single setting value of comma-separated
//! `neutral=specific` pairs, e.g. `"de=de-AT,sv=sv-FI"`.

use std::collections::BTreeMap;
use tracing::debug;

use crate::i18n::{LocaleId, NeutralLocale, SpecificLocale};

const ENTRY_SEPARATOR: &str = ",";
const PAIR_SEPARATOR: &str = "=";

/// User-chosen specific locales keyed by neutral locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<NeutralLocale, SpecificLocale>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted form.
    ///
    /// Entries with the wrong number of fields, invalid tags, a key that is
    /// not neutral or a value that is not specific are skipped. Later
    /// entries for the same key replace earlier ones.
    pub fn parse(raw: &str) -> Self {
        let mut table = Self::new();

        for item in raw.split(ENTRY_SEPARATOR) {
            match parse_entry(item) {
                Some((neutral, specific)) => {
                    table.insert(neutral, specific);
                }
                None if item.trim().is_empty() => {}
                None => debug!("Skipping malformed culture override entry: '{}'", item),
            }
        }

        table
    }

    /// Render the persisted form. An empty table renders as "".
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|(neutral, specific)| format!("{}{}{}", neutral, PAIR_SEPARATOR, specific))
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }

    pub fn get(&self, neutral: &NeutralLocale) -> Option<&SpecificLocale> {
        self.entries.get(neutral)
    }

    pub fn contains(&self, neutral: &NeutralLocale) -> bool {
        self.entries.contains_key(neutral)
    }

    pub fn insert(
        &mut self,
        neutral: NeutralLocale,
        specific: SpecificLocale,
    ) -> Option<SpecificLocale> {
        self.entries.insert(neutral, specific)
    }

    pub fn remove(&mut self, neutral: &NeutralLocale) -> Option<SpecificLocale> {
        self.entries.remove(neutral)
    }

    /// Keep only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&NeutralLocale, &SpecificLocale) -> bool,
    {
        self.entries.retain(|neutral, specific| keep(neutral, specific));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NeutralLocale, &SpecificLocale)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(item: &str) -> Option<(NeutralLocale, SpecificLocale)> {
    let parts: Vec<&str> = item.split(PAIR_SEPARATOR).map(str::trim).collect();
    if parts.len() != 2 {
        return None;
    }

    let neutral = NeutralLocale::try_from(LocaleId::parse(parts[0]).ok()?).ok()?;
    let specific = SpecificLocale::try_from(LocaleId::parse(parts[1]).ok()?).ok()?;
    Some((neutral, specific))
}
