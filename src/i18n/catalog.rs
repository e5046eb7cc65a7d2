//! Locale catalog: the known specific cultures and their parent languages.
//!
//! The resolver never enumerates cultures itself. It asks a `LocaleCatalog`
//! for the specific locales that belong to a neutral locale and applies its
//! selection rules to the answer, so the catalog must return candidates in a
//! stable order.

use crate::i18n::{LocaleId, NeutralLocale, SpecificLocale};

/// Source of specific locales grouped by parent language.
pub trait LocaleCatalog {
    /// All specific locales whose parent is `neutral`, in stable catalog order.
    fn specific_locales(&self, neutral: &NeutralLocale) -> Vec<SpecificLocale>;
}

/// A specific culture together with both forms of its parent tag.
///
/// Some cultures carry a legacy parent name that differs from the IETF parent
/// tag (e.g. "zh-CN" has parent "zh-CHS" and IETF parent "zh-Hans"). A lookup
/// matches either form.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub locale: SpecificLocale,
    pub parent: LocaleId,
    pub parent_ietf: LocaleId,
}

impl CatalogEntry {
    /// Entry whose parent is the language subtag of `locale` in both forms.
    pub fn new(locale: SpecificLocale) -> Self {
        let parent = locale.language_parent().id().clone();
        Self {
            locale,
            parent_ietf: parent.clone(),
            parent,
        }
    }

    /// Entry with explicit parent tags.
    pub fn with_parents(locale: SpecificLocale, parent: LocaleId, parent_ietf: LocaleId) -> Self {
        Self {
            locale,
            parent,
            parent_ietf,
        }
    }

    fn has_parent(&self, neutral: &NeutralLocale) -> bool {
        &self.parent == neutral.id() || &self.parent_ietf == neutral.id()
    }
}

/// In-memory catalog backed by an ordered list of entries.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Build a catalog from specific tags, deriving each parent from the
    /// language subtag. Tags that are not valid specific locales are skipped.
    ///
    /// # Example
    /// ```
    /// use culture_overrides::i18n::{LocaleCatalog, NeutralLocale, StaticCatalog};
    ///
    /// let catalog = StaticCatalog::from_tags(["de-AT", "de-DE", "fr-FR"]);
    /// let german = NeutralLocale::parse("de").unwrap();
    /// assert_eq!(catalog.specific_locales(&german).len(), 2);
    /// ```
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = tags
            .into_iter()
            .filter_map(|tag| SpecificLocale::parse(tag).ok())
            .map(CatalogEntry::new)
            .collect();
        Self { entries }
    }

    /// The bundled catalog of common specific cultures, ordered by tag.
    pub fn builtin() -> Self {
        let mut entries: Vec<CatalogEntry> = BUILTIN_TAGS
            .iter()
            .filter_map(|tag| SpecificLocale::parse(tag).ok())
            .map(CatalogEntry::new)
            .collect();

        for (tag, parent, parent_ietf) in LEGACY_PARENTS {
            if let (Ok(locale), Ok(parent), Ok(parent_ietf)) = (
                SpecificLocale::parse(tag),
                LocaleId::parse(parent),
                LocaleId::parse(parent_ietf),
            ) {
                entries.push(CatalogEntry::with_parents(locale, parent, parent_ietf));
            }
        }

        entries.sort_by(|a, b| a.locale.cmp(&b.locale));
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocaleCatalog for StaticCatalog {
    fn specific_locales(&self, neutral: &NeutralLocale) -> Vec<SpecificLocale> {
        self.entries
            .iter()
            .filter(|entry| entry.has_parent(neutral))
            .map(|entry| entry.locale.clone())
            .collect()
    }
}

/// Specific cultures whose parent is their language subtag.
const BUILTIN_TAGS: &[&str] = &[
    "af-ZA", "am-ET", "ar-AE", "ar-BH", "ar-DZ", "ar-EG", "ar-IQ", "ar-JO", "ar-KW", "ar-LB",
    "ar-LY", "ar-MA", "ar-OM", "ar-QA", "ar-SA", "ar-SY", "ar-TN", "ar-YE", "be-BY", "bg-BG",
    "bn-BD", "bn-IN", "ca-ES", "cs-CZ", "cy-GB", "da-DK", "de-AT", "de-CH", "de-DE", "de-LI",
    "de-LU", "el-GR", "en-AU", "en-CA", "en-GB", "en-IE", "en-IN", "en-NZ", "en-SG", "en-US",
    "en-ZA", "es-419", "es-AR", "es-CL", "es-CO", "es-ES", "es-MX", "es-PE", "es-US", "es-VE",
    "et-EE", "eu-ES", "fa-IR", "fi-FI", "fil-PH", "fr-BE", "fr-CA", "fr-CH", "fr-FR", "fr-LU",
    "fr-MC", "ga-IE", "gl-ES", "gu-IN", "he-IL", "hi-IN", "hr-BA", "hr-HR", "hu-HU", "hy-AM",
    "id-ID", "is-IS", "it-CH", "it-IT", "ja-JP", "ka-GE", "kk-KZ", "km-KH", "kn-IN", "ko-KR",
    "lt-LT", "lv-LV", "mk-MK", "ml-IN", "mn-MN", "mr-IN", "ms-BN", "ms-MY", "mt-MT", "nb-NO",
    "ne-NP", "nl-BE", "nl-NL", "nn-NO", "pa-IN", "pl-PL", "pt-BR", "pt-PT", "ro-MD", "ro-RO",
    "ru-MD", "ru-RU", "sk-SK", "sl-SI", "sq-AL", "sv-FI", "sv-SE", "sw-KE", "ta-IN", "ta-LK",
    "te-IN", "th-TH", "tr-TR", "uk-UA", "ur-PK", "uz-UZ", "vi-VN",
];

/// Specific cultures with explicit legacy and IETF parent tags.
const LEGACY_PARENTS: &[(&str, &str, &str)] = &[
    ("sr-Cyrl-RS", "sr-Cyrl", "sr-Cyrl"),
    ("sr-Latn-RS", "sr-Latn", "sr-Latn"),
    ("zh-CN", "zh-CHS", "zh-Hans"),
    ("zh-HK", "zh-CHT", "zh-Hant"),
    ("zh-MO", "zh-CHT", "zh-Hant"),
    ("zh-SG", "zh-CHS", "zh-Hans"),
    ("zh-TW", "zh-CHT", "zh-Hant"),
];
