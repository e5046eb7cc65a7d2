//! Culture resolution for neutral languages.
//!
//! This module decides which specific culture (e.g. "de-DE") stands for a
//! neutral culture (e.g. "de"), and lets users override that choice.
//!
//! # Architecture
//!
//! - `locale`: Case-insensitive locale identifiers and the neutral/specific split
//! - `catalog`: The known specific cultures, queried by parent language
//! - `overrides`: The override table and its persisted `neutral=specific` form
//! - `events`: Change notifications for override updates
//! - `resolver`: Default selection, override storage and persistence
//!
//! # Example
//!
//! ```rust
//! use culture_overrides::i18n::{CultureOverrideResolver, NeutralLocale, SpecificLocale, StaticCatalog};
//! use culture_overrides::settings::MemorySettingsStore;
//!
//! let mut resolver = CultureOverrideResolver::new(StaticCatalog::builtin(), MemorySettingsStore::new())?;
//! let german = NeutralLocale::parse("de")?;
//!
//! assert_eq!(resolver.resolve(&german), Some(SpecificLocale::parse("de-DE")?));
//!
//! resolver.set_override(&german, &SpecificLocale::parse("de-CH")?)?;
//! assert_eq!(resolver.resolve(&german), Some(SpecificLocale::parse("de-CH")?));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod catalog;
mod events;
mod locale;
mod overrides;
mod resolver;

pub use catalog::{CatalogEntry, LocaleCatalog, StaticCatalog};
pub use events::{CultureOverrideEvent, SubscriptionId};
pub use locale::{LocaleId, NeutralLocale, SpecificLocale};
pub use overrides::OverrideTable;
pub use resolver::{neutral_of, CultureOverrideResolver, SharedResolver};
