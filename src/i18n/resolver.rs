//! Culture override resolver.
//!
//! Answers "which specific culture represents this neutral culture", honoring
//! user overrides loaded from a settings store and falling back to a fixed
//! default-selection heuristic over the locale catalog.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::error::OverrideError;
use crate::i18n::events::Listeners;
use crate::i18n::{
    CultureOverrideEvent, LocaleCatalog, LocaleId, NeutralLocale, OverrideTable, SpecificLocale,
    SubscriptionId,
};
use crate::settings::SettingsStore;

/// Resolves neutral cultures to specific cultures with persisted overrides.
///
/// The override table only holds entries that differ from the computed
/// default. Every call to `set_override` notifies listeners and writes the
/// table back to the settings store.
#[derive(Debug)]
pub struct CultureOverrideResolver<C, S> {
    catalog: C,
    store: S,
    overrides: OverrideTable,
    listeners: Listeners,
}

impl<C: LocaleCatalog, S: SettingsStore> CultureOverrideResolver<C, S> {
    /// Create a resolver, loading overrides from `store`.
    ///
    /// Malformed persisted entries are skipped, as are entries that name the
    /// current default. An error reading the store itself is returned.
    pub fn new(catalog: C, store: S) -> Result<Self, OverrideError> {
        let raw = store.get()?.unwrap_or_default();
        let mut overrides = OverrideTable::parse(&raw);
        overrides.retain(|neutral, specific| {
            let default = select_default(neutral, catalog.specific_locales(neutral));
            let redundant = default.as_ref() == Some(specific);
            if redundant {
                debug!("Dropping culture override '{}={}': it is the default", neutral, specific);
            }
            !redundant
        });
        debug!("Loaded {} culture override(s)", overrides.len());

        Ok(Self {
            catalog,
            store,
            overrides,
            listeners: Listeners::default(),
        })
    }

    /// The specific culture to use for `neutral`.
    ///
    /// Returns the stored override if there is one, otherwise the default.
    /// `None` when the catalog has no specific culture for `neutral`.
    pub fn resolve(&self, neutral: &NeutralLocale) -> Option<SpecificLocale> {
        match self.overrides.get(neutral) {
            Some(specific) => Some(specific.clone()),
            None => self.default_specific(neutral),
        }
    }

    /// The default specific culture for `neutral`, ignoring overrides.
    ///
    /// Among the catalog candidates, in priority order:
    /// 1. the culture whose region repeats the language (`de` -> `de-DE`)
    /// 2. the first culture whose last subtag starts with the same letter as
    ///    the neutral tag (`sv` -> `sv-SE` rather than `sv-FI`)
    /// 3. the first candidate
    pub fn default_specific(&self, neutral: &NeutralLocale) -> Option<SpecificLocale> {
        select_default(neutral, self.catalog.specific_locales(neutral))
    }

    /// Catalog candidates for `neutral`, in catalog order.
    pub fn candidates(&self, neutral: &NeutralLocale) -> Vec<SpecificLocale> {
        self.catalog.specific_locales(neutral)
    }

    /// Choose `specific` for `neutral`.
    ///
    /// Choosing the default removes any stored override. Listeners are
    /// notified with the requested values before the table is persisted. If
    /// the write fails the error is returned and the in-memory change stays.
    pub fn set_override(
        &mut self,
        neutral: &NeutralLocale,
        specific: &SpecificLocale,
    ) -> Result<(), OverrideError> {
        if self.default_specific(neutral).as_ref() == Some(specific) {
            if self.overrides.remove(neutral).is_some() {
                info!("Removed culture override for '{}'", neutral);
            }
        } else {
            self.overrides.insert(neutral.clone(), specific.clone());
            info!("Culture override set: '{}' -> '{}'", neutral, specific);
        }

        self.listeners
            .notify(&CultureOverrideEvent::new(neutral.clone(), specific.clone()));

        self.persist()
    }

    /// `set_override` for raw tags.
    ///
    /// Blank or invalid tags, a non-neutral `neutral` or a non-specific
    /// `specific` fail with `OverrideError::InvalidArgument` before anything
    /// changes.
    pub fn set_override_tags(&mut self, neutral: &str, specific: &str) -> Result<(), OverrideError> {
        if neutral.trim().is_empty() {
            return Err(OverrideError::InvalidArgument("neutral culture is empty".to_string()));
        }
        if specific.trim().is_empty() {
            return Err(OverrideError::InvalidArgument("specific culture is empty".to_string()));
        }

        let neutral = NeutralLocale::parse(neutral)
            .map_err(|e| OverrideError::InvalidArgument(e.to_string()))?;
        let specific = SpecificLocale::parse(specific)
            .map_err(|e| OverrideError::InvalidArgument(e.to_string()))?;

        self.set_override(&neutral, &specific)
    }

    /// Whether a user override is stored for `neutral`.
    pub fn is_overridden(&self, neutral: &NeutralLocale) -> bool {
        self.overrides.contains(neutral)
    }

    /// The stored overrides.
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Register a listener for override changes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CultureOverrideEvent) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Receive override changes through a channel.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, UnboundedReceiver<CultureOverrideEvent>) {
        self.listeners.subscribe_channel()
    }

    /// Remove a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// The catalog used for default selection.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The store overrides are persisted to.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<(), OverrideError> {
        let value = self.overrides.serialize();
        self.store.set(&value).map_err(|e| {
            warn!("Failed to persist culture overrides: {}", e);
            OverrideError::from(e)
        })
    }
}

fn select_default(
    neutral: &NeutralLocale,
    candidates: Vec<SpecificLocale>,
) -> Option<SpecificLocale> {
    let name = neutral.as_str();
    let preferred = format!("{}-{}", name, name.to_ascii_uppercase());

    if let Some(found) = candidates
        .iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(&preferred))
    {
        return Some(found.clone());
    }

    let initial = name.chars().next()?;
    if let Some(found) = candidates.iter().find(|c| {
        c.id()
            .last_subtag()
            .chars()
            .next()
            .is_some_and(|first| first.eq_ignore_ascii_case(&initial))
    }) {
        return Some(found.clone());
    }

    candidates.into_iter().next()
}

/// Thread-safe handle around a resolver.
///
/// Each method holds one lock for the whole operation, so the read, default
/// computation, table update and write of `set_override` happen as a unit.
/// Listeners registered through the handle run after that lock is released,
/// so they may call back into the handle (e.g. `resolve` on the changed
/// culture). Listeners registered on the resolver before it was wrapped run
/// under the lock and must not.
pub struct SharedResolver<C, S> {
    inner: Arc<Mutex<CultureOverrideResolver<C, S>>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl<C, S> Clone for SharedResolver<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<C: LocaleCatalog, S: SettingsStore> SharedResolver<C, S> {
    /// Wrap `resolver` for use from several threads.
    pub fn new(resolver: CultureOverrideResolver<C, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(resolver)),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// See `CultureOverrideResolver::resolve`.
    pub fn resolve(&self, neutral: &NeutralLocale) -> Result<Option<SpecificLocale>, OverrideError> {
        Ok(self.lock()?.resolve(neutral))
    }

    /// See `CultureOverrideResolver::default_specific`.
    pub fn default_specific(
        &self,
        neutral: &NeutralLocale,
    ) -> Result<Option<SpecificLocale>, OverrideError> {
        Ok(self.lock()?.default_specific(neutral))
    }

    /// Update the override under the lock, then notify the handle's
    /// listeners once the lock is released. Listeners are notified even if
    /// the write failed; the write error is returned afterwards.
    pub fn set_override(
        &self,
        neutral: &NeutralLocale,
        specific: &SpecificLocale,
    ) -> Result<(), OverrideError> {
        let result = self.lock()?.set_override(neutral, specific);

        let event = CultureOverrideEvent::new(neutral.clone(), specific.clone());
        self.listeners
            .lock()
            .map_err(|_| OverrideError::LockPoisoned)?
            .notify(&event);

        result
    }

    /// Register a listener called after each `set_override` through any
    /// clone of this handle. Listeners must not subscribe or unsubscribe
    /// from inside the callback.
    pub fn subscribe<F>(&self, listener: F) -> Result<SubscriptionId, OverrideError>
    where
        F: FnMut(&CultureOverrideEvent) + Send + 'static,
    {
        Ok(self.listeners()?.subscribe(listener))
    }

    /// Receive override changes made through this handle via a channel.
    pub fn subscribe_channel(
        &self,
    ) -> Result<(SubscriptionId, UnboundedReceiver<CultureOverrideEvent>), OverrideError> {
        Ok(self.listeners()?.subscribe_channel())
    }

    /// Remove a listener registered through this handle.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, OverrideError> {
        Ok(self.listeners()?.unsubscribe(id))
    }

    /// Snapshot of the stored overrides.
    pub fn overrides(&self) -> Result<OverrideTable, OverrideError> {
        Ok(self.lock()?.overrides().clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CultureOverrideResolver<C, S>>, OverrideError> {
        self.inner.lock().map_err(|_| OverrideError::LockPoisoned)
    }

    fn listeners(&self) -> Result<MutexGuard<'_, Listeners>, OverrideError> {
        self.listeners.lock().map_err(|_| OverrideError::LockPoisoned)
    }
}

/// Parse a neutral tag given as any locale string, dropping a region if one
/// is present ("de-DE" -> "de").
pub fn neutral_of(tag: &str) -> Result<NeutralLocale, OverrideError> {
    let id = LocaleId::parse(tag).map_err(|e| OverrideError::InvalidArgument(e.to_string()))?;
    match SpecificLocale::try_from(id.clone()) {
        Ok(specific) => Ok(specific.language_parent()),
        Err(_) => NeutralLocale::try_from(id).map_err(|e| OverrideError::InvalidArgument(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use crate::i18n::StaticCatalog;
    use crate::settings::MemorySettingsStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    // ==================== Helper Functions ====================

    fn neutral(tag: &str) -> NeutralLocale {
        NeutralLocale::parse(tag).expect("Valid neutral tag")
    }

    fn specific(tag: &str) -> SpecificLocale {
        SpecificLocale::parse(tag).expect("Valid specific tag")
    }

    fn test_catalog() -> StaticCatalog {
        StaticCatalog::from_tags([
            "de-AT", "de-CH", "de-DE", "sv-FI", "sv-SE", "en-AU", "en-GB", "en-US", "pt-BR",
        ])
    }

    fn create_resolver(persisted: &str) -> CultureOverrideResolver<StaticCatalog, MemorySettingsStore> {
        CultureOverrideResolver::new(test_catalog(), MemorySettingsStore::with_value(persisted))
            .expect("Should create resolver")
    }

    /// Store that can read but refuses every write
    struct ReadOnlyStore {
        value: Option<String>,
    }

    impl SettingsStore for ReadOnlyStore {
        fn get(&self) -> Result<Option<String>, SettingsError> {
            Ok(self.value.clone())
        }

        fn set(&mut self, _value: &str) -> Result<(), SettingsError> {
            Err(SettingsError::Unavailable("read-only".to_string()))
        }
    }

    /// Store whose reads fail
    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn get(&self) -> Result<Option<String>, SettingsError> {
            Err(SettingsError::Unavailable("broken".to_string()))
        }

        fn set(&mut self, _value: &str) -> Result<(), SettingsError> {
            Ok(())
        }
    }

    // ==================== Default Selection Tests ====================

    #[test]
    fn test_default_prefers_region_matching_language() {
        let resolver = create_resolver("");
        assert_eq!(resolver.default_specific(&neutral("de")), Some(specific("de-DE")));
    }

    #[test]
    fn test_default_prefers_matching_first_letter() {
        let resolver = create_resolver("");
        assert_eq!(resolver.default_specific(&neutral("sv")), Some(specific("sv-SE")));
    }

    #[test]
    fn test_default_first_letter_uses_catalog_order() {
        let catalog = StaticCatalog::from_tags(["es-AR", "es-EC", "es-ES"]);
        let resolver = CultureOverrideResolver::new(catalog, MemorySettingsStore::new()).unwrap();

        // es-ES satisfies the region rule before the first-letter rule applies
        assert_eq!(resolver.default_specific(&neutral("es")), Some(specific("es-ES")));

        let catalog = StaticCatalog::from_tags(["en-AU", "en-ER", "en-EE"]);
        let resolver = CultureOverrideResolver::new(catalog, MemorySettingsStore::new()).unwrap();
        assert_eq!(resolver.default_specific(&neutral("en")), Some(specific("en-ER")));
    }

    #[test]
    fn test_default_falls_back_to_first_candidate() {
        let resolver = create_resolver("");
        assert_eq!(resolver.default_specific(&neutral("pt")), Some(specific("pt-BR")));
        assert_eq!(resolver.default_specific(&neutral("en")), Some(specific("en-AU")));
    }

    #[test]
    fn test_default_without_candidates() {
        let resolver = create_resolver("");
        assert_eq!(resolver.default_specific(&neutral("ja")), None);
        assert_eq!(resolver.resolve(&neutral("ja")), None);
        assert!(resolver.overrides().is_empty());
    }

    #[test]
    fn test_default_is_case_insensitive() {
        let catalog = StaticCatalog::from_tags(["de-at", "DE-de"]);
        let resolver = CultureOverrideResolver::new(catalog, MemorySettingsStore::new()).unwrap();
        assert_eq!(resolver.default_specific(&neutral("DE")), Some(specific("de-DE")));
    }

    #[test]
    fn test_default_with_legacy_parent() {
        let resolver =
            CultureOverrideResolver::new(StaticCatalog::builtin(), MemorySettingsStore::new()).unwrap();
        assert_eq!(resolver.default_specific(&neutral("zh-Hant")), Some(specific("zh-HK")));
        assert_eq!(resolver.default_specific(&neutral("zh-CHS")), Some(specific("zh-CN")));
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_loads_persisted_overrides() {
        let resolver = create_resolver("de=de-CH, sv = sv-FI");
        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-CH")));
        assert_eq!(resolver.resolve(&neutral("sv")), Some(specific("sv-FI")));
        assert_eq!(resolver.overrides().len(), 2);
    }

    #[test]
    fn test_new_skips_malformed_entries() {
        let resolver = create_resolver("garbage,de=de-AT,x=,=y,en=en-GB=en-US");
        assert_eq!(resolver.overrides().len(), 1);
        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-AT")));
    }

    #[test]
    fn test_new_with_unset_setting() {
        let resolver = CultureOverrideResolver::new(test_catalog(), MemorySettingsStore::new())
            .expect("Should create resolver");
        assert!(resolver.overrides().is_empty());
    }

    #[test]
    fn test_new_propagates_read_failure() {
        let result = CultureOverrideResolver::new(test_catalog(), BrokenStore);
        assert!(matches!(result, Err(OverrideError::Persistence(_))));
    }

    #[test]
    fn test_new_drops_override_equal_to_default() {
        let catalog = StaticCatalog::from_tags(["de-AT", "de-DE"]);
        let store = MemorySettingsStore::with_value("de=de-DE,sv=sv-FI");
        let resolver = CultureOverrideResolver::new(catalog, store).unwrap();

        assert!(!resolver.is_overridden(&neutral("de")));
        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-DE")));
        assert_eq!(resolver.overrides().len(), 1);
        assert!(resolver.is_overridden(&neutral("sv")));
    }

    #[test]
    fn test_next_write_omits_dropped_default_entry() {
        let mut resolver = create_resolver("de=de-DE");
        resolver.set_override(&neutral("sv"), &specific("sv-FI")).unwrap();
        assert_eq!(resolver.store().value(), Some("sv=sv-FI"));
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_without_overrides_equals_default() {
        let resolver = create_resolver("");
        for tag in ["de", "sv", "en", "pt", "ja"] {
            let n = neutral(tag);
            assert_eq!(resolver.resolve(&n), resolver.default_specific(&n));
        }
    }

    // ==================== set_override Tests ====================

    #[test]
    fn test_set_non_default_is_stored_and_resolved() {
        let mut resolver = create_resolver("");
        resolver
            .set_override(&neutral("de"), &specific("de-AT"))
            .expect("Should set override");

        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-AT")));
        assert!(resolver.is_overridden(&neutral("de")));
        assert_eq!(resolver.store().value(), Some("de=de-AT"));
    }

    #[test]
    fn test_set_default_removes_override() {
        let mut resolver = create_resolver("de=de-AT");
        resolver
            .set_override(&neutral("de"), &specific("de-DE"))
            .expect("Should set override");

        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-DE")));
        assert!(!resolver.is_overridden(&neutral("de")));
        assert_eq!(resolver.store().value(), Some(""));
    }

    #[test]
    fn test_set_default_without_existing_override_persists() {
        let mut resolver = create_resolver("sv=sv-FI");
        resolver
            .set_override(&neutral("de"), &specific("de-DE"))
            .expect("Should set override");

        assert!(!resolver.is_overridden(&neutral("de")));
        assert_eq!(resolver.store().value(), Some("sv=sv-FI"));
    }

    #[test]
    fn test_set_override_replaces_existing() {
        let mut resolver = create_resolver("de=de-AT");
        resolver.set_override(&neutral("de"), &specific("de-CH")).unwrap();

        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-CH")));
        assert_eq!(resolver.overrides().len(), 1);
    }

    #[test]
    fn test_set_override_for_neutral_without_candidates() {
        let mut resolver = create_resolver("");
        resolver.set_override(&neutral("ja"), &specific("ja-JP")).unwrap();
        assert_eq!(resolver.resolve(&neutral("ja")), Some(specific("ja-JP")));
    }

    #[test]
    fn test_persisted_value_round_trips() {
        let mut resolver = create_resolver("");
        resolver.set_override(&neutral("sv"), &specific("sv-FI")).unwrap();
        resolver.set_override(&neutral("de"), &specific("de-LU")).unwrap();
        resolver.set_override(&neutral("en"), &specific("en-US")).unwrap();

        let persisted = resolver.store().value().unwrap_or_default().to_string();
        assert_eq!(&OverrideTable::parse(&persisted), resolver.overrides());
    }

    #[test]
    fn test_write_failure_propagates_without_rollback() {
        let store = ReadOnlyStore { value: None };
        let mut resolver = CultureOverrideResolver::new(test_catalog(), store).unwrap();

        let result = resolver.set_override(&neutral("de"), &specific("de-AT"));

        assert!(matches!(result, Err(OverrideError::Persistence(_))));
        assert_eq!(resolver.resolve(&neutral("de")), Some(specific("de-AT")));
    }

    // ==================== set_override_tags Tests ====================

    #[test]
    fn test_set_override_tags() {
        let mut resolver = create_resolver("");
        resolver.set_override_tags("SV", "sv_fi").expect("Should set override");
        assert_eq!(resolver.resolve(&neutral("sv")), Some(specific("sv-FI")));
    }

    #[test]
    fn test_set_override_tags_rejects_empty() {
        let mut resolver = create_resolver("");
        assert!(matches!(
            resolver.set_override_tags("", "de-AT"),
            Err(OverrideError::InvalidArgument(_))
        ));
        assert!(matches!(
            resolver.set_override_tags("de", "  "),
            Err(OverrideError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_set_override_tags_rejects_wrong_kind() {
        let mut resolver = create_resolver("");
        assert!(matches!(
            resolver.set_override_tags("de-DE", "de-AT"),
            Err(OverrideError::InvalidArgument(_))
        ));
        assert!(matches!(
            resolver.set_override_tags("de", "fr"),
            Err(OverrideError::InvalidArgument(_))
        ));
        assert!(resolver.overrides().is_empty());
    }

    // ==================== Notification Tests ====================

    #[test]
    fn test_listener_receives_requested_values() {
        let mut resolver = create_resolver("de=de-AT");
        let (_, mut receiver) = resolver.subscribe_channel();

        resolver.set_override(&neutral("sv"), &specific("sv-FI")).unwrap();
        resolver.set_override(&neutral("de"), &specific("de-DE")).unwrap();

        let first = receiver.try_recv().expect("First event");
        assert_eq!(first, CultureOverrideEvent::new(neutral("sv"), specific("sv-FI")));

        // Removal still reports the requested culture
        let second = receiver.try_recv().expect("Second event");
        assert_eq!(second, CultureOverrideEvent::new(neutral("de"), specific("de-DE")));

        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_listener_called_once_per_call() {
        let mut resolver = create_resolver("");
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        resolver.subscribe(move |_: &CultureOverrideEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        resolver.set_override(&neutral("de"), &specific("de-AT")).unwrap();
        resolver.set_override(&neutral("de"), &specific("de-AT")).unwrap();
        resolver.set_override(&neutral("de"), &specific("de-DE")).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_listener_notified_before_failed_write() {
        let store = ReadOnlyStore { value: None };
        let mut resolver = CultureOverrideResolver::new(test_catalog(), store).unwrap();
        let (_, mut receiver) = resolver.subscribe_channel();

        assert!(resolver.set_override(&neutral("de"), &specific("de-AT")).is_err());
        assert!(receiver.try_recv().is_ok());
    }

    #[test]
    fn test_unsubscribed_listener_not_called() {
        let mut resolver = create_resolver("");
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let id = resolver.subscribe(move |_: &CultureOverrideEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(resolver.unsubscribe(id));
        resolver.set_override(&neutral("de"), &specific("de-AT")).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    // ==================== SharedResolver Tests ====================

    #[test]
    fn test_shared_resolver_across_threads() {
        let shared = SharedResolver::new(create_resolver(""));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        shared
            .subscribe(move |_: &CultureOverrideEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let handles: Vec<_> = ["de-AT", "de-CH", "de-DE", "de-AT"]
            .into_iter()
            .map(|tag| {
                let shared = shared.clone();
                thread::spawn(move || shared.set_override(&neutral("de"), &specific(tag)))
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked").expect("Should set override");
        }

        assert_eq!(count.load(Ordering::SeqCst), 4);

        // Whatever order the threads ran in, no redundant entry is stored
        let overrides = shared.overrides().unwrap();
        if let Some(value) = overrides.get(&neutral("de")) {
            assert_ne!(value, &specific("de-DE"));
        }
    }

    #[test]
    fn test_shared_listener_can_call_back_into_handle() {
        let shared = SharedResolver::new(create_resolver(""));
        let (resolved_tx, resolved_rx) = std::sync::mpsc::channel();

        let handle = shared.clone();
        shared
            .subscribe(move |event: &CultureOverrideEvent| {
                let _ = resolved_tx.send(handle.resolve(event.neutral()));
            })
            .unwrap();

        let worker = shared.clone();
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            let _ = done_tx.send(worker.set_override(&neutral("de"), &specific("de-CH")));
        });

        let finished = done_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("set_override should not block on its own listener");
        finished.expect("Should set override");

        let resolved = resolved_rx.recv().expect("Listener should run");
        assert_eq!(resolved.unwrap(), Some(specific("de-CH")));
    }

    #[test]
    fn test_shared_listener_notified_on_failed_write() {
        let store = ReadOnlyStore { value: None };
        let shared = SharedResolver::new(CultureOverrideResolver::new(test_catalog(), store).unwrap());
        let (_, mut receiver) = shared.subscribe_channel().unwrap();

        let result = shared.set_override(&neutral("de"), &specific("de-AT"));

        assert!(matches!(result, Err(OverrideError::Persistence(_))));
        assert_eq!(
            receiver.try_recv().unwrap(),
            CultureOverrideEvent::new(neutral("de"), specific("de-AT"))
        );
        assert_eq!(shared.resolve(&neutral("de")).unwrap(), Some(specific("de-AT")));
    }

    // ==================== neutral_of Tests ====================

    #[test]
    fn test_neutral_of() {
        assert_eq!(neutral_of("de").unwrap(), neutral("de"));
        assert_eq!(neutral_of("de-CH").unwrap(), neutral("de"));
        assert!(matches!(neutral_of(""), Err(OverrideError::InvalidArgument(_))));
    }
}
