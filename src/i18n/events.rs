//! Change notifications for culture overrides.

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::i18n::{NeutralLocale, SpecificLocale};

/// Emitted once per override update with the requested values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CultureOverrideEvent {
    neutral: NeutralLocale,
    specific: SpecificLocale,
}

impl CultureOverrideEvent {
    pub fn new(neutral: NeutralLocale, specific: SpecificLocale) -> Self {
        Self { neutral, specific }
    }

    pub fn neutral(&self) -> &NeutralLocale {
        &self.neutral
    }

    pub fn specific(&self) -> &SpecificLocale {
        &self.specific
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CultureOverrideEvent) + Send>;

/// Registered listeners, called in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CultureOverrideEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Forward every event into an unbounded channel. Events sent after the
    /// receiver is dropped are discarded.
    pub(crate) fn subscribe_channel(&mut self) -> (SubscriptionId, UnboundedReceiver<CultureOverrideEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.subscribe(move |event: &CultureOverrideEvent| {
            let _ = sender.send(event.clone());
        });
        (id, receiver)
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, event: &CultureOverrideEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
