//! In-memory document host for tests, demos and the CLI.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::document::{DocumentChange, DocumentHost, EntryId, IndicatorId, IndicatorRef};
use crate::render::IndicatorView;

const CHANGE_CAPACITY: usize = 256;

#[derive(Debug)]
struct Indicator {
    id: IndicatorId,
    view: IndicatorView,
}

#[derive(Debug)]
struct Entry {
    id: EntryId,
    link: Option<String>,
    indicator: Option<Indicator>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    entries: Vec<Entry>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    fn holder_of(&mut self, id: IndicatorId) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.indicator.as_ref().is_some_and(|i| i.id == id))
    }
}

/// A flat list of listing entries with at most one indicator each.
///
/// Every structural mutation, including the enricher's own, is broadcast as a
/// [`DocumentChange`], the way a subtree mutation observer would see it.
#[derive(Debug)]
pub struct InMemoryDocument {
    state: Mutex<State>,
    changes: broadcast::Sender<DocumentChange>,
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            state: Mutex::new(State::default()),
            changes,
        }
    }
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn notify(&self, change: DocumentChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }

    /// Append a listing entry whose first link points at `href`.
    pub fn add_listing(&self, href: impl Into<String>) -> EntryId {
        self.add_entry(Some(href.into()))
    }

    /// Append a listing entry, optionally without any link.
    pub fn add_entry(&self, link: Option<String>) -> EntryId {
        let id = {
            let mut state = self.lock();
            let id = EntryId(state.next_id());
            state.entries.push(Entry {
                id,
                link,
                indicator: None,
            });
            id
        };
        self.notify(DocumentChange::Inserted);
        id
    }

    pub fn remove_entry(&self, entry: EntryId) -> bool {
        let removed = {
            let mut state = self.lock();
            let before = state.entries.len();
            state.entries.retain(|e| e.id != entry);
            state.entries.len() != before
        };
        if removed {
            self.notify(DocumentChange::Removed);
        }
        removed
    }

    /// Current content of the entry's indicator.
    pub fn indicator_view(&self, entry: EntryId) -> Option<IndicatorView> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.id == entry)
            .and_then(|e| e.indicator.as_ref())
            .map(|i| i.view.clone())
    }

    pub fn indicator_count(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.indicator.is_some())
            .count()
    }

    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }
}

impl DocumentHost for InMemoryDocument {
    fn listing_entries(&self) -> Vec<EntryId> {
        self.lock().entries.iter().map(|e| e.id).collect()
    }

    fn entry_link(&self, entry: EntryId) -> Option<String> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.id == entry)
            .and_then(|e| e.link.clone())
    }

    fn indicator(&self, entry: EntryId) -> Option<IndicatorRef> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.id == entry)
            .and_then(|e| e.indicator.as_ref())
            .map(|i| IndicatorRef {
                id: i.id,
                mark: i.view.mark(),
            })
    }

    fn attach_indicator(&self, entry: EntryId, view: &IndicatorView) -> Option<IndicatorId> {
        let id = {
            let mut state = self.lock();
            let id = IndicatorId(state.next_id());
            let target = state.entry_mut(entry)?;
            target.indicator = Some(Indicator {
                id,
                view: view.clone(),
            });
            id
        };
        self.notify(DocumentChange::Inserted);
        Some(id)
    }

    fn update_indicator(&self, indicator: IndicatorId, view: &IndicatorView) -> bool {
        let updated = {
            let mut state = self.lock();
            match state.holder_of(indicator).and_then(|e| e.indicator.as_mut()) {
                Some(current) => {
                    current.view = view.clone();
                    true
                }
                None => false,
            }
        };
        if updated {
            self.notify(DocumentChange::Replaced);
        }
        updated
    }

    fn remove_indicator(&self, indicator: IndicatorId) -> bool {
        let removed = {
            let mut state = self.lock();
            match state.holder_of(indicator) {
                Some(entry) => {
                    entry.indicator = None;
                    true
                }
                None => false,
            }
        };
        if removed {
            self.notify(DocumentChange::Removed);
        }
        removed
    }

    fn remove_all_indicators(&self) -> usize {
        let removed = {
            let mut state = self.lock();
            state
                .entries
                .iter_mut()
                .filter_map(|e| e.indicator.take())
                .count()
        };
        if removed > 0 {
            self.notify(DocumentChange::Removed);
        }
        removed
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.changes.subscribe()
    }
}
