//! Host document capability.
//!
//! The enricher never touches a concrete document tree. It queries listing
//! entries, manages its own indicator elements and listens for structural
//! change notices through this trait, so any host (a browser bridge, a
//! headless renderer, the in-memory double) can be substituted.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::render::IndicatorView;

/// Class name tagging every injected indicator element.
pub const INDICATOR_CLASS: &str = "job-metrics-element";

/// Structural pattern of an enrichable listing entry.
pub const LISTING_SELECTOR: &str = ".scaffold-layout__list li.scaffold-layout__list-item";

/// Opaque handle of a listing entry, stable while the entry is attached.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

/// Opaque handle of an injected indicator element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndicatorId(pub u64);

/// Processing state recorded on an indicator.
///
/// Any mark makes the scanner skip the entry; `Failed` additionally lets a
/// retrying sweep clear it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMark {
    Pending,
    Enriched,
    Failed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IndicatorRef {
    pub id: IndicatorId,
    pub mark: IndicatorMark,
}

/// Structural mutation notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentChange {
    /// Nodes were inserted (listing entries or indicators).
    Inserted,
    /// Nodes were removed.
    Removed,
    /// An element's children were replaced.
    Replaced,
}

/// Read/query/mutate/observe surface of the host document.
pub trait DocumentHost: Send + Sync + 'static {
    /// Entries matching [`LISTING_SELECTOR`], in document order.
    fn listing_entries(&self) -> Vec<EntryId>;

    /// Navigable reference of the entry's first link, if it has one.
    fn entry_link(&self, entry: EntryId) -> Option<String>;

    /// The entry's indicator, if one is attached.
    fn indicator(&self, entry: EntryId) -> Option<IndicatorRef>;

    /// Insert an indicator as the entry's first child.
    ///
    /// Returns `None` when the entry is no longer in the document.
    fn attach_indicator(&self, entry: EntryId, view: &IndicatorView) -> Option<IndicatorId>;

    /// Replace an indicator's content (and mark) with `view`.
    ///
    /// Returns `false` when the indicator has been removed in the meantime.
    fn update_indicator(&self, indicator: IndicatorId, view: &IndicatorView) -> bool;

    fn remove_indicator(&self, indicator: IndicatorId) -> bool;

    /// Remove every element tagged [`INDICATOR_CLASS`]; returns how many.
    fn remove_all_indicators(&self) -> usize;

    /// Subscribe to structural change notices.
    fn subscribe(&self) -> broadcast::Receiver<DocumentChange>;
}
