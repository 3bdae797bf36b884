use std::fmt::{self, Debug};

use tracing::trace;

use crate::{LocationEntry, NativeHistory, PopCallback};

/// The history stack owned by the router.
///
/// A [`HistoryStore`] holds an ordered list of [`LocationEntry`]s and the index of the current
/// one. It is never empty, and the index always points at an existing entry.
///
/// Every mutation is mirrored into the wrapped [`NativeHistory`]:
///
/// | operation                         | native call                              |
/// |-----------------------------------|------------------------------------------|
/// | [`push`](HistoryStore::push)      | [`NativeHistory::push_entry`]            |
/// | [`replace`](HistoryStore::replace)| [`NativeHistory::replace_entry`]         |
/// | [`move_to`](HistoryStore::move_to)| none, the native side already moved      |
pub struct HistoryStore<R> {
    entries: Vec<LocationEntry<R>>,
    index: usize,
    native: Box<dyn NativeHistory>,
}

impl<R> HistoryStore<R> {
    /// Create a [`HistoryStore`] holding only `initial`.
    ///
    /// The current native entry is replaced with the URL of `initial`, so both sides start out
    /// aligned at index `0`.
    pub fn new(initial: LocationEntry<R>, native: impl NativeHistory + 'static) -> Self {
        let mut native: Box<dyn NativeHistory> = Box::new(native);
        native.replace_entry(&initial.url);

        Self {
            entries: vec![initial],
            index: 0,
            native,
        }
    }

    /// The current entry.
    #[must_use]
    pub fn current(&self) -> &LocationEntry<R> {
        &self.entries[self.index]
    }

    /// The index of the current entry.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LocationEntry<R>] {
        &self.entries
    }

    /// The entry at `index`, if there is one.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LocationEntry<R>> {
        self.entries.get(index)
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`, a [`HistoryStore`] holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether there is an entry before the current one.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    /// Check whether there is an entry after the current one.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Append `entry` after the current one, discarding all forward entries.
    ///
    /// ```rust
    /// # use wayfinder_history::{HistoryStore, LocationEntry, MemoryBrowser, Params};
    /// let entry = |url: &str| LocationEntry::new((), url, Params::new());
    /// let mut store = HistoryStore::new(entry("/"), MemoryBrowser::default());
    ///
    /// store.push(entry("/a"));
    /// store.push(entry("/b"));
    /// store.move_to(0);
    /// store.push(entry("/c"));
    ///
    /// assert_eq!(store.len(), 2);
    /// assert_eq!(store.current().url, "/c");
    /// ```
    pub fn push(&mut self, entry: LocationEntry<R>) {
        trace!(url = %entry.url, from = self.index, "pushing history entry");
        self.native.push_entry(&entry.url);
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    /// Overwrite the current entry with `entry`. The index stays untouched.
    pub fn replace(&mut self, entry: LocationEntry<R>) {
        trace!(url = %entry.url, at = self.index, "replacing history entry");
        self.native.replace_entry(&entry.url);
        self.entries[self.index] = entry;
    }

    /// Make the entry at `index` the current one, without touching the entries.
    ///
    /// # Panics
    /// When `index` doesn't point at an existing entry. Indices handed to this method must stem
    /// from earlier pushes.
    pub fn move_to(&mut self, index: usize) {
        assert!(
            index < self.entries.len(),
            "history index {index} out of range (history holds {} entries)",
            self.entries.len()
        );
        trace!(from = self.index, to = index, "moving through history");
        self.index = index;
    }

    /// Bring the native history back to the current index after it travelled to `native_index`
    /// on its own.
    ///
    /// Used when the router commits a different index than the one a pop event announced.
    /// Returns whether the native history was asked to travel. If so, it will announce a pop to
    /// the current index.
    pub fn realign_native(&mut self, native_index: usize) -> bool {
        let delta = self.index as isize - native_index as isize;
        if delta == 0 {
            return false;
        }

        trace!(native_index, index = self.index, "realigning native history");
        self.native.go(delta);
        true
    }

    /// Listen to the pop events of the wrapped [`NativeHistory`].
    pub fn subscribe(&mut self, callback: PopCallback) {
        self.native.subscribe(callback);
    }

    /// Stop listening to the pop events of the wrapped [`NativeHistory`].
    pub fn unsubscribe(&mut self) {
        self.native.unsubscribe();
    }
}

// `native` (a trait object) doesn't implement [`Debug`]
impl<R: Debug> Debug for HistoryStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
