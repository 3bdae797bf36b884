use wayfinder_history::{HistoryStore, LocationEntry};

/// A snapshot of the committed routing state.
///
/// Only ever reflects completed navigations. While a guard is pending, the previous snapshot
/// stays in place.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location<R> {
    /// The route type of the current entry.
    pub route: R,

    /// The index of the current entry.
    pub index: usize,

    /// The whole history stack, oldest first.
    pub entries: Vec<LocationEntry<R>>,
}

impl<R: Clone> Location<R> {
    pub(crate) fn capture(history: &HistoryStore<R>) -> Self {
        Self {
            route: history.current().route.clone(),
            index: history.index(),
            entries: history.entries().to_vec(),
        }
    }
}

impl<R> Location<R> {
    /// The current entry.
    #[must_use]
    pub fn current(&self) -> &LocationEntry<R> {
        &self.entries[self.index]
    }

    /// The URL of the current entry.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.current().url
    }

    /// Whether there is a prior entry to go back to.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    /// Whether there is a later entry to go forward to.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
