use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::{NativeHistory, PopCallback};

struct MemoryBrowserState {
    urls: Vec<String>,
    index: usize,
    listener: Option<PopCallback>,
}

/// A [`NativeHistory`] that stores all information in memory.
///
/// Clones share the same state. Hand one clone to the router and keep another one around to
/// press the back and forward buttons, or to look at the "address bar":
///
/// ```rust
/// # use wayfinder_history::{MemoryBrowser, NativeHistory};
/// let browser = MemoryBrowser::default();
/// let mut native = browser.clone();
///
/// native.push_entry("/second");
/// assert_eq!(browser.current_url(), "/second");
///
/// browser.back();
/// assert_eq!(browser.current_url(), "/");
/// assert_eq!(browser.index(), 0);
/// ```
#[derive(Clone)]
pub struct MemoryBrowser {
    state: Arc<Mutex<MemoryBrowserState>>,
}

impl Default for MemoryBrowser {
    fn default() -> Self {
        Self::with_initial_url("/")
    }
}

impl MemoryBrowser {
    /// Create a [`MemoryBrowser`] whose only entry is `url`.
    pub fn with_initial_url(url: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryBrowserState {
                urls: vec![url.into()],
                index: 0,
                listener: None,
            })),
        }
    }

    /// The URL of the current entry.
    #[must_use]
    pub fn current_url(&self) -> String {
        let state = self.state.lock();
        state.urls[state.index].clone()
    }

    /// The index of the current entry.
    #[must_use]
    pub fn index(&self) -> usize {
        self.state.lock().index
    }

    /// All URLs, oldest first.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.state.lock().urls.clone()
    }

    /// Whether a pop callback is registered.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    /// Press the back button.
    pub fn back(&self) {
        self.travel(-1);
    }

    /// Press the forward button.
    pub fn forward(&self) {
        self.travel(1);
    }

    /// Travel `delta` entries, announcing the move to the subscribed callback.
    ///
    /// Does nothing if the target lies outside the history.
    pub fn travel(&self, delta: isize) {
        let (index, listener) = {
            let mut state = self.state.lock();
            let Some(index) = state
                .index
                .checked_add_signed(delta)
                .filter(|index| *index < state.urls.len())
            else {
                trace!(delta, index = state.index, "ignoring travel outside of the history");
                return;
            };
            if index == state.index {
                return;
            }
            state.index = index;
            (index, state.listener.clone())
        };

        // the listener may call back into the browser
        if let Some(listener) = listener {
            listener(index);
        }
    }
}

impl NativeHistory for MemoryBrowser {
    fn push_entry(&mut self, url: &str) {
        let mut state = self.state.lock();
        let len = state.index + 1;
        state.urls.truncate(len);
        state.urls.push(url.to_string());
        state.index = len;
    }

    fn replace_entry(&mut self, url: &str) {
        let mut state = self.state.lock();
        let index = state.index;
        state.urls[index] = url.to_string();
    }

    fn go(&mut self, delta: isize) {
        self.travel(delta);
    }

    fn subscribe(&mut self, callback: PopCallback) {
        self.state.lock().listener = Some(callback);
    }

    fn unsubscribe(&mut self) {
        self.state.lock().listener = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn push_discards_forward_entries() {
        let browser = MemoryBrowser::default();
        let mut native = browser.clone();

        native.push_entry("/a");
        native.push_entry("/b");
        browser.back();
        browser.back();
        native.push_entry("/c");

        assert_eq!(browser.urls(), vec!["/", "/c"]);
        assert_eq!(browser.index(), 1);
    }

    #[test]
    fn replace_keeps_index() {
        let browser = MemoryBrowser::with_initial_url("/start");
        let mut native = browser.clone();

        native.push_entry("/a");
        native.replace_entry("/b");

        assert_eq!(browser.urls(), vec!["/start", "/b"]);
        assert_eq!(browser.index(), 1);
    }

    #[test]
    fn travel_notifies_listener() {
        let browser = MemoryBrowser::default();
        let mut native = browser.clone();
        let last = Arc::new(AtomicUsize::new(usize::MAX));

        let seen = last.clone();
        native.subscribe(Arc::new(move |index| seen.store(index, Ordering::SeqCst)));
        native.push_entry("/a");
        native.push_entry("/b");

        native.go(-2);
        assert_eq!(last.load(Ordering::SeqCst), 0);

        browser.forward();
        assert_eq!(last.load(Ordering::SeqCst), 1);
        assert_eq!(browser.current_url(), "/a");
    }

    #[test]
    fn travel_outside_history_is_ignored() {
        let browser = MemoryBrowser::default();
        let mut native = browser.clone();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        native.subscribe(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        browser.back();
        browser.forward();
        native.go(5);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(browser.index(), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let browser = MemoryBrowser::default();
        let mut native = browser.clone();

        native.subscribe(Arc::new(|_| panic!("unsubscribed listener was called")));
        native.push_entry("/a");
        native.unsubscribe();

        assert!(!browser.is_subscribed());
        browser.back();
        assert_eq!(browser.index(), 0);
    }
}
