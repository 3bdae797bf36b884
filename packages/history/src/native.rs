use std::sync::Arc;

/// Called with the new native index whenever the user travels through the native history.
pub type PopCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// An integration with the platform's own history mechanism.
///
/// The [`HistoryStore`](crate::HistoryStore) owns the real history stack. A [`NativeHistory`] is
/// only kept in sync with it, so that the address bar and the back/forward buttons of the
/// platform match what the router has committed.
///
/// Implementations should behave like a browser's [History API]:
/// - [`push_entry`](NativeHistory::push_entry) discards all forward entries and appends one,
/// - [`replace_entry`](NativeHistory::replace_entry) overwrites the current entry,
/// - [`go`](NativeHistory::go) travels by `delta` entries and announces the new index through the
///   subscribed [`PopCallback`], exactly like a back/forward button press would.
///
/// [History API]: https://developer.mozilla.org/en-US/docs/Web/API/History_API
pub trait NativeHistory: Send {
    /// Append `url` after the current entry, discarding all forward entries.
    fn push_entry(&mut self, url: &str);

    /// Overwrite the current entry with `url`.
    fn replace_entry(&mut self, url: &str);

    /// Travel `delta` entries through the history. Negative values go back.
    ///
    /// Travelling outside of the history should do nothing.
    fn go(&mut self, delta: isize);

    /// Register the callback invoked on pop events. Replaces any previous callback.
    fn subscribe(&mut self, callback: PopCallback);

    /// Drop the pop callback. No further pop events are delivered.
    fn unsubscribe(&mut self);
}

impl<N: NativeHistory + ?Sized> NativeHistory for Box<N> {
    fn push_entry(&mut self, url: &str) {
        (**self).push_entry(url)
    }

    fn replace_entry(&mut self, url: &str) {
        (**self).replace_entry(url)
    }

    fn go(&mut self, delta: isize) {
        (**self).go(delta)
    }

    fn subscribe(&mut self, callback: PopCallback) {
        (**self).subscribe(callback)
    }

    fn unsubscribe(&mut self) {
        (**self).unsubscribe()
    }
}
