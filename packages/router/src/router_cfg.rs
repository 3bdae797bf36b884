use std::{
    fmt::{self, Debug},
    sync::Arc,
};

use wayfinder_history::Params;

use crate::Location;

/// A callback invoked with the new [`Location`] after every commit.
pub type RoutingCallback<R> = Arc<dyn Fn(&Location<R>) + Send + Sync>;

/// The redirect limit used unless [`RouterConfig::max_redirects`] says otherwise.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Global configuration options for the router.
///
/// Follows the builder pattern:
/// ```rust
/// # use wayfinder_router::RouterConfig;
/// let cfg = RouterConfig::new("home")
///     .max_redirects(3)
///     .on_update(|location| println!("now at {}", location.url()));
/// ```
pub struct RouterConfig<R> {
    pub(crate) initial: R,
    pub(crate) initial_params: Params,
    pub(crate) max_redirects: usize,
    pub(crate) on_update: Option<RoutingCallback<R>>,
}

impl<R> RouterConfig<R> {
    /// Start at `initial`.
    ///
    /// The initial route is entered without running its guard.
    pub fn new(initial: R) -> Self {
        Self {
            initial,
            initial_params: Params::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            on_update: None,
        }
    }

    /// The parameters to resolve the initial route with.
    ///
    /// Defaults to none.
    pub fn initial_params(self, initial_params: Params) -> Self {
        Self {
            initial_params,
            ..self
        }
    }

    /// How many redirects a single navigation may go through before it fails with
    /// [`NavigationError::RedirectLoop`](crate::NavigationError::RedirectLoop).
    ///
    /// Defaults to [`DEFAULT_MAX_REDIRECTS`].
    pub fn max_redirects(self, max_redirects: usize) -> Self {
        Self {
            max_redirects,
            ..self
        }
    }

    /// A function to be called whenever a navigation commits.
    ///
    /// The callback runs inside the router service, after the new [`Location`] is published and
    /// before the navigation's caller is notified. It is not called for failed navigations.
    ///
    /// Defaults to [`None`].
    pub fn on_update(self, callback: impl Fn(&Location<R>) + Send + Sync + 'static) -> Self {
        Self {
            on_update: Some(Arc::new(callback)),
            ..self
        }
    }
}

impl<R: Debug> Debug for RouterConfig<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("initial", &self.initial)
            .field("initial_params", &self.initial_params)
            .field("max_redirects", &self.max_redirects)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}
