//! Types relating to navigation.

use wayfinder_history::{LocationEntry, Params};

/// Where a navigation request came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationKind {
    /// A programmatic [`Router::dispatch`](crate::Router::dispatch).
    Dispatch,
    /// A back/forward travel through the native history.
    Pop,
}

/// What a guard gets to see.
///
/// Contexts are created per guard invocation and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationContext<R> {
    /// The committed location that is being left.
    ///
    /// For chained redirects this stays the location the navigation started from.
    pub prev_route: LocationEntry<R>,

    /// The location that is about to be entered.
    pub next_route: LocationEntry<R>,

    /// Whether the navigation is a dispatch or a pop.
    pub kind: NavigationKind,

    /// How many redirects happened before this guard was invoked.
    pub redirects: usize,
}

/// A guard's instruction to navigate somewhere else.
///
/// ```rust
/// # use wayfinder_router::Redirect;
/// let redirect = Redirect::to("login").with_param("reason", "expired");
/// assert_eq!(redirect.route, "login");
/// assert_eq!(redirect.params["reason"], "expired");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect<R> {
    /// The route to navigate to instead.
    pub route: R,

    /// The parameters to resolve `route` with.
    pub params: Params,
}

impl<R> Redirect<R> {
    /// Redirect to `route` without parameters.
    pub fn to(route: R) -> Self {
        Self {
            route,
            params: Params::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replace all parameters.
    pub fn with_params(self, params: Params) -> Self {
        Self { params, ..self }
    }
}
