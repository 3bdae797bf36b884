use std::{error::Error as StdError, fmt::Debug};

use thiserror::Error;

/// The ways a single navigation can fail.
///
/// A failed navigation never mutates the history. The router stays usable afterwards.
#[derive(Debug, Error)]
pub enum NavigationError<R: Debug> {
    /// The requested route, or a route a guard redirected to, isn't in the route table.
    #[error("route {0:?} is not registered")]
    UnknownRoute(R),

    /// The guard of `route` failed.
    #[error("guard of route {route:?} failed: {source}")]
    Guard {
        /// The route whose guard failed.
        route: R,
        /// What the guard reported.
        #[source]
        source: GuardError,
    },

    /// Guards kept redirecting for longer than the configured limit.
    #[error("more than {limit} redirects in a row: {chain:?}")]
    RedirectLoop {
        /// The configured limit.
        limit: usize,
        /// Every route that redirected, in order.
        chain: Vec<R>,
    },

    /// The path template of `route` names a parameter that wasn't provided.
    #[error("route {route:?} requires the parameter `{param}`")]
    MissingParameter {
        /// The route being resolved.
        route: R,
        /// The name of the missing parameter.
        param: String,
    },

    /// A pop targeted an index outside of the history.
    #[error("history index {index} is out of range (history holds {len} entries)")]
    InvalidIndex {
        /// The requested index.
        index: usize,
        /// The number of entries in the history.
        len: usize,
    },

    /// The router service has stopped, or was dropped, before the request was handled.
    #[error("the router has shut down")]
    Shutdown,
}

/// An error raised by a guard.
///
/// ```rust
/// # use wayfinder_router::GuardError;
/// let err = GuardError::new("session expired");
/// assert_eq!(err.to_string(), "session expired");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GuardError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl GuardError {
    /// Create a [`GuardError`] with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a [`GuardError`] caused by another error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The message the guard reported.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The ways building a [`RouteTable`](crate::RouteTable) can fail.
#[derive(Debug, Error)]
pub enum RouteTableError<R: Debug> {
    /// The route was registered more than once.
    #[error("route {0:?} is registered more than once")]
    DuplicateRoute(R),
}
