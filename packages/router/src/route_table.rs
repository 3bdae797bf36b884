use std::{
    collections::{hash_map::Entry, HashMap},
    fmt::{self, Debug},
    future::Future,
};

use tracing::error;
use urlencoding::encode;
use wayfinder_history::{LocationEntry, Params};

use crate::{
    guard::{erase, Guard, GuardResult},
    navigation::NavigationContext,
    NavigationError, RouteKind, RouteTableError,
};

/// The definition of a single route: a path template and an optional guard.
///
/// Path templates are split at `/`. Segments starting with `:` are placeholders, they are
/// replaced with the percent-encoded parameter of the same name when the route is resolved.
pub struct RouteDef<R> {
    path: String,
    guard: Option<Guard<R>>,
}

impl<R> RouteDef<R> {
    /// Create a [`RouteDef`] without a guard.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            guard: None,
        }
    }

    /// Attach a guard, replacing any previous one.
    ///
    /// The guard runs every time the route is about to be entered, whether by dispatch, by pop or
    /// as the target of a redirect.
    pub fn guard<F, Fut>(self, guard: F) -> Self
    where
        F: Fn(NavigationContext<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GuardResult<R>> + Send + 'static,
    {
        Self {
            guard: Some(erase(guard)),
            ..self
        }
    }

    /// The path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether a guard is attached.
    #[must_use]
    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub(crate) fn guard_fn(&self) -> Option<Guard<R>> {
        self.guard.clone()
    }
}

impl<R> From<&str> for RouteDef<R> {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl<R> From<String> for RouteDef<R> {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

// the guard (a closure) doesn't implement [`Debug`]
impl<R> Debug for RouteDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("path", &self.path)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// The static mapping from route types to their [`RouteDef`]s.
///
/// Built once with [`RouteTable::builder`] and read-only afterwards.
///
/// ```rust
/// # use wayfinder_router::{RouteTable, Redirect};
/// let table = RouteTable::builder()
///     .route("home", "/")
///     .route("user", "/users/:id")
///     .guarded("admin", "/admin", |_| async { Ok(Some(Redirect::to("home"))) })
///     .build()
///     .unwrap();
///
/// let user = table
///     .resolve(&"user", [("id".to_string(), "ada lovelace".to_string())].into())
///     .unwrap();
/// assert_eq!(user.url, "/users/ada%20lovelace");
/// assert!(table.get(&"admin").unwrap().has_guard());
/// ```
pub struct RouteTable<R> {
    routes: HashMap<R, RouteDef<R>>,
}

impl<R: RouteKind> RouteTable<R> {
    /// Start building a [`RouteTable`].
    #[must_use]
    pub fn builder() -> RouteTableBuilder<R> {
        RouteTableBuilder { routes: Vec::new() }
    }

    /// Look up the definition of `route`.
    pub fn get(&self, route: &R) -> Result<&RouteDef<R>, NavigationError<R>> {
        self.routes
            .get(route)
            .ok_or_else(|| NavigationError::UnknownRoute(route.clone()))
    }

    /// Check whether `route` is registered.
    #[must_use]
    pub fn contains(&self, route: &R) -> bool {
        self.routes.contains_key(route)
    }

    /// The number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check whether no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Turn `route` and `params` into a [`LocationEntry`] by filling in the path template.
    ///
    /// Parameters that don't appear in the template are kept in the entry, but don't show up in
    /// the URL.
    pub fn resolve(
        &self,
        route: &R,
        params: Params,
    ) -> Result<LocationEntry<R>, NavigationError<R>> {
        let def = self.get(route)?;
        let url = fill_template(&def.path, &params).map_err(|param| {
            error!(?route, %param, path = %def.path, "missing route parameter");
            NavigationError::MissingParameter {
                route: route.clone(),
                param: param.to_string(),
            }
        })?;

        Ok(LocationEntry::new(route.clone(), url, params))
    }
}

impl<R: Debug> Debug for RouteTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.routes.iter()).finish()
    }
}

/// Builds a [`RouteTable`]. Created by [`RouteTable::builder`].
pub struct RouteTableBuilder<R> {
    routes: Vec<(R, RouteDef<R>)>,
}

impl<R: RouteKind> RouteTableBuilder<R> {
    /// Register `route` with a plain path or a full [`RouteDef`].
    pub fn route(mut self, route: R, def: impl Into<RouteDef<R>>) -> Self {
        self.routes.push((route, def.into()));
        self
    }

    /// Register `route` with a path and a guard.
    pub fn guarded<F, Fut>(self, route: R, path: impl Into<String>, guard: F) -> Self
    where
        F: Fn(NavigationContext<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GuardResult<R>> + Send + 'static,
    {
        self.route(route, RouteDef::new(path).guard(guard))
    }

    /// Finish the [`RouteTable`].
    ///
    /// Fails if a route was registered more than once. Redirect targets are checked when a guard
    /// actually redirects.
    pub fn build(self) -> Result<RouteTable<R>, RouteTableError<R>> {
        let mut routes = HashMap::with_capacity(self.routes.len());

        for (route, def) in self.routes {
            match routes.entry(route) {
                Entry::Occupied(entry) => {
                    error!(route = ?entry.key(), "route registered more than once");
                    return Err(RouteTableError::DuplicateRoute(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(def);
                }
            }
        }

        Ok(RouteTable { routes })
    }
}

/// Replace the `:name` segments of `template`. Returns the first missing parameter name.
fn fill_template<'a>(template: &'a str, params: &Params) -> Result<String, &'a str> {
    let mut url = String::with_capacity(template.len());

    for (i, segment) in template.split('/').enumerate() {
        if i > 0 {
            url.push('/');
        }

        match segment.strip_prefix(':') {
            Some(name) => {
                let value = params.get(name).ok_or(name)?;
                url.push_str(&encode(value));
            }
            None => url.push_str(segment),
        }
    }

    Ok(url)
}
