use std::collections::BTreeMap;

/// The parameters of a location, keyed by name.
pub type Params = BTreeMap<String, String>;

/// A single committed location in the history stack.
///
/// Entries are never modified after they are committed. Replacing a location swaps the whole
/// entry out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationEntry<R> {
    /// The route type this location belongs to.
    pub route: R,

    /// The resolved URL, e.g. `/users/42`.
    pub url: String,

    /// The parameters the URL was resolved with.
    pub params: Params,
}

impl<R> LocationEntry<R> {
    /// Create a new [`LocationEntry`].
    pub fn new(route: R, url: impl Into<String>, params: Params) -> Self {
        Self {
            route,
            url: url.into(),
            params,
        }
    }
}
