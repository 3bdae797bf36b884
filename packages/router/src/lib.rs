#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use std::{fmt::Debug, hash::Hash};

mod error;
pub use error::*;

pub mod navigation;
pub use navigation::{NavigationContext, NavigationKind, Redirect};

mod guard;
pub use guard::*;

mod route_table;
pub use route_table::*;

mod location;
pub use location::*;

mod router_cfg;
pub use router_cfg::*;

mod service;
pub use service::*;

pub use wayfinder_history::{LocationEntry, MemoryBrowser, NativeHistory, Params, PopCallback};

/// The bounds a route type tag has to satisfy.
///
/// Implemented for every fitting type; usually this is a fieldless `enum`.
pub trait RouteKind: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> RouteKind for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::guard::*;
    pub use crate::location::*;
    pub use crate::navigation::*;
    pub use crate::route_table::*;
    pub use crate::router_cfg::*;
    pub use crate::service::*;
    pub use crate::RouteKind;
    pub use wayfinder_history::{LocationEntry, MemoryBrowser, NativeHistory, Params};
}
