#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod entry;
pub use entry::*;

mod native;
pub use native::*;

mod memory;
pub use memory::*;

mod store;
pub use store::*;
