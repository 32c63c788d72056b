//! Configuration resolution: loaders, the resolver and its output.
//!
//! ## Contents
//! - [`Loader`], [`Registry`] name → artifact lookup
//! - [`ConfigResolver`] merge + load, all-or-nothing
//! - [`WorkerSpec`] resolved, immutable worker description

mod loader;
mod resolver;
mod spec;

pub use loader::{Loader, Registry};
pub use resolver::ConfigResolver;
pub use spec::WorkerSpec;
