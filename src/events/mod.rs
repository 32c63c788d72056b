//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! The only publisher is the [`Supervisor`](crate::Supervisor); every state
//! transition and per-worker outcome produces one event.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
