use std::sync::Arc;

use crate::config::Config;
use crate::events::Bus;
use crate::resolve::{ConfigResolver, Loader, Registry};

use super::supervisor::Supervisor;

/// Default capacity of the event bus.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    config: Config,
    loader: Option<Arc<dyn Loader>>,
    bus_capacity: usize,
}

impl SupervisorBuilder {
    /// Creates a new builder for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            loader: None,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    /// Sets the loader used to resolve named references.
    ///
    /// Without one, an empty [`Registry`] is used: only configurations that are
    /// already resolved, or that use [`Reference::Resolved`](crate::Reference::Resolved)
    /// everywhere, can run.
    pub fn with_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the event bus capacity (min 1).
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Builds the supervisor in the `Idle` state.
    pub fn build(self) -> Supervisor {
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(Registry::new()));
        Supervisor::new_internal(
            self.config,
            ConfigResolver::new(loader),
            Bus::new(self.bus_capacity),
        )
    }
}
