//! Runtime core: lifecycle orchestration.
//!
//! - [`supervisor`]: resolves, constructs, runs and stops workers;
//! - [`builder`]: [`SupervisorBuilder`];
//! - [`state`]: lifecycle states and the run report;
//! - [`shutdown`]: termination signal sources.

mod builder;
mod shutdown;
mod state;
mod supervisor;

pub use builder::{DEFAULT_BUS_CAPACITY, SupervisorBuilder};
pub use shutdown::{
    ChannelSignals, OsSignals, Signal, SignalSender, SignalSource, is_primary_thread,
    signal_channel,
};
pub use state::{RunReport, State, StopCause, exit_code};
pub use supervisor::Supervisor;
