use std::fmt;

use crate::core::Signal;
use crate::error::{EXIT_OK, RuntimeError};

/// Supervisor lifecycle state.
///
/// ```text
/// Idle ─► Loading ─► Starting ─► Running ─► Stopping ─► Stopped
///            │           │           └──────────────────────▲
///            └───────────┴─► Failed          (natural completion)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, not yet run.
    Idle,
    /// Resolving configuration.
    Loading,
    /// Constructing workers.
    Starting,
    /// Every worker running.
    Running,
    /// Shutdown requested; waiting for every worker to stop.
    Stopping,
    /// Terminal: all workers finished.
    Stopped,
    /// Terminal: resolution or construction failed.
    Failed,
}

impl State {
    /// Returns `true` for [`State::Stopped`] and [`State::Failed`].
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Stopped | State::Failed)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Idle => "idle",
            State::Loading => "loading",
            State::Starting => "starting",
            State::Running => "running",
            State::Stopping => "stopping",
            State::Stopped => "stopped",
            State::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// Every worker's run future resolved on its own.
    Completed,
    /// A termination signal triggered the shutdown.
    Signal(Signal),
}

/// Outcome of a successful supervisor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Number of workers that ran.
    pub workers: usize,
    /// What ended the run.
    pub cause: StopCause,
}

/// Maps a run result to the process exit code.
///
/// - `Ok` (natural completion or clean signal stop) → `0`
/// - `Err` → [`RuntimeError::exit_code`]
pub fn exit_code(result: &Result<RunReport, RuntimeError>) -> i32 {
    match result {
        Ok(_) => EXIT_OK,
        Err(e) => e.exit_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EXIT_STARTUP_FAILURE, EXIT_WORKER_FAILURE};

    #[test]
    fn test_exit_code_mapping() {
        let clean = Ok(RunReport {
            workers: 2,
            cause: StopCause::Signal(Signal::Interrupt),
        });
        assert_eq!(exit_code(&clean), EXIT_OK);
        assert_eq!(exit_code(&Err(RuntimeError::AlreadyRan)), EXIT_WORKER_FAILURE);
        assert_eq!(
            exit_code(&Err(RuntimeError::Startup {
                worker: "w1".into(),
                source: crate::error::WorkerError::Build {
                    error: "bad queue".into()
                },
            })),
            EXIT_STARTUP_FAILURE
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(State::Stopped.is_terminal());
        assert!(State::Failed.is_terminal());
        assert!(!State::Stopping.is_terminal());
        assert_eq!(State::Running.to_string(), "running");
    }
}
