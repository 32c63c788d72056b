//! # Supervisor: resolves configuration, constructs workers, runs them, stops them.
//!
//! The [`Supervisor`] owns a [`Config`], the [`ConfigResolver`] used to resolve
//! it, and the event [`Bus`]. One call to [`Supervisor::run`] drives the whole
//! lifecycle and returns once every worker has finished.
//!
//! ## High-level architecture
//! ```text
//! run()
//!   Loading:   Config::resolve(resolver) ──► Vec<WorkerSpec>        (skipped if already resolved)
//!                  └─ error ──► Failed, RuntimeError::Resolve       (nothing constructed)
//!
//!   Starting:  WorkerSpec[0]   WorkerSpec[1]  ...  WorkerSpec[N-1]
//!                  │               │                   │
//!                  └──► factory.new_worker(spec)  (all concurrently)
//!                                  │
//!                        join_all ─┘  construction barrier
//!                  └─ any error ──► Failed, RuntimeError::Startup   (nothing started)
//!
//!   Running:   runs.spawn(worker.run())  for every worker
//!              select! {
//!                  signal (first)  ──► Stopping: stops.spawn(worker.shutdown()) per worker
//!                  signal (later)  ──► ignored (logged, SignalIgnored)
//!                  runs.join_next  ──► WorkerExited / WorkerFailed
//!                  stops.join_next ──► WorkerStopped / ShutdownFailed
//!              }
//!              until every run and shutdown future resolved
//!
//!   Stopped:   Ok(RunReport) or RuntimeError::WorkersFailed { failures }
//! ```
//!
//! A failing worker does not stop its siblings: failures are collected and
//! reported together once everything finished.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use workvisor::{
//!     ClientRef, Config, ConnectOptions, GlobalConfig, Registry, Supervisor, Worker,
//!     WorkerConfigRaw, WorkerError, WorkerOptions, WorkerRef, WorkerRuntime, signal_channel,
//! };
//!
//! struct Idle;
//!
//! #[async_trait]
//! impl Worker for Idle {
//!     async fn run(&self) -> Result<(), WorkerError> { Ok(()) }
//!     async fn shutdown(&self) -> Result<(), WorkerError> { Ok(()) }
//! }
//!
//! struct Local;
//!
//! #[async_trait]
//! impl WorkerRuntime for Local {
//!     async fn connect(&self, _: ConnectOptions) -> Result<ClientRef, WorkerError> {
//!         Err(WorkerError::Connection { endpoint: "local".into(), error: "offline".into() })
//!     }
//!     async fn build_worker(&self, _: ClientRef, _: WorkerOptions) -> Result<WorkerRef, WorkerError> {
//!         Ok(Arc::new(Idle))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let registry = Registry::with_runtime(Arc::new(Local));
//!     let config = Config::new(GlobalConfig::default(), vec![WorkerConfigRaw::new("w1")]);
//!     let mut sup = Supervisor::new(config, Arc::new(registry));
//!
//!     let (_tx, signals) = signal_channel();
//!     let err = sup.run_with_signals(signals).await.unwrap_err();
//!     assert_eq!(err.exit_code(), 3);
//! }
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::core::builder::SupervisorBuilder;
use crate::core::shutdown::{OsSignals, SignalSource};
use crate::core::state::{RunReport, State, StopCause};
use crate::error::{FailurePhase, ResolveError, RuntimeError, WorkerError, WorkerFailure};
use crate::events::{Bus, Event, EventKind};
use crate::resolve::{ConfigResolver, Loader, WorkerSpec};
use crate::runtime::WorkerRef;

type Named = (Arc<str>, WorkerRef);
type Joined = (Arc<str>, Result<(), WorkerError>);

/// Drives a set of workers through one lifecycle.
pub struct Supervisor {
    config: Config,
    resolver: ConfigResolver,
    bus: Bus,
    state: watch::Sender<State>,
}

impl Supervisor {
    /// Creates a supervisor for `config`, resolving named references with `loader`.
    pub fn new(config: Config, loader: Arc<dyn Loader>) -> Self {
        SupervisorBuilder::new(config).with_loader(loader).build()
    }

    /// Returns a [`SupervisorBuilder`] for `config`.
    pub fn builder(config: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(config)
    }

    pub(crate) fn new_internal(config: Config, resolver: ConfigResolver, bus: Bus) -> Self {
        let (state, _) = watch::channel(State::Idle);
        Self {
            config,
            resolver,
            bus,
            state,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        *self.state.borrow()
    }

    /// Receiver observing every state transition.
    pub fn watch_state(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Subscribes to runtime events. Subscribe before calling `run` to see them all.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The supervised configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every configured worker, stopping them on `SIGINT` / `SIGTERM`.
    ///
    /// Signal listeners are installed once every worker is constructed, and only
    /// when called from the primary thread; elsewhere only natural completion
    /// ends the run.
    pub async fn run(&mut self) -> Result<RunReport, RuntimeError> {
        self.ensure_idle()?;
        let workers = self.prepare().await?;
        let signals = match OsSignals::install() {
            Ok(signals) => signals,
            Err(e) => {
                warn!(error = %e, "failed to install signal handlers; running without them");
                OsSignals::disabled()
            }
        };
        self.drive(workers, signals).await
    }

    /// Same as [`Supervisor::run`], with termination signals taken from `signals`.
    pub async fn run_with_signals<S: SignalSource>(
        &mut self,
        signals: S,
    ) -> Result<RunReport, RuntimeError> {
        self.ensure_idle()?;
        let workers = self.prepare().await?;
        self.drive(workers, signals).await
    }

    fn ensure_idle(&self) -> Result<(), RuntimeError> {
        match self.state() {
            State::Idle => Ok(()),
            state => {
                warn!(%state, "supervisor already ran");
                Err(RuntimeError::AlreadyRan)
            }
        }
    }

    fn set_state(&self, state: State) {
        debug!(%state, "supervisor state");
        self.state.send_replace(state);
    }

    /// Loading + Starting: resolve, then construct every worker behind a barrier.
    async fn prepare(&mut self) -> Result<Vec<Named>, RuntimeError> {
        self.set_state(State::Loading);
        let specs = match self.load() {
            Ok(specs) => specs,
            Err(e) => return Err(self.fail(None, e.into())),
        };
        self.bus
            .publish(Event::new(EventKind::ConfigResolved).with_count(specs.len()));
        info!(workers = specs.len(), "configuration resolved");

        self.set_state(State::Starting);
        self.construct(&specs).await
    }

    fn load(&mut self) -> Result<Vec<WorkerSpec>, ResolveError> {
        if let Some(specs) = self.config.specs() {
            debug!("configuration already resolved");
            return Ok(specs.to_vec());
        }
        Ok(self.config.resolve(&self.resolver)?.to_vec())
    }

    async fn construct(&self, specs: &[WorkerSpec]) -> Result<Vec<Named>, RuntimeError> {
        for spec in specs {
            info!(
                worker = %spec.name(),
                factory = %spec.factory().name(),
                endpoint = %spec.endpoint(),
                namespace = %spec.namespace(),
                "constructing worker"
            );
            self.bus
                .publish(Event::new(EventKind::WorkerConstructing).with_worker(spec.name()));
        }

        let built = join_all(specs.iter().map(|spec| async move {
            AssertUnwindSafe(spec.factory().new_worker(spec))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(WorkerError::Build {
                        error: format!("factory panicked: {}", panic_message(panic)),
                    })
                })
        }))
        .await;

        let mut workers = Vec::with_capacity(specs.len());
        let mut first_failure = None;
        for (spec, result) in specs.iter().zip(built) {
            match result {
                Ok(worker) => {
                    self.bus
                        .publish(Event::new(EventKind::WorkerConstructed).with_worker(spec.name()));
                    workers.push((Arc::from(spec.name()), worker));
                }
                Err(source) => {
                    error!(
                        worker = %spec.name(),
                        error = %source,
                        label = source.as_label(),
                        "worker construction failed"
                    );
                    first_failure.get_or_insert((spec.name(), source));
                }
            }
        }

        match first_failure {
            None => Ok(workers),
            Some((worker, source)) => Err(self.fail(
                Some(worker),
                RuntimeError::Startup {
                    worker: worker.to_string(),
                    source,
                },
            )),
        }
    }

    fn fail(&self, worker: Option<&str>, err: RuntimeError) -> RuntimeError {
        error!(error = %err, label = err.as_label(), "startup failed; no worker started");
        let mut ev = Event::new(EventKind::StartupFailed).with_error(err.to_string());
        if let Some(worker) = worker {
            ev = ev.with_worker(worker);
        }
        self.bus.publish(ev);
        self.set_state(State::Failed);
        err
    }

    /// Running + Stopping.
    async fn drive<S: SignalSource>(
        &self,
        workers: Vec<Named>,
        mut signals: S,
    ) -> Result<RunReport, RuntimeError> {
        let total = workers.len();
        self.set_state(State::Running);

        let mut runs: JoinSet<Joined> = JoinSet::new();
        for (name, worker) in &workers {
            let (name, worker) = (name.clone(), worker.clone());
            runs.spawn(async move {
                let res = AssertUnwindSafe(worker.run())
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        Err(WorkerError::Run {
                            error: format!("worker panicked: {}", panic_message(panic)),
                        })
                    });
                (name, res)
            });
        }
        self.bus
            .publish(Event::new(EventKind::WorkersStarted).with_count(total));
        info!(workers = total, "workers started");

        let mut stops: JoinSet<Joined> = JoinSet::new();
        let mut failures = Vec::new();
        let mut cause = StopCause::Completed;
        let mut signals_open = true;

        while !(runs.is_empty() && stops.is_empty()) {
            tokio::select! {
                got = signals.recv(), if signals_open => match got {
                    None => signals_open = false,
                    Some(signal) if matches!(cause, StopCause::Signal(_)) => {
                        warn!(%signal, "already stopping; signal ignored");
                        self.bus.publish(Event::new(EventKind::SignalIgnored).with_signal(signal));
                    }
                    Some(signal) => {
                        cause = StopCause::Signal(signal);
                        self.set_state(State::Stopping);
                        warn!(%signal, workers = total, "shutdown requested; stopping workers");
                        self.bus.publish(Event::new(EventKind::ShutdownRequested).with_signal(signal));
                        for (name, worker) in &workers {
                            spawn_shutdown(&mut stops, name.clone(), worker.clone());
                        }
                    }
                },
                Some(joined) = stops.join_next() => {
                    if let Some((name, res)) = self.joined(joined) {
                        self.on_stopped(name, res, &mut failures);
                    }
                },
                Some(joined) = runs.join_next() => {
                    if let Some((name, res)) = self.joined(joined) {
                        self.on_exited(name, res, &mut failures);
                    }
                },
            }
        }

        self.set_state(State::Stopped);
        self.bus.publish(Event::new(EventKind::AllStopped).with_count(total));
        info!(workers = total, failures = failures.len(), "worker shutdown complete");

        if failures.is_empty() {
            Ok(RunReport {
                workers: total,
                cause,
            })
        } else {
            Err(RuntimeError::WorkersFailed { failures })
        }
    }

    fn joined(&self, joined: Result<Joined, tokio::task::JoinError>) -> Option<Joined> {
        match joined {
            Ok(joined) => Some(joined),
            Err(e) => {
                error!(error = %e, "worker task aborted");
                None
            }
        }
    }

    fn on_exited(
        &self,
        name: Arc<str>,
        res: Result<(), WorkerError>,
        failures: &mut Vec<WorkerFailure>,
    ) {
        match res {
            Ok(()) => {
                info!(worker = %name, "worker exited");
                self.bus
                    .publish(Event::new(EventKind::WorkerExited).with_worker(name));
            }
            Err(e) => {
                error!(worker = %name, error = %e, label = e.as_label(), "worker failed");
                self.bus.publish(
                    Event::new(EventKind::WorkerFailed)
                        .with_worker(name.clone())
                        .with_error(e.to_string()),
                );
                failures.push(WorkerFailure {
                    worker: name.to_string(),
                    phase: FailurePhase::Run,
                    error: e,
                });
            }
        }
    }

    fn on_stopped(
        &self,
        name: Arc<str>,
        res: Result<(), WorkerError>,
        failures: &mut Vec<WorkerFailure>,
    ) {
        match res {
            Ok(()) => {
                debug!(worker = %name, "worker stopped");
                self.bus
                    .publish(Event::new(EventKind::WorkerStopped).with_worker(name));
            }
            Err(e) => {
                error!(worker = %name, error = %e, label = e.as_label(), "worker shutdown failed");
                self.bus.publish(
                    Event::new(EventKind::ShutdownFailed)
                        .with_worker(name.clone())
                        .with_error(e.to_string()),
                );
                failures.push(WorkerFailure {
                    worker: name.to_string(),
                    phase: FailurePhase::Shutdown,
                    error: e,
                });
            }
        }
    }
}

fn spawn_shutdown(stops: &mut JoinSet<Joined>, name: Arc<str>, worker: WorkerRef) {
    stops.spawn(async move {
        let res = AssertUnwindSafe(worker.shutdown())
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(WorkerError::Shutdown {
                    error: format!("shutdown panicked: {}", panic_message(panic)),
                })
            });
        (name, res)
    });
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::broadcast::Receiver;

    use super::*;
    use crate::config::{GlobalConfig, WorkerConfigRaw};
    use crate::core::shutdown::{Signal, signal_channel};
    use crate::core::state::exit_code;
    use crate::error::{ConfigError, EXIT_OK, EXIT_STARTUP_FAILURE, EXIT_WORKER_FAILURE};
    use crate::resolve::Registry;
    use crate::test_support::{MockRuntime, RunPlan, Step};

    fn supervisor(runtime: &Arc<MockRuntime>, names: &[&str]) -> Supervisor {
        let workers = names.iter().map(|n| WorkerConfigRaw::new(*n)).collect();
        let config = Config::new(GlobalConfig::default(), workers);
        Supervisor::new(config, Arc::new(Registry::with_runtime(runtime.clone())))
    }

    async fn wait_for(rx: &mut Receiver<Event>, kind: EventKind) -> Event {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let ev = rx.recv().await.expect("bus open");
                if ev.kind == kind {
                    return ev;
                }
            }
        })
        .await
        .expect("event in time")
    }

    async fn until(cond: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !cond() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition in time");
    }

    fn is_run(s: &Step) -> bool {
        matches!(s, Step::Run(_))
    }

    fn is_shutdown(s: &Step) -> bool {
        matches!(s, Step::Shutdown(_))
    }

    #[tokio::test]
    async fn test_natural_completion() {
        let runtime = MockRuntime::new();
        runtime.set_run("a", RunPlan::Exit(Ok(())));
        runtime.set_run("b", RunPlan::Exit(Ok(())));
        let mut sup = supervisor(&runtime, &["a", "b"]);

        let (_tx, signals) = signal_channel();
        let res = sup.run_with_signals(signals).await;

        assert_eq!(
            res.as_ref().expect("clean run"),
            &RunReport {
                workers: 2,
                cause: StopCause::Completed
            }
        );
        assert_eq!(exit_code(&res), EXIT_OK);
        assert_eq!(sup.state(), State::Stopped);
        assert_eq!(runtime.journal().count(is_shutdown), 0);
    }

    #[tokio::test]
    async fn test_construction_failure_starts_nothing() {
        let runtime = MockRuntime::new();
        runtime.fail_build("w2");
        let mut sup = supervisor(&runtime, &["w1", "w2", "w3"]);
        let mut rx = sup.subscribe();

        let (_tx, signals) = signal_channel();
        let res = sup.run_with_signals(signals).await;

        let err = res.as_ref().expect_err("startup failure");
        match err {
            RuntimeError::Startup { worker, source } => {
                assert_eq!(worker, "w2");
                assert_eq!(source.as_label(), "worker_build");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(exit_code(&res), EXIT_STARTUP_FAILURE);
        assert_eq!(sup.state(), State::Failed);

        let journal = runtime.journal();
        assert_eq!(journal.count(is_run), 0);
        assert_eq!(journal.count(|s| matches!(s, Step::Build(_))), 2);

        let ev = wait_for(&mut rx, EventKind::StartupFailed).await;
        assert_eq!(ev.worker.as_deref(), Some("w2"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_startup_failure() {
        let runtime = MockRuntime::new();
        runtime.fail_connect("unreachable:7233");
        let mut raw = WorkerConfigRaw::new("w2");
        raw.endpoint = Some("unreachable:7233".into());
        let config = Config::new(GlobalConfig::default(), vec![WorkerConfigRaw::new("w1"), raw]);
        let mut sup = Supervisor::new(config, Arc::new(Registry::with_runtime(runtime.clone())));

        let (_tx, signals) = signal_channel();
        let res = sup.run_with_signals(signals).await;

        match res.as_ref().expect_err("startup failure") {
            RuntimeError::Startup { worker, source } => {
                assert_eq!(worker, "w2");
                assert_eq!(source.as_label(), "worker_connection");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(exit_code(&res), EXIT_STARTUP_FAILURE);
        assert_eq!(runtime.journal().count(is_run), 0);
    }

    #[tokio::test]
    async fn test_first_failure_in_input_order_is_reported() {
        let runtime = MockRuntime::new();
        runtime.fail_build("w3");
        runtime.fail_build("w1");
        let mut sup = supervisor(&runtime, &["w1", "w2", "w3"]);

        let (_tx, signals) = signal_channel();
        let err = sup.run_with_signals(signals).await.expect_err("startup failure");

        assert!(matches!(err, RuntimeError::Startup { ref worker, .. } if worker == "w1"));
    }

    #[tokio::test]
    async fn test_duplicate_names_construct_nothing() {
        let runtime = MockRuntime::new();
        let mut sup = supervisor(&runtime, &["a", "a"]);

        let (_tx, signals) = signal_channel();
        let res = sup.run_with_signals(signals).await;

        let err = res.as_ref().expect_err("resolve failure");
        assert!(matches!(
            err,
            RuntimeError::Resolve(ResolveError::Config(ConfigError::DuplicateName { name })) if name == "a"
        ));
        assert_eq!(exit_code(&res), EXIT_STARTUP_FAILURE);
        assert_eq!(sup.state(), State::Failed);
        assert!(runtime.connects().is_empty());
        assert!(!sup.config().is_resolved());
    }

    #[tokio::test]
    async fn test_signal_stops_every_worker() {
        let runtime = MockRuntime::new();
        let gate = runtime.gate_shutdown("slow");
        let mut sup = supervisor(&runtime, &["fast", "slow", "other"]);
        let mut rx = sup.subscribe();
        let state = sup.watch_state();
        let journal = runtime.journal();

        let (tx, signals) = signal_channel();
        let (res, ()) = tokio::join!(sup.run_with_signals(signals), async {
            wait_for(&mut rx, EventKind::WorkersStarted).await;
            until(|| journal.count(is_run) == 3).await;

            assert!(tx.send(Signal::Terminate));
            until(|| journal.count(is_shutdown) == 3).await;
            wait_for(&mut rx, EventKind::WorkerStopped).await;
            wait_for(&mut rx, EventKind::WorkerStopped).await;

            // slow worker still draining: run has not resolved
            assert_eq!(*state.borrow(), State::Stopping);
            gate.notify_one();
        });

        assert_eq!(
            res.expect("clean stop"),
            RunReport {
                workers: 3,
                cause: StopCause::Signal(Signal::Terminate)
            }
        );
        assert_eq!(sup.state(), State::Stopped);
        assert_eq!(runtime.journal().count(is_shutdown), 3);
    }

    #[tokio::test]
    async fn test_second_signal_is_ignored() {
        let runtime = MockRuntime::new();
        let gate = runtime.gate_shutdown("w1");
        let mut sup = supervisor(&runtime, &["w1", "w2"]);
        let mut rx = sup.subscribe();
        let journal = runtime.journal();

        let (tx, signals) = signal_channel();
        let (res, ()) = tokio::join!(sup.run_with_signals(signals), async {
            wait_for(&mut rx, EventKind::WorkersStarted).await;
            assert!(tx.send(Signal::Interrupt));
            wait_for(&mut rx, EventKind::ShutdownRequested).await;

            assert!(tx.send(Signal::Terminate));
            let ev = wait_for(&mut rx, EventKind::SignalIgnored).await;
            assert_eq!(ev.signal, Some(Signal::Terminate));
            gate.notify_one();
        });

        let report = res.expect("clean stop");
        assert_eq!(report.cause, StopCause::Signal(Signal::Interrupt));
        assert_eq!(journal.count(is_shutdown), 2);
    }

    #[tokio::test]
    async fn test_run_failure_does_not_stop_siblings() {
        let runtime = MockRuntime::new();
        runtime.set_run(
            "bad",
            RunPlan::Exit(Err(WorkerError::Run {
                error: "poller crashed".into(),
            })),
        );
        runtime.set_run("good", RunPlan::Exit(Ok(())));
        let mut sup = supervisor(&runtime, &["bad", "good"]);

        let (_tx, signals) = signal_channel();
        let res = sup.run_with_signals(signals).await;

        match res.as_ref().expect_err("worker failure") {
            RuntimeError::WorkersFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].worker, "bad");
                assert_eq!(failures[0].phase, FailurePhase::Run);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(exit_code(&res), EXIT_WORKER_FAILURE);
        assert_eq!(runtime.journal().count(is_shutdown), 0);
        assert_eq!(sup.state(), State::Stopped);
    }

    #[tokio::test]
    async fn test_panics_are_captured() {
        let runtime = MockRuntime::new();
        runtime.set_run("boom", RunPlan::Panic);
        let mut sup = supervisor(&runtime, &["boom"]);

        let (_tx, signals) = signal_channel();
        let err = sup.run_with_signals(signals).await.expect_err("panic reported");

        match err {
            RuntimeError::WorkersFailed { failures } => {
                assert_eq!(failures[0].error.as_label(), "worker_run");
                assert!(failures[0].error.to_string().contains("exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_failure_is_reported() {
        let runtime = MockRuntime::new();
        runtime.fail_shutdown("w1", "drain timed out");
        let mut sup = supervisor(&runtime, &["w1", "w2"]);
        let mut rx = sup.subscribe();

        let (tx, signals) = signal_channel();
        let (res, ()) = tokio::join!(sup.run_with_signals(signals), async {
            wait_for(&mut rx, EventKind::WorkersStarted).await;
            assert!(tx.send(Signal::Terminate));
        });

        match res.expect_err("shutdown failure") {
            RuntimeError::WorkersFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].worker, "w1");
                assert_eq!(failures[0].phase, FailurePhase::Shutdown);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_workers_stop_immediately() {
        let runtime = MockRuntime::new();
        let mut sup = supervisor(&runtime, &[]);

        let (_tx, signals) = signal_channel();
        let report = sup.run_with_signals(signals).await.expect("empty run");

        assert_eq!(report.workers, 0);
        assert_eq!(sup.state(), State::Stopped);
    }

    #[tokio::test]
    async fn test_run_twice_is_rejected() {
        let runtime = MockRuntime::new();
        runtime.set_run("w1", RunPlan::Exit(Ok(())));
        let mut sup = supervisor(&runtime, &["w1"]);

        let (_tx, signals) = signal_channel();
        sup.run_with_signals(signals).await.expect("first run");

        let (_tx, signals) = signal_channel();
        let err = sup.run_with_signals(signals).await.expect_err("second run");
        assert!(matches!(err, RuntimeError::AlreadyRan));
        assert_eq!(runtime.journal().count(is_run), 1);
    }

    #[tokio::test]
    async fn test_pre_resolved_config_is_not_resolved_again() {
        let runtime = MockRuntime::new();
        runtime.set_run("w1", RunPlan::Exit(Ok(())));
        let registry: Arc<dyn Loader> = Arc::new(Registry::with_runtime(runtime.clone()));

        let mut config = Config::new(GlobalConfig::default(), vec![WorkerConfigRaw::new("w1")]);
        config
            .resolve(&ConfigResolver::new(registry.clone()))
            .expect("resolve");

        let mut sup = Supervisor::new(config, registry);
        let (_tx, signals) = signal_channel();
        sup.run_with_signals(signals).await.expect("run");

        assert_eq!(runtime.journal().count(is_run), 1);
    }
}
