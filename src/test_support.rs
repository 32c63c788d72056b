//! In-memory worker runtime and artifact stubs shared by unit tests.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{Notify, watch};

use crate::error::WorkerError;
use crate::resolve::WorkerSpec;
use crate::runtime::{
    Activity, Client, ClientRef, ConnectOptions, DataConverter, Interceptor, Worker,
    WorkerFactory, WorkerOptions, WorkerRef, WorkerRuntime, Workflow,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Observable side effect of the mock runtime or its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Hook(String),
    /// Endpoint connected to.
    Connect(String),
    /// Worker name.
    Build(String),
    Run(String),
    Shutdown(String),
}

/// Shared, ordered record of [`Step`]s.
#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<Step>>>);

impl Journal {
    pub(crate) fn push(&self, step: Step) {
        lock(&self.0).push(step);
    }

    pub(crate) fn steps(&self) -> Vec<Step> {
        lock(&self.0).clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Step) -> bool) -> usize {
        lock(&self.0).iter().filter(|s| pred(s)).count()
    }
}

/// What a mock worker's `run` does.
#[derive(Clone)]
pub(crate) enum RunPlan {
    /// Block until `shutdown` is called.
    UntilShutdown,
    /// Return immediately with the given result.
    Exit(Result<(), WorkerError>),
    Panic,
}

#[derive(Default)]
struct Plans {
    run: HashMap<String, RunPlan>,
    shutdown_gates: HashMap<String, Arc<Notify>>,
    shutdown_errors: HashMap<String, String>,
    connect_failures: HashSet<String>,
    build_failures: HashSet<String>,
}

/// Worker runtime that records every call and builds [`MockWorker`]s.
#[derive(Default)]
pub(crate) struct MockRuntime {
    journal: Journal,
    connects: Mutex<Vec<ConnectOptions>>,
    plans: Mutex<Plans>,
}

impl MockRuntime {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn journal(&self) -> Journal {
        self.journal.clone()
    }

    pub(crate) fn connects(&self) -> Vec<ConnectOptions> {
        lock(&self.connects).clone()
    }

    pub(crate) fn fail_connect(&self, endpoint: &str) {
        lock(&self.plans).connect_failures.insert(endpoint.to_string());
    }

    pub(crate) fn fail_build(&self, worker: &str) {
        lock(&self.plans).build_failures.insert(worker.to_string());
    }

    pub(crate) fn set_run(&self, worker: &str, plan: RunPlan) {
        lock(&self.plans).run.insert(worker.to_string(), plan);
    }

    pub(crate) fn fail_shutdown(&self, worker: &str, error: &str) {
        lock(&self.plans)
            .shutdown_errors
            .insert(worker.to_string(), error.to_string());
    }

    /// Makes the worker's `shutdown` wait until the returned gate is notified.
    pub(crate) fn gate_shutdown(&self, worker: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.plans)
            .shutdown_gates
            .insert(worker.to_string(), gate.clone());
        gate
    }
}

struct MockClient {
    endpoint: String,
    namespace: String,
}

impl Client for MockClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl WorkerRuntime for MockRuntime {
    async fn connect(&self, opts: ConnectOptions) -> Result<ClientRef, WorkerError> {
        lock(&self.connects).push(opts.clone());
        if lock(&self.plans).connect_failures.contains(&opts.endpoint) {
            return Err(WorkerError::Connection {
                endpoint: opts.endpoint,
                error: "connection refused".into(),
            });
        }
        self.journal.push(Step::Connect(opts.endpoint.clone()));
        Ok(Arc::new(MockClient {
            endpoint: opts.endpoint,
            namespace: opts.namespace,
        }))
    }

    async fn build_worker(
        &self,
        _client: ClientRef,
        opts: WorkerOptions,
    ) -> Result<WorkerRef, WorkerError> {
        let plans = lock(&self.plans);
        if plans.build_failures.contains(&opts.name) {
            return Err(WorkerError::Build {
                error: format!("queue {:?} rejected", opts.queue),
            });
        }
        self.journal.push(Step::Build(opts.name.clone()));
        let (stopped, _) = watch::channel(false);
        Ok(Arc::new(MockWorker {
            run: plans
                .run
                .get(&opts.name)
                .cloned()
                .unwrap_or(RunPlan::UntilShutdown),
            gate: plans.shutdown_gates.get(&opts.name).cloned(),
            shutdown_error: plans.shutdown_errors.get(&opts.name).cloned(),
            name: opts.name,
            journal: self.journal.clone(),
            stopped,
        }))
    }
}

pub(crate) struct MockWorker {
    name: String,
    journal: Journal,
    stopped: watch::Sender<bool>,
    run: RunPlan,
    gate: Option<Arc<Notify>>,
    shutdown_error: Option<String>,
}

#[async_trait]
impl Worker for MockWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        self.journal.push(Step::Run(self.name.clone()));
        match &self.run {
            RunPlan::UntilShutdown => {
                let mut rx = self.stopped.subscribe();
                let _ = rx.wait_for(|stopped| *stopped).await;
                Ok(())
            }
            RunPlan::Exit(result) => result.clone(),
            RunPlan::Panic => panic!("worker {} exploded", self.name),
        }
    }

    async fn shutdown(&self) -> Result<(), WorkerError> {
        self.journal.push(Step::Shutdown(self.name.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.stopped.send_replace(true);
        match &self.shutdown_error {
            Some(error) => Err(WorkerError::Shutdown {
                error: error.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Named placeholder usable as any opaque artifact, or as a factory that
/// never builds anything.
pub(crate) struct Stub(String);

pub(crate) fn stub(name: &str) -> Arc<Stub> {
    Arc::new(Stub(name.to_string()))
}

macro_rules! impl_stub_artifact {
    ($($tr:ident),+ $(,)?) => {$(
        impl $tr for Stub {
            fn name(&self) -> &str {
                &self.0
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    )+};
}

impl_stub_artifact!(Workflow, Activity, Interceptor, DataConverter);

#[async_trait]
impl WorkerFactory for Stub {
    fn name(&self) -> &str {
        &self.0
    }

    async fn new_worker(&self, spec: &WorkerSpec) -> Result<WorkerRef, WorkerError> {
        Err(WorkerError::Build {
            error: format!("stub factory {} cannot build {}", self.0, spec.name()),
        })
    }
}
