//! Container engine access for pkgmirror.
//!
//! This crate implements the execution layer: the pluggable
//! `ContainerEngine` trait with a docker-CLI implementation and an
//! in-memory mock, the mirror container lifecycle reconciler
//! (reuse / recreate / stop), and the bounded TCP readiness waiter.

pub mod docker;
pub mod engine;
pub mod lifecycle;
pub mod mock;
pub mod readiness;

pub use docker::DockerCli;
pub use engine::{select_engine, ContainerEngine, ContainerState, ContainerStatus, RunRequest};
pub use lifecycle::{start_mirror, stop_mirror, StopOutcome};
pub use mock::{EngineEvent, MockEngine};
pub use readiness::{probe_port, wait_for_mirrors, MAX_WAIT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("container engine '{0}' is not available")]
    EngineUnavailable(String),
    #[error("'{command}' failed: {detail}")]
    EngineCommand { command: String, detail: String },
    #[error("failed to parse engine output: {0}")]
    EngineOutput(String),
}
