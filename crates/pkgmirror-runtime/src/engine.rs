use crate::RuntimeError;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::path::PathBuf;

/// Where a mirror's local repository tree is bind-mounted inside the
/// serving container.
pub const REPO_MOUNT: &str = "/srv/repo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Stopped,
}

/// A container as observed by the engine at one instant. Never cached:
/// every decision re-reads the engine. An absent container is the `None`
/// case of `Option<ContainerState>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    pub image_id: String,
    pub status: ContainerStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ip: Option<IpAddr>,
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        self.status == ContainerStatus::Running
    }
}

/// A detached, self-removing container run. `mount`, when present, is
/// bound read-write at [`REPO_MOUNT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub image: String,
    pub name: String,
    pub mount: Option<PathBuf>,
}

/// The seam between mirror reconciliation and the container engine.
/// Every method is a fresh, blocking observation or mutation; callers
/// decide per call site whether a failure is fatal or best-effort.
pub trait ContainerEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// The image id for a locally present image, `None` if the engine
    /// does not know the image.
    fn image_id(&self, image: &str) -> Result<Option<String>, RuntimeError>;

    /// Observe a container by name, `None` if it does not exist.
    fn container(&self, name: &str) -> Result<Option<ContainerState>, RuntimeError>;

    fn run_detached(&self, request: &RunRequest) -> Result<(), RuntimeError>;

    /// Force-remove a container. Removing a missing container is an
    /// error here; call sites that only clean up opportunistically log
    /// and continue instead of propagating.
    fn remove_container(&self, name: &str) -> Result<(), RuntimeError>;

    /// All locally tagged images as `repository:tag` strings.
    fn image_tags(&self) -> Result<Vec<String>, RuntimeError>;

    /// Names of all currently running containers.
    fn running_containers(&self) -> Result<Vec<String>, RuntimeError>;
}

pub fn select_engine(name: &str) -> Result<Box<dyn ContainerEngine>, RuntimeError> {
    match name {
        "docker" => Ok(Box::new(crate::docker::DockerCli::new())),
        "mock" => Ok(Box::new(crate::mock::MockEngine::new())),
        other => Err(RuntimeError::EngineUnavailable(other.to_owned())),
    }
}
