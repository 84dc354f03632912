use crate::engine::{ContainerEngine, ContainerState, ContainerStatus, RunRequest};
use crate::RuntimeError;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Mutex;

/// A mutating engine call, recorded in order. Idempotence tests assert
/// on this log: a converged start issues no `Run` and no `Remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Run(String),
    Remove(String),
}

#[derive(Debug, Clone)]
struct MockContainer {
    image_id: String,
    running: bool,
    started_at: Option<DateTime<Utc>>,
    ip: Option<IpAddr>,
}

#[derive(Default)]
struct MockState {
    images: BTreeMap<String, String>,
    containers: BTreeMap<String, MockContainer>,
    events: Vec<EngineEvent>,
    next_ip: u8,
}

/// In-memory engine for tests: images and containers are seeded by the
/// test, mutations are recorded, and addresses are handed out from
/// 172.17.0.0/16 the way a default bridge network would.
pub struct MockEngine {
    state: Mutex<MockState>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_ip: 2,
                ..MockState::default()
            }),
        }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MockState>, RuntimeError> {
        self.state
            .lock()
            .map_err(|e| RuntimeError::EngineOutput(format!("mutex poisoned: {e}")))
    }

    pub fn add_image(&self, image: &str, image_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.images.insert(image.to_owned(), image_id.to_owned());
        }
    }

    /// Seed a container that is already up, as if a previous invocation
    /// started it.
    pub fn add_running_container(&self, name: &str, image_id: &str, ip: IpAddr) {
        if let Ok(mut state) = self.state.lock() {
            state.containers.insert(
                name.to_owned(),
                MockContainer {
                    image_id: image_id.to_owned(),
                    running: true,
                    started_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()),
                    ip: Some(ip),
                },
            );
        }
    }

    /// Seed a container that exists but is not running.
    pub fn add_stopped_container(&self, name: &str, image_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.containers.insert(
                name.to_owned(),
                MockContainer {
                    image_id: image_id.to_owned(),
                    running: false,
                    started_at: None,
                    ip: None,
                },
            );
        }
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.state
            .lock()
            .map(|state| state.events.clone())
            .unwrap_or_default()
    }
}

impl ContainerEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn image_id(&self, image: &str) -> Result<Option<String>, RuntimeError> {
        Ok(self.lock()?.images.get(image).cloned())
    }

    fn container(&self, name: &str) -> Result<Option<ContainerState>, RuntimeError> {
        Ok(self.lock()?.containers.get(name).map(|c| ContainerState {
            image_id: c.image_id.clone(),
            status: if c.running {
                ContainerStatus::Running
            } else {
                ContainerStatus::Stopped
            },
            started_at: c.started_at,
            ip: c.ip,
        }))
    }

    fn run_detached(&self, request: &RunRequest) -> Result<(), RuntimeError> {
        let mut state = self.lock()?;
        let Some(image_id) = state.images.get(&request.image).cloned() else {
            return Err(RuntimeError::EngineCommand {
                command: format!("run {}", request.image),
                detail: format!("no such image: {}", request.image),
            });
        };
        if state.containers.contains_key(&request.name) {
            return Err(RuntimeError::EngineCommand {
                command: format!("run {}", request.image),
                detail: format!("container name '{}' already in use", request.name),
            });
        }
        let ip = IpAddr::V4(Ipv4Addr::new(172, 17, 0, state.next_ip));
        state.next_ip = state.next_ip.wrapping_add(1);
        state.events.push(EngineEvent::Run(request.name.clone()));
        state.containers.insert(
            request.name.clone(),
            MockContainer {
                image_id,
                running: true,
                started_at: Some(Utc::now()),
                ip: Some(ip),
            },
        );
        Ok(())
    }

    fn remove_container(&self, name: &str) -> Result<(), RuntimeError> {
        let mut state = self.lock()?;
        if state.containers.remove(name).is_none() {
            return Err(RuntimeError::EngineCommand {
                command: format!("rm --force {name}"),
                detail: format!("no such container: {name}"),
            });
        }
        state.events.push(EngineEvent::Remove(name.to_owned()));
        Ok(())
    }

    fn image_tags(&self) -> Result<Vec<String>, RuntimeError> {
        Ok(self.lock()?.images.keys().cloned().collect())
    }

    fn running_containers(&self) -> Result<Vec<String>, RuntimeError> {
        Ok(self
            .lock()?
            .containers
            .iter()
            .filter(|(_, c)| c.running)
            .map(|(name, _)| name.clone())
            .collect())
    }
}
