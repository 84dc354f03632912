use crate::engine::{ContainerEngine, ContainerState, ContainerStatus, RunRequest, REPO_MOUNT};
use crate::RuntimeError;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::process::{Command, Output};
use tracing::debug;

/// Container engine backed by the `docker` CLI. Each call is one
/// blocking subprocess invocation; output is parsed from docker's JSON
/// inspect format rather than interpolated format strings.
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            binary: "docker".to_owned(),
        }
    }
}

impl DockerCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, RuntimeError> {
        Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(RuntimeError::Io)
    }

    /// Run a command that is expected to succeed; non-zero exit is a
    /// hard failure carrying the engine's stderr.
    fn checked(&self, args: &[&str]) -> Result<String, RuntimeError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(RuntimeError::EngineCommand {
                command: format!("{} {}", self.binary, args.join(" ")),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ContainerEngine for DockerCli {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn image_id(&self, image: &str) -> Result<Option<String>, RuntimeError> {
        let output = self.output(&["image", "inspect", "--format", "{{.Id}}", image])?;
        if !output.status.success() {
            // Inspect failure is recovered into "absent"; strict-mode
            // callers escalate absence, not this call.
            debug!(image, "image not present locally");
            return Ok(None);
        }
        let id = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        Ok(if id.is_empty() { None } else { Some(id) })
    }

    fn container(&self, name: &str) -> Result<Option<ContainerState>, RuntimeError> {
        let output = self.output(&["container", "inspect", name])?;
        if !output.status.success() {
            return Ok(None);
        }
        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| RuntimeError::EngineOutput(format!("container inspect: {e}")))?;
        let Some(detail) = parsed.get(0) else {
            return Ok(None);
        };
        let image_id = detail
            .get("Image")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                RuntimeError::EngineOutput(format!("container inspect for '{name}': no Image"))
            })?
            .to_owned();
        let running = detail
            .pointer("/State/Running")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        let started_at = detail
            .pointer("/State/StartedAt")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        let ip = detail
            .pointer("/NetworkSettings/IPAddress")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<IpAddr>().ok());
        Ok(Some(ContainerState {
            image_id,
            status: if running {
                ContainerStatus::Running
            } else {
                ContainerStatus::Stopped
            },
            started_at,
            ip,
        }))
    }

    fn run_detached(&self, request: &RunRequest) -> Result<(), RuntimeError> {
        let mut args = vec![
            "run".to_owned(),
            "--rm".to_owned(),
            "--detach".to_owned(),
            "--name".to_owned(),
            request.name.clone(),
        ];
        if let Some(mount) = &request.mount {
            args.push("--volume".to_owned());
            args.push(format!("{}:{REPO_MOUNT}", mount.display()));
        }
        args.push(request.image.clone());
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.checked(&arg_refs)?;
        Ok(())
    }

    fn remove_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.checked(&["rm", "--force", name])?;
        Ok(())
    }

    fn image_tags(&self) -> Result<Vec<String>, RuntimeError> {
        let listing = self.checked(&["images", "--format", "{{.Repository}}:{{.Tag}}"])?;
        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.contains("<none>"))
            .map(str::to_owned)
            .collect())
    }

    fn running_containers(&self) -> Result<Vec<String>, RuntimeError> {
        let listing = self.checked(&["ps", "--format", "{{.Names}}"])?;
        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }
}
