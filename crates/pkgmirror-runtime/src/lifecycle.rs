use crate::engine::{ContainerEngine, RunRequest};
use crate::RuntimeError;
use chrono::{DateTime, Utc};
use pkgmirror_schema::{MirrorAddress, MirrorDescriptor};
use tracing::{debug, warn};

/// Result of stopping a mirror container. Both values are diagnostic:
/// callers print them, nothing branches on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Removed {
        started_at: Option<DateTime<Utc>>,
    },
    DidNotExist,
}

impl StopOutcome {
    pub fn describe(&self) -> String {
        match self {
            Self::Removed {
                started_at: Some(at),
            } => at.to_rfc3339(),
            Self::Removed { started_at: None } => "removed".to_owned(),
            Self::DidNotExist => "did not exist".to_owned(),
        }
    }
}

/// Converge the engine toward "this mirror's container is up", and
/// report the address it serves on.
///
/// The reconciliation is a single actual-vs-desired pass keyed by
/// (name, image id, running): a container already matching all three is
/// reused untouched; anything else under that name is force-removed and
/// replaced by a fresh detached, self-removing run. A missing mirror
/// image is not an error: the mirror is reported `Unavailable` and the
/// caller skips it.
pub fn start_mirror(
    engine: &dyn ContainerEngine,
    descriptor: &MirrorDescriptor,
) -> Result<MirrorAddress, RuntimeError> {
    let Some(image_id) = engine.image_id(&descriptor.mirror_image)? else {
        warn!(image = %descriptor.mirror_image, "mirror image not present locally");
        return Ok(MirrorAddress::Unavailable);
    };

    match engine.container(&descriptor.container_name)? {
        Some(state) if state.image_id == image_id && state.is_running() => {
            debug!(container = %descriptor.container_name, "reusing running mirror container");
            return Ok(state
                .ip
                .map_or(MirrorAddress::Unavailable, MirrorAddress::Resolved));
        }
        // Wrong image or not running: this container is known to exist,
        // so its removal must succeed.
        Some(_) => {
            debug!(container = %descriptor.container_name, "replacing stale mirror container");
            engine.remove_container(&descriptor.container_name)?;
        }
        // The name may still be claimed by a leftover of an interrupted
        // invocation; clearing it is opportunistic.
        None => {
            if let Err(err) = engine.remove_container(&descriptor.container_name) {
                debug!(container = %descriptor.container_name, %err, "pre-run cleanup skipped");
            }
        }
    }

    let mount = match &descriptor.mount {
        Some(dir) if dir.is_dir() => Some(dir.clone()),
        Some(dir) => {
            warn!(mount = %dir.display(), "mount directory missing, starting unmounted");
            None
        }
        None => None,
    };

    engine.run_detached(&RunRequest {
        image: descriptor.mirror_image.clone(),
        name: descriptor.container_name.clone(),
        mount,
    })?;

    let observed = engine.container(&descriptor.container_name)?;
    Ok(observed
        .and_then(|state| state.ip)
        .map_or(MirrorAddress::Unavailable, MirrorAddress::Resolved))
}

/// Force-remove a mirror container if it exists, reporting the start
/// timestamp it had been running since.
pub fn stop_mirror(engine: &dyn ContainerEngine, name: &str) -> Result<StopOutcome, RuntimeError> {
    match engine.container(name)? {
        Some(state) => {
            engine.remove_container(name)?;
            Ok(StopOutcome::Removed {
                started_at: state.started_at,
            })
        }
        None => Ok(StopOutcome::DidNotExist),
    }
}
