use crate::family::family_for;
use crate::{overlay, CoreError};
use pkgmirror_runtime::{start_mirror, stop_mirror, ContainerEngine};
use pkgmirror_schema::{
    ImageReference, MirrorAddress, MirrorDescriptor, OverrideMap, ResolvedMirror,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_REGISTRY: &str = "localhost:5000/mirror-packages";

/// Immutable per-invocation configuration: registry prefix, mirror
/// selection flags, and the user's override sections. Built once from
/// CLI parsing and handed to the controller; never mutated afterwards,
/// so independent configurations can coexist in one process.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub registry: String,
    pub epel: bool,
    pub updates: bool,
    pub universe: bool,
    pub overrides: OverrideMap,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_owned(),
            epel: false,
            updates: false,
            universe: false,
            overrides: OverrideMap::new(),
        }
    }
}

/// Serializable summary of what would serve an image's package traffic.
#[derive(Debug, Serialize)]
pub struct MirrorFacts {
    pub image: String,
    pub canonical: String,
    pub mirrors: Vec<MirrorFact>,
}

#[derive(Debug, Serialize)]
pub struct MirrorFact {
    pub container: String,
    pub image: String,
    pub hosts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<PathBuf>,
}

/// The mirror resolution and container-lifecycle controller.
///
/// Answers which sidecar containers must be running to serve
/// package-manager traffic for an image, converges the engine toward
/// that state, and reports the address redirections a client needs.
/// Engine state is observed fresh on every call; nothing is cached
/// across invocations.
pub struct MirrorController<'e> {
    config: MirrorConfig,
    engine: &'e dyn ContainerEngine,
}

impl<'e> MirrorController<'e> {
    pub fn new(config: MirrorConfig, engine: &'e dyn ContainerEngine) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// `family:canonical` for a possibly-shorthand reference.
    pub fn canonical_reference(
        &self,
        reference: &ImageReference,
    ) -> Result<ImageReference, CoreError> {
        let family = family_for(&reference.family)
            .ok_or_else(|| CoreError::UnknownFamily(reference.family.clone()))?;
        Ok(ImageReference::new(
            reference.family.clone(),
            family.resolve_version(&reference.version),
        ))
    }

    /// The mirror descriptors serving this reference, catalog output
    /// merged with the user's overrides. Primary first.
    pub fn descriptors(
        &self,
        reference: &ImageReference,
    ) -> Result<Vec<MirrorDescriptor>, CoreError> {
        let family = family_for(&reference.family)
            .ok_or_else(|| CoreError::UnknownFamily(reference.family.clone()))?;
        let canonical = family.resolve_version(&reference.version);
        let built = family.descriptors(&canonical, &self.config, self.engine)?;
        Ok(overlay::apply(
            &reference.canonical_key(&canonical),
            built,
            &self.config.overrides,
        ))
    }

    pub fn facts(&self, reference: &ImageReference) -> Result<MirrorFacts, CoreError> {
        let canonical = self.canonical_reference(reference)?;
        let mirrors = self
            .descriptors(reference)?
            .into_iter()
            .map(|d| MirrorFact {
                container: d.container_name,
                image: d.mirror_image,
                hosts: d.hostnames,
                mount: d.mount,
            })
            .collect();
        Ok(MirrorFacts {
            image: reference.to_string(),
            canonical: canonical.version,
            mirrors,
        })
    }

    /// Bring every mirror for this reference up (or reuse it) and report
    /// the resolved addresses. Readiness polling is the caller's step;
    /// this only converges container state.
    pub fn start(&self, reference: &ImageReference) -> Result<Vec<ResolvedMirror>, CoreError> {
        let mut resolved = Vec::new();
        for descriptor in self.descriptors(reference)? {
            let address = start_mirror(self.engine, &descriptor)?;
            resolved.push(ResolvedMirror::new(descriptor, address));
        }
        Ok(resolved)
    }

    /// Stop every mirror for this reference. The map values are
    /// diagnostic: the removed container's start timestamp, or the
    /// did-not-exist sentinel.
    pub fn stop(&self, reference: &ImageReference) -> Result<BTreeMap<String, String>, CoreError> {
        let mut outcomes = BTreeMap::new();
        for descriptor in self.descriptors(reference)? {
            let outcome = stop_mirror(self.engine, &descriptor.container_name)?;
            outcomes.insert(descriptor.container_name, outcome.describe());
        }
        Ok(outcomes)
    }

    /// Observe without converging: which of this reference's mirrors are
    /// up right now, and on which addresses.
    pub fn show(&self, reference: &ImageReference) -> Result<Vec<ResolvedMirror>, CoreError> {
        let mut resolved = Vec::new();
        for descriptor in self.descriptors(reference)? {
            let address = self
                .engine
                .container(&descriptor.container_name)?
                .filter(pkgmirror_runtime::ContainerState::is_running)
                .and_then(|state| state.ip)
                .map_or(MirrorAddress::Unavailable, MirrorAddress::Resolved);
            resolved.push(ResolvedMirror::new(descriptor, address));
        }
        Ok(resolved)
    }

    /// All running mirror sidecars on this engine, by the `-repo-` name
    /// convention. Containers renamed through a `cname` override are not
    /// discoverable this way.
    pub fn running_mirrors(&self) -> Result<BTreeMap<String, Option<String>>, CoreError> {
        let mut mirrors = BTreeMap::new();
        for name in self.engine.running_containers()? {
            if !name.contains("-repo-") {
                continue;
            }
            let ip = self
                .engine
                .container(&name)?
                .and_then(|state| state.ip)
                .map(|ip| ip.to_string());
            mirrors.insert(name, ip);
        }
        Ok(mirrors)
    }

    /// Container-name to address map for serialized output. Unavailable
    /// mirrors are reported with a null address.
    pub fn address_map(mirrors: &[ResolvedMirror]) -> BTreeMap<String, Option<String>> {
        mirrors
            .iter()
            .map(|m| {
                (
                    m.descriptor.container_name.clone(),
                    m.address.ip().map(|ip| ip.to_string()),
                )
            })
            .collect()
    }
}
