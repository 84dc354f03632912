use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

/// A distro family plus a (possibly shorthand) version, as given on the
/// command line or detected from the host: `centos:7`, `ubuntu:22.04`,
/// `opensuse/leap:15.2`. An empty version means "latest".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageReference {
    pub family: String,
    pub version: String,
}

impl ImageReference {
    pub fn new(family: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            version: version.into(),
        }
    }

    /// Split `family:version` at the last colon so slash-carrying families
    /// (`opensuse/leap:15.2`) parse correctly. A bare family means latest.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SchemaError::InvalidReference(input.to_owned()));
        }
        let (family, version) = match input.rsplit_once(':') {
            Some((f, v)) => (f, v),
            None => (input, ""),
        };
        if family.is_empty() {
            return Err(SchemaError::InvalidReference(input.to_owned()));
        }
        Ok(Self::new(family, version))
    }

    /// The override-config section key for this reference once its version
    /// has been resolved to a canonical release string.
    pub fn canonical_key(&self, canonical: &str) -> String {
        format!("{}:{canonical}", self.family)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.family)
        } else {
            write!(f, "{}:{}", self.family, self.version)
        }
    }
}

/// Which sidecar container serves a repository mirror, and which upstream
/// hostnames should be redirected to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MirrorDescriptor {
    pub container_name: String,
    pub mirror_image: String,
    pub hostnames: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<PathBuf>,
}

impl MirrorDescriptor {
    /// Descriptor for `<registry>/<repo>:<version>` with the container name
    /// derived from the repo path and version.
    pub fn new(registry: &str, repo: &str, version: &str, hostnames: &[&str]) -> Self {
        let mirror_image = format!("{registry}/{repo}:{version}");
        Self {
            container_name: container_name(registry, &mirror_image),
            mirror_image,
            hostnames: hostnames.iter().map(|h| (*h).to_owned()).collect(),
            mount: None,
        }
    }

    /// Descriptor for an already fully-qualified image string (EPEL tags
    /// enumerated from the engine, or an override-supplied image).
    pub fn for_image(registry: &str, mirror_image: &str, hostnames: Vec<String>) -> Self {
        Self {
            container_name: container_name(registry, mirror_image),
            mirror_image: mirror_image.to_owned(),
            hostnames,
            mount: None,
        }
    }
}

/// Derive the container name for a mirror image: the image path after the
/// registry prefix, with slashes and the tag colon replaced by dashes.
/// `localhost:5000/mirror-packages/centos-repo:7.9.2009` names its
/// container `centos-repo-7.9.2009`.
pub fn container_name(registry: &str, image: &str) -> String {
    let path = match image.strip_prefix(registry).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => rest,
        // Foreign registry prefix: fall back to the last path segment.
        None => image.rsplit('/').next().unwrap_or(image),
    };
    path.replace(['/', ':'], "-")
}

/// Outcome of resolving a mirror to a serving container. `Unavailable`
/// covers both "mirror image not present locally" and "container started
/// but exposed no address"; callers treat it as skip-this-mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorAddress {
    Resolved(IpAddr),
    Unavailable,
}

impl MirrorAddress {
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Self::Resolved(ip) => Some(*ip),
            Self::Unavailable => None,
        }
    }
}

/// A mirror descriptor paired with the address it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMirror {
    pub descriptor: MirrorDescriptor,
    pub address: MirrorAddress,
}

impl ResolvedMirror {
    pub fn new(descriptor: MirrorDescriptor, address: MirrorAddress) -> Self {
        Self {
            descriptor,
            address,
        }
    }
}
