use crate::controller::MirrorConfig;
use crate::family::DistroFamily;
use crate::CoreError;
use pkgmirror_runtime::ContainerEngine;
use pkgmirror_schema::MirrorDescriptor;
use tracing::warn;

/// Version/codename tables, ordered oldest to newest. The last matching
/// entry is the newest, so alias resolution never depends on
/// lexicographic quirks of the version strings themselves.
const UBUNTU_VERSIONS: &[(&str, &str)] = &[
    ("12.04", "precise"),
    ("14.04", "trusty"),
    ("16.04", "xenial"),
    ("18.04", "bionic"),
    ("19.10", "eoan"),
    ("20.04", "focal"),
    ("22.04", "jammy"),
    ("24.04", "noble"),
];

const DEBIAN_VERSIONS: &[(&str, &str)] = &[
    ("8", "jessie"),
    ("9", "stretch"),
    ("10", "buster"),
    ("11", "bullseye"),
    ("12", "bookworm"),
];

/// apt-based family: ubuntu and debian. Ubuntu additionally offers the
/// updates/universe pocket images selected by the corresponding flags.
pub struct DebianLike {
    name: &'static str,
    repo: &'static str,
    hosts: &'static [&'static str],
    versions: &'static [(&'static str, &'static str)],
    pockets: bool,
}

pub static UBUNTU: DebianLike = DebianLike {
    name: "ubuntu",
    repo: "ubuntu-repo",
    hosts: &["archive.ubuntu.com", "security.ubuntu.com"],
    versions: UBUNTU_VERSIONS,
    pockets: true,
};

pub static DEBIAN: DebianLike = DebianLike {
    name: "debian",
    repo: "debian-repo",
    hosts: &["deb.debian.org", "security.debian.org"],
    versions: DEBIAN_VERSIONS,
    pockets: false,
};

impl DistroFamily for DebianLike {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, family: &str) -> bool {
        family == self.name
    }

    fn resolve_version(&self, version: &str) -> String {
        let version = version.trim();
        if self.versions.iter().any(|(v, _)| *v == version) {
            return version.to_owned();
        }
        if let Some((v, _)) = self.versions.iter().find(|(_, codename)| *codename == version) {
            return (*v).to_owned();
        }
        let best = if version.is_empty() || version == "latest" {
            self.versions.last()
        } else {
            self.versions
                .iter()
                .filter(|(v, _)| v.starts_with(version))
                .next_back()
        };
        match best {
            Some((v, _)) => (*v).to_owned(),
            None => {
                warn!(family = self.name, version, "unknown release, using version as-is");
                version.to_owned()
            }
        }
    }

    fn descriptors(
        &self,
        canonical: &str,
        config: &MirrorConfig,
        _engine: &dyn ContainerEngine,
    ) -> Result<Vec<MirrorDescriptor>, CoreError> {
        let repo = if self.pockets && config.universe {
            format!("{}/universe", self.repo)
        } else if self.pockets && config.updates {
            format!("{}/updates", self.repo)
        } else {
            self.repo.to_owned()
        };
        Ok(vec![MirrorDescriptor::new(
            &config.registry,
            &repo,
            canonical,
            self.hosts,
        )])
    }
}
