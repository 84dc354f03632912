use crate::controller::MirrorConfig;
use crate::family::DistroFamily;
use crate::CoreError;
use pkgmirror_runtime::ContainerEngine;
use pkgmirror_schema::MirrorDescriptor;
use tracing::warn;

/// Leap releases, ordered oldest to newest.
const LEAP_VERSIONS: &[&str] = &["42.2", "42.3", "15.0", "15.1", "15.2", "15.3", "15.4"];

pub struct OpenSuse {
    repo: &'static str,
    hosts: &'static [&'static str],
}

pub static OPENSUSE: OpenSuse = OpenSuse {
    repo: "opensuse-repo",
    hosts: &["download.opensuse.org"],
};

impl DistroFamily for OpenSuse {
    fn name(&self) -> &'static str {
        "opensuse"
    }

    fn matches(&self, family: &str) -> bool {
        family == "opensuse" || family == "opensuse/leap"
    }

    fn resolve_version(&self, version: &str) -> String {
        let version = version.trim();
        if LEAP_VERSIONS.contains(&version) {
            return version.to_owned();
        }
        let best = if version.is_empty() || version == "latest" {
            LEAP_VERSIONS.last()
        } else {
            LEAP_VERSIONS
                .iter()
                .filter(|v| v.starts_with(version))
                .next_back()
        };
        match best {
            Some(v) => (*v).to_owned(),
            None => {
                warn!(family = "opensuse", version, "unknown release, using version as-is");
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
        Ok(vec![MirrorDescriptor::new(
            &config.registry,
            self.repo,
            canonical,
            self.hosts,
        )])
    }
}
