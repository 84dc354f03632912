use crate::controller::MirrorConfig;
use crate::family::DistroFamily;
use crate::CoreError;
use pkgmirror_runtime::ContainerEngine;
use pkgmirror_schema::MirrorDescriptor;
use tracing::{debug, warn};

/// CentOS point releases, canonical string to minor-version alias.
/// Lexicographic max is a valid "newest" because the trailing build
/// dates increase monotonically with time.
const CENTOS_RELEASES: &[(&str, &str)] = &[
    ("7.0.1406", "7.0"),
    ("7.1.1503", "7.1"),
    ("7.2.1511", "7.2"),
    ("7.3.1611", "7.3"),
    ("7.4.1708", "7.4"),
    ("7.5.1804", "7.5"),
    ("7.6.1810", "7.6"),
    ("7.7.1908", "7.7"),
    ("7.8.2003", "7.8"),
    ("7.9.2009", "7.9"),
    ("8.0.1905", "8.0"),
    ("8.1.1911", "8.1"),
    ("8.2.2004", "8.2"),
    ("8.3.2011", "8.3"),
    ("8.4.2105", "8.4"),
];

/// AlmaLinux builds carry a full date suffix; a minor alias selects the
/// newest dated build of that minor.
const ALMA_RELEASES: &[(&str, &str)] = &[
    ("8.4-20210729", "8.4"),
    ("8.5-20211109", "8.5"),
    ("8.5-20220124", "8.5"),
    ("8.6-20220706", "8.6"),
    ("8.7-20221111", "8.7"),
    ("9.0-20220706", "9.0"),
    ("9.0-20221102", "9.0"),
    ("9.1-20221201", "9.1"),
    ("9.1-20230222", "9.1"),
];

const EPEL_HOSTS: &[&str] = &["mirrors.fedoraproject.org"];

/// Enterprise Linux family: centos and almalinux share the mirror layout
/// and the EPEL sidecar, differing only in release table, registry path,
/// and upstream hostnames.
pub struct EnterpriseLinux {
    name: &'static str,
    repo: &'static str,
    hosts: &'static [&'static str],
    releases: &'static [(&'static str, &'static str)],
}

pub static CENTOS: EnterpriseLinux = EnterpriseLinux {
    name: "centos",
    repo: "centos-repo",
    hosts: &["mirrorlist.centos.org"],
    releases: CENTOS_RELEASES,
};

pub static ALMALINUX: EnterpriseLinux = EnterpriseLinux {
    name: "almalinux",
    repo: "almalinux-repo",
    hosts: &["mirrors.almalinux.org"],
    releases: ALMA_RELEASES,
};

impl DistroFamily for EnterpriseLinux {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, family: &str) -> bool {
        family == self.name
    }

    fn resolve_version(&self, version: &str) -> String {
        let version = version.trim();
        if self.releases.iter().any(|(canonical, _)| *canonical == version) {
            return version.to_owned();
        }
        let best = if version.is_empty() || version == "latest" {
            self.releases.iter().map(|(canonical, _)| *canonical).max()
        } else {
            self.releases
                .iter()
                .filter(|(_, alias)| alias.starts_with(version))
                .map(|(canonical, _)| *canonical)
                .max()
        };
        match best {
            Some(canonical) => canonical.to_owned(),
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
        engine: &dyn ContainerEngine,
    ) -> Result<Vec<MirrorDescriptor>, CoreError> {
        let mut mirrors = vec![MirrorDescriptor::new(
            &config.registry,
            self.repo,
            canonical,
            self.hosts,
        )];
        if config.epel {
            mirrors.push(epel_descriptor(canonical, config, engine)?);
        }
        Ok(mirrors)
    }
}

/// Choose the EPEL sidecar image closest in time to a canonical release.
///
/// All locally tagged `*/epel-repo:*` images are candidates; each tag's
/// trailing date code is compared against the release's own: the smallest
/// code at or after the target wins, otherwise the largest code before
/// it. Among equal codes the lexicographically first image wins (sorted
/// candidate order). With no candidates at all the release's major
/// version is used as the tag, which will simply be reported unavailable
/// if nothing provides it.
fn epel_descriptor(
    canonical: &str,
    config: &MirrorConfig,
    engine: &dyn ContainerEngine,
) -> Result<MirrorDescriptor, CoreError> {
    let target = date_code(canonical).unwrap_or(0);
    let mut candidates: Vec<(u32, String)> = engine
        .image_tags()?
        .into_iter()
        .filter(|image| image.contains("/epel-repo:"))
        .filter_map(|image| date_code(&image).map(|code| (code, image)))
        .collect();
    candidates.sort();

    let image = match pick_epel(&candidates, target) {
        Some(image) => {
            debug!(code = target, image, "selected epel mirror");
            image.to_owned()
        }
        None => {
            let major = canonical.split(['.', '-']).next().unwrap_or(canonical);
            format!("{}/epel-repo:{major}", config.registry)
        }
    };

    Ok(MirrorDescriptor::for_image(
        &config.registry,
        &image,
        EPEL_HOSTS.iter().map(|h| (*h).to_owned()).collect(),
    ))
}

/// `candidates` must be sorted. Smallest at-or-after match, else largest
/// before-match.
fn pick_epel(candidates: &[(u32, String)], target: u32) -> Option<&str> {
    let at_or_after = candidates.iter().find(|(code, _)| *code >= target);
    let before = candidates.iter().rev().find(|(code, _)| *code < target);
    at_or_after.or(before).map(|(_, image)| image.as_str())
}

/// The trailing digit run of a release or tag, as a YYMM date code.
/// Full `YYYYMMDD` suffixes (AlmaLinux) are reduced to their YYMM part.
fn date_code(text: &str) -> Option<u32> {
    let tail: Vec<char> = text
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect();
    if tail.is_empty() {
        return None;
    }
    let digits: String = tail.into_iter().rev().collect();
    let code = if digits.len() >= 8 {
        &digits[2..6]
    } else {
        digits.as_str()
    };
    code.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgmirror_runtime::MockEngine;

    #[test]
    fn centos_major_resolves_to_newest_point_release() {
        assert_eq!(CENTOS.resolve_version("7"), "7.9.2009");
        assert_eq!(CENTOS.resolve_version("8"), "8.4.2105");
    }

    #[test]
    fn centos_minor_resolves_exactly() {
        assert_eq!(CENTOS.resolve_version("7.3"), "7.3.1611");
        assert_eq!(CENTOS.resolve_version("8.1"), "8.1.1911");
    }

    #[test]
    fn canonical_version_passes_through() {
        assert_eq!(CENTOS.resolve_version("7.9.2009"), "7.9.2009");
        assert_eq!(ALMALINUX.resolve_version("9.1-20230222"), "9.1-20230222");
    }

    #[test]
    fn latest_and_empty_pick_overall_newest() {
        assert_eq!(CENTOS.resolve_version(""), "8.4.2105");
        assert_eq!(CENTOS.resolve_version("latest"), "8.4.2105");
    }

    #[test]
    fn alma_minor_picks_newest_dated_build() {
        assert_eq!(ALMALINUX.resolve_version("9.1"), "9.1-20230222");
        assert_eq!(ALMALINUX.resolve_version("8.5"), "8.5-20220124");
    }

    #[test]
    fn unknown_version_degrades_unchanged() {
        assert_eq!(CENTOS.resolve_version("6"), "6");
        assert_eq!(ALMALINUX.resolve_version("10.0"), "10.0");
    }

    #[test]
    fn resolution_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(CENTOS.resolve_version("7"), "7.9.2009");
        }
    }

    #[test]
    fn date_code_of_centos_release() {
        assert_eq!(date_code("7.9.2009"), Some(2009));
        assert_eq!(date_code("8.4.2105"), Some(2105));
    }

    #[test]
    fn date_code_reduces_full_dates() {
        assert_eq!(date_code("9.1-20230222"), Some(2302));
        assert_eq!(date_code("8.5-20211109"), Some(2111));
    }

    #[test]
    fn date_code_of_tagged_image() {
        assert_eq!(date_code("localhost:5000/mirror-packages/epel-repo:8.x.2401"), Some(2401));
        assert_eq!(date_code("no-digits-here"), None);
    }

    #[test]
    fn epel_picks_largest_before_when_nothing_at_or_after() {
        let candidates = vec![
            (2309, "x/epel-repo:9.x.2309".to_owned()),
            (2401, "x/epel-repo:9.x.2401".to_owned()),
        ];
        assert_eq!(pick_epel(&candidates, 2402), Some("x/epel-repo:9.x.2401"));
    }

    #[test]
    fn epel_picks_smallest_at_or_after_when_available() {
        let candidates = vec![
            (2309, "x/epel-repo:9.x.2309".to_owned()),
            (2403, "x/epel-repo:9.x.2403".to_owned()),
        ];
        assert_eq!(pick_epel(&candidates, 2402), Some("x/epel-repo:9.x.2403"));
    }

    #[test]
    fn epel_exact_match_wins() {
        let candidates = vec![
            (2309, "x/epel-repo:9.x.2309".to_owned()),
            (2402, "x/epel-repo:9.x.2402".to_owned()),
            (2403, "x/epel-repo:9.x.2403".to_owned()),
        ];
        assert_eq!(pick_epel(&candidates, 2402), Some("x/epel-repo:9.x.2402"));
    }

    #[test]
    fn epel_no_candidates_is_none() {
        assert_eq!(pick_epel(&[], 2402), None);
    }

    #[test]
    fn epel_descriptor_from_local_tags() {
        let engine = MockEngine::new();
        let config = MirrorConfig::default();
        engine.add_image("localhost:5000/mirror-packages/epel-repo:7.x.1908", "sha256:a");
        engine.add_image("localhost:5000/mirror-packages/epel-repo:7.x.2009", "sha256:b");
        engine.add_image("localhost:5000/mirror-packages/centos-repo:7.9.2009", "sha256:c");

        let d = epel_descriptor("7.9.2009", &config, &engine).unwrap();

        assert_eq!(d.mirror_image, "localhost:5000/mirror-packages/epel-repo:7.x.2009");
        assert_eq!(d.container_name, "epel-repo-7.x.2009");
        assert_eq!(d.hostnames, vec!["mirrors.fedoraproject.org"]);
    }

    #[test]
    fn epel_descriptor_without_tags_falls_back_to_major() {
        let engine = MockEngine::new();
        let config = MirrorConfig::default();
        let d = epel_descriptor("9.1-20230222", &config, &engine).unwrap();
        assert_eq!(d.mirror_image, "localhost:5000/mirror-packages/epel-repo:9");
    }

    #[test]
    fn descriptors_order_primary_then_epel() {
        let engine = MockEngine::new();
        let config = MirrorConfig {
            epel: true,
            ..MirrorConfig::default()
        };
        let mirrors = CENTOS.descriptors("7.9.2009", &config, &engine).unwrap();
        assert_eq!(mirrors.len(), 2);
        assert!(mirrors[0].mirror_image.contains("/centos-repo:"));
        assert!(mirrors[1].mirror_image.contains("/epel-repo:"));
    }

    #[test]
    fn descriptors_without_epel() {
        let engine = MockEngine::new();
        let config = MirrorConfig::default();
        let mirrors = ALMALINUX.descriptors("9.1-20230222", &config, &engine).unwrap();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(
            mirrors[0].mirror_image,
            "localhost:5000/mirror-packages/almalinux-repo:9.1-20230222"
        );
        assert_eq!(mirrors[0].hostnames, vec!["mirrors.almalinux.org"]);
    }
}
