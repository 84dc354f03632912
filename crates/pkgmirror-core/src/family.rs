use crate::controller::MirrorConfig;
use crate::CoreError;
use pkgmirror_runtime::ContainerEngine;
use pkgmirror_schema::MirrorDescriptor;

/// One package-repo family (centos, almalinux, opensuse, ubuntu, debian).
///
/// Implementations carry the static release tables and the per-family
/// mirror layout; they are selected once per invocation through
/// [`family_for`], never by string-prefix checks at call sites.
pub trait DistroFamily: Sync {
    fn name(&self) -> &'static str;

    /// Whether this family serves the given normalized family string.
    fn matches(&self, family: &str) -> bool;

    /// Normalize a shorthand version (`7`, `8.3`, a codename, `latest`,
    /// empty) to the canonical release string. Pure: static tables and
    /// input only. Unknown versions degrade to the input unchanged, with
    /// a warning; callers must not assume normalization succeeded.
    fn resolve_version(&self, version: &str) -> String;

    /// Mirror descriptors for a canonical release, primary first. The
    /// engine is consulted only to enumerate locally tagged images (the
    /// EPEL freshness selection); no container is touched.
    fn descriptors(
        &self,
        canonical: &str,
        config: &MirrorConfig,
        engine: &dyn ContainerEngine,
    ) -> Result<Vec<MirrorDescriptor>, CoreError>;
}

static FAMILIES: &[&dyn DistroFamily] = &[
    &crate::el::CENTOS,
    &crate::el::ALMALINUX,
    &crate::suse::OPENSUSE,
    &crate::deb::UBUNTU,
    &crate::deb::DEBIAN,
];

pub fn family_for(family: &str) -> Option<&'static dyn DistroFamily> {
    FAMILIES.iter().find(|f| f.matches(family)).copied()
}
