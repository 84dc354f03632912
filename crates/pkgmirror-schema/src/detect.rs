use crate::types::ImageReference;
use crate::SchemaError;
use std::fs;
use std::path::Path;

const OS_RELEASE: &str = "/etc/os-release";

/// Detect the host's own distro as an image reference, so `docker_mirror`
/// without an image argument mirrors for the machine it runs on.
pub fn host_reference() -> Result<ImageReference, SchemaError> {
    let content = fs::read_to_string(OS_RELEASE)?;
    parse_os_release(&content).ok_or_else(|| SchemaError::UndetectedHost(OS_RELEASE.to_owned()))
}

/// Parse `ID` and `VERSION_ID` out of an os-release document. openSUSE
/// spells its family with a dash (`opensuse-leap`); image references use
/// the registry path form (`opensuse/leap`).
pub fn parse_os_release(content: &str) -> Option<ImageReference> {
    let mut id = None;
    let mut version_id = None;
    for line in content.lines() {
        let line = line.trim();
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            match key.trim() {
                "ID" => id = Some(value.to_owned()),
                "VERSION_ID" => version_id = Some(value.to_owned()),
                _ => {}
            }
        }
    }
    let family = match id?.as_str() {
        "opensuse-leap" => "opensuse/leap".to_owned(),
        "opensuse-tumbleweed" => "opensuse".to_owned(),
        other => other.to_owned(),
    };
    Some(ImageReference::new(family, version_id.unwrap_or_default()))
}

/// Derive the image reference from a Dockerfile's first `FROM` line, so
/// mirrors can be brought up for the base image a build is about to use.
pub fn dockerfile_reference(path: &Path) -> Result<ImageReference, SchemaError> {
    let content = fs::read_to_string(path)?;
    let image = parse_dockerfile_from(&content)
        .ok_or_else(|| SchemaError::NoFromLine(path.display().to_string()))?;
    ImageReference::parse(&image)
}

/// The image named by the first `FROM` instruction: `--platform` options
/// and the `AS stage` suffix are skipped.
pub fn parse_dockerfile_from(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        let Some(rest) = line
            .strip_prefix("FROM ")
            .or_else(|| line.strip_prefix("from "))
        else {
            continue;
        };
        let image = rest
            .split_whitespace()
            .find(|token| !token.starts_with("--"))?;
        return Some(image.to_owned());
    }
    None
}
