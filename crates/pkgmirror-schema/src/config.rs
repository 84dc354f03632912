use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One `[family:version]` section of the override file. Only present,
/// non-empty fields override the catalog-computed defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideEntry {
    pub cname: Option<String>,
    pub image: Option<String>,
    pub hosts: Option<Vec<String>>,
    pub mount: Option<PathBuf>,
}

impl OverrideEntry {
    pub fn is_empty(&self) -> bool {
        self.cname.is_none() && self.image.is_none() && self.hosts.is_none() && self.mount.is_none()
    }
}

/// Override sections keyed by canonical `family:version`.
pub type OverrideMap = BTreeMap<String, OverrideEntry>;

/// `$XDG_CONFIG_HOME/docker_mirror.ini`, falling back to
/// `~/.config/docker_mirror.ini`.
pub fn default_config_path() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join("docker_mirror.ini");
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("docker_mirror.ini");
    }
    PathBuf::from("docker_mirror.ini")
}

pub fn load_overrides(path: &Path) -> Result<OverrideMap, SchemaError> {
    let content = fs::read_to_string(path)?;
    parse_overrides_str(&content)
}

/// Parse the ini-style override document:
///
/// ```ini
/// [centos:7.9.2009]
/// mount = /data/centos
/// hosts = mirrorlist.centos.org, mirror.centos.org
/// ```
///
/// Sections may repeat; later keys win. Keys other than
/// `cname`/`image`/`hosts`/`mount` are ignored, matching the tolerant
/// reader this file format has always had. Empty values count as absent.
pub fn parse_overrides_str(input: &str) -> Result<OverrideMap, SchemaError> {
    let mut map = OverrideMap::new();
    let mut section: Option<String> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            if name.is_empty() {
                return Err(SchemaError::InvalidIni {
                    line: idx + 1,
                    text: raw.to_owned(),
                });
            }
            map.entry(name.to_owned()).or_default();
            section = Some(name.to_owned());
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(SchemaError::InvalidIni {
                line: idx + 1,
                text: raw.to_owned(),
            });
        };
        let Some(ref section) = section else {
            return Err(SchemaError::InvalidIni {
                line: idx + 1,
                text: raw.to_owned(),
            });
        };
        let key = key.trim();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let entry = map.entry(section.clone()).or_default();
        match key {
            "cname" => entry.cname = Some(value.to_owned()),
            "image" => entry.image = Some(value.to_owned()),
            "hosts" => {
                let hosts: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_owned)
                    .collect();
                if !hosts.is_empty() {
                    entry.hosts = Some(hosts);
                }
            }
            "mount" => entry.mount = Some(PathBuf::from(value)),
            _ => {}
        }
    }

    Ok(map)
}
