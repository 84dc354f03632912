//! Data model and file parsing for pkgmirror.
//!
//! This crate holds the pure data layer: image references, mirror
//! descriptors, the tagged mirror address result, the ini override
//! configuration, and host OS / Dockerfile detection. It performs no
//! subprocess I/O; everything observable about the container engine
//! lives in `pkgmirror-runtime`.

pub mod config;
pub mod detect;
pub mod types;

pub use config::{default_config_path, load_overrides, parse_overrides_str, OverrideEntry, OverrideMap};
pub use detect::{dockerfile_reference, host_reference, parse_dockerfile_from, parse_os_release};
pub use types::{container_name, ImageReference, MirrorAddress, MirrorDescriptor, ResolvedMirror};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config line {line}: '{text}'")]
    InvalidIni { line: usize, text: String },
    #[error("invalid image reference: '{0}'")]
    InvalidReference(String),
    #[error("no FROM line found in '{0}'")]
    NoFromLine(String),
    #[error("could not detect host OS from {0}")]
    UndetectedHost(String),
}
