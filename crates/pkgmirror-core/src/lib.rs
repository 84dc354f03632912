//! Mirror resolution for pkgmirror.
//!
//! This crate ties the data model and the container engine together into
//! the `MirrorController` — the API that answers which sidecar containers
//! must be running to serve package-manager traffic for an image, brings
//! them up or down, and emits the host redirections a client container
//! needs. Distro knowledge lives in one `DistroFamily` implementation per
//! family, selected through a registry.

pub mod controller;
pub mod deb;
pub mod el;
pub mod family;
pub mod overlay;
pub mod redirect;
pub mod suse;

pub use controller::{MirrorConfig, MirrorController, MirrorFact, MirrorFacts, DEFAULT_REGISTRY};
pub use family::{family_for, DistroFamily};
pub use redirect::{add_host_args, emit};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown distro family: '{0}'")]
    UnknownFamily(String),
    #[error("schema error: {0}")]
    Schema(#[from] pkgmirror_schema::SchemaError),
    #[error("runtime error: {0}")]
    Runtime(#[from] pkgmirror_runtime::RuntimeError),
}
