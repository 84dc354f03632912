pub mod addhost;
pub mod containers;
pub mod detect;
pub mod epel;
pub mod facts;
pub mod image;
pub mod inspect;
pub mod latest;
pub mod repo;
pub mod repos;
pub mod scripts;
pub mod show;
pub mod start;
pub mod stop;

use indicatif::{ProgressBar, ProgressStyle};
use pkgmirror_schema::ResolvedMirror;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_done(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

/// Warn on stderr about mirrors that could not be served; in strict
/// `--local` mode the caller turns this into a failure instead.
pub fn report_unavailable(mirrors: &[ResolvedMirror]) -> Vec<String> {
    let unavailable: Vec<String> = mirrors
        .iter()
        .filter(|m| m.address.ip().is_none())
        .map(|m| m.descriptor.mirror_image.clone())
        .collect();
    for image in &unavailable {
        eprintln!(
            "{} mirror {} is not available locally",
            console::style("warning:").yellow().bold(),
            console::style(image).dim()
        );
    }
    unavailable
}
