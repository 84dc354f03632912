use super::{report_unavailable, spin_done, spinner, EXIT_SUCCESS};
use pkgmirror_core::{redirect, MirrorController};
use pkgmirror_runtime::wait_for_mirrors;
use pkgmirror_schema::ImageReference;

/// `start` with the add-host rendering: the printed tokens go straight
/// into a client `docker run`.
pub fn run(
    controller: &MirrorController<'_>,
    reference: &ImageReference,
    strict_local: bool,
) -> Result<u8, String> {
    let mirrors = controller.start(reference).map_err(|e| e.to_string())?;

    let pb = spinner("waiting for mirrors to accept connections...");
    let _ = wait_for_mirrors(&mirrors);
    spin_done(&pb, &format!("{} mirror(s) up", mirrors.len()));

    let unavailable = report_unavailable(&mirrors);
    if strict_local && !unavailable.is_empty() {
        return Err(format!(
            "local mirror(s) not available: {}",
            unavailable.join(", ")
        ));
    }

    println!("{}", redirect::add_host_args(&mirrors).join(" "));
    Ok(EXIT_SUCCESS)
}
