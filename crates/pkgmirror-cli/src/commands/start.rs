use super::{json_pretty, report_unavailable, spin_done, spinner, EXIT_SUCCESS};
use pkgmirror_core::{redirect, MirrorController};
use pkgmirror_runtime::wait_for_mirrors;
use pkgmirror_schema::ImageReference;

pub fn run(
    controller: &MirrorController<'_>,
    reference: &ImageReference,
    add_hosts: bool,
    strict_local: bool,
) -> Result<u8, String> {
    let mirrors = controller.start(reference).map_err(|e| e.to_string())?;

    let pb = spinner("waiting for mirrors to accept connections...");
    let failures = wait_for_mirrors(&mirrors);
    spin_done(
        &pb,
        &format!("checked {} mirror(s), {failures} refused probe(s)", mirrors.len()),
    );

    let unavailable = report_unavailable(&mirrors);
    if strict_local && !unavailable.is_empty() {
        return Err(format!(
            "local mirror(s) not available: {}",
            unavailable.join(", ")
        ));
    }

    if add_hosts {
        println!("{}", redirect::add_host_args(&mirrors).join(" "));
    } else {
        println!("{}", json_pretty(&MirrorController::address_map(&mirrors))?);
    }
    Ok(EXIT_SUCCESS)
}
