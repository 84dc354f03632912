use super::{json_pretty, EXIT_SUCCESS};
use pkgmirror_core::{redirect, MirrorController};
use pkgmirror_schema::ImageReference;

pub fn run(
    controller: &MirrorController<'_>,
    reference: &ImageReference,
    add_hosts: bool,
) -> Result<u8, String> {
    let mirrors = controller.show(reference).map_err(|e| e.to_string())?;
    if add_hosts {
        println!("{}", redirect::add_host_args(&mirrors).join(" "));
    } else {
        println!("{}", json_pretty(&MirrorController::address_map(&mirrors))?);
    }
    Ok(EXIT_SUCCESS)
}
