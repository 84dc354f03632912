use super::{json_pretty, EXIT_SUCCESS};
use pkgmirror_core::MirrorController;

pub fn run(controller: &MirrorController<'_>) -> Result<u8, String> {
    let mirrors = controller.running_mirrors().map_err(|e| e.to_string())?;
    println!("{}", json_pretty(&mirrors)?);
    Ok(EXIT_SUCCESS)
}
