use super::{json_pretty, EXIT_SUCCESS};
use pkgmirror_core::MirrorController;
use pkgmirror_schema::ImageReference;

pub fn run(controller: &MirrorController<'_>, reference: &ImageReference) -> Result<u8, String> {
    let outcomes = controller.stop(reference).map_err(|e| e.to_string())?;
    println!("{}", json_pretty(&outcomes)?);
    Ok(EXIT_SUCCESS)
}
