use super::EXIT_SUCCESS;
use pkgmirror_core::MirrorController;
use pkgmirror_schema::ImageReference;

pub fn run(controller: &MirrorController<'_>, reference: &ImageReference) -> Result<u8, String> {
    let canonical = controller
        .canonical_reference(reference)
        .map_err(|e| e.to_string())?;
    println!("{canonical}");
    Ok(EXIT_SUCCESS)
}
