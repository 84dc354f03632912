use super::EXIT_SUCCESS;
use pkgmirror_core::MirrorController;
use pkgmirror_schema::ImageReference;

pub fn run(controller: &MirrorController<'_>, reference: &ImageReference) -> Result<u8, String> {
    let descriptors = controller.descriptors(reference).map_err(|e| e.to_string())?;
    let primary = descriptors
        .first()
        .ok_or_else(|| format!("no mirror known for '{reference}'"))?;
    println!("{}", primary.mirror_image);
    Ok(EXIT_SUCCESS)
}
