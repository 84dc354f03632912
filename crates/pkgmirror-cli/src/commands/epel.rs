use super::EXIT_SUCCESS;
use pkgmirror_core::MirrorController;
use pkgmirror_schema::ImageReference;

pub fn run(controller: &MirrorController<'_>, reference: &ImageReference) -> Result<u8, String> {
    let descriptors = controller.descriptors(reference).map_err(|e| e.to_string())?;
    let epel = descriptors
        .iter()
        .find(|d| d.mirror_image.contains("/epel-repo:"))
        .ok_or_else(|| format!("no EPEL mirror for '{reference}'"))?;
    println!("{}", epel.mirror_image);
    Ok(EXIT_SUCCESS)
}
