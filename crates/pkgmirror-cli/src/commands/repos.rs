use super::EXIT_SUCCESS;
use pkgmirror_core::MirrorController;
use pkgmirror_schema::ImageReference;

pub fn run(controller: &MirrorController<'_>, reference: &ImageReference) -> Result<u8, String> {
    for descriptor in controller.descriptors(reference).map_err(|e| e.to_string())? {
        println!("{}", descriptor.mirror_image);
    }
    Ok(EXIT_SUCCESS)
}
