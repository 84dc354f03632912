use super::{json_pretty, EXIT_SUCCESS};
use pkgmirror_core::MirrorController;
use pkgmirror_schema::ImageReference;
use std::collections::BTreeMap;

pub fn run(controller: &MirrorController<'_>, reference: &ImageReference) -> Result<u8, String> {
    let mirrors = controller.show(reference).map_err(|e| e.to_string())?;
    let detail: BTreeMap<String, serde_json::Value> = mirrors
        .into_iter()
        .map(|m| {
            (
                m.descriptor.container_name,
                serde_json::json!({
                    "image": m.descriptor.mirror_image,
                    "hosts": m.descriptor.hostnames,
                    "ip": m.address.ip().map(|ip| ip.to_string()),
                }),
            )
        })
        .collect();
    println!("{}", json_pretty(&detail)?);
    Ok(EXIT_SUCCESS)
}
