use pkgmirror_schema::{container_name, MirrorDescriptor, OverrideMap};

/// Merge the user's override section for `key` into the catalog output.
///
/// Only the primary descriptor is eligible: each present, non-empty
/// field replaces that single field and nothing else. When the catalog
/// produced nothing but the section names an image, a one-element list
/// is synthesized with a hostname derived from the image's first path
/// segment.
pub fn apply(
    key: &str,
    mut descriptors: Vec<MirrorDescriptor>,
    overrides: &OverrideMap,
) -> Vec<MirrorDescriptor> {
    let Some(entry) = overrides.get(key) else {
        return descriptors;
    };

    if let Some(primary) = descriptors.first_mut() {
        if let Some(cname) = &entry.cname {
            primary.container_name = cname.clone();
        }
        if let Some(image) = &entry.image {
            primary.mirror_image = image.clone();
        }
        if let Some(hosts) = &entry.hosts {
            primary.hostnames = hosts.clone();
        }
        if let Some(mount) = &entry.mount {
            primary.mount = Some(mount.clone());
        }
    } else if let Some(image) = &entry.image {
        let default_host = format!("{}.org", image.split('/').next().unwrap_or(image));
        descriptors.push(MirrorDescriptor {
            container_name: entry
                .cname
                .clone()
                .unwrap_or_else(|| container_name("", image)),
            mirror_image: image.clone(),
            hostnames: entry.hosts.clone().unwrap_or_else(|| vec![default_host]),
            mount: entry.mount.clone(),
        });
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgmirror_schema::{parse_overrides_str, OverrideEntry};
    use std::path::PathBuf;

    fn catalog_default() -> Vec<MirrorDescriptor> {
        vec![MirrorDescriptor::new(
            "localhost:5000/mirror-packages",
            "centos-repo",
            "7.9.2009",
            &["mirrorlist.centos.org"],
        )]
    }

    #[test]
    fn no_section_leaves_descriptors_untouched() {
        let overrides = OverrideMap::new();
        let out = apply("centos:7.9.2009", catalog_default(), &overrides);
        assert_eq!(out, catalog_default());
    }

    #[test]
    fn mount_only_section_keeps_other_defaults() {
        let overrides =
            parse_overrides_str("[centos:7.9.2009]\nmount=/data/x\n").unwrap();
        let out = apply("centos:7.9.2009", catalog_default(), &overrides);
        let primary = &out[0];
        assert_eq!(primary.container_name, "centos-repo-7.9.2009");
        assert_eq!(
            primary.mirror_image,
            "localhost:5000/mirror-packages/centos-repo:7.9.2009"
        );
        assert_eq!(primary.hostnames, vec!["mirrorlist.centos.org"]);
        assert_eq!(primary.mount, Some(PathBuf::from("/data/x")));
    }

    #[test]
    fn full_section_replaces_every_field() {
        let overrides = parse_overrides_str(
            "[centos:7.9.2009]\n\
             cname=my-mirror\n\
             image=mirror.example/centos-repo:7\n\
             hosts=a.example.org,b.example.org\n\
             mount=/data/y\n",
        )
        .unwrap();
        let out = apply("centos:7.9.2009", catalog_default(), &overrides);
        let primary = &out[0];
        assert_eq!(primary.container_name, "my-mirror");
        assert_eq!(primary.mirror_image, "mirror.example/centos-repo:7");
        assert_eq!(primary.hostnames, vec!["a.example.org", "b.example.org"]);
        assert_eq!(primary.mount, Some(PathBuf::from("/data/y")));
    }

    #[test]
    fn only_primary_descriptor_is_eligible() {
        let mut descriptors = catalog_default();
        descriptors.push(MirrorDescriptor::for_image(
            "localhost:5000/mirror-packages",
            "localhost:5000/mirror-packages/epel-repo:7.x.2009",
            vec!["mirrors.fedoraproject.org".to_owned()],
        ));
        let overrides = parse_overrides_str("[centos:7.9.2009]\nhosts=h.example\n").unwrap();
        let out = apply("centos:7.9.2009", descriptors, &overrides);
        assert_eq!(out[0].hostnames, vec!["h.example"]);
        assert_eq!(out[1].hostnames, vec!["mirrors.fedoraproject.org"]);
    }

    #[test]
    fn image_section_synthesizes_descriptor_when_catalog_is_empty() {
        let overrides =
            parse_overrides_str("[custom:1]\nimage=my-mirror/custom-repo:1\n").unwrap();
        let out = apply("custom:1", Vec::new(), &overrides);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].mirror_image, "my-mirror/custom-repo:1");
        assert_eq!(out[0].container_name, "custom-repo-1");
        assert_eq!(out[0].hostnames, vec!["my-mirror.org"]);
    }

    #[test]
    fn section_without_image_synthesizes_nothing() {
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "custom:1".to_owned(),
            OverrideEntry {
                mount: Some(PathBuf::from("/data/z")),
                ..OverrideEntry::default()
            },
        );
        assert!(apply("custom:1", Vec::new(), &overrides).is_empty());
    }
}
