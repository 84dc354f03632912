use super::{json_pretty, EXIT_SUCCESS};
use std::collections::BTreeMap;

/// The rsync helpers that populate each family's mirror tree live
/// outside this tool; this prints where a caller finds them.
pub fn run() -> Result<u8, String> {
    let scripts: BTreeMap<&str, &str> = [
        ("centos", "scripts/centos-repo-sync.sh"),
        ("almalinux", "scripts/almalinux-repo-sync.sh"),
        ("epel", "scripts/epel-repo-sync.sh"),
        ("opensuse", "scripts/opensuse-repo-sync.sh"),
        ("ubuntu", "scripts/ubuntu-repo-sync.sh"),
        ("debian", "scripts/debian-repo-sync.sh"),
    ]
    .into_iter()
    .collect();
    println!("{}", json_pretty(&scripts)?);
    Ok(EXIT_SUCCESS)
}
