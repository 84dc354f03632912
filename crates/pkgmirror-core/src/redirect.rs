use pkgmirror_schema::ResolvedMirror;
use std::net::IpAddr;

/// Hostname-to-address pairs for every reachable mirror, in descriptor
/// order then hostname-list order. Unresolved mirrors contribute
/// nothing.
pub fn emit(mirrors: &[ResolvedMirror]) -> Vec<(String, IpAddr)> {
    let mut pairs = Vec::new();
    for mirror in mirrors {
        let Some(ip) = mirror.address.ip() else {
            continue;
        };
        for host in &mirror.descriptor.hostnames {
            pairs.push((host.clone(), ip));
        }
    }
    pairs
}

/// The `--add-host` tokens a client `docker run` needs so package-manager
/// lookups resolve to the local mirrors.
pub fn add_host_args(mirrors: &[ResolvedMirror]) -> Vec<String> {
    emit(mirrors)
        .into_iter()
        .flat_map(|(host, ip)| ["--add-host".to_owned(), format!("{host}:{ip}")])
        .collect()
}
