use pkgmirror_schema::ResolvedMirror;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;
use tracing::{debug, warn};

/// Attempt ceiling for https-fronted mirrors; plain-http targets get two
/// fewer attempts since they answer quickly once up.
pub const MAX_WAIT: u32 = 6;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// AlmaLinux and EPEL mirrors front their metadata over https; everything
/// else answers on plain http.
pub fn probe_port(mirror_image: &str) -> u16 {
    if mirror_image.contains("alma") || mirror_image.contains("epel") {
        443
    } else {
        80
    }
}

fn attempts_for(port: u16) -> u32 {
    if port == 80 {
        MAX_WAIT - 2
    } else {
        MAX_WAIT
    }
}

/// Probe one address until it accepts, counting refused attempts. Worst
/// case is `attempts * (timeout + delay)`.
fn wait_for(addr: SocketAddr, attempts: u32, timeout: Duration, delay: Duration) -> u32 {
    let mut failures = 0;
    for _ in 0..attempts {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => return failures,
            Err(err) => {
                debug!(%addr, %err, "mirror not reachable yet");
                failures += 1;
                std::thread::sleep(delay);
            }
        }
    }
    failures
}

/// Wait for every resolved mirror to accept TCP connections, one host at
/// a time. Mirrors without an address are skipped. Returns the summed
/// failure count: zero only if every host connected on its first try.
pub fn wait_for_mirrors(mirrors: &[ResolvedMirror]) -> u32 {
    let mut total = 0;
    for mirror in mirrors {
        let Some(ip) = mirror.address.ip() else {
            continue;
        };
        let port = probe_port(&mirror.descriptor.mirror_image);
        let failures = wait_for(
            SocketAddr::new(ip, port),
            attempts_for(port),
            CONNECT_TIMEOUT,
            RETRY_DELAY,
        );
        if failures > 0 {
            warn!(
                container = %mirror.descriptor.container_name,
                failures,
                "mirror was slow to accept connections"
            );
        }
        total += failures;
    }
    total
}
