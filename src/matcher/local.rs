//! Local and private network host detection.

use ipnet::Ipv4Net;
use once_cell::sync::Lazy;
use std::net::Ipv4Addr;

/// Loopback and private IPv4 ranges that always route directly.
static LOCAL_NETS: Lazy<Vec<Ipv4Net>> = Lazy::new(|| {
    ["127.0.0.0/8", "10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16"]
        .iter()
        .filter_map(|cidr| cidr.parse().ok())
        .collect()
});

/// Check whether a host is local and must never be proxied.
///
/// A host is local if it has no dot, ends with `.local`, or its leading
/// numeric labels fall inside a loopback or private IPv4 range. Only the
/// leading labels are inspected, so `10.0.0.1` and `192.168.1.1` are local
/// while `172.15.0.1` is not.
///
/// The host must already be lowercase.
///
/// # Example
/// ```
/// use k2pac::is_local_host;
///
/// assert!(is_local_host("localhost"));
/// assert!(is_local_host("printer.local"));
/// assert!(is_local_host("172.16.0.1"));
/// assert!(!is_local_host("8.8.8.8"));
/// ```
pub fn is_local_host(host: &str) -> bool {
    if !host.contains('.') || host.ends_with(".local") {
        return true;
    }

    match leading_ipv4(host) {
        Some(addr) => LOCAL_NETS.iter().any(|net| net.contains(&addr)),
        None => false,
    }
}

/// Build an address from the leading numeric labels, zero-filling the rest.
///
/// Returns `None` when the first label is not an octet.
fn leading_ipv4(host: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut count = 0;

    for (slot, label) in octets.iter_mut().zip(host.split('.')) {
        match label.parse::<u8>() {
            Ok(v) if label.bytes().all(|b| b.is_ascii_digit()) => {
                *slot = v;
                count += 1;
            }
            _ => break,
        }
    }

    (count > 0).then_some(Ipv4Addr::from(octets))
}
