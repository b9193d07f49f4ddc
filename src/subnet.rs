//! IPv4 subnet arithmetic.
use std::net::Ipv4Addr;

/// Compute the broadcast address of the subnet `ip` belongs to: every host
/// bit of `ip` set to one.
#[inline]
#[must_use]
pub fn broadcast(ip: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) | !u32::from(mask))
}
