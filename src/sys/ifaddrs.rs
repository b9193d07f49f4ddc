use crate::enet::MacAddr;
use crate::iface::{Flags, InterfaceSource, NetworkInterface};
use ipnetwork::IpNetwork;
use std::ffi::CStr;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ptr;

#[allow(clippy::cast_sign_loss)]
const IFF_UP: libc::c_uint = libc::IFF_UP as libc::c_uint;
#[allow(clippy::cast_sign_loss)]
const IFF_LOOPBACK: libc::c_uint = libc::IFF_LOOPBACK as libc::c_uint;

/// Enumerates interfaces with `getifaddrs(3)`.
///
/// `getifaddrs` reports one entry per (interface, address). Entries are
/// folded into one [`NetworkInterface`] per device, in the order devices
/// first appear. The `AF_PACKET` entry supplies the index and hardware address,
/// `AF_INET` and `AF_INET6` entries supply bindings.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> io::Result<Vec<NetworkInterface>> {
        let list = IfAddrs::new()?;
        let mut ifaces = Vec::new();

        let mut cursor = list.0;
        while !cursor.is_null() {
            // SAFETY: every node of the list stays valid until `list` is
            // dropped at the end of this function.
            let entry = unsafe { &*cursor };
            cursor = entry.ifa_next;

            // SAFETY: the name is null or NUL-terminated, and the address
            // pointers are null or point to a sockaddr of the family named in
            // their header.
            unsafe { fold_entry(&mut ifaces, entry) };
        }

        Ok(ifaces)
    }
}

/// Merge one `getifaddrs` entry into the interface it belongs to.
///
/// Addresses added with a label are reported under that label (`eth0:7`),
/// so the entry is keyed by the device part of the name.
unsafe fn fold_entry(ifaces: &mut Vec<NetworkInterface>, entry: &libc::ifaddrs) {
    if entry.ifa_name.is_null() {
        return;
    }
    let name = CStr::from_ptr(entry.ifa_name).to_string_lossy();
    let device = device_name(&name);
    let pos = match ifaces.iter().position(|iface| iface.name == device) {
        Some(pos) => pos,
        None => {
            let flags = Flags::new(
                entry.ifa_flags & IFF_UP != 0,
                entry.ifa_flags & IFF_LOOPBACK != 0,
            );
            ifaces.push(NetworkInterface::new(device, flags));
            ifaces.len() - 1
        }
    };
    let iface = &mut ifaces[pos];

    if entry.ifa_addr.is_null() {
        return;
    }
    let family = libc::c_int::from((*entry.ifa_addr).sa_family);
    match family {
        libc::AF_PACKET => {
            let ll = &*entry.ifa_addr.cast::<libc::sockaddr_ll>();
            iface.index = u32::try_from(ll.sll_ifindex).unwrap_or(0);
            if usize::from(ll.sll_halen) == 6 {
                let mut octets = [0; 6];
                octets.copy_from_slice(&ll.sll_addr[..6]);
                iface.hardware_addr = Some(MacAddr::from(octets));
            }
        }
        libc::AF_INET | libc::AF_INET6 => {
            let addr = read_ip(entry.ifa_addr, family);
            let mask = read_ip(entry.ifa_netmask, family);
            if let (Some(addr), Some(mask)) = (addr, mask) {
                match IpNetwork::with_netmask(addr, mask) {
                    Ok(binding) => iface.bindings.push(binding),
                    Err(err) => {
                        tracing::debug!(interface = %iface.name, %addr, %mask, error = %err, "skipping address");
                    }
                }
            }
        }
        _ => {}
    }
}

/// Device names cannot contain `:`; anything after it is an address label.
fn device_name(name: &str) -> &str {
    name.split_once(':').map_or(name, |(device, _)| device)
}

// The netmask's own family field is not reliable, so the address family
// decides how it is read.
unsafe fn read_ip(sa: *const libc::sockaddr, family: libc::c_int) -> Option<IpAddr> {
    if sa.is_null() {
        return None;
    }
    match family {
        libc::AF_INET => {
            let sin = &*sa.cast::<libc::sockaddr_in>();
            Some(IpAddr::V4(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))))
        }
        libc::AF_INET6 => {
            let sin6 = &*sa.cast::<libc::sockaddr_in6>();
            Some(IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
        }
        _ => None,
    }
}

/// Owns the list returned by `getifaddrs` and frees it on drop.
struct IfAddrs(*mut libc::ifaddrs);

impl IfAddrs {
    fn new() -> io::Result<Self> {
        let mut head = ptr::null_mut();
        // SAFETY: getifaddrs only writes the list head through the pointer.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(head))
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from a successful getifaddrs call.
            unsafe { libc::freeifaddrs(self.0) };
        }
    }
}
