//! Network interface discovery.
use crate::{enet::MacAddr, Error, Result};
use ipnetwork::IpNetwork;
use std::io;
use std::net::Ipv4Addr;

/// A snapshot of one host network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    /// OS interface index, 0 when unknown.
    pub index: u32,
    /// `None` for devices without a 48-bit link-layer address, e.g. tunnels.
    pub hardware_addr: Option<MacAddr>,
    pub flags: Flags,
    /// Bound addresses with their netmasks, displayed in CIDR form.
    pub bindings: Vec<IpNetwork>,
}

impl NetworkInterface {
    #[must_use]
    pub fn new(name: impl Into<String>, flags: Flags) -> Self {
        Self {
            name: name.into(),
            index: 0,
            hardware_addr: None,
            flags,
            bindings: Vec::new(),
        }
    }

    /// IPv4 bindings as (address, mask) pairs. Everything else is skipped.
    pub fn ipv4_bindings(&self) -> impl Iterator<Item = (Ipv4Addr, Ipv4Addr)> + '_ {
        self.bindings.iter().filter_map(|binding| match binding {
            IpNetwork::V4(net) => Some((net.ip(), net.mask())),
            IpNetwork::V6(_) => None,
        })
    }

    /// Whether GARP should be sent on this interface.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        !self.flags.loopback && self.flags.up
    }
}

/// The interface flags discovery cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// Administratively up.
    pub up: bool,
    pub loopback: bool,
}

impl Flags {
    #[must_use]
    pub const fn new(up: bool, loopback: bool) -> Self {
        Self { up, loopback }
    }
}

/// Something that can list the host's interfaces.
pub trait InterfaceSource {
    /// Enumerate every interface, in the order the OS reports them.
    ///
    /// # Errors
    ///
    /// Fails when the OS cannot report its interfaces.
    fn interfaces(&self) -> io::Result<Vec<NetworkInterface>>;
}

/// List the interfaces GARP should be sent on: not loopback and
/// administratively up, in enumeration order.
///
/// # Errors
///
/// Fails with [`Error::Enumerate`] when the source cannot enumerate
/// interfaces.
pub fn list_eligible_interfaces<S: InterfaceSource + ?Sized>(
    source: &S,
) -> Result<Vec<NetworkInterface>> {
    let ifaces = source.interfaces().map_err(Error::Enumerate)?;
    Ok(ifaces
        .into_iter()
        .filter(|iface| {
            if !iface.is_eligible() {
                tracing::trace!(interface = %iface.name, flags = ?iface.flags, "skipping netdev");
                return false;
            }
            match iface.hardware_addr {
                Some(mac) => tracing::debug!(interface = %iface.name, hwaddr = %mac, "found netdev"),
                None => tracing::debug!(interface = %iface.name, "found netdev without hwaddr"),
            }
            true
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{list_eligible_interfaces, Flags, InterfaceSource, NetworkInterface};
    use crate::Error;
    use std::error::Error as StdError;
    use std::io;
    use std::net::Ipv4Addr;

    struct Fixed(Vec<NetworkInterface>);

    impl InterfaceSource for Fixed {
        fn interfaces(&self) -> io::Result<Vec<NetworkInterface>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl InterfaceSource for Broken {
        fn interfaces(&self) -> io::Result<Vec<NetworkInterface>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn discovery_keeps_only_up_non_loopback() -> Result<(), Box<dyn StdError>> {
        let source = Fixed(vec![
            NetworkInterface::new("lo", Flags::new(true, true)),
            NetworkInterface::new("eth1", Flags::new(false, false)),
            NetworkInterface::new("eth0", Flags::new(true, false)),
        ]);
        let eligible = list_eligible_interfaces(&source)?;
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].name, "eth0");
        Ok(())
    }

    #[test]
    fn discovery_excludes_down_loopback() -> Result<(), Box<dyn StdError>> {
        let source = Fixed(vec![NetworkInterface::new("lo", Flags::new(false, true))]);
        assert!(list_eligible_interfaces(&source)?.is_empty());
        Ok(())
    }

    #[test]
    fn discovery_preserves_enumeration_order() -> Result<(), Box<dyn StdError>> {
        let names = ["wlan0", "eth0", "br0"];
        let source = Fixed(
            names
                .iter()
                .map(|name| NetworkInterface::new(*name, Flags::new(true, false)))
                .collect(),
        );
        let eligible = list_eligible_interfaces(&source)?;
        let found: Vec<&str> = eligible.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(found, names);
        Ok(())
    }

    #[test]
    fn discovery_failure_is_reported() {
        let result = list_eligible_interfaces(&Broken);
        assert!(matches!(result, Err(Error::Enumerate(_))));
    }

    #[test]
    fn ipv4_bindings_skip_ipv6() -> Result<(), Box<dyn StdError>> {
        let mut iface = NetworkInterface::new("eth0", Flags::new(true, false));
        iface.bindings.push("fe80::1/64".parse()?);
        iface.bindings.push("10.0.0.5/8".parse()?);

        let v4: Vec<_> = iface.ipv4_bindings().collect();
        assert_eq!(
            v4,
            vec![(Ipv4Addr::new(10, 0, 0, 5), Ipv4Addr::new(255, 0, 0, 0))]
        );
        Ok(())
    }

    #[test]
    fn ipv4_bindings_keep_host_address_and_mask() -> Result<(), Box<dyn StdError>> {
        let mut iface = NetworkInterface::new("eth0", Flags::new(true, false));
        iface.bindings.push("172.16.4.9/20".parse()?);

        let v4: Vec<_> = iface.ipv4_bindings().collect();
        assert_eq!(
            v4,
            vec![(Ipv4Addr::new(172, 16, 4, 9), Ipv4Addr::new(255, 255, 240, 0))]
        );
        assert_eq!(iface.bindings[0].to_string(), "172.16.4.9/20");
        Ok(())
    }
}
