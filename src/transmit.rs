//! Send one gratuitous ARP per IPv4 binding on each interface.
//!
//! Failures are per attempt: they are logged with the interface and the cause
//! and the pass moves on. Nothing is retried.
use crate::{
    garp::GarpFrame,
    iface::NetworkInterface,
    link::{Link, Transmit},
    Error, Result,
};
use ipnetwork::IpNetwork;
use std::net::Ipv4Addr;
use std::ops::AddAssign;

/// Outcome counts of a transmission pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub sent: usize,
    pub failed: usize,
}

impl AddAssign for Report {
    fn add_assign(&mut self, rhs: Self) {
        self.sent += rhs.sent;
        self.failed += rhs.failed;
    }
}

/// Drives frame construction and raw writes over a [`Link`].
#[derive(Debug)]
pub struct Transmitter<L> {
    link: L,
}

impl<L: Link> Transmitter<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Announce on every interface in order. One interface failing has no
    /// effect on the others.
    pub fn announce(&self, ifaces: &[NetworkInterface]) -> Report {
        let mut report = Report::default();
        for iface in ifaces {
            report += self.send_garp(iface);
        }
        tracing::debug!(sent = report.sent, failed = report.failed, "GARP pass complete");
        report
    }

    /// Announce every IPv4 binding of `iface`. Other bindings are skipped.
    pub fn send_garp(&self, iface: &NetworkInterface) -> Report {
        let mut report = Report::default();
        for binding in &iface.bindings {
            let IpNetwork::V4(net) = binding else {
                tracing::debug!(interface = %iface.name, addr = %binding, "skipping non-IPv4 address");
                continue;
            };
            let ip = net.ip();
            match self.send_one(iface, ip, net.mask()) {
                Ok(()) => report.sent += 1,
                Err(err) => {
                    tracing::error!(
                        interface = %iface.name,
                        ip = %ip,
                        error = %err,
                        cause = ?std::error::Error::source(&err).map(ToString::to_string),
                        "could not send ARP"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn send_one(&self, iface: &NetworkInterface, ip: Ipv4Addr, mask: Ipv4Addr) -> Result<()> {
        let mac = iface
            .hardware_addr
            .ok_or_else(|| Error::NoHardwareAddr(iface.name.clone()))?;
        let bytes = GarpFrame::announce(mac, ip, mask).to_bytes()?;

        let mut handle = self.link.open(iface).map_err(|source| Error::Open {
            iface: iface.name.clone(),
            source,
        })?;
        let written = handle.send(&bytes).map_err(|source| Error::Write {
            iface: iface.name.clone(),
            source,
        })?;
        if written != bytes.len() {
            return Err(Error::ShortWrite {
                iface: iface.name.clone(),
                written,
                len: bytes.len(),
            });
        }

        tracing::info!(interface = %iface.name, hwaddr = %mac, ip = %ip, "ARP sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Report, Transmitter};
    use crate::enet::MacAddr;
    use crate::iface::{Flags, NetworkInterface};
    use crate::link::{Link, Transmit};
    use std::cell::RefCell;
    use std::error::Error;
    use std::io;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        opened: Vec<String>,
        closed: usize,
        written: Vec<(String, Vec<u8>)>,
    }

    /// Records everything written, failing on the named interfaces.
    #[derive(Default)]
    struct FakeLink {
        log: Rc<RefCell<Log>>,
        refuse_open: Vec<&'static str>,
        refuse_write: Vec<&'static str>,
        short_write: Vec<&'static str>,
    }

    struct FakeHandle {
        iface: String,
        log: Rc<RefCell<Log>>,
        fail: bool,
        short: bool,
    }

    impl Link for FakeLink {
        type Handle = FakeHandle;

        fn open(&self, iface: &NetworkInterface) -> io::Result<FakeHandle> {
            if self.refuse_open.contains(&iface.name.as_str()) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "no CAP_NET_RAW"));
            }
            self.log.borrow_mut().opened.push(iface.name.clone());
            Ok(FakeHandle {
                iface: iface.name.clone(),
                log: Rc::clone(&self.log),
                fail: self.refuse_write.contains(&iface.name.as_str()),
                short: self.short_write.contains(&iface.name.as_str()),
            })
        }
    }

    impl Transmit for FakeHandle {
        fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "network is down"));
            }
            self.log
                .borrow_mut()
                .written
                .push((self.iface.clone(), frame.to_vec()));
            Ok(if self.short { frame.len() / 2 } else { frame.len() })
        }
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.log.borrow_mut().closed += 1;
        }
    }

    fn iface(name: &str, last_octet: u8, cidrs: &[&str]) -> Result<NetworkInterface, Box<dyn Error>> {
        let mut iface = NetworkInterface::new(name, Flags::new(true, false));
        iface.hardware_addr = Some(MacAddr::new(0x02, 0, 0, 0, 0, last_octet));
        for cidr in cidrs {
            iface.bindings.push(cidr.parse()?);
        }
        Ok(iface)
    }

    #[test]
    fn sends_one_frame_per_ipv4_binding() -> Result<(), Box<dyn Error>> {
        let link = FakeLink::default();
        let eth0 = iface("eth0", 1, &["192.168.1.10/24", "fe80::1/64", "10.0.0.5/8"])?;

        let report = Transmitter::new(&link).send_garp(&eth0);

        assert_eq!(report, Report { sent: 2, failed: 0 });
        let log = link.log.borrow();
        assert_eq!(log.written.len(), 2);
        assert_eq!(&log.written[0].1[38..42], &[192, 168, 1, 255]);
        assert_eq!(&log.written[1].1[28..32], &[10, 0, 0, 5]);
        assert_eq!(&log.written[1].1[38..42], &[10, 255, 255, 255]);
        Ok(())
    }

    #[test]
    fn each_handle_is_released_after_its_frame() -> Result<(), Box<dyn Error>> {
        let link = FakeLink {
            refuse_write: vec!["eth1"],
            ..FakeLink::default()
        };
        let ifaces = vec![
            iface("eth0", 1, &["192.168.1.10/24", "192.168.2.10/24"])?,
            iface("eth1", 2, &["172.16.0.2/16"])?,
        ];

        Transmitter::new(&link).announce(&ifaces);

        let log = link.log.borrow();
        assert_eq!(log.opened.len(), 3);
        assert_eq!(log.closed, 3);
        Ok(())
    }

    #[test]
    fn write_failure_does_not_stop_later_interfaces() -> Result<(), Box<dyn Error>> {
        let link = FakeLink {
            refuse_write: vec!["eth0"],
            ..FakeLink::default()
        };
        let ifaces = vec![
            iface("eth0", 1, &["192.168.1.10/24"])?,
            iface("eth1", 2, &["192.168.2.10/24"])?,
        ];

        let report = Transmitter::new(&link).announce(&ifaces);

        assert_eq!(report, Report { sent: 1, failed: 1 });
        let log = link.log.borrow();
        assert_eq!(log.written.len(), 1);
        assert_eq!(log.written[0].0, "eth1");
        Ok(())
    }

    #[test]
    fn open_failure_does_not_stop_later_interfaces() -> Result<(), Box<dyn Error>> {
        let link = FakeLink {
            refuse_open: vec!["eth0"],
            ..FakeLink::default()
        };
        let ifaces = vec![
            iface("eth0", 1, &["192.168.1.10/24", "192.168.3.10/24"])?,
            iface("eth1", 2, &["192.168.2.10/24"])?,
        ];

        let report = Transmitter::new(&link).announce(&ifaces);

        assert_eq!(report, Report { sent: 1, failed: 2 });
        assert_eq!(link.log.borrow().opened, vec!["eth1".to_string()]);
        Ok(())
    }

    #[test]
    fn short_write_counts_as_failure() -> Result<(), Box<dyn Error>> {
        let link = FakeLink {
            short_write: vec!["eth0"],
            ..FakeLink::default()
        };
        let eth0 = iface("eth0", 1, &["192.168.1.10/24"])?;

        let report = Transmitter::new(&link).send_garp(&eth0);

        assert_eq!(report, Report { sent: 0, failed: 1 });
        assert_eq!(link.log.borrow().closed, 1);
        Ok(())
    }

    #[test]
    fn interface_without_hardware_addr_never_opens_a_handle() -> Result<(), Box<dyn Error>> {
        let link = FakeLink::default();
        let mut tun0 = iface("tun0", 0, &["10.8.0.2/24"])?;
        tun0.hardware_addr = None;

        let report = Transmitter::new(&link).send_garp(&tun0);

        assert_eq!(report, Report { sent: 0, failed: 1 });
        assert!(link.log.borrow().opened.is_empty());
        Ok(())
    }

    #[test]
    fn ipv6_only_interface_sends_nothing() -> Result<(), Box<dyn Error>> {
        let link = FakeLink::default();
        let eth0 = iface("eth0", 1, &["fe80::1/64", "2001:db8::1/64"])?;

        let report = Transmitter::new(&link).send_garp(&eth0);

        assert_eq!(report, Report::default());
        assert!(link.log.borrow().opened.is_empty());
        Ok(())
    }
}
