//! Read and write ARP packets for Ethernet hardware and IPv4 protocol
//! addresses.
//!
//! # Standards conformance
//!
//! Follows [RFC 826](https://www.rfc-editor.org/rfc/rfc826.html). Other
//! hardware or protocol address sizes are out of scope, so every field sits
//! at a fixed offset in a [`HEADER_LEN`]-byte packet.
use crate::{enet::EtherType, enet::MacAddr, subnet, Error, Result};
use byteorder::{ByteOrder, NetworkEndian};
use std::net::Ipv4Addr;

/// An ARP packet.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Packet<B: AsRef<[u8]>> {
    buf: B,
}

impl<B: AsRef<[u8]>> Packet<B> {
    /// Create a new ARP packet.
    ///
    /// # Errors
    ///
    /// Fails when the buffer is shorter than [`HEADER_LEN`].
    #[inline]
    pub fn new(buf: B) -> Result<Self> {
        if buf.as_ref().len() >= HEADER_LEN {
            Ok(Self { buf })
        } else {
            Err(Error::CannotParse("buffer too small"))
        }
    }

    /// Create a new [`PacketBuilder`] that modifies a buffer of bytes in-place.
    ///
    /// # Errors
    ///
    /// See [`PacketBuilder::new`].
    pub fn builder<T>(buf: T) -> Result<PacketBuilder<T>>
    where
        T: AsRef<[u8]> + AsMut<[u8]>,
    {
        PacketBuilder::new(buf)
    }

    /// Extract the hardware type
    #[inline]
    pub fn hardware_type(&self) -> HardwareType {
        NetworkEndian::read_u16(&self.buf.as_ref()[offsets::HARDWARE_TYPE]).into()
    }

    /// Extract the protocol type
    #[inline]
    pub fn protocol_type(&self) -> EtherType {
        NetworkEndian::read_u16(&self.buf.as_ref()[offsets::PROTOCOL_TYPE]).into()
    }

    /// Extract the hardware address length
    #[inline]
    pub fn hardware_addr_len(&self) -> u8 {
        self.buf.as_ref()[offsets::HARDWARE_ADDR_LEN]
    }

    /// Extract the protocol address length
    #[inline]
    pub fn protocol_addr_len(&self) -> u8 {
        self.buf.as_ref()[offsets::PROTOCOL_ADDR_LEN]
    }

    /// Extract the operation
    #[inline]
    pub fn operation(&self) -> Operation {
        NetworkEndian::read_u16(&self.buf.as_ref()[offsets::OPERATION]).into()
    }

    /// Extract the sender's hardware address
    #[inline]
    pub fn sender_hardware_addr(&self) -> MacAddr {
        read_mac(&self.buf.as_ref()[offsets::SENDER_HARDWARE_ADDR])
    }

    /// Extract the sender's protocol address
    #[inline]
    pub fn sender_protocol_addr(&self) -> Ipv4Addr {
        read_ipv4(&self.buf.as_ref()[offsets::SENDER_PROTOCOL_ADDR])
    }

    /// Extract the target's hardware address
    #[inline]
    pub fn target_hardware_addr(&self) -> MacAddr {
        read_mac(&self.buf.as_ref()[offsets::TARGET_HARDWARE_ADDR])
    }

    /// Extract the target's protocol address
    #[inline]
    pub fn target_protocol_addr(&self) -> Ipv4Addr {
        read_ipv4(&self.buf.as_ref()[offsets::TARGET_PROTOCOL_ADDR])
    }
}

/// Builder for constructing [`Packet`] instances.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PacketBuilder<B: AsRef<[u8]> + AsMut<[u8]>> {
    buf: B,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PacketBuilder<B> {
    /// Create a new [`PacketBuilder`] over a byte buffer. The buffer is
    /// modified in place.
    ///
    /// # Errors
    ///
    /// Fails when the buffer is shorter than [`HEADER_LEN`].
    #[inline]
    pub fn new(buf: B) -> Result<Self> {
        if buf.as_ref().len() >= HEADER_LEN {
            Ok(PacketBuilder { buf })
        } else {
            Err(Error::CannotParse("buffer too small"))
        }
    }

    /// Set the hardware type.
    #[inline]
    #[must_use]
    pub fn hardware_type(mut self, htype: HardwareType) -> Self {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[offsets::HARDWARE_TYPE], htype.into());
        self
    }

    /// Set the protocol type.
    #[inline]
    #[must_use]
    pub fn protocol_type(mut self, protocol: EtherType) -> Self {
        NetworkEndian::write_u16(
            &mut self.buf.as_mut()[offsets::PROTOCOL_TYPE],
            protocol.into(),
        );
        self
    }

    /// Set both address lengths to the Ethernet/IPv4 sizes.
    #[inline]
    #[must_use]
    pub fn ethernet_ipv4_addr_lens(mut self) -> Self {
        let data = self.buf.as_mut();
        data[offsets::HARDWARE_ADDR_LEN] = HARDWARE_ADDR_LEN;
        data[offsets::PROTOCOL_ADDR_LEN] = PROTOCOL_ADDR_LEN;
        self
    }

    /// Set the operation.
    #[inline]
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[offsets::OPERATION], operation.into());
        self
    }

    /// Set the sender hardware address.
    #[inline]
    #[must_use]
    pub fn sender_hardware_addr(mut self, addr: MacAddr) -> Self {
        self.buf.as_mut()[offsets::SENDER_HARDWARE_ADDR].copy_from_slice(&addr.octets());
        self
    }

    /// Set the sender protocol address.
    #[inline]
    #[must_use]
    pub fn sender_protocol_addr(mut self, addr: Ipv4Addr) -> Self {
        self.buf.as_mut()[offsets::SENDER_PROTOCOL_ADDR].copy_from_slice(&addr.octets());
        self
    }

    /// Set the target hardware address.
    #[inline]
    #[must_use]
    pub fn target_hardware_addr(mut self, addr: MacAddr) -> Self {
        self.buf.as_mut()[offsets::TARGET_HARDWARE_ADDR].copy_from_slice(&addr.octets());
        self
    }

    /// Set the target protocol address.
    #[inline]
    #[must_use]
    pub fn target_protocol_addr(mut self, addr: Ipv4Addr) -> Self {
        self.buf.as_mut()[offsets::TARGET_PROTOCOL_ADDR].copy_from_slice(&addr.octets());
        self
    }

    /// Create the ARP packet.
    #[inline]
    pub fn build(self) -> Packet<B> {
        Packet { buf: self.buf }
    }
}

/// Encode a gratuitous ARP reply announcing that `mac` owns `ip`.
///
/// Following RFC 5227 the operation is a reply and the target hardware
/// address is broadcast, which makes receivers refresh their entry for the
/// sender without having asked. The target protocol address is the subnet
/// broadcast address derived from `mask`, not `ip` itself.
#[must_use]
pub fn gratuitous_reply(mac: MacAddr, ip: Ipv4Addr, mask: Ipv4Addr) -> [u8; HEADER_LEN] {
    let mut buf = [0; HEADER_LEN];
    PacketBuilder { buf: &mut buf }
        .hardware_type(HardwareType::Ethernet)
        .protocol_type(EtherType::Ipv4)
        .ethernet_ipv4_addr_lens()
        .operation(Operation::Reply)
        .sender_hardware_addr(mac)
        .sender_protocol_addr(ip)
        .target_hardware_addr(MacAddr::BROADCAST)
        .target_protocol_addr(subnet::broadcast(ip, mask))
        .build();
    buf
}

mod offsets {
    use std::ops::Range;
    pub(crate) const HARDWARE_TYPE: Range<usize> = 0..2;
    pub(crate) const PROTOCOL_TYPE: Range<usize> = 2..4;
    pub(crate) const HARDWARE_ADDR_LEN: usize = 4;
    pub(crate) const PROTOCOL_ADDR_LEN: usize = 5;
    pub(crate) const OPERATION: Range<usize> = 6..8;
    pub(crate) const SENDER_HARDWARE_ADDR: Range<usize> = 8..14;
    pub(crate) const SENDER_PROTOCOL_ADDR: Range<usize> = 14..18;
    pub(crate) const TARGET_HARDWARE_ADDR: Range<usize> = 18..24;
    pub(crate) const TARGET_PROTOCOL_ADDR: Range<usize> = 24..28;
}

fn read_mac(bytes: &[u8]) -> MacAddr {
    let mut octets = [0; 6];
    octets.copy_from_slice(bytes);
    MacAddr::from(octets)
}

fn read_ipv4(bytes: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}

/// Interpretation of the "hardware type" field in the ARP packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HardwareType {
    Ethernet,
    Unknown(u16),
}

impl From<u16> for HardwareType {
    fn from(value: u16) -> Self {
        match value {
            1 => HardwareType::Ethernet,
            _ => HardwareType::Unknown(value),
        }
    }
}

impl From<HardwareType> for u16 {
    fn from(value: HardwareType) -> Self {
        match value {
            HardwareType::Ethernet => 1,
            HardwareType::Unknown(value) => value,
        }
    }
}

/// Interpretation of the "operation" field in the ARP packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Operation {
    Request,
    Reply,
    Invalid(u16),
}

impl From<u16> for Operation {
    fn from(value: u16) -> Self {
        match value {
            1 => Operation::Request,
            2 => Operation::Reply,
            _ => Operation::Invalid(value),
        }
    }
}

impl From<Operation> for u16 {
    fn from(value: Operation) -> Self {
        match value {
            Operation::Request => 1,
            Operation::Reply => 2,
            Operation::Invalid(op) => op,
        }
    }
}

/// Length of an ARP packet carrying 48-bit MAC and IPv4 addresses.
pub const HEADER_LEN: usize = 28;

const HARDWARE_ADDR_LEN: u8 = 6;
const PROTOCOL_ADDR_LEN: u8 = 4;
