//! Read and write Ethernet II frames.
//!
//! Only the parts of IEEE 802.3 needed to carry ARP are covered: the two MAC
//! addresses and the EtherType. Preamble, SFD and FCS belong to the NIC. The
//! minimum frame size is not enforced either; short frames are padded by
//! the transmitting device.
use byteorder::{ByteOrder, NetworkEndian};

use crate::{Error, Result};
use std::fmt;

/// A view over an Ethernet frame.
///
/// Nothing is parsed until an accessor is called. The length is checked once
/// in [`Frame::new`], so the accessors can index directly.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Frame<B: AsRef<[u8]>> {
    buf: B,
}

impl<B: AsRef<[u8]>> Frame<B> {
    /// Create a new Ethernet frame.
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

    /// Construct a new [`Frame`] using a [`FrameBuilder`].
    ///
    /// # Errors
    ///
    /// See [`FrameBuilder::new`].
    #[inline]
    pub fn builder<T>(buf: T) -> Result<FrameBuilder<T>>
    where
        T: AsRef<[u8]> + AsMut<[u8]>,
    {
        FrameBuilder::new(buf)
    }

    /// Extract the destination MAC address.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> MacAddr {
        read_mac(&self.buf.as_ref()[offsets::DEST])
    }

    /// Extract the source MAC address.
    #[inline]
    #[must_use]
    pub fn source(&self) -> MacAddr {
        read_mac(&self.buf.as_ref()[offsets::SOURCE])
    }

    /// Extract the EtherType.
    #[inline]
    #[must_use]
    pub fn ethertype(&self) -> EtherType {
        NetworkEndian::read_u16(&self.buf.as_ref()[offsets::ETHERTYPE]).into()
    }

    /// Extract the client data.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_ref()[offsets::PAYLOAD]
    }

    /// Total length of the frame.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }
}

/// Builder for constructing [`Frame`] instances in place.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FrameBuilder<B: AsRef<[u8]> + AsMut<[u8]>> {
    buf: B,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuilder<B> {
    /// Create a new [`FrameBuilder`] over a byte buffer.
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

    /// Set the destination MAC address.
    #[inline]
    #[must_use]
    pub fn dest(mut self, dest: MacAddr) -> Self {
        self.buf.as_mut()[offsets::DEST].copy_from_slice(&dest.octets);
        self
    }

    /// Set the source MAC address.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: MacAddr) -> Self {
        self.buf.as_mut()[offsets::SOURCE].copy_from_slice(&source.octets);
        self
    }

    /// Set the EtherType.
    #[inline]
    #[must_use]
    pub fn ethertype(mut self, ethertype: EtherType) -> Self {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[offsets::ETHERTYPE], ethertype.into());
        self
    }

    /// Copy the payload in after the header.
    ///
    /// # Errors
    ///
    /// Fails when the payload does not fit in the remaining buffer.
    #[inline]
    pub fn payload(mut self, payload: &[u8]) -> Result<Self> {
        let room = &mut self.buf.as_mut()[offsets::PAYLOAD];
        if room.len() < payload.len() {
            return Err(Error::NotEnoughSpace(
                "buffer not large enough to write payload",
            ));
        }
        room[..payload.len()].copy_from_slice(payload);
        Ok(self)
    }

    /// Create the [`Frame`].
    #[inline]
    #[must_use]
    pub fn build(self) -> Frame<B> {
        Frame { buf: self.buf }
    }
}

mod offsets {
    use std::ops::{Range, RangeFrom};
    pub(crate) const DEST: Range<usize> = 0..6;
    pub(crate) const SOURCE: Range<usize> = 6..12;
    pub(crate) const ETHERTYPE: Range<usize> = 12..14;
    pub(crate) const PAYLOAD: RangeFrom<usize> = 14..;
}

fn read_mac(bytes: &[u8]) -> MacAddr {
    let mut octets = [0; 6];
    octets.copy_from_slice(bytes);
    MacAddr { octets }
}

/// The EtherTypes this crate deals with.
///
/// See the [IANA list of EtherType
/// values](https://www.iana.org/assignments/ieee-802-numbers/ieee-802-numbers.xhtml#ieee-802-numbers-1).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EtherType {
    Arp,
    Ipv4,
    Unknown(u16),
}

impl From<EtherType> for u16 {
    fn from(value: EtherType) -> Self {
        match value {
            EtherType::Arp => ETHERTYPE_ARP,
            EtherType::Ipv4 => ETHERTYPE_IPV4,
            EtherType::Unknown(typ) => typ,
        }
    }
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        match value {
            ETHERTYPE_ARP => EtherType::Arp,
            ETHERTYPE_IPV4 => EtherType::Ipv4,
            _ => EtherType::Unknown(value),
        }
    }
}

/// A 48-bit MAC address.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct MacAddr {
    octets: [u8; 6],
}

impl MacAddr {
    /// `ff:ff:ff:ff:ff:ff`
    pub const BROADCAST: MacAddr = MacAddr { octets: [0xff; 6] };

    /// Create a new [`MacAddr`] instance.
    #[inline]
    #[must_use]
    pub const fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self {
            octets: [a, b, c, d, e, f],
        }
    }

    /// The six octets in transmission order.
    #[inline]
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.octets
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr { octets }
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Size of the Ethernet header.
pub const HEADER_LEN: usize = 14;

// EtherType code for IPv4.
const ETHERTYPE_IPV4: u16 = 0x800;

// EtherType code for ARP.
const ETHERTYPE_ARP: u16 = 0x806;
