//! The gratuitous ARP announcement frame.
use crate::{
    arp,
    enet::{self, EtherType, MacAddr},
    Result,
};
use std::net::Ipv4Addr;

/// Length of a serialized [`GarpFrame`]: Ethernet header plus ARP packet.
pub const FRAME_LEN: usize = enet::HEADER_LEN + arp::HEADER_LEN;

/// One announcement, ready to serialize.
///
/// The destination is always the broadcast MAC and the EtherType always ARP.
/// A frame is built for a single (interface, address) pair and dropped once
/// its bytes have been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarpFrame {
    source: MacAddr,
    payload: [u8; arp::HEADER_LEN],
}

impl GarpFrame {
    /// Wrap an already encoded ARP payload.
    #[must_use]
    pub fn assemble(source: MacAddr, payload: [u8; arp::HEADER_LEN]) -> Self {
        Self { source, payload }
    }

    /// Build the announcement of `ip` (in the subnet given by `mask`) from
    /// the interface with hardware address `mac`.
    #[must_use]
    pub fn announce(mac: MacAddr, ip: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self::assemble(mac, arp::gratuitous_reply(mac, ip, mask))
    }

    #[must_use]
    pub fn dest(&self) -> MacAddr {
        MacAddr::BROADCAST
    }

    #[must_use]
    pub fn source(&self) -> MacAddr {
        self.source
    }

    #[must_use]
    pub fn ethertype(&self) -> EtherType {
        EtherType::Arp
    }

    #[must_use]
    pub fn payload(&self) -> &[u8; arp::HEADER_LEN] {
        &self.payload
    }

    /// Serialize to wire format. No minimum-size padding is added.
    ///
    /// # Errors
    ///
    /// Only fails if the Ethernet builder rejects the fixed-size buffer,
    /// which cannot happen for [`FRAME_LEN`] bytes.
    pub fn to_bytes(&self) -> Result<[u8; FRAME_LEN]> {
        let mut buf = [0; FRAME_LEN];
        enet::Frame::<&[u8]>::builder(&mut buf)?
            .dest(self.dest())
            .source(self.source)
            .ethertype(self.ethertype())
            .payload(&self.payload)?
            .build();
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::{GarpFrame, FRAME_LEN};
    use crate::{arp, enet};
    use std::error::Error;
    use std::net::Ipv4Addr;

    const MAC: enet::MacAddr = enet::MacAddr::new(0x02, 0x00, 0x00, 0x00, 0x00, 0x01);

    fn frame() -> GarpFrame {
        GarpFrame::announce(
            MAC,
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::new(255, 255, 255, 0),
        )
    }

    #[test]
    fn serialized_frame_has_expected_header() -> Result<(), Box<dyn Error>> {
        let bytes = frame().to_bytes()?;

        assert_eq!(bytes.len(), 42);
        assert_eq!(&bytes[0..6], &[0xff; 6]);
        assert_eq!(&bytes[6..12], &MAC.octets());
        assert_eq!(&bytes[12..14], &[0x08, 0x06]);
        Ok(())
    }

    #[test]
    fn serialized_frame_carries_payload_unchanged() -> Result<(), Box<dyn Error>> {
        let frame = frame();
        let bytes = frame.to_bytes()?;
        assert_eq!(&bytes[enet::HEADER_LEN..], &frame.payload()[..]);
        Ok(())
    }

    #[test]
    fn serialized_frame_reads_back() -> Result<(), Box<dyn Error>> {
        let bytes = frame().to_bytes()?;
        let frame = enet::Frame::new(&bytes[..])?;
        assert_eq!(frame.dest(), enet::MacAddr::BROADCAST);
        assert_eq!(frame.source(), MAC);
        assert_eq!(frame.ethertype(), enet::EtherType::Arp);

        let packet = arp::Packet::new(frame.payload())?;
        assert_eq!(packet.operation(), arp::Operation::Reply);
        assert_eq!(packet.sender_protocol_addr(), Ipv4Addr::new(192, 168, 1, 10));
        Ok(())
    }

    #[test]
    fn assembling_twice_gives_identical_bytes() -> Result<(), Box<dyn Error>> {
        assert_eq!(frame().to_bytes()?, frame().to_bytes()?);
        assert_eq!(frame().to_bytes()?.len(), FRAME_LEN);
        Ok(())
    }
}
