use crate::iface::{InterfaceSource, NetworkInterface};
use crate::link::{Link, Transmit};
use std::io;

fn unsupported() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "only supported on Linux")
}

/// Interface enumeration, unavailable on this platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> io::Result<Vec<NetworkInterface>> {
        Err(unsupported())
    }
}

/// Raw transmission, unavailable on this platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct PacketLink;

pub struct PacketSocket;

impl Link for PacketLink {
    type Handle = PacketSocket;

    fn open(&self, _iface: &NetworkInterface) -> io::Result<PacketSocket> {
        Err(unsupported())
    }
}

impl Transmit for PacketSocket {
    fn send(&mut self, _frame: &[u8]) -> io::Result<usize> {
        Err(unsupported())
    }
}
