//! Raw link-layer transmission.
//!
//! A [`Link`] opens a [`Transmit`] handle on one interface. Handles are
//! expected to release their OS resources when dropped; the transmitter keeps
//! each one alive for a single frame.
use crate::iface::NetworkInterface;
use std::io;

/// Opens raw transmit handles on interfaces.
pub trait Link {
    type Handle: Transmit;

    /// Open a handle that writes whole Ethernet frames onto `iface`.
    ///
    /// # Errors
    ///
    /// Fails when the OS refuses to open or bind the handle.
    fn open(&self, iface: &NetworkInterface) -> io::Result<Self::Handle>;
}

/// A handle that writes raw Ethernet frames.
pub trait Transmit {
    /// Write one frame, returning how many bytes the OS accepted.
    ///
    /// # Errors
    ///
    /// Fails when the OS rejects the write.
    fn send(&mut self, frame: &[u8]) -> io::Result<usize>;
}

impl<L: Link + ?Sized> Link for &L {
    type Handle = L::Handle;

    fn open(&self, iface: &NetworkInterface) -> io::Result<Self::Handle> {
        (**self).open(iface)
    }
}
