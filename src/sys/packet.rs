use crate::iface::NetworkInterface;
use crate::link::{Link, Transmit};
use std::io;
use std::mem;

/// Opens `AF_PACKET` sockets, one per interface. Needs `CAP_NET_RAW`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PacketLink;

impl Link for PacketLink {
    type Handle = PacketSocket;

    fn open(&self, iface: &NetworkInterface) -> io::Result<PacketSocket> {
        PacketSocket::bind(iface.index)
    }
}

/// A raw socket bound to one interface. The descriptor is closed on drop.
pub struct PacketSocket {
    fd: libc::c_int,
    send_addr: libc::sockaddr_ll,
}

impl PacketSocket {
    /// Open a raw ARP socket and bind it to the interface with index
    /// `ifindex`.
    ///
    /// # Errors
    ///
    /// Fails when `ifindex` is 0, which would bind to every interface, or
    /// when `socket(2)` or `bind(2)` fail.
    pub fn bind(ifindex: u32) -> io::Result<Self> {
        let ifindex = match libc::c_int::try_from(ifindex) {
            Ok(0) | Err(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "interface has no usable link-layer index",
                ))
            }
            Ok(index) => index,
        };
        let protocol = ETH_P_ARP.to_be();

        // man 7 packet
        // SAFETY: plain syscall, no Rust memory involved.
        let fd = unsafe { libc::socket(libc::AF_PACKET, libc::SOCK_RAW, libc::c_int::from(protocol)) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: sockaddr_ll is plain data, all zeroes is a valid value.
        let mut send_addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
        send_addr.sll_family = AF_PACKET;
        send_addr.sll_protocol = protocol;
        send_addr.sll_ifindex = ifindex;

        let socket = Self { fd, send_addr };

        // SAFETY: the address is a valid sockaddr_ll and its size is passed
        // alongside.
        let err = unsafe {
            libc::bind(
                socket.fd,
                (&socket.send_addr as *const libc::sockaddr_ll).cast::<libc::sockaddr>(),
                SOCKADDR_LL_LEN,
            )
        };
        if err < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(socket)
    }
}

impl Transmit for PacketSocket {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        // SAFETY: frame is borrowed for the duration of the call and its
        // length is passed alongside.
        let sent = unsafe {
            libc::sendto(
                self.fd,
                frame.as_ptr().cast::<libc::c_void>(),
                frame.len(),
                0,
                (&self.send_addr as *const libc::sockaddr_ll).cast::<libc::sockaddr>(),
                SOCKADDR_LL_LEN,
            )
        };
        usize::try_from(sent).map_err(|_| io::Error::last_os_error())
    }
}

impl Drop for PacketSocket {
    fn drop(&mut self) {
        // SAFETY: fd was returned by socket(2) and is closed exactly once.
        unsafe {
            libc::close(self.fd);
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const ETH_P_ARP: u16 = libc::ETH_P_ARP as u16;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const AF_PACKET: libc::sa_family_t = libc::AF_PACKET as libc::sa_family_t;

#[allow(clippy::cast_possible_truncation)]
const SOCKADDR_LL_LEN: libc::socklen_t = mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;
