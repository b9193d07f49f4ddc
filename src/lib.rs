//! Announce this host's IPv4-to-MAC bindings with gratuitous ARP.
//!
//! On startup a freshly booted machine is invisible to its neighbours until
//! one of them asks for its address and the answer lands in the neighbour's
//! ARP cache. Hypervisors typically poll on a fixed interval, so a VM that
//! comes up just after a poll looks unreachable until the next one. Sending a
//! gratuitous ARP reply on every eligible interface skips that wait.
//!
//! ## Layout
//!
//! * [`subnet`] derives the subnet broadcast address.
//! * [`arp`] and [`enet`] read and write the two wire formats involved.
//! * [`garp`] puts them together into the 42-byte announcement frame.
//! * [`iface`] discovers which interfaces to announce on.
//! * [`transmit`] writes one frame per IPv4 binding through a [`link::Link`].
//! * [`notify`] answers a single HTTP request with what was announced.
//!
//! The OS-facing pieces ([`sys`]) sit behind the [`iface::InterfaceSource`]
//! and [`link::Link`] traits so that everything above them can be exercised
//! without raw sockets.
#![warn(clippy::pedantic)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::module_name_repetitions)]

pub mod arp;
pub mod config;
pub mod enet;
pub mod garp;
pub mod iface;
pub mod link;
pub mod logging;
pub mod notify;
pub mod subnet;
pub mod sys;
pub mod transmit;

use iface::{InterfaceSource, NetworkInterface};
use link::Link;
use transmit::{Report, Transmitter};

/// Utility wrapper for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while announcing.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    CannotParse(&'static str),
    #[error("not enough space: {0}")]
    NotEnoughSpace(&'static str),
    #[error("could not enumerate network interfaces")]
    Enumerate(#[source] std::io::Error),
    #[error("interface {0} has no ethernet hardware address")]
    NoHardwareAddr(String),
    #[error("could not open transmit handle on {iface}")]
    Open {
        iface: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write frame on {iface}")]
    Write {
        iface: String,
        #[source]
        source: std::io::Error,
    },
    #[error("short write on {iface}: {written} of {len} bytes")]
    ShortWrite {
        iface: String,
        written: usize,
        len: usize,
    },
    #[error("notification server failed")]
    Notify(#[source] std::io::Error),
}

/// Discover the eligible interfaces and send one announcement per IPv4
/// binding on each of them.
///
/// The discovered interfaces are returned alongside the outcome so the caller
/// can report on them afterwards.
///
/// # Errors
///
/// Fails only when interfaces cannot be enumerated. Transmission failures are
/// logged and counted in the [`Report`].
pub fn run<S, L>(source: &S, link: L) -> Result<(Vec<NetworkInterface>, Report)>
where
    S: InterfaceSource,
    L: Link,
{
    let ifaces = iface::list_eligible_interfaces(source)?;
    let report = Transmitter::new(link).announce(&ifaces);
    Ok((ifaces, report))
}
