//! OS backends for interface enumeration and raw transmission.
//!
//! Only Linux is supported. Elsewhere both backends exist but fail with
//! [`std::io::ErrorKind::Unsupported`].
#[cfg(target_os = "linux")]
mod ifaddrs;
#[cfg(target_os = "linux")]
mod packet;

#[cfg(target_os = "linux")]
pub use ifaddrs::SystemInterfaces;
#[cfg(target_os = "linux")]
pub use packet::{PacketLink, PacketSocket};

#[cfg(not(target_os = "linux"))]
mod unsupported;
#[cfg(not(target_os = "linux"))]
pub use unsupported::{PacketLink, PacketSocket, SystemInterfaces};
