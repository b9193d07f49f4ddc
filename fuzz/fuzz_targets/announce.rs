#![no_main]

use garp::enet::{self, MacAddr};
use garp::{arp, garp::GarpFrame, subnet};
use libfuzzer_sys::fuzz_target;
use std::net::Ipv4Addr;

fuzz_target!(|data: [u8; 14]| {
    let mut mac = [0; 6];
    mac.copy_from_slice(&data[..6]);
    let ip = Ipv4Addr::new(data[6], data[7], data[8], data[9]);
    let mask = Ipv4Addr::new(data[10], data[11], data[12], data[13]);

    let bytes = GarpFrame::announce(MacAddr::from(mac), ip, mask)
        .to_bytes()
        .expect("announcement fits its buffer");
    let frame = enet::Frame::new(&bytes[..]).expect("frame has a full header");
    let packet = arp::Packet::new(frame.payload()).expect("payload holds an ARP packet");

    assert_eq!(packet.sender_hardware_addr(), frame.source());
    assert_eq!(packet.sender_protocol_addr(), ip);
    assert_eq!(packet.target_protocol_addr(), subnet::broadcast(ip, mask));
});
