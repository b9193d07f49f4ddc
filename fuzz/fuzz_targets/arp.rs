#![no_main]

use libfuzzer_sys::fuzz_target;
use std::error::Error;

fuzz_target!(|data: &[u8]| {
    let _ = fuzz_arp(data);
});

fn fuzz_arp(bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    let packet = garp::arp::Packet::new(bytes)?;

    let _htype = packet.hardware_type();
    let _ptype = packet.protocol_type();
    let _op = packet.operation();
    let _sha = packet.sender_hardware_addr();
    let _spa = packet.sender_protocol_addr();
    let _tha = packet.target_hardware_addr();
    let _tpa = packet.target_protocol_addr();

    Ok(())
}
