#![no_main]

use libfuzzer_sys::fuzz_target;
use std::error::Error;

fuzz_target!(|data: &[u8]| {
    let _ = fuzz_eth(data);
});

fn fuzz_eth(bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    let frame = garp::enet::Frame::new(bytes)?;

    let _dst = frame.dest();
    let _src = frame.source();
    let _typ = frame.ethertype();
    let _payload = frame.payload();

    Ok(())
}
