#![no_main]
use libfuzzer_sys::fuzz_target;
use roughtime_proto::verify_response;

fuzz_target!(|data: &[u8]| {
    // The full validation pipeline over arbitrary bytes: every outcome must
    // be a clean typed error (or, unreachably, success), never a panic.
    let nonce = [0x42u8; 32];
    let root_public_key = [0x24u8; 32];
    let _ = verify_response(data, &nonce, &root_public_key);
});
