#![no_main]
use libfuzzer_sys::fuzz_target;
use roughtime_proto::tags;
use roughtime_proto::wire::Message;

fuzz_target!(|data: &[u8]| {
    // Parse tag-value messages from arbitrary bytes; must not panic or read
    // out of bounds.
    if let Ok(msg) = Message::decode(data) {
        let _ = msg.num_tags();
        // Exercise lookups and nested decoding on whatever parsed.
        let _ = msg.get(tags::NONC);
        let _ = msg.get(tags::MIDP);
        let _ = msg.get(tags::RADI);
        let _ = msg.nested(tags::CERT);
        let _ = msg.nested(tags::SREP);
    }
});
