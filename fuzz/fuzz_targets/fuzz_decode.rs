#![no_main]

use libfuzzer_sys::fuzz_target;
use node_protocol::protocol::message::MessageKind;
use node_protocol::SyncMessage;

fuzz_target!(|data: &[u8]| {
    // Fuzz message decoding - test for panics, crashes, oversized allocations
    let kinds = [
        MessageKind::Handshake,
        MessageKind::Goodbye,
        MessageKind::BlocksByRangeRequest,
        MessageKind::BlocksByRangeResponse,
        MessageKind::BlocksByRootRequest,
        MessageKind::BlocksByRootResponse,
    ];

    for kind in kinds {
        if let Ok(message) = SyncMessage::decode(kind, data) {
            // Any buffer that decodes must re-encode byte-exactly
            let encoded = message.encode().expect("decoded message must encode");
            assert_eq!(&encoded[..], data);
        }
    }
});
