//! Wire-format integration tests
//!
//! Pins the byte-exact layout of every catalog message against
//! hand-built buffers, and checks both directions of the round-trip
//! law.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use node_protocol::protocol::message::{
    Block, BlocksByRangeRequest, BlocksByRangeResponse, BlocksByRootRequest, BlocksByRootResponse,
    Goodbye, HandshakeRequest, MessageKind, Root, SyncMessage,
};

#[test]
fn handshake_layout_is_pinned() {
    let message = HandshakeRequest {
        fork_version: [1, 2, 3, 4],
        finalized_root: Root([0x11; 32]),
        finalized_epoch: 2,
        head_root: Root([0x22; 32]),
        head_slot: 0x0102,
    };
    let bytes = SyncMessage::Handshake(message).encode().unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&[1, 2, 3, 4]);
    expected.extend_from_slice(&[0x11; 32]);
    expected.extend_from_slice(&2u64.to_le_bytes());
    expected.extend_from_slice(&[0x22; 32]);
    expected.extend_from_slice(&0x0102u64.to_le_bytes());

    assert_eq!(&bytes[..], &expected[..]);
}

#[test]
fn goodbye_layout_is_pinned() {
    let bytes = SyncMessage::Goodbye(Goodbye::new(7u64)).encode().unwrap();
    assert_eq!(&bytes[..], &7u64.to_le_bytes());
}

#[test]
fn roots_request_layout_is_pinned() {
    let message = BlocksByRootRequest {
        block_roots: vec![Root([0xAA; 32]), Root([0xBB; 32])],
    };
    let bytes = SyncMessage::BlocksByRootRequest(message).encode().unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&2u32.to_le_bytes());
    expected.extend_from_slice(&[0xAA; 32]);
    expected.extend_from_slice(&[0xBB; 32]);

    assert_eq!(&bytes[..], &expected[..]);
}

#[test]
fn block_list_layout_is_count_then_length_prefixed_elements() {
    let message = BlocksByRangeResponse {
        blocks: vec![Block::new(vec![0xDE, 0xAD]), Block::new(vec![0xBE])],
    };
    let bytes = SyncMessage::BlocksByRangeResponse(message).encode().unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&2u32.to_le_bytes());
    expected.extend_from_slice(&2u32.to_le_bytes());
    expected.extend_from_slice(&[0xDE, 0xAD]);
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(&[0xBE]);

    assert_eq!(&bytes[..], &expected[..]);
}

#[test]
fn decode_then_encode_reproduces_the_input_buffer() {
    // A well-formed buffer built by hand, not by our encoder.
    let mut buffer = Vec::new();
    buffer.extend_from_slice(&[9, 9, 9, 9]);
    buffer.extend_from_slice(&[0x33; 32]);
    buffer.extend_from_slice(&77u64.to_le_bytes());
    buffer.extend_from_slice(&[0x44; 32]);
    buffer.extend_from_slice(&1234u64.to_le_bytes());

    let decoded = SyncMessage::decode(MessageKind::Handshake, &buffer).unwrap();
    assert_eq!(decoded.encode().unwrap(), &buffer[..]);
}

#[test]
fn every_kind_round_trips() {
    let messages = vec![
        SyncMessage::Handshake(HandshakeRequest::default()),
        SyncMessage::Goodbye(Goodbye::new(u64::MAX)),
        SyncMessage::BlocksByRangeRequest(BlocksByRangeRequest {
            head_block_root: Root([3; 32]),
            start_slot: 0,
            count: 10,
            step: 1,
        }),
        SyncMessage::BlocksByRangeResponse(BlocksByRangeResponse {
            blocks: vec![Block::new(vec![]), Block::new(vec![1; 64])],
        }),
        SyncMessage::BlocksByRootRequest(BlocksByRootRequest {
            block_roots: vec![Root::ZERO],
        }),
    ];

    for message in messages {
        let bytes = message.encode().unwrap();
        let decoded = SyncMessage::decode(message.kind(), &bytes).unwrap();
        assert_eq!(decoded, message);
    }
}

#[test]
fn truncated_and_padded_buffers_are_rejected_for_every_kind() {
    let kinds = [
        MessageKind::Handshake,
        MessageKind::Goodbye,
        MessageKind::BlocksByRangeRequest,
        MessageKind::BlocksByRangeResponse,
        MessageKind::BlocksByRootRequest,
        MessageKind::BlocksByRootResponse,
    ];

    for kind in kinds {
        assert!(SyncMessage::decode(kind, &[]).is_err(), "{kind:?} empty");

        let valid = sample_for(kind).encode().unwrap();

        let mut truncated = valid.to_vec();
        truncated.pop();
        assert!(
            SyncMessage::decode(kind, &truncated).is_err(),
            "{kind:?} truncated"
        );

        let mut padded = valid.to_vec();
        padded.push(0);
        assert!(
            SyncMessage::decode(kind, &padded).is_err(),
            "{kind:?} padded"
        );
    }
}

fn sample_for(kind: MessageKind) -> SyncMessage {
    match kind {
        MessageKind::Handshake => SyncMessage::Handshake(HandshakeRequest::default()),
        MessageKind::Goodbye => SyncMessage::Goodbye(Goodbye::new(1u64)),
        MessageKind::BlocksByRangeRequest => {
            SyncMessage::BlocksByRangeRequest(BlocksByRangeRequest {
                head_block_root: Root::ZERO,
                start_slot: 1,
                count: 2,
                step: 1,
            })
        }
        MessageKind::BlocksByRangeResponse => {
            SyncMessage::BlocksByRangeResponse(BlocksByRangeResponse {
                blocks: vec![Block::new(vec![1, 2, 3])],
            })
        }
        MessageKind::BlocksByRootRequest => SyncMessage::BlocksByRootRequest(BlocksByRootRequest {
            block_roots: vec![Root([1; 32])],
        }),
        MessageKind::BlocksByRootResponse => SyncMessage::BlocksByRootResponse(BlocksByRootResponse {
            blocks: vec![Block::new(vec![4, 5])],
        }),
    }
}
