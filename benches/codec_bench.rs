use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use node_protocol::protocol::message::{
    Block, BlocksByRangeResponse, HandshakeRequest, MessageKind, Root, SyncMessage,
};

#[allow(clippy::unwrap_used)]
fn bench_handshake_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("handshake_encode_decode");

    let message = SyncMessage::Handshake(HandshakeRequest {
        fork_version: [1, 2, 3, 4],
        finalized_root: Root([0x11; 32]),
        finalized_epoch: 1024,
        head_root: Root([0x22; 32]),
        head_slot: 32768,
    });
    let bytes = message.encode().unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| message.encode().unwrap());
    });
    group.bench_function("decode", |b| {
        b.iter(|| SyncMessage::decode(MessageKind::Handshake, &bytes).unwrap());
    });

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_block_list_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_list_encode_decode");
    let block_counts = [1usize, 16, 64, 256];
    let block_size = 512usize;

    for &count in &block_counts {
        let message = SyncMessage::BlocksByRangeResponse(BlocksByRangeResponse {
            blocks: vec![Block::new(vec![0xAB; block_size]); count],
        });
        let bytes = message.encode().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("encode_{count}_blocks"), |b| {
            b.iter_batched(
                || message.clone(),
                |m| m.encode().unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{count}_blocks"), |b| {
            b.iter(|| SyncMessage::decode(MessageKind::BlocksByRangeResponse, &bytes).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_handshake_encode_decode,
    bench_block_list_encode_decode
);
criterion_main!(benches);
