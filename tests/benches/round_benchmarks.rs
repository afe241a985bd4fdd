//! # Ride-Chain Round Benchmarks
//!
//! | Path | Cost driver |
//! |------|-------------|
//! | Commitment check | one Keccak-256 over `coord ‖ salt` |
//! | Matching pass | open requests × commits per request |
//! | State root | bincode + Keccak-256 over every table |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use primitive_types::U256;
use ride_node::{LedgerState, NodeConfig, Operation, RoundExecutor, Transaction};
use shared_types::{commitment, verify_commitment, Address, BlockContext};
use std::time::Duration;

const RIDERS: u8 = 200;

fn rider(i: u8) -> Address {
    let mut a = [0x10; 20];
    a[19] = i;
    a
}

fn driver(i: u8) -> Address {
    let mut a = [0x20; 20];
    a[19] = i;
    a
}

fn create(i: u8) -> Transaction {
    Transaction {
        caller: rider(i),
        op: Operation::CreateRequest {
            cell_topic: vec![i; 32],
            region_topic: vec![0xD0; 32],
            params_hash: vec![0x50; 32],
            pickup_commit: commitment(b"40.7128,-74.0060", &[i; 16]).to_vec(),
            dropoff_commit: commitment(b"40.7580,-73.9855", &[i; 16]).to_vec(),
            max_driver_eta: 30,
            ttl: 100,
            deposit: U256::from(100u64),
        },
    }
}

/// Executor after round 1: `requests` open requests, `commits` drivers each.
fn loaded(requests: u8, commits: u8) -> RoundExecutor {
    let mut config = NodeConfig::default();
    config.matching.commit_window = 1;
    let state = LedgerState::new(&config)
        .with_allocations((0..RIDERS).map(|i| (rider(i), U256::from(1_000u64))))
        .expect("allocations");
    let mut node = RoundExecutor::with_state(&config, state);

    let mut txs: Vec<Transaction> = (0..requests).map(create).collect();
    for request_id in 1..=u64::from(requests) {
        for d in 0..commits {
            txs.push(Transaction {
                caller: driver(d),
                op: Operation::SubmitDriverCommit {
                    request_id,
                    commitment: vec![d; 32],
                    eta: u32::from(d % 40),
                },
            });
        }
    }
    node.execute_round(BlockContext::new(1, 0), txs)
        .expect("round 1");
    node
}

fn bench_commitment(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment");
    let expected = commitment(b"40.7128,-74.0060", b"0123456789abcdef");

    group.bench_function("verify", |b| {
        b.iter(|| {
            black_box(verify_commitment(
                black_box(b"40.7128,-74.0060"),
                black_box(b"0123456789abcdef"),
                &expected,
            ))
        })
    });
    group.finish();
}

fn bench_matching_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching-pass");
    group.measurement_time(Duration::from_secs(10));

    for (requests, commits) in [(10u8, 5u8), (50, 10), (200, 20)] {
        group.throughput(Throughput::Elements(u64::from(requests)));
        group.bench_with_input(
            BenchmarkId::new("match_round", format!("{requests}x{commits}")),
            &(requests, commits),
            |b, &(requests, commits)| {
                b.iter_batched(
                    || loaded(requests, commits),
                    |mut node| {
                        black_box(
                            node.execute_round(BlockContext::new(2, 0), Vec::new())
                                .expect("round 2"),
                        )
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_state_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("state-root");

    for requests in [10u8, 100, 200] {
        let node = loaded(requests, 5);
        group.bench_with_input(BenchmarkId::new("keccak_bincode", requests), &node, |b, node| {
            b.iter(|| black_box(node.state().state_root().expect("root")))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_commitment,
    bench_matching_pass,
    bench_state_root
);
criterion_main!(benches);
