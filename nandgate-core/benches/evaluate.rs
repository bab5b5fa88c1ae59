//! Benchmarks for network evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nandgate_core::{GateId, Network, Signal};

/// Build a chain of inverters over one signal. Returns the last gate.
fn build_chain(network: &mut Network, signal: &Signal, depth: usize) -> GateId {
    let mut previous = network.create(1).unwrap();
    network.connect_signal(signal, previous, 0).unwrap();
    for _ in 1..depth {
        let gate = network.create(1).unwrap();
        network.connect_gate(previous, gate, 0).unwrap();
        previous = gate;
    }
    previous
}

/// Build a balanced tree of two-input gates over `width` signals.
/// Returns the root.
fn build_tree(network: &mut Network, signals: &[Signal]) -> GateId {
    let mut level: Vec<GateId> = signals
        .chunks(2)
        .map(|pair| {
            let gate = network.create(pair.len()).unwrap();
            for (slot, signal) in pair.iter().enumerate() {
                network.connect_signal(signal, gate, slot).unwrap();
            }
            gate
        })
        .collect();

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let gate = network.create(pair.len()).unwrap();
                for (slot, &producer) in pair.iter().enumerate() {
                    network.connect_gate(producer, gate, slot).unwrap();
                }
                gate
            })
            .collect();
    }
    level[0]
}

fn bench_eval_chain(c: &mut Criterion) {
    let signal = Signal::new(true);

    for depth in [10, 100, 1000] {
        let mut network = Network::new();
        let last = build_chain(&mut network, &signal, depth);
        let mut out = [false];

        c.bench_function(&format!("eval_chain_depth_{depth}"), |b| {
            b.iter(|| network.evaluate(black_box(&[last]), &mut out).unwrap())
        });
    }
}

fn bench_eval_tree(c: &mut Criterion) {
    let signals: Vec<Signal> = (0..256).map(|i| Signal::new(i % 3 == 0)).collect();
    let mut network = Network::new();
    let root = build_tree(&mut network, &signals);
    let mut out = [false];

    c.bench_function("eval_tree_256_signals", |b| {
        b.iter(|| network.evaluate(black_box(&[root]), &mut out).unwrap())
    });
}

fn bench_eval_shared_fan_out(c: &mut Criterion) {
    // Many observed gates reading one shared chain.
    let signal = Signal::new(false);
    let mut network = Network::new();
    let shared = build_chain(&mut network, &signal, 100);
    let observed: Vec<GateId> = (0..64)
        .map(|_| {
            let gate = network.create(1).unwrap();
            network.connect_gate(shared, gate, 0).unwrap();
            gate
        })
        .collect();
    let mut out = vec![false; observed.len()];

    c.bench_function("eval_fan_out_64", |b| {
        b.iter(|| network.evaluate(black_box(&observed), &mut out).unwrap())
    });
}

fn bench_build_and_delete(c: &mut Criterion) {
    let signal = Signal::new(true);

    c.bench_function("build_and_delete_chain_100", |b| {
        b.iter(|| {
            let mut network = Network::with_capacity(100);
            build_chain(&mut network, &signal, 100);
            let ids: Vec<GateId> = network.gates().collect();
            for id in ids {
                network.delete(id);
            }
            network
        })
    });
}

criterion_group!(
    benches,
    bench_eval_chain,
    bench_eval_tree,
    bench_eval_shared_fan_out,
    bench_build_and_delete,
);

criterion_main!(benches);
