use criterion::{black_box, criterion_group, criterion_main, Criterion};

use boot_trees::msa::{self, Alignment};
use boot_trees::tree::{InferConfig, NeighborJoining, TreeBuilder};

fn make_alignment(n_seqs: usize, len: usize) -> Alignment {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut x: u32 = 42;
    let mut base = Vec::with_capacity(len);
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        base.push(bases[(x >> 16) as usize % 4]);
    }

    // each sequence mutates a few sites of the shared ancestor
    let rows = (0..n_seqs)
        .map(|s| {
            let mut row = base.clone();
            for k in 0..len / 20 {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let pos = (x >> 8) as usize % len;
                row[pos] = bases[(s + k) % 4];
            }
            row
        })
        .collect();
    let names = (0..n_seqs).map(|i| format!("seq{}", i)).collect();
    Alignment::new(names, rows).unwrap()
}

fn bench_bootstrap_replicate(c: &mut Criterion) {
    let aln = make_alignment(50, 2_000);

    c.bench_function("bootstrap_replicate_50x2000", |b| {
        let mut rng = msa::replicate_rng(7, 1);
        b.iter(|| {
            black_box(msa::bootstrap_replicate(black_box(&aln), &mut rng));
        })
    });
}

fn bench_nj(c: &mut Criterion) {
    let aln = make_alignment(50, 1_000);
    let cfg = InferConfig::default();

    c.bench_function("nj_tree_50x1000", |b| {
        b.iter(|| {
            black_box(NeighborJoining.infer(black_box(&aln), &cfg).unwrap());
        })
    });
}

criterion_group!(benches, bench_bootstrap_replicate, bench_nj);
criterion_main!(benches);
