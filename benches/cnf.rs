//! Benchmarks for CNF conversion of the heavyweight axiom shapes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use senet::axioms::{self, WorldBounds};
use senet::cnf::to_clauses;
use senet::prop::{Cell, Heading};

fn bench_location_ssa(c: &mut Criterion) {
    let bounds = WorldBounds::grid(4, 4).unwrap();
    let ssa = axioms::at_location_ssa(3, Cell::new(2, 2), &bounds).unwrap();

    c.bench_function("cnf_location_ssa_interior", |bench| {
        bench.iter(|| black_box(to_clauses(&ssa)))
    });
}

fn bench_at_most_one_wumpus(c: &mut Criterion) {
    let bounds = WorldBounds::grid(4, 4).unwrap();
    let exclusion = axioms::at_most_one_wumpus(&bounds).unwrap();

    c.bench_function("cnf_at_most_one_wumpus_4x4", |bench| {
        bench.iter(|| black_box(to_clauses(&exclusion)))
    });
}

fn bench_temporal_bundle(c: &mut Criterion) {
    let bounds = WorldBounds::grid(4, 4).unwrap();
    let bundle = axioms::temporal_bundle(5, Cell::new(2, 2), Heading::East, &bounds).unwrap();

    c.bench_function("cnf_temporal_bundle_4x4", |bench| {
        bench.iter(|| {
            let clause_count: usize = bundle.iter().map(|s| to_clauses(s).len()).sum();
            black_box(clause_count)
        })
    });
}

criterion_group!(
    benches,
    bench_location_ssa,
    bench_at_most_one_wumpus,
    bench_temporal_bundle
);
criterion_main!(benches);
