//! Benchmarks for anchor selection over a generated hypergraph.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use heka::atom::{AtomId, AtomType};
use heka::query::select::find_thinnest;
use heka::query::Pattern;
use heka::space::AtomSpace;

/// A space with `n` entities linked by random orbit-style facts, skewed so
/// a handful of hub entities collect fat incoming sets.
fn random_space(n: usize, facts: usize) -> (AtomSpace, Vec<AtomId>) {
    let space = AtomSpace::new();
    let orbits = space.add_node(AtomType::Predicate, "rel").unwrap();
    let entities: Vec<AtomId> = (0..n)
        .map(|i| space.add_node(AtomType::Concept, format!("e{i}")).unwrap())
        .collect();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..facts {
        // Square the draw to skew references toward low-index hubs.
        let a = entities[rng.gen_range(0..n) * rng.gen_range(0..n) / n];
        let b = entities[rng.gen_range(0..n)];
        let args = space.add_link(AtomType::List, vec![a, b]).unwrap();
        space
            .add_link(AtomType::Evaluation, vec![orbits, args])
            .unwrap();
    }
    (space, entities)
}

fn bench_find_thinnest(c: &mut Criterion) {
    let (space, entities) = random_space(1_000, 10_000);
    let orbits = space.add_node(AtomType::Predicate, "rel").unwrap();
    let var = space.add_node(AtomType::Variable, "$x").unwrap();

    // Eight clauses relating the variable to scattered entities.
    let clauses: Vec<AtomId> = (0..8)
        .map(|i| {
            let target = entities[i * 117 % entities.len()];
            let args = space.add_link(AtomType::List, vec![var, target]).unwrap();
            space
                .add_link(AtomType::Evaluation, vec![orbits, args])
                .unwrap()
        })
        .collect();
    let pattern = Pattern::new(&space, clauses).unwrap();

    c.bench_function("find_thinnest_8_clauses_10k_facts", |bench| {
        bench.iter(|| black_box(find_thinnest(&space, &pattern, None)))
    });
}

fn bench_incoming_enumeration(c: &mut Criterion) {
    let (space, entities) = random_space(1_000, 10_000);
    let hub = entities[0];

    c.bench_function("incoming_set_hub", |bench| {
        bench.iter(|| black_box(space.incoming_set(hub)))
    });
}

criterion_group!(benches, bench_find_thinnest, bench_incoming_enumeration);
criterion_main!(benches);
