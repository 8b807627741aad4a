use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mincut::graph::{
    exact_min_cut, randomized_min_cut, stoer_wagner_sparse, AdjacencyList, AdjacencyMatrix,
    KargerConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Connected random graph with edge probability `p` and unit weights.
fn random_graph(n: usize, p: f64, seed: u64) -> AdjacencyMatrix<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = AdjacencyMatrix::new(n);
    for v in 1..n {
        let u = rng.gen_range(0..v);
        graph.add_edge(u, v, 1).unwrap();
    }
    for u in 0..n {
        for v in (u + 1)..n {
            if graph.weight(u, v) == 0 && rng.gen_bool(p) {
                graph.add_edge(u, v, 1).unwrap();
            }
        }
    }
    graph
}

fn bench_stoer_wagner(c: &mut Criterion) {
    let mut group = c.benchmark_group("stoer_wagner");
    for &n in &[20, 50, 100] {
        let graph = random_graph(n, 0.3, n as u64);
        group.bench_with_input(BenchmarkId::new("dense", n), &graph, |b, g| {
            b.iter(|| exact_min_cut(&mut black_box(g.clone())).unwrap())
        });
        let list = AdjacencyList::from_matrix(&graph);
        group.bench_with_input(BenchmarkId::new("heap", n), &list, |b, l| {
            b.iter(|| stoer_wagner_sparse(&mut black_box(l.clone())).unwrap())
        });
    }
    group.finish();
}

fn bench_karger(c: &mut Criterion) {
    let mut group = c.benchmark_group("karger");
    for &n in &[20, 50, 100] {
        let graph = random_graph(n, 0.3, n as u64);
        let sequential = KargerConfig::default().with_trials(100).with_seed(1);
        let parallel = sequential.clone().with_parallel(true);
        group.bench_with_input(BenchmarkId::new("sequential", n), &graph, |b, g| {
            b.iter(|| randomized_min_cut(black_box(g), &sequential).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", n), &graph, |b, g| {
            b.iter(|| randomized_min_cut(black_box(g), &parallel).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stoer_wagner, bench_karger);
criterion_main!(benches);
