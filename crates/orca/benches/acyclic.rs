use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use orca::graph::{Graph, follow_always};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct GraphSpec {
    vertex_count: usize,
    edges: Vec<(usize, usize, i32, bool)>,
}

impl GraphSpec {
    fn build(&self) -> Graph {
        let mut g: Graph = Graph::new();
        let vs: Vec<_> = (0..self.vertex_count).map(|_| g.add_vertex(())).collect();
        for &(from, to, weight, cutable) in &self.edges {
            g.add_edge(vs[from], vs[to], weight, cutable, ());
        }
        g
    }
}

/// A chain of rings: each ring is a directed cycle of cutable edges with an
/// uncutable spine, and consecutive rings are bridged so the whole graph is
/// one component.
fn build_ring_spec(rings: usize, ring_len: usize) -> GraphSpec {
    let vertex_count = rings * ring_len;
    let mut edges: Vec<(usize, usize, i32, bool)> = Vec::new();

    for r in 0..rings {
        let base = r * ring_len;
        for i in 0..ring_len {
            let from = base + i;
            let to = base + (i + 1) % ring_len;
            let cutable = i != 0;
            let weight = 1 + ((r + i) % 5) as i32;
            edges.push((from, to, weight, cutable));
        }
        if r + 1 < rings {
            edges.push((base, (r + 1) * ring_len, 1, false));
        }
    }

    GraphSpec {
        vertex_count,
        edges,
    }
}

fn bench_acyclic(c: &mut Criterion) {
    let mut group = c.benchmark_group("acyclic");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("rings_8x8", 8usize, 8usize),
        ("rings_32x16", 32usize, 16usize),
        ("rings_64x32", 64usize, 32usize),
    ];

    for (name, rings, ring_len) in cases {
        let spec = build_ring_spec(rings, ring_len);
        group.bench_with_input(BenchmarkId::new("acyclic", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut g| {
                    orca::acyclic(black_box(&mut g), follow_always);
                    black_box(g.edge_count());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_acyclic);
criterion_main!(benches);
