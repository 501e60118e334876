use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use strata::{CliqueStrategy, Context, Handle, PageRankConfig, Status};

fn random_graph(ctx: &mut Context, n: usize, m: usize, weighted: bool) -> Handle {
    let mut g = Handle::NULL;
    ctx.graph_create(false, false, false, weighted, &mut g);
    let status = ctx.generate_gnm_random(g, n, m, false, false, 42);
    assert_eq!(status, Status::Success);
    g
}

/// Benchmark vertex and edge insertion through the handle boundary
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut ctx = Context::default();
                let mut g = Handle::NULL;
                ctx.graph_create(true, false, false, true, &mut g);
                let mut prev = 0;
                ctx.graph_add_vertex(g, &mut prev);
                for i in 1..size {
                    let mut v = 0;
                    ctx.graph_add_vertex(g, &mut v);
                    let mut e = 0;
                    ctx.graph_add_edge(g, prev, v, Some((i % 7) as f64), &mut e);
                    prev = v;
                }
            });
        });
    }
    group.finish();
}

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("dijkstra_single_source");

    for size in [100, 1000, 5000].iter() {
        let mut ctx = Context::default();
        let g = random_graph(&mut ctx, *size, size * 4, true);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut tree = Handle::NULL;
                ctx.sp_exec_dijkstra_get_singlesource_from_vertex(g, 0, &mut tree);
                ctx.destroy(tree);
            });
        });
    }
    group.finish();
}

fn bench_pagerank(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagerank");

    for size in [100, 1000, 5000].iter() {
        let mut ctx = Context::default();
        let g = random_graph(&mut ctx, *size, size * 4, false);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut ranks = Handle::NULL;
                ctx.scoring_exec_pagerank(g, PageRankConfig::default(), &mut ranks);
                ctx.destroy(ranks);
            });
        });
    }
    group.finish();
}

fn bench_cliques(c: &mut Criterion) {
    let mut group = c.benchmark_group("bron_kerbosch");
    group.sample_size(20);

    let mut ctx = Context::default();
    let g = random_graph(&mut ctx, 200, 2000, false);
    for strategy in [CliqueStrategy::Pivot, CliqueStrategy::PivotDegeneracy] {
        group.bench_function(format!("{:?}", strategy), |b| {
            b.iter(|| {
                let mut it = Handle::NULL;
                ctx.clique_exec_bron_kerbosch(g, strategy, 0, &mut it);
                ctx.destroy(it);
            });
        });
    }
    group.finish();
}

fn bench_planarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("planarity");

    for size in [100, 1000].iter() {
        let mut ctx = Context::default();
        let mut g = Handle::NULL;
        ctx.graph_create(false, false, false, false, &mut g);
        // rings stay planar
        ctx.generate_ring(g, *size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let (mut planar, mut embedding) = (false, None);
                ctx.planarity_exec_left_right(g, &mut planar, &mut embedding);
                if let Some(embedding) = embedding {
                    ctx.destroy(embedding);
                }
                criterion::black_box(planar);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insertion,
    bench_shortest_paths,
    bench_pagerank,
    bench_cliques,
    bench_planarity
);
criterion_main!(benches);
