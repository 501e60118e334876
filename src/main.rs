use strata::{Context, ContextConfig, Element, Handle, PageRankConfig, Status};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing, RUST_LOG=debug shows per-algorithm timings
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Strata Graph Engine v{}", strata::version());
    println!("==========================================");
    println!();

    let config = match std::env::args().nth(1).map(std::fs::read_to_string) {
        Some(Ok(json)) => match ContextConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid context configuration: {}", e);
                std::process::exit(2);
            }
        },
        Some(Err(e)) => {
            eprintln!("Cannot read context configuration: {}", e);
            std::process::exit(2);
        }
        None => ContextConfig::default(),
    };
    let mut ctx = Context::new(config);

    demo_shortest_paths(&mut ctx);
    demo_generated_graph(&mut ctx);
    demo_error_channel(&mut ctx);

    println!("\nLive handles at exit: {}", ctx.live_handles());
}

fn check(ctx: &Context, status: Status) -> bool {
    if status.is_success() {
        return true;
    }
    println!("  ✗ {}: {}", status, ctx.error_message().unwrap_or("no message"));
    false
}

fn demo_shortest_paths(ctx: &mut Context) {
    println!("=== Demo 1: Weighted directed graph ===");
    let mut g = Handle::NULL;
    let status = ctx.graph_create(true, false, false, true, &mut g);
    if !check(ctx, status) {
        return;
    }
    let mut v = [0u64; 4];
    for slot in v.iter_mut() {
        ctx.graph_add_vertex(g, slot);
    }
    let mut e = 0;
    for (s, t, w) in [(0, 1, 1.0), (0, 2, 5.0), (1, 3, 3.0), (2, 3, 1.0)] {
        ctx.graph_add_edge(g, v[s], v[t], Some(w), &mut e);
    }
    println!("✓ Created 4 vertices and 4 edges");

    let mut path = None;
    let status = ctx.sp_exec_dijkstra_get_path_between_vertices(g, v[0], v[3], &mut path);
    if check(ctx, status) {
        if let Some(path) = path {
            let (mut weight, mut start, mut end, mut edges) = (0.0, 0, 0, Handle::NULL);
            ctx.graph_path_get_fields(path, &mut weight, &mut start, &mut end, &mut edges);
            println!("✓ Dijkstra {} -> {} costs {}", start, end, weight);
            ctx.destroy(edges);
            ctx.destroy(path);
        }
    }

    let mut ranks = Handle::NULL;
    let status = ctx.scoring_exec_pagerank(g, PageRankConfig::default(), &mut ranks);
    if check(ctx, status) {
        for vertex in v {
            let (mut found, mut score) = (false, 0.0);
            ctx.map_get_double(ranks, &Element::id(vertex), &mut found, &mut score);
            println!("  PageRank of {}: {:.4}", vertex, score);
        }
        ctx.destroy(ranks);
    }
    ctx.destroy(g);
}

fn demo_generated_graph(ctx: &mut Context) {
    println!("\n=== Demo 2: Generated graph ===");
    let mut g = Handle::NULL;
    let status = ctx.graph_create(false, false, false, false, &mut g);
    if !check(ctx, status) {
        return;
    }
    let status = ctx.generate_barabasi_albert(g, 3, 2, 50, 7);
    if !check(ctx, status) {
        return;
    }
    let (mut n, mut m) = (0, 0);
    ctx.graph_vertices_count(g, &mut n);
    ctx.graph_edges_count(g, &mut m);
    println!("✓ Barabási-Albert graph with {} vertices and {} edges", n, m);

    let (mut colors, mut coloring) = (0, Handle::NULL);
    let status = ctx.coloring_exec_greedy_dsatur(g, &mut colors, &mut coloring);
    if check(ctx, status) {
        println!("✓ DSatur uses {} colors", colors);
        ctx.destroy(coloring);
    }
    let mut triangles = 0;
    let status = ctx.graph_metrics_triangles(g, &mut triangles);
    if check(ctx, status) {
        println!("✓ {} triangles", triangles);
    }
    let (mut planar, mut embedding) = (false, None);
    let status = ctx.planarity_exec_left_right(g, &mut planar, &mut embedding);
    if check(ctx, status) {
        println!("✓ Planar: {}", planar);
        if let Some(embedding) = embedding {
            ctx.destroy(embedding);
        }
    }
    ctx.destroy(g);
}

fn demo_error_channel(ctx: &mut Context) {
    println!("\n=== Demo 3: Error channel ===");
    let mut g = Handle::NULL;
    ctx.graph_create(false, false, false, false, &mut g);
    ctx.destroy(g);
    let mut n = 0;
    let status = ctx.graph_vertices_count(g, &mut n);
    println!("Using a destroyed handle: {}", status);
    println!("  message: {}", ctx.error_message().unwrap_or("none"));
    ctx.error_clear();
}
