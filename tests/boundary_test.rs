use strata::{Context, ContextConfig, Element, Handle, ObjectKind, Status};

fn undirected_graph(ctx: &mut Context) -> Handle {
    let mut g = Handle::NULL;
    assert_eq!(ctx.graph_create(false, false, false, true, &mut g), Status::Success);
    g
}

#[test]
fn test_destroyed_handle_fails_and_records_error() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    assert_eq!(ctx.destroy(g), Status::Success);

    let mut count = 42;
    let status = ctx.graph_vertices_count(g, &mut count);
    assert_ne!(status, Status::Success);
    assert_eq!(status, Status::UseAfterFree);
    assert_eq!(count, 42, "output slot must be left alone on failure");
    assert_eq!(ctx.error_code(), Status::UseAfterFree);
    assert!(ctx.error_message().is_some());

    // a second destroy is also a use after free
    assert_eq!(ctx.destroy(g), Status::UseAfterFree);
}

#[test]
fn test_stale_handle_does_not_alias_reused_slot() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    ctx.destroy(g);

    let mut list = Handle::NULL;
    assert_eq!(ctx.list_create(&mut list), Status::Success);
    assert_ne!(g, list);

    let mut kind = ObjectKind::Graph;
    assert_eq!(ctx.handle_kind(list, &mut kind), Status::Success);
    assert_eq!(kind, ObjectKind::List);
    assert_eq!(ctx.handle_kind(g, &mut kind), Status::UseAfterFree);
}

#[test]
fn test_success_does_not_clear_error_channel() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    let mut v = 0;
    ctx.graph_add_vertex(g, &mut v);

    let mut e = 0;
    assert_eq!(ctx.graph_add_edge(g, v, v, None, &mut e), Status::IllegalArgument);
    let message = ctx.error_message().map(str::to_owned);
    assert!(message.is_some());

    let mut n = 0;
    assert_eq!(ctx.graph_vertices_count(g, &mut n), Status::Success);
    assert_eq!(ctx.error_code(), Status::IllegalArgument);
    assert_eq!(ctx.error_message().map(str::to_owned), message);

    ctx.error_clear();
    assert_eq!(ctx.error_code(), Status::Success);
    assert!(ctx.error_message().is_none());
}

#[test]
fn test_latest_failure_wins() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    let mut e = 0;
    assert_eq!(ctx.graph_add_edge(g, 1, 2, None, &mut e), Status::NoSuchElement);
    ctx.destroy(g);
    let mut n = 0;
    ctx.graph_edges_count(g, &mut n);
    assert_eq!(ctx.error_code(), Status::UseAfterFree);
}

#[test]
fn test_wrong_handle_kind_is_illegal_argument() {
    let mut ctx = Context::default();
    let mut list = Handle::NULL;
    ctx.list_create(&mut list);
    let mut n = 0;
    assert_eq!(ctx.graph_vertices_count(list, &mut n), Status::IllegalArgument);
    assert!(ctx.error_message().unwrap_or_default().contains("list"));
}

#[test]
fn test_null_handle_is_never_live() {
    let mut ctx = Context::default();
    assert!(Handle::NULL.is_null());
    let mut n = 0;
    assert_ne!(ctx.graph_vertices_count(Handle::NULL, &mut n), Status::Success);
    assert_ne!(ctx.destroy(Handle::NULL), Status::Success);
}

#[test]
fn test_handle_limit_from_config() {
    let config = ContextConfig::from_json(r#"{ "max_handles": 2 }"#).unwrap();
    let mut ctx = Context::new(config);
    let (mut a, mut b, mut c) = (Handle::NULL, Handle::NULL, Handle::NULL);
    assert_eq!(ctx.list_create(&mut a), Status::Success);
    assert_eq!(ctx.set_create(&mut b), Status::Success);
    assert_eq!(ctx.map_create(&mut c), Status::IllegalArgument);
    assert!(c.is_null());

    ctx.destroy(a);
    assert_eq!(ctx.map_create(&mut c), Status::Success);
    assert_eq!(ctx.live_handles(), 2);
}

#[test]
fn test_backtrace_only_when_configured() {
    let mut quiet = Context::default();
    let mut n = 0;
    quiet.graph_vertices_count(Handle::NULL, &mut n);
    assert!(quiet.error_backtrace().is_none());

    let config = ContextConfig {
        capture_backtrace: true,
        ..ContextConfig::default()
    };
    let mut verbose = Context::new(config);
    verbose.graph_vertices_count(Handle::NULL, &mut n);
    assert!(verbose.error_backtrace().is_some());
}

#[test]
fn test_contexts_are_independent() {
    let mut first = Context::default();
    let mut second = Context::default();
    let g = undirected_graph(&mut first);
    let mut n = 0;
    assert_eq!(first.graph_vertices_count(g, &mut n), Status::Success);

    // same slot index in the other context holds nothing
    assert_ne!(second.graph_vertices_count(g, &mut n), Status::Success);
    assert_eq!(first.error_code(), Status::Success);
}

#[test]
fn test_result_objects_outlive_their_graph() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    let mut v = [0u64; 3];
    for slot in v.iter_mut() {
        ctx.graph_add_vertex(g, slot);
    }
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], Some(1.0), &mut e);
    ctx.graph_add_edge(g, v[1], v[2], Some(1.0), &mut e);

    let mut it = Handle::NULL;
    assert_eq!(ctx.graph_vertices_it(g, &mut it), Status::Success);
    ctx.destroy(g);

    let mut seen = Vec::new();
    let mut has_next = true;
    while ctx.it_has_next(it, &mut has_next) == Status::Success && has_next {
        let mut id = 0;
        assert_eq!(ctx.it_next_int(it, &mut id), Status::Success);
        seen.push(id as u64);
    }
    assert_eq!(seen, v.to_vec());

    let mut id = 0;
    assert_eq!(ctx.it_next_int(it, &mut id), Status::NoSuchElement);
}

#[test]
fn test_raw_handle_round_trip() {
    let mut ctx = Context::default();
    let mut map = Handle::NULL;
    ctx.map_create(&mut map);
    let raw = map.to_raw();
    let back = Handle::from_raw(raw);
    assert_eq!(back, map);
    assert_eq!(ctx.map_put(back, Element::Int(1), Element::Double(2.0)), Status::Success);
}

#[test]
fn test_null_handle_fails_while_slot_zero_is_live() {
    let mut ctx = Context::default();
    // the first registration takes slot 0
    let g = undirected_graph(&mut ctx);
    let mut n = 0;
    assert_eq!(ctx.graph_vertices_count(g, &mut n), Status::Success);
    assert_eq!(ctx.graph_vertices_count(Handle::NULL, &mut n), Status::IllegalArgument);
    assert_eq!(ctx.destroy(Handle::NULL), Status::IllegalArgument);
    assert_eq!(ctx.live_handles(), 1);
}

#[test]
fn test_failed_call_releases_the_handles_it_registered() {
    let config = ContextConfig::from_json(r#"{ "max_handles": 2 }"#).unwrap();
    let mut ctx = Context::new(config);
    let mut g = Handle::NULL;
    assert_eq!(ctx.graph_create(true, false, false, true, &mut g), Status::Success);
    let (mut s, mut t) = (0, 0);
    ctx.graph_add_vertex(g, &mut s);
    ctx.graph_add_vertex(g, &mut t);
    let mut e = 0;
    ctx.graph_add_edge(g, s, t, Some(3.0), &mut e);

    // flows fit in the one free slot, the source partition does not
    let (mut value, mut flows, mut partition) = (0.0, Handle::NULL, Handle::NULL);
    assert_eq!(
        ctx.maxflow_exec_dinic(g, s, t, &mut value, &mut flows, &mut partition),
        Status::IllegalArgument
    );
    assert!(flows.is_null());
    assert!(partition.is_null());
    assert_eq!(ctx.live_handles(), 1);

    // the released slot is usable again
    let mut list = Handle::NULL;
    assert_eq!(ctx.list_create(&mut list), Status::Success);
    assert_eq!(ctx.live_handles(), 2);
}

#[test]
fn test_object_item_survives_a_full_registry() {
    let config = ContextConfig::from_json(r#"{ "max_handles": 3 }"#).unwrap();
    let mut ctx = Context::new(config);
    let mut g = Handle::NULL;
    ctx.graph_create(true, false, false, false, &mut g);
    let mut v = [0; 3];
    for id in v.iter_mut() {
        ctx.graph_add_vertex(g, id);
    }
    let mut e = 0;
    for (s, t) in [(0, 1), (1, 2), (2, 0)] {
        ctx.graph_add_edge(g, v[s], v[t], None, &mut e);
    }
    let mut it = Handle::NULL;
    assert_eq!(ctx.cycles_simple_enumeration_exec_johnson(g, &mut it), Status::Success);
    let mut filler = Handle::NULL;
    assert_eq!(ctx.list_create(&mut filler), Status::Success);

    let mut cycle = Handle::NULL;
    assert_eq!(ctx.it_next_object(it, &mut cycle), Status::IllegalArgument);
    assert!(cycle.is_null());
    let mut more = false;
    ctx.it_has_next(it, &mut more);
    assert!(more, "the cycle stays in the iterator");

    ctx.destroy(filler);
    assert_eq!(ctx.it_next_object(it, &mut cycle), Status::Success);
    let mut len = 0;
    assert_eq!(ctx.list_size(cycle, &mut len), Status::Success);
    assert_eq!(len, 3);
    ctx.it_has_next(it, &mut more);
    assert!(!more);
}

#[test]
fn test_sparse_graphs_respect_the_vertex_limit() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    let mut added = false;
    assert_eq!(ctx.graph_add_given_vertex(g, 1 << 40, &mut added), Status::Success);
    assert!(added);
    let mut sparse = Handle::NULL;
    assert_eq!(ctx.graph_as_sparse(g, &mut sparse), Status::IllegalArgument);
    assert!(sparse.is_null());

    let mut edges = Handle::NULL;
    ctx.list_create(&mut edges);
    assert_eq!(ctx.graph_sparse_create(usize::MAX, edges, false, false, &mut sparse), Status::IllegalArgument);

    let config = ContextConfig::from_json(r#"{ "max_sparse_vertices": 4 }"#).unwrap();
    let mut small = Context::new(config);
    let mut empty = Handle::NULL;
    small.list_create(&mut empty);
    assert_eq!(small.graph_sparse_create(4, empty, false, false, &mut sparse), Status::Success);
    assert_eq!(small.graph_sparse_create(5, empty, false, false, &mut sparse), Status::IllegalArgument);
}

#[test]
fn test_ids_beyond_signed_range_are_rejected() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    let mut added = false;
    assert_eq!(ctx.graph_add_given_vertex(g, (1 << 63) + 5, &mut added), Status::IllegalArgument);
    assert_eq!(ctx.graph_add_given_vertex(g, i64::MAX as u64, &mut added), Status::Success);
    assert!(added);
    let mut n = 0;
    ctx.graph_vertices_count(g, &mut n);
    assert_eq!(n, 1);

    let mut v = 0;
    ctx.graph_add_vertex(g, &mut v);
    assert_eq!(ctx.graph_add_given_edge(g, i64::MAX as u64, v, u64::MAX, None, &mut added), Status::IllegalArgument);
    ctx.graph_edges_count(g, &mut n);
    assert_eq!(n, 0);
}

#[test]
fn test_nan_weight_leaves_graph_unchanged() {
    let mut ctx = Context::default();
    let g = undirected_graph(&mut ctx);
    let (mut a, mut b) = (0, 0);
    ctx.graph_add_vertex(g, &mut a);
    ctx.graph_add_vertex(g, &mut b);
    let mut e = 0;
    assert_eq!(ctx.graph_add_edge(g, a, b, Some(f64::NAN), &mut e), Status::IllegalArgument);
    let mut n = 0;
    ctx.graph_edges_count(g, &mut n);
    assert_eq!(n, 0);
    assert_eq!(ctx.graph_add_edge(g, a, b, Some(1.5), &mut e), Status::Success);
    assert_eq!(ctx.graph_set_edge_weight(g, e, f64::NAN), Status::IllegalArgument);
}

#[test]
fn test_generator_into_undirected_view_of_directed_graph_adds_nothing() {
    let mut ctx = Context::default();
    let mut g = Handle::NULL;
    ctx.graph_create(true, false, false, false, &mut g);
    let mut view = Handle::NULL;
    assert_eq!(ctx.graph_as_undirected(g, &mut view), Status::Success);

    assert_eq!(ctx.generate_complete(view, 4), Status::UnsupportedOperation);
    assert_eq!(ctx.generate_ring(view, 5), Status::UnsupportedOperation);
    let mut n = 0;
    ctx.graph_vertices_count(g, &mut n);
    assert_eq!(n, 0);

    // vertices alone are fine
    assert_eq!(ctx.generate_empty(view, 3), Status::Success);
    ctx.graph_vertices_count(g, &mut n);
    assert_eq!(n, 3);
}
