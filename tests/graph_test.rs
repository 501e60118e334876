use proptest::prelude::*;
use strata::graph::{Graph, GraphStore, GraphType, VertexId};
use strata::{Context, Element, GraphError, Handle, Status};

fn create(ctx: &mut Context, directed: bool, loops: bool, multiple: bool, weighted: bool) -> Handle {
    let mut g = Handle::NULL;
    assert_eq!(ctx.graph_create(directed, loops, multiple, weighted, &mut g), Status::Success);
    g
}

fn add_vertices(ctx: &mut Context, g: Handle, n: usize) -> Vec<u64> {
    (0..n)
        .map(|_| {
            let mut v = 0;
            assert_eq!(ctx.graph_add_vertex(g, &mut v), Status::Success);
            v
        })
        .collect()
}

fn drain_ids(ctx: &mut Context, it: Handle) -> Vec<u64> {
    let mut out = Vec::new();
    let mut more = false;
    while ctx.it_has_next(it, &mut more) == Status::Success && more {
        let mut id = 0;
        assert_eq!(ctx.it_next_int(it, &mut id), Status::Success);
        out.push(id as u64);
    }
    out
}

#[test]
fn test_self_loop_rejected_leaves_graph_unchanged() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, false, false, false, false);
    let v = add_vertices(&mut ctx, g, 1);

    let mut e = 99;
    assert_eq!(ctx.graph_add_edge(g, v[0], v[0], None, &mut e), Status::IllegalArgument);
    assert_eq!(e, 99);
    let mut m = 7;
    ctx.graph_edges_count(g, &mut m);
    assert_eq!(m, 0);
}

#[test]
fn test_multiple_edges_rejected_in_both_directions_when_undirected() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, false, false, false, false);
    let v = add_vertices(&mut ctx, g, 2);
    let mut e = 0;
    assert_eq!(ctx.graph_add_edge(g, v[0], v[1], None, &mut e), Status::Success);
    assert_eq!(ctx.graph_add_edge(g, v[1], v[0], None, &mut e), Status::IllegalArgument);

    let directed = create(&mut ctx, true, false, false, false);
    let v = add_vertices(&mut ctx, directed, 2);
    assert_eq!(ctx.graph_add_edge(directed, v[0], v[1], None, &mut e), Status::Success);
    assert_eq!(ctx.graph_add_edge(directed, v[1], v[0], None, &mut e), Status::Success);
}

#[test]
fn test_given_ids() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, true, false, false, true);
    let mut added = false;
    assert_eq!(ctx.graph_add_given_vertex(g, 5, &mut added), Status::Success);
    assert!(added);
    assert_eq!(ctx.graph_add_given_vertex(g, 5, &mut added), Status::Success);
    assert!(!added);

    // auto ids skip taken ones
    let v = add_vertices(&mut ctx, g, 6);
    assert!(!v.contains(&5));

    assert_eq!(ctx.graph_add_given_edge(g, 5, v[0], 100, Some(2.5), &mut added), Status::Success);
    assert!(added);
    let mut weight = 0.0;
    ctx.graph_get_edge_weight(g, 100, &mut weight);
    assert_eq!(weight, 2.5);

    // retired ids stay retired
    assert_eq!(ctx.graph_remove_vertex(g, 5), Status::Success);
    assert_eq!(ctx.graph_add_given_vertex(g, 5, &mut added), Status::IllegalArgument);
    let mut exists = true;
    ctx.graph_contains_edge(g, 100, &mut exists);
    assert!(!exists);
}

#[test]
fn test_remove_vertex_removes_incident_edges() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, true, false, false, false);
    let v = add_vertices(&mut ctx, g, 3);
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], None, &mut e);
    ctx.graph_add_edge(g, v[1], v[2], None, &mut e);
    ctx.graph_add_edge(g, v[2], v[0], None, &mut e);

    assert_eq!(ctx.graph_remove_vertex(g, v[1]), Status::Success);
    let mut m = 0;
    ctx.graph_edges_count(g, &mut m);
    assert_eq!(m, 1);
    let mut degree = 0;
    ctx.graph_outdegree_of(g, v[0], &mut degree);
    assert_eq!(degree, 0);
    ctx.graph_indegree_of(g, v[0], &mut degree);
    assert_eq!(degree, 1);
    assert_eq!(ctx.graph_degree_of(g, v[1], &mut degree), Status::NoSuchElement);
}

#[test]
fn test_directed_incidence_queries() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, true, false, true, false);
    let v = add_vertices(&mut ctx, g, 3);
    let mut e = [0u64; 4];
    ctx.graph_add_edge(g, v[0], v[1], None, &mut e[0]);
    ctx.graph_add_edge(g, v[0], v[1], None, &mut e[1]);
    ctx.graph_add_edge(g, v[1], v[0], None, &mut e[2]);
    ctx.graph_add_edge(g, v[2], v[0], None, &mut e[3]);

    let mut it = Handle::NULL;
    ctx.graph_edges_between_it(g, v[0], v[1], &mut it);
    assert_eq!(drain_ids(&mut ctx, it), vec![e[0], e[1]]);

    ctx.graph_out_edges_of_it(g, v[0], &mut it);
    assert_eq!(drain_ids(&mut ctx, it).len(), 2);
    ctx.graph_in_edges_of_it(g, v[0], &mut it);
    let mut incoming = drain_ids(&mut ctx, it);
    incoming.sort_unstable();
    assert_eq!(incoming, vec![e[2], e[3]]);

    let mut between = false;
    ctx.graph_contains_edge_between(g, v[0], v[2], &mut between);
    assert!(!between);
    ctx.graph_contains_edge_between(g, v[2], v[0], &mut between);
    assert!(between);

    let mut source = 0;
    let mut target = 0;
    ctx.graph_edge_source(g, e[3], &mut source);
    ctx.graph_edge_target(g, e[3], &mut target);
    assert_eq!((source, target), (v[2], v[0]));
}

#[test]
fn test_unweighted_graph_weights() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, false, false, false, false);
    let v = add_vertices(&mut ctx, g, 2);
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], None, &mut e);
    let mut w = 0.0;
    assert_eq!(ctx.graph_get_edge_weight(g, e, &mut w), Status::Success);
    assert_eq!(w, 1.0);
    assert_eq!(ctx.graph_set_edge_weight(g, e, 3.0), Status::IllegalArgument);
    assert_eq!(ctx.graph_add_edge(g, v[0], v[1], Some(2.0), &mut e), Status::IllegalArgument);
}

#[test]
fn test_nan_weight_rejected() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, false, false, false, true);
    let v = add_vertices(&mut ctx, g, 2);
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], Some(4.0), &mut e);
    assert_eq!(ctx.graph_set_edge_weight(g, e, f64::NAN), Status::IllegalArgument);
    let mut w = 0.0;
    ctx.graph_get_edge_weight(g, e, &mut w);
    assert_eq!(w, 4.0);
}

#[test]
fn test_edge_reversed_view_is_live() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, true, false, false, true);
    let v = add_vertices(&mut ctx, g, 2);
    let mut reversed = Handle::NULL;
    assert_eq!(ctx.graph_as_edge_reversed(g, &mut reversed), Status::Success);

    // mutation of the base after the view was made is visible through it
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], Some(2.0), &mut e);
    let (mut s, mut t) = (0, 0);
    ctx.graph_edge_source(reversed, e, &mut s);
    ctx.graph_edge_target(reversed, e, &mut t);
    assert_eq!((s, t), (v[1], v[0]));

    // adding through the view lands reversed in the base
    let mut e2 = 0;
    assert_eq!(ctx.graph_add_edge(reversed, v[1], v[0], None, &mut e2), Status::IllegalArgument);
    ctx.graph_remove_edge(g, e);
    assert_eq!(ctx.graph_add_edge(reversed, v[0], v[1], None, &mut e2), Status::Success);
    ctx.graph_edge_source(g, e2, &mut s);
    assert_eq!(s, v[1]);
}

#[test]
fn test_undirected_view_of_directed_graph() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, true, false, false, false);
    let v = add_vertices(&mut ctx, g, 3);
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], None, &mut e);
    ctx.graph_add_edge(g, v[2], v[0], None, &mut e);

    let mut undirected = Handle::NULL;
    ctx.graph_as_undirected(g, &mut undirected);
    let mut degree = 0;
    ctx.graph_degree_of(undirected, v[0], &mut degree);
    assert_eq!(degree, 2);
    let mut between = false;
    ctx.graph_contains_edge_between(undirected, v[1], v[0], &mut between);
    assert!(between);

    let mut graph_type = strata::GraphType::default();
    ctx.graph_type(undirected, &mut graph_type);
    assert!(!graph_type.directed);

    assert_eq!(ctx.graph_add_edge(undirected, v[1], v[2], None, &mut e), Status::UnsupportedOperation);
    let mut added = 0;
    assert_eq!(ctx.graph_add_vertex(undirected, &mut added), Status::Success);
    let mut n = 0;
    ctx.graph_vertices_count(g, &mut n);
    assert_eq!(n, 4);
}

#[test]
fn test_unmodifiable_and_unweighted_views() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, false, false, false, true);
    let v = add_vertices(&mut ctx, g, 2);
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[1], Some(5.0), &mut e);

    let mut frozen = Handle::NULL;
    ctx.graph_as_unmodifiable(g, &mut frozen);
    let mut x = 0;
    assert_eq!(ctx.graph_add_vertex(frozen, &mut x), Status::UnsupportedOperation);
    assert_eq!(ctx.graph_remove_edge(frozen, e), Status::UnsupportedOperation);
    let mut graph_type = strata::GraphType::default();
    ctx.graph_type(frozen, &mut graph_type);
    assert!(!graph_type.modifiable);

    let mut plain = Handle::NULL;
    ctx.graph_as_unweighted(g, &mut plain);
    let mut w = 0.0;
    ctx.graph_get_edge_weight(plain, e, &mut w);
    assert_eq!(w, 1.0);
    assert_eq!(ctx.graph_set_edge_weight(plain, e, 2.0), Status::UnsupportedOperation);
    ctx.graph_get_edge_weight(g, e, &mut w);
    assert_eq!(w, 5.0);

    // views keep working after the base handle is released
    ctx.destroy(g);
    let mut n = 0;
    assert_eq!(ctx.graph_vertices_count(plain, &mut n), Status::Success);
    assert_eq!(n, 2);
}

#[test]
fn test_sparse_graph_from_edge_list() {
    let mut ctx = Context::default();
    let mut list = Handle::NULL;
    ctx.list_create(&mut list);
    ctx.list_add(list, Element::EdgeTriple(0, 1, 2.0));
    ctx.list_add(list, Element::EdgeTriple(1, 2, 3.0));
    ctx.list_add(list, Element::EdgePair(2, 3));

    let mut g = Handle::NULL;
    assert_eq!(ctx.graph_sparse_create(4, list, true, true, &mut g), Status::Success);
    let (mut n, mut m) = (0, 0);
    ctx.graph_vertices_count(g, &mut n);
    ctx.graph_edges_count(g, &mut m);
    assert_eq!((n, m), (4, 3));

    let mut w = 0.0;
    ctx.graph_get_edge_weight(g, 1, &mut w);
    assert_eq!(w, 3.0);
    ctx.graph_get_edge_weight(g, 2, &mut w);
    assert_eq!(w, 1.0);

    let mut v = 0;
    assert_eq!(ctx.graph_add_vertex(g, &mut v), Status::UnsupportedOperation);
    assert_eq!(ctx.graph_remove_edge(g, 0), Status::UnsupportedOperation);
    assert_eq!(ctx.graph_set_edge_weight(g, 0, 7.5), Status::Success);
    ctx.graph_get_edge_weight(g, 0, &mut w);
    assert_eq!(w, 7.5);

    let mut bad = Handle::NULL;
    ctx.list_add(list, Element::EdgePair(3, 9));
    assert_eq!(ctx.graph_sparse_create(4, list, true, true, &mut bad), Status::NoSuchElement);
    assert!(bad.is_null());
}

#[test]
fn test_as_sparse_copies_structure() {
    let mut ctx = Context::default();
    let g = create(&mut ctx, false, false, false, true);
    let v = add_vertices(&mut ctx, g, 3);
    let mut e = 0;
    ctx.graph_add_edge(g, v[0], v[2], Some(4.0), &mut e);

    let mut sparse = Handle::NULL;
    assert_eq!(ctx.graph_as_sparse(g, &mut sparse), Status::Success);
    let mut m = 0;
    ctx.graph_edges_count(sparse, &mut m);
    assert_eq!(m, 1);
    let mut between = false;
    ctx.graph_contains_edge_between(sparse, v[2], v[0], &mut between);
    assert!(between);

    // the copy does not follow later changes
    ctx.graph_add_edge(g, v[0], v[1], None, &mut e);
    ctx.graph_edges_count(sparse, &mut m);
    assert_eq!(m, 1);
}

#[derive(Debug, Clone)]
enum Mutation {
    AddVertex,
    RemoveVertex(usize),
    AddEdge(usize, usize),
    RemoveEdge(usize),
}

fn arb_mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        3 => Just(Mutation::AddVertex),
        1 => (0usize..32).prop_map(Mutation::RemoveVertex),
        5 => (0usize..32, 0usize..32).prop_map(|(a, b)| Mutation::AddEdge(a, b)),
        1 => (0usize..64).prop_map(Mutation::RemoveEdge),
    ]
}

fn apply(g: &mut GraphStore, ops: &[Mutation]) {
    for op in ops {
        let vertices = g.vertices();
        let edges = g.edges();
        let pick_vertex = |i: usize| vertices.get(i % vertices.len().max(1)).copied();
        match op {
            Mutation::AddVertex => {
                g.add_vertex().unwrap();
            }
            Mutation::RemoveVertex(i) => {
                if let Some(v) = pick_vertex(*i) {
                    g.remove_vertex(v).unwrap();
                }
            }
            Mutation::AddEdge(a, b) => {
                if let (Some(u), Some(v)) = (pick_vertex(*a), pick_vertex(*b)) {
                    let before = g.edge_count();
                    match g.add_edge(u, v, None) {
                        Ok(_) => assert_eq!(g.edge_count(), before + 1),
                        Err(GraphError::SelfLoopForbidden(_)) | Err(GraphError::MultipleEdgesForbidden(..)) => {
                            assert_eq!(g.edge_count(), before)
                        }
                        Err(other) => panic!("unexpected error {other}"),
                    }
                }
            }
            Mutation::RemoveEdge(i) => {
                if let Some(e) = edges.get(i % edges.len().max(1)) {
                    g.remove_edge(*e).unwrap();
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_store_invariants_hold(
        directed in any::<bool>(),
        loops in any::<bool>(),
        multiple in any::<bool>(),
        ops in prop::collection::vec(arb_mutation(), 1..120),
    ) {
        let mut g = GraphStore::new(GraphType::new(directed, loops, multiple, false));
        apply(&mut g, &ops);

        let vertices = g.vertices();
        prop_assert_eq!(vertices.len(), g.vertex_count());
        let mut pairs = std::collections::HashSet::new();
        for e in g.edges() {
            let s = g.edge_source(e).unwrap();
            let t = g.edge_target(e).unwrap();
            prop_assert!(g.contains_vertex(s) && g.contains_vertex(t));
            if !loops {
                prop_assert_ne!(s, t);
            }
            if !multiple {
                let key = if directed || s.0 <= t.0 { (s, t) } else { (t, s) };
                prop_assert!(pairs.insert(key), "duplicate edge between {:?} and {:?}", s, t);
            }
        }
        if directed {
            let out: usize = vertices.iter().map(|v| g.out_degree_of(*v).unwrap()).sum();
            let inc: usize = vertices.iter().map(|v| g.in_degree_of(*v).unwrap()).sum();
            prop_assert_eq!(out, g.edge_count());
            prop_assert_eq!(inc, g.edge_count());
        } else {
            let total: usize = vertices.iter().map(|v| g.degree_of(*v).unwrap()).sum();
            prop_assert_eq!(total, 2 * g.edge_count());
        }
    }

    #[test]
    fn prop_auto_ids_are_never_reissued(ops in prop::collection::vec(arb_mutation(), 1..80)) {
        let mut g = GraphStore::new(GraphType::new(false, false, false, false));
        let mut issued = std::collections::HashSet::new();
        for op in &ops {
            apply(&mut g, std::slice::from_ref(op));
            for v in g.vertices() {
                issued.insert(v);
            }
        }
        let fresh = g.add_vertex().unwrap();
        prop_assert!(!issued.contains(&fresh));
        prop_assert_eq!(g.add_given_vertex(VertexId(fresh.0)).unwrap(), false);
    }
}
