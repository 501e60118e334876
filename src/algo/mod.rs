//! Graph algorithms module
//!
//! Algorithms are implemented in the `strata-algorithms` crate over a read-only CSR
//! snapshot. This module provides the integration/adapter layer: it projects any
//! [`Graph`] (store, sparse graph or view) into a [`GraphView`] and times each run.

use crate::error::GraphResult;
use crate::graph::{Graph, SharedGraph};
use std::sync::Arc;
use std::time::Instant;
use strata_algorithms::GraphView;
use tracing::debug;

/// Build a GraphView from a graph for algorithm execution
///
/// Vertex order and edge order follow the graph's iteration order, so results that
/// depend on visit order are deterministic for a given sequence of mutations.
pub fn build_view(graph: &dyn Graph) -> GraphResult<GraphView> {
    let graph_type = graph.graph_type();
    let nodes = graph.vertices().into_iter().map(|v| v.0).collect();
    let mut edge_list = Vec::with_capacity(graph.edge_count());
    for e in graph.edges() {
        edge_list.push((
            e.0,
            graph.edge_source(e)?.0,
            graph.edge_target(e)?.0,
            graph.edge_weight(e)?,
        ));
    }
    Ok(GraphView::build(nodes, edge_list, graph_type.directed, graph_type.weighted)?)
}

/// Snapshot a shared graph under its read lock
pub fn snapshot(graph: &SharedGraph) -> GraphResult<GraphView> {
    let guard = graph.read();
    build_view(&*guard)
}

/// Snapshot for lazily evaluated results that outlive the call
pub fn shared_snapshot(graph: &SharedGraph) -> GraphResult<Arc<GraphView>> {
    snapshot(graph).map(Arc::new)
}

/// Run one algorithm over a snapshot and log how long it took
pub fn timed<T, F>(name: &str, view: &GraphView, run: F) -> GraphResult<T>
where
    F: FnOnce(&GraphView) -> GraphResult<T>,
{
    let started = Instant::now();
    let result = run(view);
    debug!(
        "{} on {} vertices and {} edges finished in {:?}",
        name,
        view.node_count,
        view.edge_count(),
        started.elapsed()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{shared, GraphStore, GraphType, VertexId, ViewGraph, ViewKind};

    fn diamond() -> GraphStore {
        let mut g = GraphStore::new(GraphType::new(true, false, false, true));
        for _ in 0..4 {
            g.add_vertex().unwrap();
        }
        g.add_edge(VertexId(0), VertexId(1), Some(1.0)).unwrap();
        g.add_edge(VertexId(0), VertexId(2), Some(5.0)).unwrap();
        g.add_edge(VertexId(1), VertexId(3), Some(1.0)).unwrap();
        g.add_edge(VertexId(2), VertexId(3), Some(1.0)).unwrap();
        g
    }

    #[test]
    fn test_build_view() {
        let view = build_view(&diamond()).unwrap();
        assert_eq!(view.node_count, 4);
        assert_eq!(view.edge_count(), 4);
        assert!(view.directed && view.weighted);
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.weight(1), 5.0);
    }

    #[test]
    fn test_view_of_view() {
        let base = shared(diamond());
        let reversed = shared(ViewGraph::new(base, ViewKind::EdgeReversed));
        let view = snapshot(&reversed).unwrap();
        assert_eq!(view.out_degree(3), 2);
        assert_eq!(view.out_degree(0), 0);

        let unweighted = shared(ViewGraph::new(reversed, ViewKind::Unweighted));
        let view = snapshot(&unweighted).unwrap();
        assert!(!view.weighted);
        assert_eq!(view.weight(1), 1.0);
    }

    #[test]
    fn test_timed_passes_result_through() {
        let view = build_view(&diamond()).unwrap();
        let n = timed("count", &view, |v| Ok(v.node_count)).unwrap();
        assert_eq!(n, 4);
    }
}
