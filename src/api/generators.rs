//! Generators that grow a caller graph in place

use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::generate;
use crate::graph::{Graph, VertexId};
use crate::handle::Handle;
use tracing::debug;

impl Context {
    fn generate_into<F>(&mut self, op: &'static str, graph: Handle, generator: F) -> Status
    where
        F: FnOnce(&mut dyn Graph) -> GraphResult<Vec<VertexId>>,
    {
        self.run(op, |ctx| {
            let shared = ctx.shared_graph(graph)?;
            let mut guard = shared.write();
            let added = generator(&mut *guard)?;
            debug!("{} added {} vertices, graph now has {} edges", op, added.len(), guard.edge_count());
            Ok(())
        })
    }

    pub fn generate_empty(&mut self, graph: Handle, n: usize) -> Status {
        self.generate_into("generate_empty", graph, |g| generate::empty(g, n))
    }

    pub fn generate_complete(&mut self, graph: Handle, n: usize) -> Status {
        self.generate_into("generate_complete", graph, |g| generate::complete(g, n))
    }

    pub fn generate_bipartite_complete(&mut self, graph: Handle, a: usize, b: usize) -> Status {
        self.generate_into("generate_bipartite_complete", graph, |g| generate::complete_bipartite(g, a, b))
    }

    pub fn generate_ring(&mut self, graph: Handle, n: usize) -> Status {
        self.generate_into("generate_ring", graph, |g| generate::ring(g, n))
    }

    pub fn generate_gnp_random(&mut self, graph: Handle, n: usize, p: f64, create_loops: bool, seed: u64) -> Status {
        self.generate_into("generate_gnp_random", graph, |g| generate::gnp_random(g, n, p, create_loops, seed))
    }

    pub fn generate_gnm_random(
        &mut self,
        graph: Handle,
        n: usize,
        m: usize,
        loops: bool,
        multiple_edges: bool,
        seed: u64,
    ) -> Status {
        self.generate_into("generate_gnm_random", graph, |g| {
            generate::gnm_random(g, n, m, loops, multiple_edges, seed)
        })
    }

    /// Preferential attachment: a complete core of `m0` vertices grown to `n`, each new
    /// vertex attaching `m` edges
    pub fn generate_barabasi_albert(&mut self, graph: Handle, m0: usize, m: usize, n: usize, seed: u64) -> Status {
        self.generate_into("generate_barabasi_albert", graph, |g| generate::barabasi_albert(g, m0, m, n, seed))
    }

    pub fn generate_watts_strogatz(
        &mut self,
        graph: Handle,
        n: usize,
        k: usize,
        p: f64,
        add_instead_of_rewire: bool,
        seed: u64,
    ) -> Status {
        self.generate_into("generate_watts_strogatz", graph, |g| {
            generate::watts_strogatz(g, n, k, p, add_instead_of_rewire, seed)
        })
    }
}
