//! Connectivity and clustering
//!
//! Components are returned as clustering objects, with a scalar connectivity flag.

use crate::algo::timed;
use crate::context::Context;
use crate::error::Status;
use crate::handle::{Handle, Object};
use strata_algorithms::{community, LabelPropagationConfig};

impl Context {
    /// Weak components by union find
    pub fn connectivity_weak_exec_bfs(&mut self, graph: Handle, is_connected: &mut bool, components: &mut Handle) -> Status {
        self.run("connectivity_weak_exec_bfs", |ctx| {
            let view = ctx.view_of(graph)?;
            let clustering = timed("weak components", &view, |v| Ok(community::weakly_connected_components(v)))?;
            let connected = clustering.number_of_clusters() <= 1;
            *components = ctx.register(Object::Clustering(clustering))?;
            *is_connected = connected;
            Ok(())
        })
    }

    /// Strong components by Kosaraju's algorithm
    pub fn connectivity_strong_exec_kosaraju(
        &mut self,
        graph: Handle,
        is_connected: &mut bool,
        components: &mut Handle,
    ) -> Status {
        self.run("connectivity_strong_exec_kosaraju", |ctx| {
            let view = ctx.view_of(graph)?;
            let clustering = timed("strong components", &view, |v| Ok(community::strongly_connected_components(v)))?;
            let connected = clustering.number_of_clusters() <= 1;
            *components = ctx.register(Object::Clustering(clustering))?;
            *is_connected = connected;
            Ok(())
        })
    }

    /// `max_iterations` of 0 runs until labels are stable
    pub fn clustering_exec_label_propagation(
        &mut self,
        graph: Handle,
        max_iterations: usize,
        seed: u64,
        res: &mut Handle,
    ) -> Status {
        self.run("clustering_exec_label_propagation", |ctx| {
            let view = ctx.view_of(graph)?;
            let config = LabelPropagationConfig { max_iterations, seed };
            let clustering = timed("label propagation", &view, |v| Ok(community::label_propagation(v, config)))?;
            *res = ctx.register(Object::Clustering(clustering))?;
            Ok(())
        })
    }

    /// `k` clusters from a minimum spanning forest with its heaviest edges removed
    pub fn clustering_exec_k_spanning_tree(&mut self, graph: Handle, k: usize, res: &mut Handle) -> Status {
        self.run("clustering_exec_k_spanning_tree", |ctx| {
            let view = ctx.view_of(graph)?;
            let clustering = timed("k spanning tree", &view, |v| Ok(community::k_spanning_tree_clustering(v, k)?))?;
            *res = ctx.register(Object::Clustering(clustering))?;
            Ok(())
        })
    }
}
