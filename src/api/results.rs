//! Accessors for result objects: paths, shortest path trees, clusterings, mappings
//! and planar embeddings

use crate::context::Context;
use crate::error::{GraphError, Status};
use crate::graph::VertexId;
use crate::handle::{Handle, Object};
use crate::iter::HandleIter;

impl Context {
    /// Total weight, endpoints and an iterator over the edges of a path
    pub fn graph_path_get_fields(
        &mut self,
        path: Handle,
        weight: &mut f64,
        start: &mut u64,
        end: &mut u64,
        edges_it: &mut Handle,
    ) -> Status {
        self.run("graph_path_get_fields", |ctx| {
            let p = ctx.registry().path(path)?;
            let (w, s, t) = (p.cost, p.source, p.target);
            let edges = p.edges.clone();
            let it = ctx.register_iter(HandleIter::ids(edges))?;
            *weight = w;
            *start = s;
            *end = t;
            *edges_it = it;
            Ok(())
        })
    }

    pub fn graph_path_vertices_it(&mut self, path: Handle, res: &mut Handle) -> Status {
        self.run("graph_path_vertices_it", |ctx| {
            let vertices = ctx.registry().path(path)?.path.clone();
            *res = ctx.register_iter(HandleIter::ids(vertices))?;
            Ok(())
        })
    }

    /// `res` is `None` when the vertex is unreachable from the source
    pub fn sp_singlesource_get_path_to_vertex(&mut self, paths: Handle, vertex: u64, res: &mut Option<Handle>) -> Status {
        self.run("sp_singlesource_get_path_to_vertex", |ctx| {
            let path = ctx.registry().single_source_paths(paths)?.path_to(vertex)?;
            *res = path.map(|p| ctx.register(Object::Path(p))).transpose()?;
            Ok(())
        })
    }

    /// Infinite when unreachable
    pub fn sp_singlesource_distance(&mut self, paths: Handle, vertex: u64, res: &mut f64) -> Status {
        self.run("sp_singlesource_distance", |ctx| {
            *res = ctx.registry().single_source_paths(paths)?.distance(vertex)?;
            Ok(())
        })
    }

    pub fn sp_allpairs_get_path(&mut self, paths: Handle, source: u64, target: u64, res: &mut Option<Handle>) -> Status {
        self.run("sp_allpairs_get_path", |ctx| {
            let path = ctx.registry().all_pairs_paths(paths)?.path(source, target)?;
            *res = path.map(|p| ctx.register(Object::Path(p))).transpose()?;
            Ok(())
        })
    }

    pub fn sp_allpairs_distance(&mut self, paths: Handle, source: u64, target: u64, res: &mut f64) -> Status {
        self.run("sp_allpairs_distance", |ctx| {
            *res = ctx.registry().all_pairs_paths(paths)?.distance(source, target)?;
            Ok(())
        })
    }

    /// Shortest path tree rooted at `source`, extracted from an all-pairs result
    pub fn sp_allpairs_get_singlesource(&mut self, paths: Handle, source: u64, res: &mut Handle) -> Status {
        self.run("sp_allpairs_get_singlesource", |ctx| {
            let tree = ctx.registry().all_pairs_paths(paths)?.single_source(source)?;
            *res = ctx.register(Object::SingleSourcePaths(tree))?;
            Ok(())
        })
    }

    pub fn clustering_number_of_clusters(&mut self, clustering: Handle, res: &mut usize) -> Status {
        self.run("clustering_number_of_clusters", |ctx| {
            *res = ctx.registry().clustering(clustering)?.number_of_clusters();
            Ok(())
        })
    }

    pub fn clustering_ith_cluster_it(&mut self, clustering: Handle, i: usize, res: &mut Handle) -> Status {
        self.run("clustering_ith_cluster_it", |ctx| {
            let c = ctx.registry().clustering(clustering)?;
            let members = c
                .cluster(i)
                .ok_or_else(|| GraphError::NoSuchElement(format!("cluster {} of {}", i, c.number_of_clusters())))?
                .to_vec();
            *res = ctx.register_iter(HandleIter::ids(members))?;
            Ok(())
        })
    }

    /// Image of a vertex of the first graph (`forward`) or preimage of one of the second
    pub fn mapping_vertex_correspondence(
        &mut self,
        mapping: Handle,
        vertex: u64,
        forward: bool,
        found: &mut bool,
        res: &mut u64,
    ) -> Status {
        self.run("mapping_vertex_correspondence", |ctx| {
            let image = ctx.registry().graph_mapping(mapping)?.vertex_correspondence(vertex, forward);
            *found = image.is_some();
            if let Some(v) = image {
                *res = v;
            }
            Ok(())
        })
    }

    pub fn mapping_edge_correspondence(
        &mut self,
        mapping: Handle,
        edge: u64,
        forward: bool,
        found: &mut bool,
        res: &mut u64,
    ) -> Status {
        self.run("mapping_edge_correspondence", |ctx| {
            let image = ctx.registry().graph_mapping(mapping)?.edge_correspondence(edge, forward);
            *found = image.is_some();
            if let Some(e) = image {
                *res = e;
            }
            Ok(())
        })
    }

    /// Edges around a vertex in cyclic embedding order
    pub fn planar_embedding_edges_around(&mut self, embedding: Handle, vertex: u64, res: &mut Handle) -> Status {
        self.run("planar_embedding_edges_around", |ctx| {
            let edges = ctx
                .registry()
                .planar_embedding(embedding)?
                .edges_around(vertex)
                .ok_or(GraphError::VertexNotFound(VertexId(vertex)))?
                .to_vec();
            *res = ctx.register_iter(HandleIter::ids(edges))?;
            Ok(())
        })
    }
}
