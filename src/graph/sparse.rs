//! Immutable compact graph in compressed sparse row form
//!
//! Vertices are `0..n`, edges are numbered `0..m` in construction order. Structure
//! cannot change after construction; weights can, when the graph is weighted.

use super::traits::Graph;
use super::types::{EdgeId, GraphType, VertexId};
use crate::error::{GraphError, GraphResult};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SparseGraph {
    graph_type: GraphType,
    vertex_count: usize,
    sources: Vec<usize>,
    targets: Vec<usize>,
    weights: Vec<f64>,
    /// Offsets into `out_edges`, size = vertex_count + 1
    out_offsets: Vec<usize>,
    out_edges: Vec<usize>,
    /// Offsets into `in_edges`; unused when undirected
    in_offsets: Vec<usize>,
    in_edges: Vec<usize>,
}

fn csr(vertex_count: usize, keys: impl Iterator<Item = (usize, usize)>) -> (Vec<usize>, Vec<usize>) {
    let pairs: Vec<(usize, usize)> = keys.collect();
    let mut offsets = vec![0usize; vertex_count + 1];
    for &(v, _) in &pairs {
        offsets[v + 1] += 1;
    }
    for i in 0..vertex_count {
        offsets[i + 1] += offsets[i];
    }
    let mut cursor = offsets.clone();
    let mut flat = vec![0usize; pairs.len()];
    for (v, e) in pairs {
        flat[cursor[v]] = e;
        cursor[v] += 1;
    }
    (offsets, flat)
}

impl SparseGraph {
    /// Build from `(source, target, weight)` triples; a `None` weight means 1.0
    pub fn new<I>(vertex_count: usize, edge_list: I, directed: bool, weighted: bool) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (u64, u64, Option<f64>)>,
    {
        let mut sources = Vec::new();
        let mut targets = Vec::new();
        let mut weights = Vec::new();
        for (s, t, w) in edge_list {
            for v in [s, t] {
                if v >= vertex_count as u64 {
                    return Err(GraphError::VertexNotFound(VertexId(v)));
                }
            }
            sources.push(s as usize);
            targets.push(t as usize);
            weights.push(if weighted { w.unwrap_or(1.0) } else { 1.0 });
        }

        let m = sources.len();
        let (out_offsets, out_edges, in_offsets, in_edges) = if directed {
            let (oo, oe) = csr(vertex_count, (0..m).map(|e| (sources[e], e)));
            let (io, ie) = csr(vertex_count, (0..m).map(|e| (targets[e], e)));
            (oo, oe, io, ie)
        } else {
            let incident = (0..m).flat_map(|e| {
                let loop_edge = sources[e] == targets[e];
                std::iter::once((sources[e], e)).chain((!loop_edge).then_some((targets[e], e)))
            });
            let (oo, oe) = csr(vertex_count, incident);
            (oo, oe, Vec::new(), Vec::new())
        };

        debug!("Built sparse graph with {} vertices and {} edges", vertex_count, m);
        Ok(SparseGraph {
            graph_type: GraphType {
                directed,
                allow_self_loops: true,
                allow_multiple_edges: true,
                weighted,
                modifiable: false,
            },
            vertex_count,
            sources,
            targets,
            weights,
            out_offsets,
            out_edges,
            in_offsets,
            in_edges,
        })
    }

    /// Number of vertices a sparse copy of `graph` needs: one past its largest id
    pub fn span_of(graph: &dyn Graph) -> usize {
        graph
            .vertices()
            .iter()
            .map(|v| usize::try_from(v.0).map_or(usize::MAX, |id| id.saturating_add(1)))
            .max()
            .unwrap_or(0)
    }

    /// Copy any graph into a sparse graph over vertices `0..=max_id`
    pub fn from_graph(graph: &dyn Graph) -> GraphResult<Self> {
        let t = graph.graph_type();
        let vertex_count = Self::span_of(graph);
        let mut list = Vec::with_capacity(graph.edge_count());
        for e in graph.edges() {
            list.push((graph.edge_source(e)?.0, graph.edge_target(e)?.0, Some(graph.edge_weight(e)?)));
        }
        Self::new(vertex_count, list, t.directed, t.weighted)
    }

    fn vertex(&self, v: VertexId) -> GraphResult<usize> {
        if v.0 < self.vertex_count as u64 {
            Ok(v.0 as usize)
        } else {
            Err(GraphError::VertexNotFound(v))
        }
    }

    fn edge(&self, e: EdgeId) -> GraphResult<usize> {
        if e.0 < self.sources.len() as u64 {
            Ok(e.0 as usize)
        } else {
            Err(GraphError::EdgeNotFound(e))
        }
    }

    fn out_slice(&self, v: usize) -> &[usize] {
        &self.out_edges[self.out_offsets[v]..self.out_offsets[v + 1]]
    }

    fn in_slice(&self, v: usize) -> &[usize] {
        if self.graph_type.directed {
            &self.in_edges[self.in_offsets[v]..self.in_offsets[v + 1]]
        } else {
            self.out_slice(v)
        }
    }

    fn ids(slice: &[usize]) -> Vec<EdgeId> {
        slice.iter().map(|&e| EdgeId(e as u64)).collect()
    }
}

impl Graph for SparseGraph {
    fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.sources.len()
    }

    fn vertices(&self) -> Vec<VertexId> {
        (0..self.vertex_count as u64).map(VertexId).collect()
    }

    fn edges(&self) -> Vec<EdgeId> {
        (0..self.sources.len() as u64).map(EdgeId).collect()
    }

    fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertex(v).is_ok()
    }

    fn contains_edge(&self, e: EdgeId) -> bool {
        self.edge(e).is_ok()
    }

    fn edge_source(&self, e: EdgeId) -> GraphResult<VertexId> {
        Ok(VertexId(self.sources[self.edge(e)?] as u64))
    }

    fn edge_target(&self, e: EdgeId) -> GraphResult<VertexId> {
        Ok(VertexId(self.targets[self.edge(e)?] as u64))
    }

    fn edge_weight(&self, e: EdgeId) -> GraphResult<f64> {
        Ok(self.weights[self.edge(e)?])
    }

    fn edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        let v = self.vertex(v)?;
        let mut all = Self::ids(self.out_slice(v));
        if self.graph_type.directed {
            all.extend(
                self.in_slice(v)
                    .iter()
                    .filter(|&&e| self.sources[e] != self.targets[e])
                    .map(|&e| EdgeId(e as u64)),
            );
        }
        Ok(all)
    }

    fn in_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        Ok(Self::ids(self.in_slice(self.vertex(v)?)))
    }

    fn out_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        Ok(Self::ids(self.out_slice(self.vertex(v)?)))
    }

    fn edges_between(&self, u: VertexId, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        let (ui, vi) = (self.vertex(u)?, self.vertex(v)?);
        Ok(self
            .out_slice(ui)
            .iter()
            .copied()
            .filter(|&e| {
                let (s, t) = (self.sources[e], self.targets[e]);
                if self.graph_type.directed {
                    t == vi
                } else {
                    (s == ui && t == vi) || (s == vi && t == ui)
                }
            })
            .map(|e| EdgeId(e as u64))
            .collect())
    }

    fn degree_of(&self, v: VertexId) -> GraphResult<usize> {
        let v = self.vertex(v)?;
        if self.graph_type.directed {
            Ok(self.out_slice(v).len() + self.in_slice(v).len())
        } else {
            let loops = self.out_slice(v).iter().filter(|&&e| self.sources[e] == self.targets[e]).count();
            Ok(self.out_slice(v).len() + loops)
        }
    }

    fn in_degree_of(&self, v: VertexId) -> GraphResult<usize> {
        if self.graph_type.directed {
            Ok(self.in_slice(self.vertex(v)?).len())
        } else {
            self.degree_of(v)
        }
    }

    fn out_degree_of(&self, v: VertexId) -> GraphResult<usize> {
        if self.graph_type.directed {
            Ok(self.out_slice(self.vertex(v)?).len())
        } else {
            self.degree_of(v)
        }
    }

    fn add_vertex(&mut self) -> GraphResult<VertexId> {
        Err(GraphError::Unsupported("sparse graphs cannot add vertices"))
    }

    fn add_given_vertex(&mut self, _v: VertexId) -> GraphResult<bool> {
        Err(GraphError::Unsupported("sparse graphs cannot add vertices"))
    }

    fn remove_vertex(&mut self, _v: VertexId) -> GraphResult<()> {
        Err(GraphError::Unsupported("sparse graphs cannot remove vertices"))
    }

    fn add_edge(&mut self, _source: VertexId, _target: VertexId, _weight: Option<f64>) -> GraphResult<EdgeId> {
        Err(GraphError::Unsupported("sparse graphs cannot add edges"))
    }

    fn add_given_edge(
        &mut self,
        _source: VertexId,
        _target: VertexId,
        _e: EdgeId,
        _weight: Option<f64>,
    ) -> GraphResult<bool> {
        Err(GraphError::Unsupported("sparse graphs cannot add edges"))
    }

    fn remove_edge(&mut self, _e: EdgeId) -> GraphResult<()> {
        Err(GraphError::Unsupported("sparse graphs cannot remove edges"))
    }

    fn set_edge_weight(&mut self, e: EdgeId, weight: f64) -> GraphResult<()> {
        if !self.graph_type.weighted {
            return Err(GraphError::Unweighted);
        }
        let e = self.edge(e)?;
        self.weights[e] = weight;
        Ok(())
    }
}
