//! Boundary operations on an execution [`Context`]
//!
//! Every operation takes typed inputs plus `&mut` output slots and returns a
//! [`Status`](crate::error::Status). Slots are only written when the call succeeds.
//! Algorithm families are named `<family>_exec_<algorithm>`.

mod attributes;
mod clustering;
mod coloring;
mod containers;
mod cycles;
mod flow;
mod generators;
mod graph;
mod isomorphism;
mod iterators;
mod matching;
mod planarity;
mod properties;
mod results;
mod scoring;
mod shortest_paths;
mod spanning;
mod tours;
mod traversal;

use crate::algo;
use crate::containers::{Element, ElementMap, ElementSet};
use crate::context::Context;
use crate::error::{illegal, GraphResult};
use crate::graph::SharedGraph;
use crate::handle::{Handle, Object};
use crate::iter::HandleIter;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use strata_algorithms::{GraphView, NodeId};

impl Context {
    pub(crate) fn shared_graph(&self, graph: Handle) -> GraphResult<SharedGraph> {
        self.registry().graph(graph)
    }

    /// Snapshot of a graph handle for one algorithm run
    pub(crate) fn view_of(&self, graph: Handle) -> GraphResult<GraphView> {
        algo::snapshot(&self.shared_graph(graph)?)
    }

    pub(crate) fn shared_view_of(&self, graph: Handle) -> GraphResult<Arc<GraphView>> {
        algo::shared_snapshot(&self.shared_graph(graph)?)
    }

    pub(crate) fn register_iter(&mut self, iter: HandleIter) -> GraphResult<Handle> {
        self.register(Object::Iterator(iter))
    }

    /// Ids held by a list or set handle
    pub(crate) fn ids_of(&self, container: Handle) -> GraphResult<Vec<u64>> {
        match self.registry().get(container)? {
            Object::List(list) => list.iter().map(Element::as_id).collect(),
            Object::Set(set) => set.iter().map(Element::as_id).collect(),
            other => Err(illegal(format!("expected a list or set of ids, found a {}", other.kind()))),
        }
    }

    /// Id to double entries of a map handle
    pub(crate) fn id_weights_of(&self, map: Handle) -> GraphResult<HashMap<u64, f64>> {
        self.registry()
            .map(map)?
            .iter()
            .map(|(k, v)| Ok((k.as_id()?, v.as_double()?)))
            .collect()
    }
}

/// Ids as a linked set, in the given order
pub(crate) fn id_set<I: IntoIterator<Item = u64>>(ids: I) -> Object {
    let mut set = ElementSet::linked();
    for id in ids {
        set.insert(Element::id(id));
    }
    Object::Set(set)
}

/// A per-vertex map keyed in snapshot vertex order
pub(crate) fn vertex_map<V, F>(view: &GraphView, values: &HashMap<NodeId, V>, to_element: F) -> Object
where
    F: Fn(&V) -> Element,
{
    ordered_map(view.index_to_node.iter(), values, to_element)
}

pub(crate) fn ordered_map<'a, K, V, F>(order: impl Iterator<Item = &'a K>, values: &HashMap<K, V>, to_element: F) -> Object
where
    K: Copy + Eq + Hash + Into<u64> + 'a,
    F: Fn(&V) -> Element,
{
    let mut map = ElementMap::linked();
    for key in order {
        if let Some(v) = values.get(key) {
            map.insert(Element::id((*key).into()), to_element(v));
        }
    }
    Object::Map(map)
}
