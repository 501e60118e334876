//! Generation-checked registry of every object that crosses the boundary
//!
//! A [`Handle`] is a slot index plus the generation the slot had when the object was
//! registered. Destroying an object bumps the slot generation, so a stale handle is
//! detected as `UseAfterFree` instead of aliasing whatever reuses the slot.

use crate::attributes::{AttributeRegistry, AttributeStore};
use crate::containers::{ElementList, ElementMap, ElementSet};
use crate::error::{illegal, GraphError, GraphResult};
use crate::graph::SharedGraph;
use crate::iter::HandleIter;
use serde::{Deserialize, Serialize};
use std::fmt;
use strata_algorithms::{AllPairsResult, Clustering, GraphMapping, PathResult, PlanarEmbedding, ShortestPathTree};
use tracing::debug;

/// Opaque reference to a registered object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Never refers to a live object
    pub const NULL: Handle = Handle { index: 0, generation: 0 };

    pub fn to_raw(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }

    pub fn from_raw(raw: u64) -> Self {
        Handle {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }

    pub fn is_null(self) -> bool {
        self.generation == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}#{})", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Graph,
    Iterator,
    List,
    Set,
    Map,
    Path,
    SingleSourcePaths,
    AllPairsPaths,
    Clustering,
    GraphMapping,
    PlanarEmbedding,
    AttributeStore,
    AttributeRegistry,
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Graph => "graph",
            ObjectKind::Iterator => "iterator",
            ObjectKind::List => "list",
            ObjectKind::Set => "set",
            ObjectKind::Map => "map",
            ObjectKind::Path => "graph path",
            ObjectKind::SingleSourcePaths => "single-source paths",
            ObjectKind::AllPairsPaths => "all-pairs paths",
            ObjectKind::Clustering => "clustering",
            ObjectKind::GraphMapping => "graph mapping",
            ObjectKind::PlanarEmbedding => "planar embedding",
            ObjectKind::AttributeStore => "attribute store",
            ObjectKind::AttributeRegistry => "attribute registry",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Anything a handle can refer to
pub enum Object {
    Graph(SharedGraph),
    Iterator(HandleIter),
    List(ElementList),
    Set(ElementSet),
    Map(ElementMap),
    Path(PathResult),
    SingleSourcePaths(ShortestPathTree),
    AllPairsPaths(AllPairsResult),
    Clustering(Clustering),
    GraphMapping(GraphMapping),
    PlanarEmbedding(PlanarEmbedding),
    AttributeStore(AttributeStore),
    AttributeRegistry(AttributeRegistry),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Graph(_) => ObjectKind::Graph,
            Object::Iterator(_) => ObjectKind::Iterator,
            Object::List(_) => ObjectKind::List,
            Object::Set(_) => ObjectKind::Set,
            Object::Map(_) => ObjectKind::Map,
            Object::Path(_) => ObjectKind::Path,
            Object::SingleSourcePaths(_) => ObjectKind::SingleSourcePaths,
            Object::AllPairsPaths(_) => ObjectKind::AllPairsPaths,
            Object::Clustering(_) => ObjectKind::Clustering,
            Object::GraphMapping(_) => ObjectKind::GraphMapping,
            Object::PlanarEmbedding(_) => ObjectKind::PlanarEmbedding,
            Object::AttributeStore(_) => ObjectKind::AttributeStore,
            Object::AttributeRegistry(_) => ObjectKind::AttributeRegistry,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.kind())
    }
}

struct Slot {
    generation: u32,
    object: Option<Object>,
}

/// Owns every live object of one execution context
pub struct HandleRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    max_handles: Option<usize>,
}

fn wrong_kind(handle: Handle, expected: ObjectKind, actual: &Object) -> GraphError {
    GraphError::WrongHandleKind {
        handle: handle.to_raw(),
        expected: expected.name(),
        actual: actual.kind().name(),
    }
}

macro_rules! typed_accessors {
    ($($kind:ident => $get:ident, $get_mut:ident: $ty:ty;)*) => {
        $(
            pub fn $get(&self, handle: Handle) -> GraphResult<&$ty> {
                match self.get(handle)? {
                    Object::$kind(inner) => Ok(inner),
                    other => Err(wrong_kind(handle, ObjectKind::$kind, other)),
                }
            }

            pub fn $get_mut(&mut self, handle: Handle) -> GraphResult<&mut $ty> {
                match self.get_mut(handle)? {
                    Object::$kind(inner) => Ok(inner),
                    other => Err(wrong_kind(handle, ObjectKind::$kind, other)),
                }
            }
        )*
    };
}

impl HandleRegistry {
    pub fn new(max_handles: Option<usize>) -> Self {
        HandleRegistry {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            max_handles,
        }
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Fails unless `count` more handles can be registered
    pub fn ensure_capacity(&self, count: usize) -> GraphResult<()> {
        if let Some(max) = self.max_handles {
            if self.live + count > max {
                return Err(illegal(format!("handle limit of {} reached", max)));
            }
        }
        if self.free.is_empty() && self.slots.len() + count > u32::MAX as usize {
            return Err(illegal("handle space exhausted"));
        }
        Ok(())
    }

    /// Register an object and hand out its handle
    pub fn insert(&mut self, object: Object) -> GraphResult<Handle> {
        self.ensure_capacity(1)?;
        let kind = object.kind();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.object = Some(object);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| illegal("handle space exhausted"))?;
                self.slots.push(Slot {
                    generation: 1,
                    object: Some(object),
                });
                Handle { index, generation: 1 }
            }
        };
        self.live += 1;
        debug!("Allocated {} {}", kind, handle);
        Ok(handle)
    }

    fn slot(&self, handle: Handle) -> GraphResult<&Slot> {
        if handle.is_null() {
            return Err(illegal("the null handle refers to nothing"));
        }
        let slot = self
            .slots
            .get(handle.index as usize)
            .ok_or_else(|| illegal(format!("{} is not a handle of this context", handle)))?;
        if slot.generation != handle.generation || slot.object.is_none() {
            return Err(GraphError::UseAfterFree(handle.to_raw()));
        }
        Ok(slot)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.slot(handle).is_ok()
    }

    pub fn get(&self, handle: Handle) -> GraphResult<&Object> {
        self.slot(handle)?
            .object
            .as_ref()
            .ok_or(GraphError::UseAfterFree(handle.to_raw()))
    }

    pub fn get_mut(&mut self, handle: Handle) -> GraphResult<&mut Object> {
        self.slot(handle)?;
        self.slots[handle.index as usize]
            .object
            .as_mut()
            .ok_or(GraphError::UseAfterFree(handle.to_raw()))
    }

    pub fn kind(&self, handle: Handle) -> GraphResult<ObjectKind> {
        Ok(self.get(handle)?.kind())
    }

    /// Release an object; the handle and every copy of it become stale
    pub fn remove(&mut self, handle: Handle) -> GraphResult<Object> {
        self.slot(handle)?;
        let slot = &mut self.slots[handle.index as usize];
        let object = slot.object.take().ok_or(GraphError::UseAfterFree(handle.to_raw()))?;
        slot.generation = slot.generation.wrapping_add(1);
        // A slot whose generation wrapped is never reused
        if slot.generation != 0 {
            self.free.push(handle.index);
        }
        self.live -= 1;
        debug!("Released {} {}", object.kind(), handle);
        Ok(object)
    }

    /// Shared reference to a graph, views included
    pub fn graph(&self, handle: Handle) -> GraphResult<SharedGraph> {
        match self.get(handle)? {
            Object::Graph(g) => Ok(g.clone()),
            other => Err(wrong_kind(handle, ObjectKind::Graph, other)),
        }
    }

    typed_accessors! {
        Iterator => iterator, iterator_mut: HandleIter;
        List => list, list_mut: ElementList;
        Set => set, set_mut: ElementSet;
        Map => map, map_mut: ElementMap;
        Path => path, path_mut: PathResult;
        SingleSourcePaths => single_source_paths, single_source_paths_mut: ShortestPathTree;
        AllPairsPaths => all_pairs_paths, all_pairs_paths_mut: AllPairsResult;
        Clustering => clustering, clustering_mut: Clustering;
        GraphMapping => graph_mapping, graph_mapping_mut: GraphMapping;
        PlanarEmbedding => planar_embedding, planar_embedding_mut: PlanarEmbedding;
        AttributeStore => attribute_store, attribute_store_mut: AttributeStore;
        AttributeRegistry => attribute_registry, attribute_registry_mut: AttributeRegistry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{shared, GraphStore};

    #[test]
    fn test_raw_roundtrip() {
        let h = Handle {
            index: 7,
            generation: 3,
        };
        assert_eq!(Handle::from_raw(h.to_raw()), h);
        assert!(Handle::NULL.is_null());
        assert!(!h.is_null());
    }

    #[test]
    fn test_insert_get_remove() {
        let mut reg = HandleRegistry::new(None);
        let h = reg.insert(Object::List(ElementList::new())).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.kind(h).unwrap(), ObjectKind::List);
        assert!(reg.list(h).is_ok());
        assert!(matches!(reg.set(h), Err(GraphError::WrongHandleKind { .. })));

        reg.remove(h).unwrap();
        assert!(reg.is_empty());
        assert!(matches!(reg.get(h), Err(GraphError::UseAfterFree(_))));
        assert!(matches!(reg.remove(h), Err(GraphError::UseAfterFree(_))));
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut reg = HandleRegistry::new(None);
        let old = reg.insert(Object::Set(ElementSet::new())).unwrap();
        reg.remove(old).unwrap();
        let new = reg.insert(Object::Graph(shared(GraphStore::default()))).unwrap();
        assert_ne!(old, new);
        assert!(matches!(reg.get(old), Err(GraphError::UseAfterFree(_))));
        assert!(reg.graph(new).is_ok());
    }

    #[test]
    fn test_unknown_and_null_handles() {
        let mut reg = HandleRegistry::new(None);
        assert_eq!(reg.get(Handle::from_raw(1 << 32 | 5)).unwrap_err().status(), crate::error::Status::IllegalArgument);
        assert!(reg.get(Handle::NULL).is_err());

        // slot 0 is live, the null handle still names nothing
        reg.insert(Object::List(ElementList::new())).unwrap();
        assert_eq!(reg.get(Handle::NULL).unwrap_err().status(), crate::error::Status::IllegalArgument);
    }

    #[test]
    fn test_handle_limit() {
        let mut reg = HandleRegistry::new(Some(2));
        assert!(reg.ensure_capacity(2).is_ok());
        reg.insert(Object::Map(ElementMap::new())).unwrap();
        assert!(reg.ensure_capacity(2).is_err());
        reg.insert(Object::Map(ElementMap::new())).unwrap();
        assert!(reg.insert(Object::Map(ElementMap::new())).is_err());
    }
}
