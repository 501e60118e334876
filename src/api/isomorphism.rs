//! VF2 isomorphism
//!
//! Mappings are produced lazily: the returned iterator yields graph mapping objects
//! on demand, over snapshots taken when the call was made.

use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::{Handle, Object};
use crate::iter::{HandleIter, IterItem};
use strata_algorithms::{isomorphism, Vf2Mappings};
use tracing::debug;

impl Context {
    fn register_mappings(&mut self, mappings: Vf2Mappings, exists: &mut bool, res: &mut Handle) -> GraphResult<()> {
        let mut iter = HandleIter::new(mappings.map(|m| IterItem::from(Object::GraphMapping(m))));
        let found = iter.has_next();
        let handle = self.register_iter(iter)?;
        *exists = found;
        *res = handle;
        Ok(())
    }

    /// Isomorphisms from `graph1` onto `graph2`
    pub fn isomorphism_exec_vf2(&mut self, graph1: Handle, graph2: Handle, exists: &mut bool, res: &mut Handle) -> Status {
        self.run("isomorphism_exec_vf2", |ctx| {
            let g1 = ctx.shared_view_of(graph1)?;
            let g2 = ctx.shared_view_of(graph2)?;
            debug!("VF2 isomorphism: {} vs {} vertices", g1.node_count, g2.node_count);
            let mappings = isomorphism::vf2_isomorphism(g1, g2)?;
            ctx.register_mappings(mappings, exists, res)
        })
    }

    /// Isomorphisms between `graph2` and induced subgraphs of `graph1`
    pub fn isomorphism_exec_vf2_subgraph(
        &mut self,
        graph1: Handle,
        graph2: Handle,
        exists: &mut bool,
        res: &mut Handle,
    ) -> Status {
        self.run("isomorphism_exec_vf2_subgraph", |ctx| {
            let g1 = ctx.shared_view_of(graph1)?;
            let g2 = ctx.shared_view_of(graph2)?;
            debug!("VF2 subgraph isomorphism: {} in {} vertices", g2.node_count, g1.node_count);
            let mappings = isomorphism::vf2_subgraph_isomorphism(g1, g2)?;
            ctx.register_mappings(mappings, exists, res)
        })
    }
}
