//! Planarity testing

use crate::algo::timed;
use crate::context::Context;
use crate::error::Status;
use crate::handle::{Handle, Object};
use strata_algorithms::planarity;

impl Context {
    /// Left-right planarity test. Edge direction is ignored. The embedding is `None`
    /// when the graph is not planar.
    pub fn planarity_exec_left_right(
        &mut self,
        graph: Handle,
        is_planar: &mut bool,
        embedding: &mut Option<Handle>,
    ) -> Status {
        self.run("planarity_exec_left_right", |ctx| {
            let view = ctx.view_of(graph)?;
            let result = timed("left-right planarity", &view, |v| Ok(planarity::left_right_planarity(v)))?;
            let handle = result
                .embedding
                .map(|e| ctx.register(Object::PlanarEmbedding(e)))
                .transpose()?;
            *is_planar = result.is_planar;
            *embedding = handle;
            Ok(())
        })
    }
}
