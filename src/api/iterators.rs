//! Iterator protocol: `it_has_next` and the typed `it_next_*` family

use crate::context::Context;
use crate::error::Status;
use crate::handle::Handle;

impl Context {
    pub fn it_has_next(&mut self, it: Handle, res: &mut bool) -> Status {
        self.run("it_has_next", |ctx| {
            *res = ctx.registry_mut().iterator_mut(it)?.has_next();
            Ok(())
        })
    }

    pub fn it_next_int(&mut self, it: Handle, res: &mut i64) -> Status {
        self.run("it_next_int", |ctx| {
            *res = ctx.registry_mut().iterator_mut(it)?.next_int()?;
            Ok(())
        })
    }

    pub fn it_next_double(&mut self, it: Handle, res: &mut f64) -> Status {
        self.run("it_next_double", |ctx| {
            *res = ctx.registry_mut().iterator_mut(it)?.next_double()?;
            Ok(())
        })
    }

    pub fn it_next_string(&mut self, it: Handle, res: &mut String) -> Status {
        self.run("it_next_string", |ctx| {
            *res = ctx.registry_mut().iterator_mut(it)?.next_string()?;
            Ok(())
        })
    }

    /// Source and target of the next edge pair (or triple)
    pub fn it_next_edge_pair(&mut self, it: Handle, source: &mut u64, target: &mut u64) -> Status {
        self.run("it_next_edge_pair", |ctx| {
            let (s, t) = ctx.registry_mut().iterator_mut(it)?.next_edge_pair()?;
            *source = s;
            *target = t;
            Ok(())
        })
    }

    pub fn it_next_edge_triple(
        &mut self,
        it: Handle,
        source: &mut u64,
        target: &mut u64,
        weight: &mut f64,
    ) -> Status {
        self.run("it_next_edge_triple", |ctx| {
            let (s, t, w) = ctx.registry_mut().iterator_mut(it)?.next_edge_triple()?;
            *source = s;
            *target = t;
            *weight = w;
            Ok(())
        })
    }

    /// Registers the next object and writes its handle
    pub fn it_next_object(&mut self, it: Handle, res: &mut Handle) -> Status {
        self.run("it_next_object", |ctx| {
            // the item stays in the iterator when no handle is available
            ctx.registry().ensure_capacity(1)?;
            let object = ctx.registry_mut().iterator_mut(it)?.next_object()?;
            *res = ctx.register(object)?;
            Ok(())
        })
    }
}
