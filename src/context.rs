//! Execution context: one handle namespace plus one error channel
//!
//! Every boundary operation is a `Context` method that returns a [`Status`] and writes
//! its outputs through `&mut` slots. A failing operation leaves its slots untouched,
//! releases any handle it registered and records the failure in the error channel; a panic inside an operation is caught and
//! reported as `InternalFailure`. A successful call never clears the channel.

use crate::config::ContextConfig;
use crate::error::{GraphError, GraphResult, Status};
use crate::handle::{Handle, HandleRegistry, Object, ObjectKind};
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

/// Most recent failure of a context
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorChannel {
    code: Status,
    message: Option<String>,
    backtrace: Option<String>,
}

impl Default for ErrorChannel {
    fn default() -> Self {
        ErrorChannel {
            code: Status::Success,
            message: None,
            backtrace: None,
        }
    }
}

impl ErrorChannel {
    fn record(&mut self, code: Status, message: String, backtrace: Option<String>) {
        self.code = code;
        self.message = Some(message);
        self.backtrace = backtrace;
    }

    fn clear(&mut self) {
        *self = ErrorChannel::default();
    }
}

pub struct Context {
    config: ContextConfig,
    handles: HandleRegistry,
    error: ErrorChannel,
    /// Handles registered by the operation in progress
    created: Vec<Handle>,
    in_call: bool,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Context {
    pub fn new(config: ContextConfig) -> Self {
        info!("Created execution context (max handles: {:?})", config.max_handles);
        Context {
            handles: HandleRegistry::new(config.max_handles),
            config,
            error: ErrorChannel::default(),
            created: Vec::new(),
            in_call: false,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.handles
    }

    pub(crate) fn registry_mut(&mut self) -> &mut HandleRegistry {
        &mut self.handles
    }

    pub(crate) fn register(&mut self, object: Object) -> GraphResult<Handle> {
        let handle = self.handles.insert(object)?;
        if self.in_call {
            self.created.push(handle);
        }
        Ok(handle)
    }

    /// Run one boundary operation, translating errors and panics into a status
    pub(crate) fn run<F>(&mut self, op: &'static str, f: F) -> Status
    where
        F: FnOnce(&mut Context) -> GraphResult<()>,
    {
        let nested = self.in_call;
        let outer = std::mem::take(&mut self.created);
        self.in_call = true;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.in_call = nested;
        let created = std::mem::replace(&mut self.created, outer);
        let err = match outcome {
            Ok(Ok(())) => {
                if nested {
                    self.created.extend(created);
                }
                return Status::Success;
            }
            Ok(Err(err)) => err,
            Err(payload) => GraphError::Internal(format!("{} panicked: {}", op, panic_message(payload.as_ref()))),
        };
        // A failed call releases every handle it registered
        for handle in created.into_iter().rev() {
            if let Err(e) = self.handles.remove(handle) {
                warn!("{} could not release {}: {}", op, handle, e);
            }
        }
        let status = err.status();
        warn!("{} failed with {}: {}", op, status, err);
        let backtrace = self
            .config
            .capture_backtrace
            .then(|| Backtrace::force_capture().to_string());
        self.error.record(status, err.to_string(), backtrace);
        status
    }

    pub fn error_clear(&mut self) {
        self.error.clear();
    }

    /// `Success` when no failure was recorded since the last clear
    pub fn error_code(&self) -> Status {
        self.error.code
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.message.as_deref()
    }

    /// Present only when `capture_backtrace` is configured
    pub fn error_backtrace(&self) -> Option<&str> {
        self.error.backtrace.as_deref()
    }

    /// Release an object; destroying a handle twice is reported as `UseAfterFree`
    pub fn destroy(&mut self, handle: Handle) -> Status {
        self.run("destroy", |ctx| ctx.handles.remove(handle).map(drop))
    }

    pub fn handle_kind(&mut self, handle: Handle, res: &mut ObjectKind) -> Status {
        self.run("handle_kind", |ctx| {
            *res = ctx.handles.kind(handle)?;
            Ok(())
        })
    }

    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(ContextConfig::default())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        info!("Destroyed execution context with {} live handles", self.handles.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::ElementList;

    #[test]
    fn test_error_channel_is_sticky() {
        let mut ctx = Context::default();
        let status = ctx.run("fail", |_| Err(GraphError::IteratorExhausted));
        assert_eq!(status, Status::NoSuchElement);
        assert_eq!(ctx.error_code(), Status::NoSuchElement);

        assert_eq!(ctx.run("ok", |_| Ok(())), Status::Success);
        assert_eq!(ctx.error_code(), Status::NoSuchElement);
        assert!(ctx.error_message().is_some());

        ctx.error_clear();
        assert_eq!(ctx.error_code(), Status::Success);
        assert!(ctx.error_message().is_none());
    }

    #[test]
    fn test_panic_becomes_internal_failure() {
        let mut ctx = Context::default();
        let status = ctx.run("boom", |_| panic!("kaboom"));
        assert_eq!(status, Status::InternalFailure);
        assert!(ctx.error_message().unwrap().contains("kaboom"));
    }

    #[test]
    fn test_backtrace_capture() {
        let mut ctx = Context::new(ContextConfig {
            capture_backtrace: true,
            ..Default::default()
        });
        ctx.run("fail", |_| Err(GraphError::Unweighted));
        assert!(ctx.error_backtrace().is_some());
    }

    #[test]
    fn test_double_destroy() {
        let mut ctx = Context::default();
        let h = ctx.register(Object::List(ElementList::new())).unwrap();
        assert_eq!(ctx.destroy(h), Status::Success);
        assert_eq!(ctx.destroy(h), Status::UseAfterFree);
        assert_eq!(ctx.live_handles(), 0);
    }

    #[test]
    fn test_failed_call_leaves_slot_untouched() {
        let mut ctx = Context::default();
        let mut kind = ObjectKind::Map;
        assert_eq!(ctx.handle_kind(Handle::from_raw(1 << 32), &mut kind), Status::IllegalArgument);
        assert_eq!(kind, ObjectKind::Map);
    }
}
