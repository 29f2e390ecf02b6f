//! Collaborators the renderer drives but does not implement.
//!
//! Each trait is object safe so a [`Renderer`](crate::render::Renderer) can
//! hold them behind `Rc<dyn _>`. Asynchronous operations return a
//! [`LocalBoxFuture`]: everything here runs on one thread, and a future that
//! has nothing to wait for completes on its first poll.

use futures::future::LocalBoxFuture;

use crate::context::RenderContext;
use crate::error::BoxError;
use crate::host::HostContext;
use crate::jsx::RawNode;
use crate::node::{ElementId, IntermediateNode};

bitflags::bitflags! {
    /// Flags handed through to the diff engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderFlags: u32 {
        /// Rendering inside an SVG subtree.
        const IS_SVG = 1 << 0;
        /// Rendering inside the document head.
        const IS_HEAD = 1 << 1;
        /// Props of the rendered subtree never change.
        const IS_IMMUTABLE = 1 << 2;
    }
}

/// What the component executor produced.
#[derive(Debug)]
pub struct ExecutedComponent {
    /// Raw component output.
    pub node: RawNode,
    /// Rendering context for the rest of the pass.
    pub render_ctx: RenderContext,
}

/// Runs a host's component function.
pub trait ComponentExecutor {
    /// Executes the component of `host`.
    fn execute<'a>(
        &'a self,
        ctx: &'a RenderContext,
        host: &'a HostContext,
    ) -> LocalBoxFuture<'a, Result<ExecutedComponent, BoxError>>;
}

/// Applies the difference between two trees to the live target.
pub trait DiffEngine {
    /// Reconciles `old` into `new` under the root identified by `root_id`.
    fn smart_update_children<'a>(
        &'a self,
        ctx: &'a RenderContext,
        old: &'a IntermediateNode,
        new: &'a IntermediateNode,
        root_id: &'a str,
        flags: RenderFlags,
    ) -> LocalBoxFuture<'a, Result<(), BoxError>>;
}

/// Owns the reactive subscriptions of every host.
pub trait SubscriptionManager {
    /// Drops every subscription held for `host`. Idempotent.
    fn clear_subscriptions(&self, host: ElementId);
}

/// Reads existing live content back into nodes.
pub trait TreeReconstructor {
    /// Returns the nodes equivalent to the live children of `element`.
    fn reconstruct_tree(&self, element: ElementId) -> Vec<IntermediateNode>;
}
