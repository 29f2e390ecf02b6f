//! The render orchestrator.
//!
//! One call to [`Renderer::render_host`] is one render pass for one host:
//!
//! 1. read whether the host is mounting for the first time;
//! 2. drop the host from the container's dirty staging set;
//! 3. clear the host's subscriptions, so reads made while the component runs
//!    build a fresh set;
//! 4. execute the component;
//! 5. build the invocation context of the pass;
//! 6. on first mount, queue the component's head styles;
//! 7. normalize the component output;
//! 8. anchor it under the host's virtual root;
//! 9. fetch the previous tree;
//! 10. hand both trees to the diff engine;
//! 11. cache the new tree.
//!
//! Steps 2 and 3 are not rolled back when a later step fails. A failed pass
//! leaves the previous tree cached; the caller re-stages the host to retry.

use alloc::rc::Rc;
use core::fmt::{self, Debug};

use crate::cache::get_previous_tree;
use crate::config::RenderConfig;
use crate::context::{ContainerState, RenderContext, RenderStaticContext};
use crate::engine::{ComponentExecutor, DiffEngine, RenderFlags, TreeReconstructor};
use crate::error::RenderError;
use crate::host::HostContext;
use crate::invoke::{InvokeContext, Subscriber};
use crate::node::{IntermediateNode, wrap_root};
use crate::normalize::normalize;

/// Outcome of a successful render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// The pass was the host's first.
    pub just_mounted: bool,
    /// Head styles newly queued by this pass.
    pub styles_flushed: usize,
}

/// Drives render passes against the configured collaborators.
pub struct Renderer {
    config: RenderConfig,
    executor: Rc<dyn ComponentExecutor>,
    diff: Rc<dyn DiffEngine>,
    reconstructor: Rc<dyn TreeReconstructor>,
}

impl Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Creates a renderer.
    pub fn new(
        config: RenderConfig,
        executor: Rc<dyn ComponentExecutor>,
        diff: Rc<dyn DiffEngine>,
        reconstructor: Rc<dyn TreeReconstructor>,
    ) -> Self {
        Self {
            config,
            executor,
            diff,
            reconstructor,
        }
    }

    /// The renderer's configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Creates the root context of a render cycle over `container`.
    #[must_use]
    pub fn root_context(&self, container: Rc<ContainerState>) -> RenderContext {
        RenderContext::new(Rc::new(RenderStaticContext::new(
            self.config.locale(),
            container,
        )))
    }

    /// Returns the tree `host` rendered last, rebuilding it from the live
    /// element if the host never rendered through this renderer.
    pub fn previous_tree<'h>(&self, host: &'h mut HostContext) -> &'h IntermediateNode {
        get_previous_tree(host, self.reconstructor.as_ref())
    }

    /// Runs one render pass for `host`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Normalize`] if the component output cannot be
    /// normalized, and [`RenderError::Executor`] or [`RenderError::Commit`]
    /// carrying the collaborator's own error. The host's cached tree is left
    /// untouched on failure.
    pub async fn render_host(
        &self,
        rctx: &RenderContext,
        host: &mut HostContext,
        flags: RenderFlags,
    ) -> Result<RenderReport, RenderError> {
        let just_mounted = !host.is_mounted();
        let element = host.element();
        let static_ctx = rctx.static_ctx();
        let container = static_ctx.container();

        tracing::debug!(host = %element, just_mounted, ?flags, "render pass started");

        container.unstage(element);
        container.subscriptions().clear_subscriptions(element);

        let executed = self.executor.execute(rctx, host).await.map_err(|err| {
            tracing::warn!(host = %element, error = %err, "component execution failed");
            RenderError::Executor(err)
        })?;
        let new_ctx = executed.render_ctx;

        static_ctx.register_host(element);
        let invocation = InvokeContext::new(static_ctx.locale(), Some(element))
            .with_subscriber(Subscriber::host(element))
            .with_render_context(new_ctx.clone())
            .with_wrap_policy(self.config.wrap_policy().clone());

        let mut styles_flushed = 0;
        if just_mounted {
            for style in host.append_styles() {
                if static_ctx.append_head_style(style.clone()) {
                    styles_flushed += 1;
                }
            }
            if styles_flushed > 0 {
                tracing::debug!(host = %element, styles_flushed, "queued first-mount styles");
            }
        }

        let processed = normalize(executed.node, &invocation).await?;
        let new_vdom = wrap_root(element, processed);
        let old_vdom = get_previous_tree(host, self.reconstructor.as_ref());

        self.diff
            .smart_update_children(&new_ctx, old_vdom, &new_vdom, self.config.root_id(), flags)
            .await
            .map_err(|err| {
                tracing::warn!(host = %element, error = %err, "diff/commit failed");
                RenderError::Commit(err)
            })?;

        host.commit(new_vdom);
        tracing::debug!(host = %element, "render pass completed");

        Ok(RenderReport {
            just_mounted,
            styles_flushed,
        })
    }
}
