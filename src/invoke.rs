//! The invocation context threaded through normalization.
//!
//! There is no ambient "current context": every component invocation and every
//! normalization step receives the [`InvokeContext`] explicitly.

use crate::context::RenderContext;
use crate::jsx::{Component, ComponentProps, RawNode};
use crate::node::ElementId;
use crate::normalize::WrapPolicy;

/// What kind of subscriber a reactive read is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriberKind {
    /// A component host; a change re-renders the whole host.
    Host,
}

/// Identity that reactive reads made during a pass subscribe under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscriber {
    /// Subscriber kind.
    pub kind: SubscriberKind,
    /// The host being rendered.
    pub host: ElementId,
}

impl Subscriber {
    /// A subscriber for a component host.
    #[must_use]
    pub const fn host(host: ElementId) -> Self {
        Self {
            kind: SubscriberKind::Host,
            host,
        }
    }
}

/// Context bound to one render pass.
#[derive(Debug, Clone)]
pub struct InvokeContext {
    locale: String,
    host: Option<ElementId>,
    subscriber: Option<Subscriber>,
    render_ctx: Option<RenderContext>,
    wrap_policy: WrapPolicy,
}

impl InvokeContext {
    /// Creates a context for rendering `host` in `locale`.
    pub fn new(locale: impl Into<String>, host: Option<ElementId>) -> Self {
        Self {
            locale: locale.into(),
            host,
            subscriber: None,
            render_ctx: None,
            wrap_policy: WrapPolicy::default(),
        }
    }

    /// Sets the subscriber reactive leaves are created under.
    #[must_use]
    pub const fn with_subscriber(mut self, subscriber: Subscriber) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Sets the rendering context produced by the component executor.
    #[must_use]
    pub fn with_render_context(mut self, ctx: RenderContext) -> Self {
        self.render_ctx = Some(ctx);
        self
    }

    /// Sets the policy deciding when component output is wrapped in a fragment.
    #[must_use]
    pub fn with_wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.wrap_policy = policy;
        self
    }

    /// The locale of this pass.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The host being rendered.
    #[must_use]
    pub const fn host(&self) -> Option<ElementId> {
        self.host
    }

    /// The active subscriber.
    #[must_use]
    pub const fn subscriber(&self) -> Option<Subscriber> {
        self.subscriber
    }

    /// The rendering context of this pass.
    #[must_use]
    pub const fn render_context(&self) -> Option<&RenderContext> {
        self.render_ctx.as_ref()
    }

    /// The wrap policy of this pass.
    #[must_use]
    pub const fn wrap_policy(&self) -> &WrapPolicy {
        &self.wrap_policy
    }

    /// Invokes a component under this context.
    pub fn invoke(&self, component: &Component, props: ComponentProps) -> RawNode {
        tracing::trace!(component = component.name(), key = ?props.key, "invoking component");
        component.call(self, props)
    }
}
