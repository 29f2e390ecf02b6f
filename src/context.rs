//! Shared state of a container and of a render cycle.

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt::{self, Debug};

use crate::engine::SubscriptionManager;
use crate::host::HeadStyle;
use crate::node::ElementId;

/// State shared by every host of one container.
pub struct ContainerState {
    hosts_staging: RefCell<BTreeSet<ElementId>>,
    subs_manager: Rc<dyn SubscriptionManager>,
}

impl ContainerState {
    /// Creates a container backed by `subs_manager`.
    pub fn new(subs_manager: Rc<dyn SubscriptionManager>) -> Self {
        Self {
            hosts_staging: RefCell::new(BTreeSet::new()),
            subs_manager,
        }
    }

    /// Stages `host` for the next render cycle. Returns `false` if it was
    /// already staged.
    pub fn mark_dirty(&self, host: ElementId) -> bool {
        self.hosts_staging.borrow_mut().insert(host)
    }

    /// Removes `host` from the staging set. A no-op if it was not staged.
    pub fn unstage(&self, host: ElementId) {
        self.hosts_staging.borrow_mut().remove(&host);
    }

    /// Returns `true` if `host` is waiting to render.
    #[must_use]
    pub fn is_staged(&self, host: ElementId) -> bool {
        self.hosts_staging.borrow().contains(&host)
    }

    /// Hosts waiting to render, in element order.
    #[must_use]
    pub fn staged_hosts(&self) -> Vec<ElementId> {
        self.hosts_staging.borrow().iter().copied().collect()
    }

    /// The subscription manager of this container.
    #[must_use]
    pub fn subscriptions(&self) -> &dyn SubscriptionManager {
        self.subs_manager.as_ref()
    }
}

impl Debug for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerState")
            .field("hosts_staging", &self.hosts_staging.borrow())
            .finish_non_exhaustive()
    }
}

/// State that lives for a whole render cycle, shared by every pass in it.
#[derive(Debug)]
pub struct RenderStaticContext {
    locale: String,
    container: Rc<ContainerState>,
    host_elements: RefCell<BTreeSet<ElementId>>,
    head_styles: RefCell<Vec<HeadStyle>>,
}

impl RenderStaticContext {
    /// Creates the cycle state.
    pub fn new(locale: impl Into<String>, container: Rc<ContainerState>) -> Self {
        Self {
            locale: locale.into(),
            container,
            host_elements: RefCell::new(BTreeSet::new()),
            head_styles: RefCell::new(Vec::new()),
        }
    }

    /// The locale components render in.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The container being rendered.
    #[must_use]
    pub const fn container(&self) -> &Rc<ContainerState> {
        &self.container
    }

    /// Records that `host` rendered during this cycle.
    pub fn register_host(&self, host: ElementId) {
        self.host_elements.borrow_mut().insert(host);
    }

    /// Hosts rendered during this cycle.
    #[must_use]
    pub fn host_elements(&self) -> Vec<ElementId> {
        self.host_elements.borrow().iter().copied().collect()
    }

    /// Queues a style for injection into the document head.
    ///
    /// Returns `false`, and queues nothing, if a style with the same id is
    /// already queued.
    pub fn append_head_style(&self, style: HeadStyle) -> bool {
        let mut styles = self.head_styles.borrow_mut();
        if styles.iter().any(|queued| queued.style_id == style.style_id) {
            return false;
        }
        styles.push(style);
        true
    }

    /// Styles queued for injection, in queue order.
    #[must_use]
    pub fn head_styles(&self) -> Vec<HeadStyle> {
        self.head_styles.borrow().clone()
    }
}

/// Rendering context handed to collaborators.
///
/// Cloning is cheap; every clone shares the same cycle state.
#[derive(Debug, Clone)]
pub struct RenderContext {
    static_ctx: Rc<RenderStaticContext>,
    component: Option<ElementId>,
}

impl RenderContext {
    /// Creates a root context for a cycle.
    #[must_use]
    pub const fn new(static_ctx: Rc<RenderStaticContext>) -> Self {
        Self {
            static_ctx,
            component: None,
        }
    }

    /// Derives a context scoped to the component rendered by `host`.
    #[must_use]
    pub fn for_component(&self, host: ElementId) -> Self {
        Self {
            static_ctx: Rc::clone(&self.static_ctx),
            component: Some(host),
        }
    }

    /// The cycle state.
    #[must_use]
    pub fn static_ctx(&self) -> &RenderStaticContext {
        &self.static_ctx
    }

    /// The component host this context is scoped to.
    #[must_use]
    pub const fn component(&self) -> Option<ElementId> {
        self.component
    }
}
