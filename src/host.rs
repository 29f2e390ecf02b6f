//! Per-host render state.

use crate::node::{ElementId, IntermediateNode};

bitflags::bitflags! {
    /// Lifecycle flags of a host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HostFlags: u8 {
        /// The host has completed at least one render pass.
        const MOUNTED = 1 << 0;
    }
}

/// A style a component registered for injection on first mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadStyle {
    /// Unique id; a style id is injected at most once per container.
    pub style_id: String,
    /// Stylesheet text.
    pub content: String,
}

impl HeadStyle {
    /// Creates a head style.
    pub fn new(style_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            style_id: style_id.into(),
            content: content.into(),
        }
    }
}

/// State the renderer keeps for one live host element.
///
/// A host owns exactly one cached tree, replaced at the end of every
/// successful pass. Only one pass may run against a host at a time; the
/// `&mut` receiver of [`Renderer::render_host`](crate::render::Renderer::render_host)
/// makes overlapping passes on the same host impossible to express.
#[derive(Debug)]
pub struct HostContext {
    element: ElementId,
    flags: HostFlags,
    vdom: Option<IntermediateNode>,
    append_styles: Vec<HeadStyle>,
}

impl HostContext {
    /// Creates the context for a host that has not rendered yet.
    #[must_use]
    pub const fn new(element: ElementId) -> Self {
        Self {
            element,
            flags: HostFlags::empty(),
            vdom: None,
            append_styles: Vec::new(),
        }
    }

    /// The live element this host renders into.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Lifecycle flags.
    #[must_use]
    pub const fn flags(&self) -> HostFlags {
        self.flags
    }

    /// Returns `true` once a pass has completed.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.flags.contains(HostFlags::MOUNTED)
    }

    /// Registers a style to inject when the host first mounts.
    pub fn append_style(&mut self, style: HeadStyle) {
        self.append_styles.push(style);
    }

    /// Styles registered for first mount.
    #[must_use]
    pub fn append_styles(&self) -> &[HeadStyle] {
        &self.append_styles
    }

    /// The cached tree from the last pass, without reconstructing it.
    #[must_use]
    pub const fn cached_tree(&self) -> Option<&IntermediateNode> {
        self.vdom.as_ref()
    }

    pub(crate) fn vdom_slot(&mut self) -> &mut Option<IntermediateNode> {
        &mut self.vdom
    }

    pub(crate) fn commit(&mut self, tree: IntermediateNode) {
        self.vdom = Some(tree);
        self.flags.insert(HostFlags::MOUNTED);
    }
}
