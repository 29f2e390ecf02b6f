//! The canonical node tree consumed by the diff engine.
//!
//! An [`IntermediateNode`] is what normalization produces from raw component
//! output. Its shape is fixed once constructed: the diff engine only reads it,
//! and the tree cache stores it whole until the next pass overwrites it.

use alloc::collections::BTreeMap;
use core::fmt::{self, Display};

use serde_json::{Value, json};

use crate::jsx::DevSource;
use crate::invoke::Subscriber;
use crate::signal::ReactiveBinding;

/// Attribute or parameter values, keyed by name.
pub type Props = BTreeMap<String, Value>;

/// Type name of virtual fragments.
pub const VIRTUAL: &str = ":virtual";
/// Type name of text and reactive leaves.
pub const TEXT: &str = "#text";
/// Type name of skip markers.
pub const SKIP_RENDER: &str = ":skipRender";

bitflags::bitflags! {
    /// Rendering hints carried by a node. Opaque to normalization.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        /// Event listeners on this node never change.
        const STATIC_LISTENERS = 1 << 0;
        /// Nothing under this node changes; the diff engine may skip it.
        const STATIC_SUBTREE = 1 << 1;
    }
}

/// Handle to a node of the live target tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an [`IntermediateNode`] represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A live element with this tag.
    Element(String),
    /// A virtual fragment.
    Virtual,
    /// A static text leaf.
    Text,
    /// A text leaf bound to a reactive value.
    Reactive,
    /// Leave the matching subtree untouched.
    SkipRender,
}

impl NodeKind {
    /// The type name used to build identities.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Element(tag) => tag,
            Self::Virtual => VIRTUAL,
            Self::Text | Self::Reactive => TEXT,
            Self::SkipRender => SKIP_RENDER,
        }
    }
}

/// A reactive binding as stored on a leaf, together with the subscriber that
/// was rendering when the leaf was created.
#[derive(Debug, Clone)]
pub struct ReactiveLeaf {
    /// The binding the diff engine subscribes to.
    pub binding: ReactiveBinding,
    /// The subscriber active during normalization.
    pub subscriber: Option<Subscriber>,
}

/// A node of the canonical tree.
#[derive(Debug, Clone)]
pub struct IntermediateNode {
    kind: NodeKind,
    id: String,
    key: Option<String>,
    props: Props,
    immutable_props: Option<Props>,
    children: Vec<IntermediateNode>,
    flags: NodeFlags,
    text: Option<String>,
    signal: Option<ReactiveLeaf>,
    elm: Option<ElementId>,
    dev: Option<DevSource>,
}

impl IntermediateNode {
    /// Builds a node. The identity is derived from `kind` and `key`.
    #[must_use]
    pub fn new(
        kind: NodeKind,
        props: Props,
        immutable_props: Option<Props>,
        children: Vec<Self>,
        flags: NodeFlags,
        key: Option<String>,
    ) -> Self {
        let id = identity(&kind, key.as_deref());
        Self {
            kind,
            id,
            key,
            props,
            immutable_props,
            children,
            flags,
            text: None,
            signal: None,
            elm: None,
            dev: None,
        }
    }

    /// Builds an element with the given children and no key.
    #[must_use]
    pub fn element(tag: impl Into<String>, props: Props, children: Vec<Self>) -> Self {
        Self::new(
            NodeKind::Element(tag.into()),
            props,
            None,
            children,
            NodeFlags::empty(),
            None,
        )
    }

    /// Builds an empty virtual fragment.
    #[must_use]
    pub fn fragment(children: Vec<Self>) -> Self {
        Self::new(
            NodeKind::Virtual,
            Props::new(),
            None,
            children,
            NodeFlags::empty(),
            None,
        )
    }

    /// Builds a text leaf.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let mut node = Self::leaf(NodeKind::Text);
        node.text = Some(value.into());
        node
    }

    /// Builds a reactive leaf.
    #[must_use]
    pub fn reactive(binding: ReactiveBinding, subscriber: Option<Subscriber>) -> Self {
        let mut node = Self::leaf(NodeKind::Reactive);
        node.signal = Some(ReactiveLeaf {
            binding,
            subscriber,
        });
        node
    }

    /// Builds a skip marker.
    #[must_use]
    pub fn skip_render() -> Self {
        Self::leaf(NodeKind::SkipRender)
    }

    fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, Props::new(), None, Vec::new(), NodeFlags::empty(), None)
    }

    pub(crate) fn with_dev(mut self, dev: Option<DevSource>) -> Self {
        self.dev = dev;
        self
    }

    /// What this node represents.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Identity used to match this node against the previous tree.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The explicit key, if one was given.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Attributes or parameters.
    #[must_use]
    pub const fn props(&self) -> &Props {
        &self.props
    }

    /// Props known not to change across re-renders.
    #[must_use]
    pub const fn immutable_props(&self) -> Option<&Props> {
        self.immutable_props.as_ref()
    }

    /// Flattened children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Rendering hints.
    #[must_use]
    pub const fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// The text of a text leaf.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The binding of a reactive leaf.
    #[must_use]
    pub const fn reactive_leaf(&self) -> Option<&ReactiveLeaf> {
        self.signal.as_ref()
    }

    /// The live element a synthetic root is anchored to.
    #[must_use]
    pub const fn bound_element(&self) -> Option<ElementId> {
        self.elm
    }

    /// Where the descriptor this node came from was written.
    #[must_use]
    pub const fn dev(&self) -> Option<&DevSource> {
        self.dev.as_ref()
    }

    /// Renders this tree as JSON, for diagnostics.
    ///
    /// Reactive leaves are rendered with their current value.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let mut value = json!({
            "type": self.kind.type_name(),
            "id": self.id,
        });
        let Value::Object(map) = &mut value else {
            return value;
        };
        if let Some(key) = &self.key {
            map.insert("key".into(), json!(key));
        }
        if !self.props.is_empty() {
            map.insert("props".into(), json!(self.props));
        }
        if let Some(immutable) = &self.immutable_props {
            map.insert("immutableProps".into(), json!(immutable));
        }
        if !self.flags.is_empty() {
            map.insert("flags".into(), json!(self.flags.bits()));
        }
        if let Some(text) = &self.text {
            map.insert("text".into(), json!(text));
        }
        if let Some(leaf) = &self.signal {
            map.insert("signal".into(), json!(leaf.binding.current()));
        }
        if let Some(elm) = self.elm {
            map.insert("element".into(), json!(elm.get()));
        }
        if !self.children.is_empty() {
            let children: Vec<Value> = self.children.iter().map(Self::snapshot).collect();
            map.insert("children".into(), Value::Array(children));
        }
        value
    }
}

fn identity(kind: &NodeKind, key: Option<&str>) -> String {
    match key {
        Some(key) if !key.is_empty() => format!("{}:{key}", kind.type_name()),
        _ => kind.type_name().to_owned(),
    }
}

/// Result of normalizing one raw value.
#[derive(Debug, Clone, Default)]
pub enum Normalized {
    /// The value contributes nothing.
    #[default]
    Absent,
    /// A single node.
    Node(IntermediateNode),
    /// A flat sequence of nodes.
    Nodes(Vec<IntermediateNode>),
}

impl Normalized {
    /// Coerces the result to a sequence. Absent becomes empty.
    #[must_use]
    pub fn into_vec(self) -> Vec<IntermediateNode> {
        match self {
            Self::Absent => Vec::new(),
            Self::Node(node) => vec![node],
            Self::Nodes(nodes) => nodes,
        }
    }

    /// Returns `true` if nothing was produced.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Anchors normalized output under a synthetic virtual root bound to `element`.
///
/// Every host gets the same root identity no matter how many top-level nodes
/// its component produced.
#[must_use]
pub fn wrap_root(element: ElementId, output: Normalized) -> IntermediateNode {
    let mut root = IntermediateNode::fragment(output.into_vec());
    root.elm = Some(element);
    root
}
