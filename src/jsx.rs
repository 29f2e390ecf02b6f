//! Raw component output.
//!
//! Components return a [`RawNode`]: a closed union over everything a render
//! function may produce. Nothing here is canonical yet; the normalizer turns a
//! `RawNode` into [`IntermediateNode`](crate::node::IntermediateNode)s.
//!
//! ```
//! use waterui_reconcile::jsx::{JsxNode, RawNode};
//!
//! let list = JsxNode::element("ul")
//!     .with_key("items")
//!     .with_children(vec![
//!         RawNode::from(JsxNode::element("li").with_children("one")),
//!         RawNode::from(JsxNode::element("li").with_children(2)),
//!         RawNode::Null,
//!     ]);
//! let _raw = RawNode::from(list);
//! ```

use alloc::rc::Rc;
use core::fmt::{self, Debug, Display};
use core::future::Future;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::error::BoxError;
use crate::invoke::InvokeContext;
use crate::node::{NodeFlags, Props};
use crate::signal::ReactiveBinding;

/// Anything a component may return.
pub enum RawNode {
    /// `null`/`undefined`; contributes nothing.
    Null,
    /// Booleans contribute nothing, which keeps `cond && node` patterns cheap.
    Bool(bool),
    /// A string primitive.
    Text(String),
    /// An integer primitive.
    Int(i64),
    /// A floating point primitive.
    Float(f64),
    /// A structured output descriptor.
    Element(Box<JsxNode>),
    /// A reactive text binding.
    Signal(ReactiveBinding),
    /// A sequence, possibly nested.
    List(Vec<RawNode>),
    /// A value that is not available yet.
    Pending(LocalBoxFuture<'static, Result<RawNode, BoxError>>),
    /// Leave the matching subtree untouched on this pass.
    SkipRender,
    /// A value none of the other shapes describe. Logged and dropped.
    Unsupported(Box<dyn Debug>),
}

impl RawNode {
    /// Wraps a future producing a raw node.
    pub fn pending(future: impl Future<Output = Self> + 'static) -> Self {
        Self::Pending(future.map(Ok).boxed_local())
    }

    /// Wraps a fallible future. Its error aborts the render pass.
    pub fn try_pending<E>(future: impl Future<Output = Result<Self, E>> + 'static) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Pending(future.map(|result| result.map_err(Into::into)).boxed_local())
    }

    /// Wraps an arbitrary value the renderer does not understand.
    pub fn unsupported(value: impl Debug + 'static) -> Self {
        Self::Unsupported(Box::new(value))
    }

    /// Returns the descriptor if this is a structured output.
    #[must_use]
    pub fn as_element(&self) -> Option<&JsxNode> {
        match self {
            Self::Element(node) => Some(node),
            _ => None,
        }
    }
}

impl Debug for RawNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Element(node) => f.debug_tuple("Element").field(node).finish(),
            Self::Signal(binding) => f.debug_tuple("Signal").field(binding).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Pending(_) => f.write_str("Pending"),
            Self::SkipRender => f.write_str("SkipRender"),
            Self::Unsupported(value) => f.debug_tuple("Unsupported").field(value).finish(),
        }
    }
}

impl From<()> for RawNode {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl From<bool> for RawNode {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawNode {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawNode {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RawNode {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            /// Values outside the `i64` range become floats.
            impl From<$ty> for RawNode {
                #[allow(clippy::cast_precision_loss)]
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize);

impl From<f32> for RawNode {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for RawNode {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<JsxNode> for RawNode {
    fn from(value: JsxNode) -> Self {
        Self::Element(Box::new(value))
    }
}

impl From<ReactiveBinding> for RawNode {
    fn from(value: ReactiveBinding) -> Self {
        Self::Signal(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for RawNode {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for RawNode {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> FromIterator<T> for RawNode {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Source location of a descriptor, recorded by dev builds of the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevSource {
    /// File the descriptor was written in.
    pub file: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl DevSource {
    /// Creates a new source location.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl Display for DevSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// What a descriptor renders to.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// A live element with this tag name.
    Tag(String),
    /// A virtual fragment.
    Virtual,
    /// A component invoked during normalization.
    Component(Component),
    /// A type that arrived through a loosely typed channel and matches none
    /// of the above. Normalizing it fails.
    Other(Value),
}

impl From<&str> for NodeType {
    fn from(value: &str) -> Self {
        Self::Tag(value.to_owned())
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        Self::Tag(value)
    }
}

impl From<Component> for NodeType {
    fn from(value: Component) -> Self {
        Self::Component(value)
    }
}

impl From<Value> for NodeType {
    fn from(value: Value) -> Self {
        match value {
            Value::String(tag) => Self::Tag(tag),
            other => Self::Other(other),
        }
    }
}

/// A structured output descriptor.
#[derive(Debug)]
pub struct JsxNode {
    /// What this descriptor renders to.
    pub node_type: NodeType,
    /// Attributes or component parameters.
    pub props: Props,
    /// Props known not to change across re-renders.
    pub immutable_props: Option<Props>,
    /// Raw children, normalized as a sequence.
    pub children: Option<RawNode>,
    /// Rendering hints passed through to the diff engine.
    pub flags: NodeFlags,
    /// Explicit key used for identity matching among siblings.
    pub key: Option<String>,
    /// Where this descriptor was written.
    pub dev: Option<DevSource>,
}

impl JsxNode {
    /// Creates a descriptor of the given type with no props or children.
    pub fn new(node_type: impl Into<NodeType>) -> Self {
        Self {
            node_type: node_type.into(),
            props: Props::new(),
            immutable_props: None,
            children: None,
            flags: NodeFlags::empty(),
            key: None,
            dev: None,
        }
    }

    /// Creates an element descriptor.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeType::Tag(tag.into()))
    }

    /// Creates a virtual fragment descriptor.
    #[must_use]
    pub fn fragment() -> Self {
        Self::new(NodeType::Virtual)
    }

    /// Creates a component descriptor.
    #[must_use]
    pub fn component(component: Component) -> Self {
        Self::new(NodeType::Component(component))
    }

    /// Sets the key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets one prop.
    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Sets one immutable prop.
    #[must_use]
    pub fn with_immutable_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.immutable_props
            .get_or_insert_with(Props::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the children.
    #[must_use]
    pub fn with_children(mut self, children: impl Into<RawNode>) -> Self {
        self.children = Some(children.into());
        self
    }

    /// Sets the flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Records where this descriptor was written.
    #[must_use]
    pub fn with_dev(mut self, dev: DevSource) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Returns `true` if this descriptor invokes a component.
    #[must_use]
    pub const fn is_component(&self) -> bool {
        matches!(self.node_type, NodeType::Component(_))
    }
}

/// Input handed to a component when it is invoked.
#[derive(Debug)]
pub struct ComponentProps {
    /// Declared props.
    pub props: Props,
    /// Children passed to the component, unnormalized.
    pub children: Option<RawNode>,
    /// The descriptor's key.
    pub key: Option<String>,
    /// The descriptor's flags.
    pub flags: NodeFlags,
}

type ComponentFn = dyn Fn(&InvokeContext, ComponentProps) -> RawNode;

/// A render function invoked during normalization.
///
/// Components are cheap to clone and compare by pointer.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Rc<ComponentFn>,
}

impl Component {
    /// Creates a component from a render function.
    pub fn new(
        name: &'static str,
        render: impl Fn(&InvokeContext, ComponentProps) -> RawNode + 'static,
    ) -> Self {
        Self {
            name,
            render: Rc::new(render),
        }
    }

    /// The component's name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call(&self, ctx: &InvokeContext, props: ComponentProps) -> RawNode {
        (self.render)(ctx, props)
    }
}

impl Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}
