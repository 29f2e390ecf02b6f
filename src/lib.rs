#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]

extern crate alloc;

pub mod cache;
pub mod config;
pub mod context;
pub mod engine;
/// Error types for normalization and render passes.
pub mod error;
pub mod host;
pub mod invoke;
pub mod jsx;
pub mod logging;
pub mod node;
pub mod normalize;
pub mod render;
pub mod signal;

pub use cache::get_previous_tree;
pub use config::RenderConfig;
pub use context::{ContainerState, RenderContext, RenderStaticContext};
pub use engine::{
    ComponentExecutor, DiffEngine, ExecutedComponent, RenderFlags, SubscriptionManager,
    TreeReconstructor,
};
pub use error::{BoxError, NormalizeError, RenderError};
pub use host::{HeadStyle, HostContext, HostFlags};
pub use invoke::{InvokeContext, Subscriber};
pub use jsx::{Component, ComponentProps, DevSource, JsxNode, NodeType, RawNode};
pub use node::{ElementId, IntermediateNode, NodeFlags, NodeKind, Normalized, Props, wrap_root};
pub use normalize::{WrapPolicy, normalize, normalize_now};
pub use render::{RenderReport, Renderer};
pub use signal::ReactiveBinding;

pub use nami as reactive;
pub use tracing as log;
