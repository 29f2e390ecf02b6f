//! Normalization of raw component output.
//!
//! [`normalize`] converts a [`RawNode`] into the canonical
//! [`IntermediateNode`] form. Dispatch is one exhaustive match over the raw
//! union:
//!
//! | Raw value | Result |
//! |---|---|
//! | `Null`, `Bool` | absent |
//! | `Text`, `Int`, `Float` | text leaf |
//! | `Element` | element, fragment, or the invoked component's output |
//! | `Signal` | reactive leaf |
//! | `List` | flattened sequence, absent entries dropped |
//! | `Pending` | whatever the resolved value normalizes to |
//! | `SkipRender` | skip marker |
//! | `Unsupported` | absent, with a warning |
//!
//! Siblings are normalized concurrently on the caller's task and collected
//! positionally, so the output always follows source order.

use alloc::rc::Rc;
use core::fmt::{self, Debug};

use futures::future::{FutureExt, LocalBoxFuture, try_join_all};

use crate::error::NormalizeError;
use crate::invoke::InvokeContext;
use crate::jsx::{ComponentProps, JsxNode, NodeType, RawNode};
use crate::node::{IntermediateNode, NodeKind, Normalized};

type WrapPredicate = dyn Fn(&RawNode, Option<&str>) -> bool;

/// Decides whether a component's output is wrapped in a keyed fragment or
/// normalized in place.
///
/// Normalizing in place avoids a spurious fragment layer for pass-through
/// components. Wrapping keeps the descriptor's key attached to something the
/// diff engine can match.
#[derive(Clone, Default)]
pub enum WrapPolicy {
    /// Wrap only keyed components whose output would lose the key: anything
    /// that is not a descriptor, or a non-component descriptor with a
    /// different key.
    #[default]
    PreserveKey,
    /// Always normalize in place.
    Never,
    /// Always wrap.
    Always,
    /// Decide with a custom predicate over the output and the descriptor key.
    Custom(Rc<WrapPredicate>),
}

impl WrapPolicy {
    /// Creates a policy from a predicate.
    pub fn custom(predicate: impl Fn(&RawNode, Option<&str>) -> bool + 'static) -> Self {
        Self::Custom(Rc::new(predicate))
    }

    /// Returns `true` if `output`, produced by a descriptor keyed `key`,
    /// must be wrapped. An empty key counts as no key.
    #[must_use]
    pub fn should_wrap(&self, output: &RawNode, key: Option<&str>) -> bool {
        let key = key.filter(|key| !key.is_empty());
        match self {
            Self::PreserveKey => key.is_some_and(|key| match output.as_element() {
                Some(node) => !node.is_component() && node.key.as_deref() != Some(key),
                None => true,
            }),
            Self::Never => false,
            Self::Always => true,
            Self::Custom(predicate) => predicate(output, key),
        }
    }
}

impl Debug for WrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreserveKey => f.write_str("PreserveKey"),
            Self::Never => f.write_str("Never"),
            Self::Always => f.write_str("Always"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Normalizes raw output under `ctx`.
///
/// The future completes without suspending unless some reachable value is
/// pending.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidNodeType`] if a descriptor has a type that
/// is neither a tag, the fragment marker nor a component, and
/// [`NormalizeError::Rejected`] if a pending value fails.
pub async fn normalize(raw: RawNode, ctx: &InvokeContext) -> Result<Normalized, NormalizeError> {
    process_data(raw, ctx).await
}

/// Normalizes raw output that contains nothing pending.
///
/// Returns `None` if normalization would have to wait on a pending value.
///
/// # Errors
///
/// Same as [`normalize`].
pub fn normalize_now(
    raw: RawNode,
    ctx: &InvokeContext,
) -> Option<Result<Normalized, NormalizeError>> {
    process_data(raw, ctx).now_or_never()
}

fn process_data(
    raw: RawNode,
    ctx: &InvokeContext,
) -> LocalBoxFuture<'_, Result<Normalized, NormalizeError>> {
    async move {
        match raw {
            RawNode::Null | RawNode::Bool(_) => Ok(Normalized::Absent),
            RawNode::Text(text) => Ok(Normalized::Node(IntermediateNode::text(text))),
            RawNode::Int(value) => Ok(Normalized::Node(IntermediateNode::text(value.to_string()))),
            RawNode::Float(value) => Ok(Normalized::Node(IntermediateNode::text(
                number_to_string(value),
            ))),
            RawNode::Element(node) => process_node(*node, ctx).await,
            RawNode::Signal(binding) => Ok(Normalized::Node(IntermediateNode::reactive(
                binding,
                ctx.subscriber(),
            ))),
            RawNode::List(items) => {
                let results = try_join_all(items.into_iter().map(|item| process_data(item, ctx)))
                    .await?;
                let mut nodes = Vec::with_capacity(results.len());
                for result in results {
                    match result {
                        Normalized::Absent => {}
                        Normalized::Node(node) => nodes.push(node),
                        Normalized::Nodes(inner) => nodes.extend(inner),
                    }
                }
                Ok(Normalized::Nodes(nodes))
            }
            RawNode::Pending(future) => {
                let resolved = future.await.map_err(NormalizeError::Rejected)?;
                process_data(resolved, ctx).await
            }
            RawNode::SkipRender => Ok(Normalized::Node(IntermediateNode::skip_render())),
            RawNode::Unsupported(value) => {
                tracing::warn!(
                    ?value,
                    "an unsupported value was passed to the node tree, skipping render"
                );
                Ok(Normalized::Absent)
            }
        }
    }
    .boxed_local()
}

fn process_node(
    node: JsxNode,
    ctx: &InvokeContext,
) -> LocalBoxFuture<'_, Result<Normalized, NormalizeError>> {
    async move {
        let JsxNode {
            node_type,
            props,
            immutable_props,
            children,
            flags,
            key,
            dev,
        } = node;

        let kind = match node_type {
            NodeType::Tag(tag) => NodeKind::Element(tag),
            NodeType::Virtual => NodeKind::Virtual,
            NodeType::Component(component) => {
                let output = ctx.invoke(
                    &component,
                    ComponentProps {
                        props,
                        children,
                        key: key.clone(),
                        flags,
                    },
                );
                if !ctx.wrap_policy().should_wrap(&output, key.as_deref()) {
                    return process_data(output, ctx).await;
                }
                let mut wrapper = JsxNode::fragment().with_children(output);
                wrapper.key = key;
                wrapper.dev = dev;
                return process_node(wrapper, ctx).await;
            }
            NodeType::Other(value) => {
                let found = value.to_string();
                match &dev {
                    Some(location) => {
                        tracing::error!(%found, %location, "invalid node type");
                    }
                    None => tracing::error!(%found, "invalid node type"),
                }
                return Err(NormalizeError::InvalidNodeType {
                    found,
                    location: dev,
                });
            }
        };

        let children = match children {
            Some(children) => process_data(children, ctx).await?.into_vec(),
            None => Vec::new(),
        };

        Ok(Normalized::Node(
            IntermediateNode::new(kind, props, immutable_props, children, flags, key)
                .with_dev(dev),
        ))
    }
    .boxed_local()
}

/// Formats a float the way text content expects it: shortest round-trip
/// digits, plain notation for exponents in `-7..21`, `e` notation otherwise.
fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let sign = if value.is_sign_negative() { "-" } else { "" };

    // `point` is where the decimal point sits relative to the digit string.
    let point = exponent + 1;
    let len = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let zeros = |count: i32| "0".repeat(usize::try_from(count).unwrap_or(0));
    let split = usize::try_from(point).unwrap_or(0);

    let body = if len <= point && point <= 21 {
        format!("{digits}{}", zeros(point - len))
    } else if 0 < point && point <= 21 {
        format!("{}.{}", &digits[..split], &digits[split..])
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", zeros(-point))
    } else {
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{head}e{exponent_sign}{}", exponent.abs())
        } else {
            format!("{head}.{tail}e{exponent_sign}{}", exponent.abs())
        }
    };
    format!("{sign}{body}")
}
