//! The per-host tree cache.

use crate::engine::TreeReconstructor;
use crate::host::HostContext;
use crate::node::{IntermediateNode, Normalized, wrap_root};

/// Returns the tree `host` rendered last.
///
/// A host that has never rendered through the renderer, such as one whose
/// markup already exists when it is first hydrated, gets its tree rebuilt
/// from the live element once and cached. A host without live children yields
/// an empty virtual root.
pub fn get_previous_tree<'h>(
    host: &'h mut HostContext,
    reconstructor: &dyn TreeReconstructor,
) -> &'h IntermediateNode {
    let element = host.element();
    host.vdom_slot().get_or_insert_with(|| {
        tracing::debug!(host = %element, "reconstructing previous tree from live element");
        wrap_root(
            element,
            Normalized::Nodes(reconstructor.reconstruct_tree(element)),
        )
    })
}
