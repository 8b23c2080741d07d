//! Port definition for document filters.

use async_trait::async_trait;

use crate::domain::entities::{Document, NodeId};

/// One pass of a content filter chain, applied node by node.
///
/// A filter may rewrite the node's content and append siblings at the end of
/// its parent, but must never detach, replace or reorder existing nodes: the
/// caller is walking the tree while the filter runs.
#[async_trait]
pub trait NodeFilter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies the filter to `node`. Never fails; anomalies degrade to a
    /// no-op or partial output.
    async fn filter(&self, document: &mut Document, node: NodeId);
}
