//! Runs a chain of node filters over every text node of a document.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::entities::{Document, NodeId};
use crate::domain::ports::NodeFilter;

use super::tree_walker::TreeWalker;

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Text nodes handed to the filter chain.
    pub visited: usize,
    /// Text nodes left empty by a filter, including empty ones it appended.
    pub emptied: usize,
    /// Filter calls abandoned because they exceeded the node timeout.
    pub timed_out: usize,
    /// Emptied text nodes detached after the walk.
    pub pruned: usize,
}

/// Orchestrates filters over a document.
///
/// Filters run while the walk is in progress, so they only mutate in place.
/// Structural cleanup (detaching the text nodes the pass emptied or appended
/// empty) is deferred until the walk has finished. Text nodes that were
/// already empty before the pass are kept.
pub struct FilterPass {
    filters: Vec<Arc<dyn NodeFilter>>,
    node_timeout: Option<Duration>,
    prune_empty: bool,
}

impl FilterPass {
    /// Creates a pass without timeout or pruning.
    #[must_use]
    pub fn new(filters: Vec<Arc<dyn NodeFilter>>) -> Self {
        Self {
            filters,
            node_timeout: None,
            prune_empty: false,
        }
    }

    /// Bounds every single filter call. A zero duration disables the bound.
    #[must_use]
    pub fn with_node_timeout(mut self, timeout: Duration) -> Self {
        self.node_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Enables detaching emptied text nodes after the walk.
    #[must_use]
    pub const fn with_pruning(mut self, prune_empty: bool) -> Self {
        self.prune_empty = prune_empty;
        self
    }

    /// Applies every filter, in order, to every text node below `root`.
    pub async fn run(&self, document: &mut Document, root: NodeId) -> PassReport {
        let mut report = PassReport::default();
        let mut emptied = Vec::new();
        let mut walker = TreeWalker::new(root);
        let first_created = document.len();

        while let Some(node) = walker.next_text(document) {
            report.visited += 1;
            let created = node.index() >= first_created;
            let had_text = document
                .text_content(node)
                .is_some_and(|text| !text.is_empty());

            for filter in &self.filters {
                debug!(filter = filter.name(), node = %node, "Applying filter");
                if !self.apply(filter.as_ref(), document, node).await {
                    report.timed_out += 1;
                }
            }

            let now_empty = document.text_content(node).is_some_and(|text| text.is_empty());
            if (had_text || created) && now_empty {
                emptied.push(node);
            }
        }

        report.emptied = emptied.len();
        if self.prune_empty {
            for node in emptied {
                document.detach(node);
                report.pruned += 1;
            }
        }

        info!(
            visited = report.visited,
            emptied = report.emptied,
            timed_out = report.timed_out,
            pruned = report.pruned,
            "Filter pass complete"
        );
        report
    }

    /// Returns false if the call was abandoned on timeout.
    async fn apply(&self, filter: &dyn NodeFilter, document: &mut Document, node: NodeId) -> bool {
        let Some(timeout) = self.node_timeout else {
            filter.filter(document, node).await;
            return true;
        };

        if tokio::time::timeout(timeout, filter.filter(document, node))
            .await
            .is_ok()
        {
            true
        } else {
            warn!(
                filter = filter.name(),
                node = %node,
                timeout_ms = timeout.as_millis(),
                "Filter timed out, node left unchanged"
            );
            false
        }
    }
}

impl std::fmt::Debug for FilterPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
        f.debug_struct("FilterPass")
            .field("filters", &names)
            .field("node_timeout", &self.node_timeout)
            .field("prune_empty", &self.prune_empty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::emoji_filter::EmojiFilter;
    use crate::domain::entities::{Element, EmojiMap, NodeData};
    use crate::domain::ports::ImageMaterializerPort;
    use crate::domain::ports::mocks::{PendingMaterializer, RecordingMaterializer};

    fn emoji_filter(materializer: Arc<dyn ImageMaterializerPort>) -> Arc<dyn NodeFilter> {
        let emoji: EmojiMap = [(":cat:", "cat.png"), (":dog:", "dog.png")]
            .into_iter()
            .collect();
        Arc::new(EmojiFilter::new(emoji, materializer))
    }

    #[tokio::test]
    async fn test_pass_filters_every_paragraph() {
        let mut document = Document::from_plain_text("hi :cat:\n\nno emoji\n\n:dog: bye");
        let materializer = Arc::new(RecordingMaterializer::new());
        let pass = FilterPass::new(vec![emoji_filter(materializer.clone())]);

        let root = document.root();
        let report = pass.run(&mut document, root).await;

        assert_eq!(materializer.calls().await, vec!["cat.png", "dog.png"]);
        // both filtered texts plus the empty leading text before `:dog:`
        assert_eq!(report.emptied, 3);
        assert_eq!(report.pruned, 0);
        assert_eq!(report.timed_out, 0);
        // three original texts plus the two appended leading texts
        assert_eq!(report.visited, 5);
        assert_eq!(
            document.to_html(root),
            "<body><p>hi <img class=\"emoji\" src=\"data:image/png;base64,cat.png\"></p>\
             <p>no emoji</p>\
             <p><img class=\"emoji\" src=\"data:image/png;base64,dog.png\"></p></body>"
        );
    }

    #[tokio::test]
    async fn test_pruning_detaches_emptied_nodes_after_walk() {
        let mut document = Document::from_plain_text("hi :cat:");
        let pass = FilterPass::new(vec![emoji_filter(Arc::new(RecordingMaterializer::new()))])
            .with_pruning(true);

        let root = document.root();
        let report = pass.run(&mut document, root).await;

        assert_eq!(report.pruned, 1);
        let body = document.children(root)[0];
        let p = document.children(body)[0];
        let kinds: Vec<bool> = document
            .children(p)
            .iter()
            .map(|child| matches!(document.data(*child), Some(NodeData::Text(_))))
            .collect();
        assert_eq!(kinds, vec![true, false]);
        assert_eq!(document.text_content(p).as_deref(), Some("hi "));
    }

    #[tokio::test]
    async fn test_pruning_detaches_empty_leading_text() {
        let mut document = Document::from_plain_text(":dog: bye");
        let pass = FilterPass::new(vec![emoji_filter(Arc::new(RecordingMaterializer::new()))])
            .with_pruning(true);

        let root = document.root();
        let report = pass.run(&mut document, root).await;

        assert_eq!(report.pruned, 2);
        let body = document.children(root)[0];
        let p = document.children(body)[0];
        assert_eq!(document.children(p).len(), 1);
        assert!(matches!(
            document.data(document.children(p)[0]),
            Some(NodeData::Element(_))
        ));
    }

    #[tokio::test]
    async fn test_pruning_keeps_text_that_was_empty_before_pass() {
        let mut document = Document::new();
        let root = document.root();
        let p = document.create_element(Element::new("p"));
        document.append_child(root, p);
        let blank = document.create_text("");
        document.append_child(p, blank);
        let pass = FilterPass::new(vec![emoji_filter(Arc::new(RecordingMaterializer::new()))])
            .with_pruning(true);

        let report = pass.run(&mut document, root).await;

        assert_eq!(report.pruned, 0);
        assert_eq!(document.children(p).to_vec(), vec![blank]);
    }

    #[tokio::test]
    async fn test_timeout_leaves_node_unchanged_and_continues() {
        let mut document = Document::from_plain_text("stuck :cat:\n\nplain");
        let pass = FilterPass::new(vec![emoji_filter(Arc::new(PendingMaterializer))])
            .with_node_timeout(Duration::from_millis(20))
            .with_pruning(true);

        let root = document.root();
        let before = document.to_html(root);
        let report = pass.run(&mut document, root).await;

        assert_eq!(report.visited, 2);
        assert_eq!(report.timed_out, 1);
        assert_eq!(report.emptied, 0);
        assert_eq!(document.to_html(root), before);
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let pass = FilterPass::new(Vec::new()).with_node_timeout(Duration::ZERO);
        assert!(pass.node_timeout.is_none());
    }
}
