use serde::{Deserialize, Serialize};

/// Suffix for a keyword that was discovered but never expanded.
pub const TERMINAL_TAG: char = '$';
/// Suffix for a keyword whose page was already fetched earlier in the run.
pub const VISITED_TAG: char = '@';

/// One discovered page, identified by its keyword.
///
/// Nodes start out flat (as produced by the expander) and only gain
/// `children` once the tree builder links them to their parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordNode {
    pub keyword: String,
    pub parent_keyword: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<KeywordNode>>,
}

impl KeywordNode {
    pub fn new(keyword: String, parent_keyword: Option<String>, url: String) -> Self {
        Self {
            keyword,
            parent_keyword,
            url,
            children: None,
        }
    }

    pub fn root(keyword: String, url: String) -> Self {
        Self::new(keyword, None, url)
    }

    pub fn is_root(&self) -> bool {
        self.parent_keyword.is_none()
    }

    /// Append a status suffix to the keyword in place.
    pub fn tag(&mut self, suffix: char) {
        self.keyword.push(suffix);
    }

    pub fn push_child(&mut self, child: KeywordNode) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    pub fn children(&self) -> &[KeywordNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of nodes in the tree rooted here, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(KeywordNode::node_count).sum::<usize>()
    }

    /// Number of levels in the tree rooted here; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(KeywordNode::depth)
            .max()
            .unwrap_or(0)
    }
}
