// Rebuilding the keyword tree from the expander's flat worklist

use std::collections::HashMap;
use thiserror::Error;
use wikitree_scanner::KeywordNode;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("no root keyword in the list")]
    MissingRoot,

    #[error("more than one root keyword: {first} and {second}")]
    MultipleRoots { first: String, second: String },

    #[error("keyword {keyword} points at unknown parent {parent_keyword}")]
    OrphanNode {
        keyword: String,
        parent_keyword: String,
    },

    #[error("keyword {keyword} is not reachable from the root")]
    Detached { keyword: String },
}

/// Link every node to its parent and return the root.
///
/// A node's parent is the first node in list order whose keyword equals its
/// `parent_keyword`. Children keep their relative input order. Lists with no
/// root, several roots, or a parent keyword that matches nothing are rejected.
pub fn build_tree(nodes: Vec<KeywordNode>) -> Result<KeywordNode, TreeError> {
    // First occurrence wins on duplicate keywords
    let mut first_index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        first_index.entry(node.keyword.as_str()).or_insert(idx);
    }

    let mut root = None;
    let mut child_indices: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

    for (idx, node) in nodes.iter().enumerate() {
        match node.parent_keyword.as_deref() {
            None => {
                if let Some(first) = root {
                    let first: &KeywordNode = &nodes[first];
                    return Err(TreeError::MultipleRoots {
                        first: first.keyword.clone(),
                        second: node.keyword.clone(),
                    });
                }
                root = Some(idx);
            }
            Some(parent_keyword) => {
                let parent = first_index.get(parent_keyword).ok_or_else(|| TreeError::OrphanNode {
                    keyword: node.keyword.clone(),
                    parent_keyword: parent_keyword.to_string(),
                })?;
                child_indices[*parent].push(idx);
            }
        }
    }

    let root = root.ok_or(TreeError::MissingRoot)?;

    let mut slots: Vec<Option<KeywordNode>> = nodes.into_iter().map(Some).collect();
    let tree = assemble(root, &mut slots, &child_indices);

    // Nodes left over sit on a parent cycle that never reaches the root
    if let Some(node) = slots.into_iter().flatten().next() {
        return Err(TreeError::Detached {
            keyword: node.keyword,
        });
    }

    tree.ok_or(TreeError::MissingRoot)
}

fn assemble(
    idx: usize,
    slots: &mut [Option<KeywordNode>],
    child_indices: &[Vec<usize>],
) -> Option<KeywordNode> {
    let mut node = slots[idx].take()?;
    for &child in &child_indices[idx] {
        if let Some(child_node) = assemble(child, slots, child_indices) {
            node.push_child(child_node);
        }
    }
    Some(node)
}
