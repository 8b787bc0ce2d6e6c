//! Cached subject tree nodes.
//!
//! Trees are built fresh for each hierarchy query from the cached subject
//! records and discarded after the response. `samples` is only populated
//! while a query is being materialized.

use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Separator between path segments in an absolute subject path.
pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectNode {
    pub absolute_path: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub children: Vec<SubjectNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Sample>,
}

impl SubjectNode {
    /// Create a leaf node; the name is the last segment of the path.
    pub fn new(absolute_path: impl Into<String>) -> Self {
        let absolute_path = absolute_path.into();
        let name = absolute_path
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            absolute_path,
            name,
            tags: Vec::new(),
            children: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_child(mut self, child: SubjectNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag_refs(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SubjectNode::node_count).sum::<usize>()
    }

    /// Levels of `children` below this node (0 for a leaf).
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Depth-first search by absolute path.
    pub fn find(&self, absolute_path: &str) -> Option<&SubjectNode> {
        if self.absolute_path == absolute_path {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find(absolute_path))
    }
}

/// Strip `children` below the requested level.
///
/// `depth = 0` keeps direct children with their own children removed;
/// `depth = d` keeps `d + 1` levels below `node`. Runs after pruning so
/// ancestor retention is decided against the full tree.
pub fn limit_depth(node: &mut SubjectNode, depth: usize) {
    for child in &mut node.children {
        if depth == 0 {
            child.children.clear();
        } else {
            limit_depth(child, depth - 1);
        }
    }
}
