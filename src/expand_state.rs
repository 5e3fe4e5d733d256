use std::collections::HashSet;

use crate::node::NodePath;

/// Tracks which folders are expanded, keyed by their render path.
///
/// Keys are [`NodePath`]s, so a folder keeps its state when its siblings are
/// reordered.
#[derive(Debug, Default, Clone)]
pub struct ExpansionState {
    expanded: HashSet<NodePath>,
}

impl ExpansionState {
    pub fn expand(&mut self, path: &NodePath) {
        self.expanded.insert(path.clone());
    }

    /// Remove this path and all descendants from the expanded set.
    ///
    /// Descendants are torn down with their parent, so a later re-expand
    /// shows them collapsed again.
    pub fn collapse_recursive(&mut self, path: &NodePath) {
        self.expanded.retain(|p| !p.starts_with(path));
    }

    /// Flip a folder; returns the new expansion flag.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if self.is_expanded(path) {
            self.collapse_recursive(path);
            false
        } else {
            self.expand(path);
            true
        }
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.contains(path)
    }

    /// Reset all expansions.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
