use indextree::{Arena, NodeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::node::Node;

/// One scanned filesystem entry
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    /// Cumulative size including all children
    pub cumulative_size: u64,
}

/// Arena that collects walker output in any order before it is turned into
/// a [`Node`] tree.
pub struct ScanTree {
    arena: Arena<ScanEntry>,
    root: NodeId,
    path_to_node: HashMap<PathBuf, NodeId>,
}

impl ScanTree {
    /// Create a new tree with a root node. The root is named after the last
    /// component of `root_path`, or the whole path when it has none (`/`,
    /// `.`, `..`); callers that want a real name pass a canonical path.
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        let mut arena = Arena::new();
        let root_path_buf = root_path.as_ref().to_path_buf();
        let root_name = root_path_buf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path_buf.display().to_string());

        let root_node = ScanEntry {
            name: root_name,
            size: 0,
            is_dir: true,
            cumulative_size: 0,
        };

        let root = arena.new_node(root_node);
        let mut path_to_node = HashMap::new();
        path_to_node.insert(root_path_buf, root);

        Self {
            arena,
            root,
            path_to_node,
        }
    }

    /// Add an entry below its parent. Returns false when the parent has not
    /// been added yet or the path is already known.
    pub fn add_entry(&mut self, path: PathBuf, size: u64, is_dir: bool) -> bool {
        if self.path_to_node.contains_key(&path) {
            return false;
        }
        let Some(&parent_id) = path.parent().and_then(|p| self.path_to_node.get(p)) else {
            return false;
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let node_id = self.arena.new_node(ScanEntry {
            name,
            size,
            is_dir,
            cumulative_size: size,
        });
        parent_id.append(node_id, &mut self.arena);
        self.path_to_node.insert(path, node_id);
        true
    }

    /// Calculate cumulative sizes for all directories (bottom-up)
    pub fn calculate_sizes(&mut self) {
        self.calculate_sizes_recursive(self.root);
    }

    fn calculate_sizes_recursive(&mut self, node_id: NodeId) -> u64 {
        let mut total = 0u64;

        // Collect children first (to avoid borrow issues)
        let children: Vec<NodeId> = node_id.children(&self.arena).collect();

        for child in children {
            total += self.calculate_sizes_recursive(child);
        }

        if let Some(node) = self.arena.get_mut(node_id) {
            let entry = node.get_mut();
            if entry.is_dir {
                entry.cumulative_size = total;
            } else {
                total += entry.size;
                entry.cumulative_size = entry.size;
            }
        }

        total
    }

    pub fn len(&self) -> usize {
        self.path_to_node.len()
    }

    /// Total size of the tree
    pub fn total_size(&self) -> u64 {
        self.arena
            .get(self.root)
            .map(|n| n.get().cumulative_size)
            .unwrap_or(0)
    }

    /// Convert to the browser's node model, keeping insertion order.
    /// Every node is annotated with its human-readable cumulative size.
    pub fn to_node(&self) -> Node {
        self.to_node_recursive(self.root)
    }

    fn to_node_recursive(&self, node_id: NodeId) -> Node {
        let Some(entry) = self.arena.get(node_id).map(|n| n.get()) else {
            return Node::folder("", Vec::new());
        };
        let meta = format_size(entry.cumulative_size);

        if entry.is_dir {
            let children = node_id
                .children(&self.arena)
                .map(|child| self.to_node_recursive(child))
                .collect();
            Node::folder(entry.name.clone(), children).with_meta(meta)
        } else {
            Node::file(entry.name.clone()).with_meta(meta)
        }
    }
}

pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit_index = 0;
    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }
    format!("{:.1} {}", value, UNITS[unit_index])
}
