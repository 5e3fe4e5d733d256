use crate::expand_state::ExpansionState;
use crate::node::{Node, NodeKind, NodePath};

/// A node in the render tree, produced by build_render_tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    /// Stable key: root name joined with every name down to this node.
    pub path: NodePath,
    pub name: String,
    pub kind: NodeKind,
    pub depth: u16,
    /// Only meaningful for folders.
    pub expanded: bool,
    /// Only files are ever marked selected.
    pub selected: bool,
    /// Folder with at least one child in the source tree.
    pub has_children: bool,
    /// Sub-nodes (only populated for expanded folders).
    pub children: Vec<RenderNode>,
}

/// One visible line of the tree, depth-first.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRow {
    pub path: NodePath,
    pub name: String,
    pub kind: NodeKind,
    pub depth: u16,
    pub expanded: bool,
    pub selected: bool,
    pub has_children: bool,
}

/// Render `root` against the current expansion and selection.
///
/// Collapsed folders render their header only: their descendants are absent
/// from the output, not hidden. `selected` styles matching files and never
/// affects which nodes are visited.
pub fn build_render_tree(
    root: &Node,
    expansion: &ExpansionState,
    selected: Option<&str>,
) -> RenderNode {
    render_node(root, NodePath::root(root.name()), 0, expansion, selected)
}

fn render_node(
    node: &Node,
    path: NodePath,
    depth: u16,
    expansion: &ExpansionState,
    selected: Option<&str>,
) -> RenderNode {
    match node {
        Node::File { name, .. } => RenderNode {
            selected: selected == Some(name.as_str()),
            path,
            name: name.clone(),
            kind: NodeKind::File,
            depth,
            expanded: false,
            has_children: false,
            children: Vec::new(),
        },
        Node::Folder { name, children, .. } => {
            let expanded = expansion.is_expanded(&path);
            let rendered = if expanded {
                render_children(children, &path, depth, expansion, selected)
            } else {
                Vec::new()
            };

            RenderNode {
                path,
                name: name.clone(),
                kind: NodeKind::Folder,
                depth,
                expanded,
                selected: false,
                has_children: !children.is_empty(),
                children: rendered,
            }
        }
    }
}

fn render_children(
    children: &[Node],
    parent: &NodePath,
    depth: u16,
    expansion: &ExpansionState,
    selected: Option<&str>,
) -> Vec<RenderNode> {
    children
        .iter()
        .map(|child| {
            render_node(
                child,
                parent.join(child.name()),
                depth.saturating_add(1),
                expansion,
                selected,
            )
        })
        .collect()
}

/// Flatten a render tree into its visible rows.
pub fn flatten_render_nodes(root: &RenderNode) -> Vec<RenderRow> {
    let mut out = Vec::new();
    flatten_into(root, &mut out);
    out
}

fn flatten_into(node: &RenderNode, out: &mut Vec<RenderRow>) {
    out.push(RenderRow {
        path: node.path.clone(),
        name: node.name.clone(),
        kind: node.kind,
        depth: node.depth,
        expanded: node.expanded,
        selected: node.selected,
        has_children: node.has_children,
    });

    for child in &node.children {
        flatten_into(child, out);
    }
}
