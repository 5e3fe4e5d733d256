use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Position of a node in the tree: the root's name followed by every name
/// on the way down.
///
/// Names are kept whole, so `/`, `.` or `..` inside a name is plain text
/// and never splits or merges keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub fn root(name: impl Into<String>) -> Self {
        NodePath(vec![name.into()])
    }

    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut names = self.0.clone();
        names.push(name.into());
        NodePath(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// True for the path itself and every path below it.
    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        NodePath(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Folder,
    File,
}

/// One entry of the browsed tree.
///
/// The tree is read-only input: nothing in the browser mutates it. All
/// interaction state (expansion, selection, context menu) lives beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder {
        name: String,
        /// Free-form annotation, not displayed by the tree itself.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<String>,
        /// Missing `children` deserialises to an empty folder.
        #[serde(default, alias = "data")]
        children: Vec<Node>,
    },
    File {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<String>,
    },
}

impl Node {
    pub fn folder(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Folder {
            name: name.into(),
            meta: None,
            children,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Node::File {
            name: name.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            Node::Folder { meta, .. } | Node::File { meta, .. } => *meta = Some(value.into()),
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Folder { name, .. } | Node::File { name, .. } => name,
        }
    }

    pub fn meta(&self) -> Option<&str> {
        match self {
            Node::Folder { meta, .. } | Node::File { meta, .. } => meta.as_deref(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder { .. } => NodeKind::Folder,
            Node::File { .. } => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder { .. })
    }

    /// Children in source order; always empty for files.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Folder { children, .. } => children,
            Node::File { .. } => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name() == name)
    }

    /// Resolve a render path (root name first) back to its node.
    pub fn descendant(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.names().split_first()?;
        if first != self.name() {
            return None;
        }

        rest.iter().try_fold(self, |current, name| current.child(name))
    }

    /// Number of (folders, files) in the subtree, this node included.
    pub fn count(&self) -> (usize, usize) {
        match self {
            Node::File { .. } => (0, 1),
            Node::Folder { children, .. } => {
                children.iter().fold((1, 0), |(folders, files), child| {
                    let (f, l) = child.count();
                    (folders + f, files + l)
                })
            }
        }
    }

    /// File names that occur more than once anywhere in the tree.
    ///
    /// Selection is keyed by file name, so every name listed here will
    /// highlight all of its occurrences at once.
    pub fn duplicate_file_names(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        self.collect_file_names(&mut seen);

        let mut dupes: Vec<String> = seen
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(name, _)| name.to_string())
            .collect();
        dupes.sort();
        dupes
    }

    fn collect_file_names<'a>(&'a self, seen: &mut HashMap<&'a str, usize>) {
        match self {
            Node::File { name, .. } => *seen.entry(name.as_str()).or_default() += 1,
            Node::Folder { children, .. } => {
                for child in children {
                    child.collect_file_names(seen);
                }
            }
        }
    }

    /// Paths of folders holding two or more children with the same name.
    pub fn duplicate_sibling_names(&self) -> Vec<NodePath> {
        let mut out = Vec::new();
        self.collect_sibling_clashes(NodePath::root(self.name()), &mut out);
        out
    }

    fn collect_sibling_clashes(&self, path: NodePath, out: &mut Vec<NodePath>) {
        let children = self.children();
        let mut names: Vec<&str> = children.iter().map(Node::name).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            out.push(path.clone());
        }

        for child in children.iter().filter(|c| c.is_folder()) {
            child.collect_sibling_clashes(path.join(child.name()), out);
        }
    }
}
