use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{ExplorerError, Result};
use crate::node::Node;
use crate::tree::{format_size, ScanTree};

const SAMPLE_TREE: &str = include_str!("../data/sample_tree.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Deepest level below the root that is read.
    pub max_depth: usize,
    pub show_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: 8,
            show_hidden: false,
        }
    }
}

/// Where the browsed tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// Built-in demo tree.
    Sample,
    Json(PathBuf),
    Directory { root: PathBuf, options: ScanOptions },
}

impl TreeSource {
    pub fn load(&self) -> Result<Node> {
        let node = match self {
            TreeSource::Sample => sample_tree()?,
            TreeSource::Json(path) => load_json(path)?,
            TreeSource::Directory { root, options } => scan_directory(root, options)?,
        };
        audit(&node);
        Ok(node)
    }

    pub fn describe(&self) -> String {
        match self {
            TreeSource::Sample => "sample tree".to_string(),
            TreeSource::Json(path) => path.display().to_string(),
            TreeSource::Directory { root, .. } => root.display().to_string(),
        }
    }
}

pub fn sample_tree() -> Result<Node> {
    parse_tree(SAMPLE_TREE, "built-in sample")
}

pub fn parse_json(json: &str) -> Result<Node> {
    parse_tree(json, "input")
}

pub fn load_json(path: &Path) -> Result<Node> {
    let text = fs::read_to_string(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tree(&text, &path.display().to_string())
}

fn parse_tree(json: &str, origin: &str) -> Result<Node> {
    let node: Node = serde_json::from_str(json).map_err(|source| ExplorerError::Json {
        origin: origin.to_string(),
        source,
    })?;
    if !node.is_folder() {
        return Err(ExplorerError::RootNotFolder(node.name().to_string()));
    }
    Ok(node)
}

/// Read a directory into a tree. Nothing on disk is modified.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<Node> {
    let metadata = fs::metadata(root).map_err(|source| ExplorerError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ExplorerError::NotADirectory(root.to_path_buf()));
    }
    // `.` and `..` have no file name of their own
    let root = fs::canonicalize(root).map_err(|source| ExplorerError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let root = root.as_path();

    let start = Instant::now();
    let mut tree = ScanTree::new(root);
    let mut skipped = 0usize;

    let walker = WalkDir::new(root)
        .skip_hidden(!options.show_hidden)
        .follow_links(false)
        .sort(true)
        .max_depth(options.max_depth);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping entry: {}", err);
                skipped += 1;
                continue;
            }
        };
        if entry.depth == 0 {
            continue;
        }

        let is_dir = entry.file_type().is_dir();
        let size = if is_dir {
            0
        } else {
            entry.metadata().map(|m| m.len()).unwrap_or(0)
        };
        if !tree.add_entry(entry.path(), size, is_dir) {
            skipped += 1;
        }
    }

    tree.calculate_sizes();
    log::info!(
        "scanned {} entries ({}) under {} in {} ms ({} skipped)",
        tree.len().saturating_sub(1),
        format_size(tree.total_size()),
        root.display(),
        start.elapsed().as_millis(),
        skipped
    );
    Ok(tree.to_node())
}

/// Log names that break the name-as-identity assumption. The tree is left
/// as it is.
fn audit(node: &Node) {
    for name in node.duplicate_file_names() {
        log::warn!("file name '{}' occurs more than once; selecting it marks every copy", name);
    }
    for path in node.duplicate_sibling_names() {
        log::warn!("{} holds siblings with the same name", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch() -> TempDir {
        tempfile::Builder::new().prefix("scan").tempdir().unwrap()
    }

    #[test]
    fn test_sample_tree_parses() {
        let tree = sample_tree().unwrap();
        assert_eq!(tree.name(), "project");
        assert!(tree.duplicate_file_names().is_empty());
        assert!(tree.child("src").unwrap().child("index.ts").is_some());
        assert!(tree.child("styles").unwrap().child("app.css").is_some());
        assert!(tree.child("readme.md").is_some());
    }

    #[test]
    fn test_parse_json_rejects_file_root() {
        let err = parse_json(r#"{ "type": "file", "name": "lonely.txt" }"#).unwrap_err();
        assert!(matches!(err, ExplorerError::RootNotFolder(name) if name == "lonely.txt"));
    }

    #[test]
    fn test_parse_json_reports_syntax_errors() {
        let err = parse_json("{ not json").unwrap_err();
        assert!(matches!(err, ExplorerError::Json { .. }));
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = load_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ExplorerError::Io { .. }));
    }

    #[test]
    fn test_load_json_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(
            &path,
            r#"{ "type": "folder", "name": "r", "data": [ { "type": "file", "name": "f" } ] }"#,
        )
        .unwrap();

        let tree = TreeSource::Json(path).load().unwrap();
        assert_eq!(tree.children().len(), 1);
    }

    #[test]
    fn test_scan_directory() {
        let dir = scratch();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/inner.txt"), b"hello").unwrap();
        fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        fs::write(dir.path().join(".hidden"), b"x").unwrap();

        let tree = scan_directory(dir.path(), &ScanOptions::default()).unwrap();

        assert!(tree.is_folder());
        let names: Vec<_> = tree.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["a.txt", "sub"]);
        let sub = tree.child("sub").unwrap();
        assert!(sub.is_folder());
        assert_eq!(sub.child("inner.txt").unwrap().meta(), Some("5.0 B"));
        assert_eq!(tree.meta(), Some("8.0 B"));
    }

    #[test]
    fn test_scan_directory_hidden_and_depth() {
        let dir = scratch();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), b"x").unwrap();
        fs::write(dir.path().join(".hidden"), b"x").unwrap();

        let options = ScanOptions {
            max_depth: 2,
            show_hidden: true,
        };
        let tree = scan_directory(dir.path(), &options).unwrap();

        assert!(tree.child(".hidden").is_some());
        let b = tree.child("a").unwrap().child("b").unwrap();
        assert!(b.is_folder());
        assert!(b.children().is_empty());
    }

    #[test]
    fn test_scan_directory_names_relative_root() {
        let dir = scratch();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), b"abc").unwrap();

        let tree = scan_directory(&dir.path().join("sub/.."), &ScanOptions::default()).unwrap();

        let expected = dir.path().file_name().unwrap().to_str().unwrap();
        assert_eq!(tree.name(), expected);
        assert!(tree.child("a.txt").is_some());
        assert!(tree.child("sub").is_some());
    }

    #[test]
    fn test_scan_directory_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let err = scan_directory(&file, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ExplorerError::NotADirectory(_)));
    }
}
