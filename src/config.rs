use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use env_logger::{Env, Target};

use crate::error::{ExplorerError, Result};
use crate::loader::{ScanOptions, TreeSource};

/// Browse a file tree with expand/collapse, selection and a context menu.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding the tree (`type`, `name`, `meta`, `children`)
    #[arg(long, value_name = "FILE", conflicts_with = "dir")]
    pub tree: Option<PathBuf>,

    /// Directory to scan instead of a JSON tree
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Deepest directory level read by --dir
    #[arg(long, default_value_t = 8)]
    pub max_depth: usize,

    /// Include dot-files when scanning
    #[arg(long)]
    pub show_hidden: bool,

    /// Write log output to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// The built-in sample tree unless --tree or --dir is given.
    pub fn source(&self) -> TreeSource {
        if let Some(path) = &self.tree {
            return TreeSource::Json(path.clone());
        }
        match &self.dir {
            Some(root) => TreeSource::Directory {
                root: root.clone(),
                options: ScanOptions {
                    max_depth: self.max_depth,
                    show_hidden: self.show_hidden,
                },
            },
            None => TreeSource::Sample,
        }
    }
}

/// Install `env_logger`, honouring `RUST_LOG` (default `info`). Output goes
/// to `log_file` when set, stderr otherwise.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| ExplorerError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    Ok(())
}
