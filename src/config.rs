use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolver::DEFAULT_EXTENSIONS;

pub const CONFIG_FILE_NAME: &str = ".driftmap.toml";

/// Project configuration loaded from `.driftmap.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftmapConfig {
    /// File extensions treated as source modules
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Substring patterns excluded from the file walk
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Record external (bare-specifier) targets as graph nodes
    #[serde(default = "default_true")]
    pub include_external: bool,

    /// Abort analysis on the first extraction failure instead of skipping
    #[serde(default)]
    pub fail_fast: bool,

    /// Maximum number of per-file fact entries kept in the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    4096
}

impl Default for DriftmapConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_patterns: Vec::new(),
            include_external: default_true(),
            fail_fast: false,
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl DriftmapConfig {
    /// Search `start` and its ancestors for a config file; falls back to
    /// defaults when none is found or a found file fails to parse.
    pub fn load(start: &Path) -> Self {
        const MAX_TRAVERSAL_DEPTH: usize = 10;

        directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find_map(|path| try_load_from_path(&path))
            .unwrap_or_else(|| {
                log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                DriftmapConfig::default()
            })
    }

    /// Default config serialized as commented TOML, written by `init`
    pub fn default_template() -> String {
        format!(
            r#"# driftmap configuration

# File extensions treated as source modules
extensions = ["ts", "tsx", "js", "jsx", "mjs", "cjs"]

# Substring patterns excluded from the file walk
ignore_patterns = ["node_modules", "dist"]

# Record external (bare-specifier) targets as graph nodes
include_external = true

# Abort analysis on the first extraction failure instead of skipping
fail_fast = false

# Maximum number of per-file fact entries kept in the cache
cache_capacity = {}
"#,
            default_cache_capacity()
        )
    }
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn try_load_from_path(path: &Path) -> Option<DriftmapConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to read {}: {}", path.display(), e);
            }
            return None;
        }
    };

    match toml::from_str::<DriftmapConfig>(&contents) {
        Ok(config) => {
            log::debug!("loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: failed to parse {}: {}. Using defaults.", path.display(), e);
            None
        }
    }
}
