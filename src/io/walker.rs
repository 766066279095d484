use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Walks a project directory for source files, honoring `.gitignore`
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf, extensions: Vec<String>) -> Self {
        Self {
            root,
            extensions,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }
        let path_str = path.to_string_lossy();
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_only_configured_extensions() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.ts"), "export {};\n").unwrap();
        fs::write(tmp.path().join("b.md"), "# doc\n").unwrap();

        let walker = FileWalker::new(tmp.path().to_path_buf(), vec!["ts".to_string()]);
        let files = walker.walk().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.ts"));
    }

    #[test]
    fn ignore_patterns_filter_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/dep")).unwrap();
        fs::write(tmp.path().join("node_modules/dep/index.ts"), "export {};\n").unwrap();
        fs::write(tmp.path().join("a.ts"), "export {};\n").unwrap();

        let walker = FileWalker::new(tmp.path().to_path_buf(), vec!["ts".to_string()])
            .with_ignore_patterns(vec!["node_modules".to_string()]);
        let files = walker.walk().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.ts"));
    }
}
