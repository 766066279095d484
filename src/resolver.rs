//! Module identity resolution.
//!
//! Turns the specifier text of an import (`./util`, `../lib/api`, `react`)
//! into a canonical node id: an absolute path for project-relative targets,
//! the package name verbatim for everything else. Resolution never fails:
//! a missing target degrades to the best-effort joined path so that graphs
//! over partially-available snapshots still build.

use std::path::{Component, Path, PathBuf};

/// Extension candidates tried in order, also used for directory-index files
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Outcome of resolving one specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub id: String,
    pub is_external: bool,
}

#[derive(Debug, Clone)]
pub struct ModuleResolver {
    extensions: Vec<String>,
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
    }
}

impl ModuleResolver {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Resolve `specifier` as written in `from_module`.
    ///
    /// Relative specifiers resolve against the importing file's directory:
    /// the literal path first, then each extension candidate, then
    /// `<path>/index.<ext>` for each candidate. When nothing exists on disk
    /// the normalized joined path (first extension appended, unless one is
    /// already present) is returned anyway. Bare specifiers come back
    /// verbatim and external.
    pub fn resolve(&self, from_module: &Path, specifier: &str) -> Resolution {
        if !is_relative_specifier(specifier) {
            return Resolution {
                id: specifier.to_string(),
                is_external: true,
            };
        }

        let base = from_module.parent().unwrap_or_else(|| Path::new(""));
        let joined = normalize(&base.join(specifier));

        if joined.is_file() {
            return internal(joined);
        }

        for ext in &self.extensions {
            let candidate = with_appended_extension(&joined, ext);
            if candidate.is_file() {
                return internal(candidate);
            }
        }

        for ext in &self.extensions {
            let index = joined.join(format!("index.{}", ext));
            if index.is_file() {
                return internal(index);
            }
        }

        // Target missing from this snapshot; agree on one stable id so every
        // importer of the same missing module points at the same node.
        let fallback = if joined.extension().is_some() {
            joined
        } else {
            match self.extensions.first() {
                Some(ext) => with_appended_extension(&joined, ext),
                None => joined,
            }
        };
        internal(fallback)
    }
}

fn internal(path: PathBuf) -> Resolution {
    Resolution {
        id: path.to_string_lossy().into_owned(),
        is_external: false,
    }
}

fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

/// Append an extension without clobbering dots in directory or file names
/// (`Path::set_extension` would turn `a.module` into `a.ts`)
fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Collapse `.` and `..` components lexically. `canonicalize` is wrong here:
/// the target may not exist in the analyzed snapshot.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(component),
            },
            c => out.push(c),
        }
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "export {};\n").unwrap();
        path
    }

    #[test]
    fn bare_specifier_is_external() {
        let resolver = ModuleResolver::default();
        let result = resolver.resolve(Path::new("/src/app.ts"), "react");
        assert!(result.is_external);
        assert_eq!(result.id, "react");
    }

    #[test]
    fn scoped_package_is_external() {
        let resolver = ModuleResolver::default();
        let result = resolver.resolve(Path::new("/src/app.ts"), "@org/utils");
        assert!(result.is_external);
        assert_eq!(result.id, "@org/utils");
    }

    #[test]
    fn resolves_with_extension_inference() {
        let tmp = TempDir::new().unwrap();
        let target = touch(tmp.path(), "src/util.ts");
        let from = touch(tmp.path(), "src/app.ts");

        let resolver = ModuleResolver::default();
        let result = resolver.resolve(&from, "./util");
        assert!(!result.is_external);
        assert_eq!(result.id, target.to_string_lossy());
    }

    #[test]
    fn extension_order_prefers_ts_over_js() {
        let tmp = TempDir::new().unwrap();
        let ts = touch(tmp.path(), "src/util.ts");
        touch(tmp.path(), "src/util.js");
        let from = touch(tmp.path(), "src/app.ts");

        let resolver = ModuleResolver::default();
        let result = resolver.resolve(&from, "./util");
        assert_eq!(result.id, ts.to_string_lossy());
    }

    #[test]
    fn falls_back_to_directory_index() {
        let tmp = TempDir::new().unwrap();
        let index = touch(tmp.path(), "src/lib/index.ts");
        let from = touch(tmp.path(), "src/app.ts");

        let resolver = ModuleResolver::default();
        let result = resolver.resolve(&from, "./lib");
        assert_eq!(result.id, index.to_string_lossy());
    }

    #[test]
    fn missing_target_degrades_to_best_effort_path() {
        let resolver = ModuleResolver::default();
        let result = resolver.resolve(Path::new("/proj/src/app.ts"), "./gone");
        assert!(!result.is_external);
        assert_eq!(result.id, "/proj/src/gone.ts");
    }

    #[test]
    fn missing_target_with_two_importers_agrees_on_one_id() {
        let resolver = ModuleResolver::default();
        let a = resolver.resolve(Path::new("/proj/src/a.ts"), "./shared/gone");
        let b = resolver.resolve(Path::new("/proj/src/shared/b.ts"), "./gone");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn parent_components_collapse() {
        let resolver = ModuleResolver::default();
        let result = resolver.resolve(Path::new("/proj/src/deep/app.ts"), "../sibling");
        assert_eq!(result.id, "/proj/src/sibling.ts");
    }
}
