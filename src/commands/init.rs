use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{DriftmapConfig, CONFIG_FILE_NAME};

/// Write a default config file into `path`, refusing to clobber an
/// existing one unless `force` is set.
pub fn handle_init(path: &Path, force: bool) -> Result<()> {
    let target = path.join(CONFIG_FILE_NAME);
    if target.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    fs::write(&target, DriftmapConfig::default_template())
        .with_context(|| format!("writing {}", target.display()))?;
    println!("Created {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_parseable_default_config() {
        let dir = TempDir::new().unwrap();
        handle_init(dir.path(), false).unwrap();
        let config = DriftmapConfig::load(dir.path());
        assert_eq!(config.ignore_patterns, vec!["node_modules", "dist"]);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        handle_init(dir.path(), false).unwrap();
        assert!(handle_init(dir.path(), false).is_err());
        assert!(handle_init(dir.path(), true).is_ok());
    }
}
