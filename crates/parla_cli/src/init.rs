//! Project scaffolding

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{ParlaConfig, CONFIG_FILE};

const STARTER_CATALOG: &str = r#"# Plain messages map a key to text; plural messages map rule names to text.
greeting: "Hello, {name}!"
files:
  none: "No files"
  one: "{count} file"
  other: "{count} files"
"#;

/// Write parla.toml and a starter English catalog into `path`.
///
/// Existing files are left untouched.
pub fn init_project(path: &Path) -> Result<()> {
    let config = ParlaConfig::new();

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }
    fs::write(&config_path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    for dir in &config.i18n.dirs {
        for namespace in &config.i18n.namespaces {
            let ns_dir = path.join(dir).join(namespace);
            fs::create_dir_all(&ns_dir)
                .with_context(|| format!("Failed to create {}", ns_dir.display()))?;

            let catalog = ns_dir.join("en.yaml");
            if !catalog.exists() {
                fs::write(&catalog, STARTER_CATALOG)
                    .with_context(|| format!("Failed to write {}", catalog.display()))?;
            }
        }
    }

    Ok(())
}
