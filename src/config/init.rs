use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};

const HEADER: &str = "\
# f1-whatif configuration
#
# scoring.race / scoring.sprint: points for P1, P2, ...
# palette: chart colour per constructor name, e.g.
#   palette:
#     Ferrari: \"#dc0000\"
#     Williams: lightblue
";

/// Render the default config as YAML, with a commented header
pub fn default_config_yaml() -> Result<String> {
    let yaml = serde_saphyr::to_string(&Config::default())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    Ok(format!("{}\n{}", HEADER, yaml))
}

/// Write a config file with default settings.
///
/// Uses `path` if given, otherwise the default config path. An existing file
/// is only replaced when `force` is set. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    write_atomically(&config_path, &default_config_yaml()?)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    Ok(config_path)
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}
