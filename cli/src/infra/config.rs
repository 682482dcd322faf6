//! YAML settings loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Settings;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "IMIRUNNER_CONFIG";

const FILE_NAME: &str = "settings.yml";

/// Loads `Settings` from a YAML file on disk.
pub struct YamlSettingsStore {
    explicit: Option<PathBuf>,
}

impl YamlSettingsStore {
    /// `explicit` (from `--config`) takes precedence over every other location.
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// The settings file to read.
    ///
    /// `--config`, then `$IMIRUNNER_CONFIG`, then `./settings.yml` if present,
    /// then `~/.imirunner/settings.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if no location applies and the home directory is unknown.
    pub fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV)
            && !val.is_empty()
        {
            return Ok(PathBuf::from(val));
        }
        let local = PathBuf::from(FILE_NAME);
        if local.is_file() {
            return Ok(local);
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".imirunner").join(FILE_NAME))
    }

    /// Read, parse, expand and validate the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or lacks a
    /// required value.
    pub fn load(&self) -> Result<Settings> {
        let path = self.path()?;
        load_from(&path)
    }
}

/// Read and validate settings from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or fails validation.
pub fn load_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "cannot read settings file {} (use --config or set {CONFIG_ENV})",
            path.display()
        )
    })?;
    let mut settings: Settings = serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    settings.validate()?;
    let home = dirs::home_dir();
    for p in [
        &mut settings.paths.ssh_key,
        &mut settings.paths.local_data,
        &mut settings.paths.artifacts,
    ] {
        *p = expand_tilde(p, home.as_deref());
    }
    tracing::debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

/// Replace a leading `~` with `home`.
#[must_use]
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
