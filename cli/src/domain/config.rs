//! Settings schema for `settings.yml`.
//!
//! Pure types and validation only. Loading lives in `crate::infra::config`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;
use crate::domain::setup::FailurePolicy;

/// Top-level settings, loaded once per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub aws: AwsSettings,
    pub paths: PathSettings,
    pub region: RegionSettings,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub setup: SetupSettings,
}

/// Cloud account and launch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsSettings {
    pub region: String,
    #[serde(default)]
    pub ami_id: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    pub launch_template_id: String,
    #[serde(default = "default_key_name")]
    pub key_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Private key used for every ssh/scp/rsync call.
    pub ssh_key: PathBuf,
    /// Root directory for retrieved run output.
    pub local_data: PathBuf,
    #[serde(default = "default_s3_data")]
    pub s3_data: String,
    /// Directory holding the setup artifacts.
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
}

/// Region-specific setup artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSettings {
    /// Shapefile basename; `.shp` and `.shx` are copied.
    pub shapefile: String,
    pub state_vector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            user: default_user(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupSettings {
    /// Stop at the first failed setup step instead of attempting all of them.
    #[serde(default)]
    pub fail_fast: bool,
}

impl SetupSettings {
    #[must_use]
    pub fn policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::BestEffort
        }
    }
}

fn default_key_name() -> String {
    "imikey".to_string()
}

fn default_s3_data() -> String {
    "s3://imidata".to_string()
}

fn default_artifacts() -> PathBuf {
    PathBuf::from(".")
}

fn default_user() -> String {
    "ubuntu".to_string()
}

impl Settings {
    /// Check that required values are non-empty.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Missing` naming the first empty setting.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let required: [(&'static str, bool); 7] = [
            ("aws.region", self.aws.region.is_empty()),
            ("aws.launch_template_id", self.aws.launch_template_id.is_empty()),
            ("paths.ssh_key", self.paths.ssh_key.as_os_str().is_empty()),
            ("paths.local_data", self.paths.local_data.as_os_str().is_empty()),
            ("region.shapefile", self.region.shapefile.is_empty()),
            ("region.state_vector", self.region.state_vector.is_empty()),
            ("remote.user", self.remote.user.is_empty()),
        ];
        match required.into_iter().find(|(_, empty)| *empty) {
            Some((name, _)) => Err(SettingsError::Missing(name)),
            None => Ok(()),
        }
    }
}
