use std::path::Path;

use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "dfdls.toml";
const HIDDEN_CONFIG_FILE: &str = ".dfdls.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Invalid default_prefix '{0}': expected a bare namespace prefix such as 'xs'")]
    InvalidPrefix(String),
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    /// Namespace prefix assumed when no schema tag precedes the cursor.
    pub default_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            default_prefix: "xs".to_string(),
        }
    }
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("org", "dfdl", "dfdls")
            .map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILE));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    /// Layer, lowest priority first: the user config file, then
    /// `.dfdls.toml`, then `dfdls.toml` in `project_root`. Missing files are
    /// skipped.
    pub fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        for name in [HIDDEN_CONFIG_FILE, CONFIG_FILE] {
            builder = builder.add_source(
                File::from(project_root.join(name))
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(?settings, root = %project_root.display(), "loaded settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let prefix = self.default_prefix.strip_suffix(':').unwrap_or(&self.default_prefix);
        let valid = prefix
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidPrefix(self.default_prefix.clone()))
        }
    }
}
