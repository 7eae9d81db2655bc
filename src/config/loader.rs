//! Configuration Loader
//!
//! Environment-aware layering: built-in defaults, then
//! `<dir>/cluster-action.toml`, then `<dir>/cluster-action.<environment>.toml`,
//! then `CLUSTER_ACTION__SECTION__KEY` environment variables. Every file is
//! optional; the merged result is validated before it is handed out.

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::detect_environment;
use super::error::ConfigResult;
use super::ClusterActionConfig;

const CONFIG_FILE_STEM: &str = "cluster-action";
const ENV_PREFIX: &str = "CLUSTER_ACTION";

#[derive(Debug)]
pub struct ConfigManager {
    config: ClusterActionConfig,
    environment: String,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection.
    ///
    /// `CLUSTER_ACTION_CONFIG` names an explicit file; otherwise `./config` is searched.
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let environment = detect_environment();
        match env::var("CLUSTER_ACTION_CONFIG") {
            Ok(path) => Self::load_from_file_with_env(Path::new(&path), &environment),
            Err(_) => Self::load_from_directory_with_env(Path::new("config"), &environment),
        }
    }

    /// Load the base and per-environment files from a directory.
    /// Takes the environment explicitly so tests need not touch process env vars.
    pub fn load_from_directory_with_env(
        config_dir: &Path,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        debug!(
            environment = %environment,
            config_dir = %config_dir.display(),
            "Loading configuration"
        );

        let base = config_dir.join(format!("{CONFIG_FILE_STEM}.toml"));
        let overrides = config_dir.join(format!("{CONFIG_FILE_STEM}.{environment}.toml"));
        Self::build(&[base, overrides], environment)
    }

    /// Load a single explicit file over the defaults
    pub fn load_from_file(path: &Path) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_file_with_env(path, &detect_environment())
    }

    fn load_from_file_with_env(path: &Path, environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        debug!(environment = %environment, file = %path.display(), "Loading configuration");
        Self::build(&[path.to_path_buf()], environment)
    }

    fn build(files: &[PathBuf], environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&ClusterActionConfig::default())?);

        for file in files {
            builder = builder.add_source(File::from(file.as_path()).required(false));
        }

        let config: ClusterActionConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            environment = %environment,
            poll_interval_ms = config.scheduler.poll_interval_ms,
            action_timeout_ms = config.scheduler.action_timeout_ms,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
        }))
    }

    pub fn from_config(
        config: ClusterActionConfig,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
        }))
    }

    pub fn config(&self) -> &ClusterActionConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}
