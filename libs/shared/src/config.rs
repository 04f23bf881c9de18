use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::Error;

/// Key-value settings parsed from a YAML file. Keys and value types belong to
/// the consumer.
pub type Settings = Mapping;

const DEFAULT_TOKEN_KEY: &str = "DISCORD_TOKEN";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Workspace root: the directory holding `.env` and `configs/`.
pub fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(Path::parent)
        .unwrap_or(manifest)
        .to_path_buf()
}

/// Configuration shared by every bot.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    bot_name: Option<String>,
    project_root: PathBuf,
}

impl BaseConfig {
    /// Resolve the project root and load its `.env`, if any.
    pub fn new(bot_name: Option<&str>) -> Result<Self, Error> {
        Self::with_root(bot_name, project_root())
    }

    pub fn with_root(bot_name: Option<&str>, root: impl Into<PathBuf>) -> Result<Self, Error> {
        let config = Self {
            bot_name: bot_name.map(str::to_owned),
            project_root: root.into(),
        };
        config.load_environment()?;
        Ok(config)
    }

    pub fn bot_name(&self) -> Option<&str> {
        self.bot_name.as_deref()
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load `{root}/.env` into the process environment.
    /// Variables that are already set keep their value.
    pub fn load_environment(&self) -> Result<(), Error> {
        let env_file = self.project_root.join(".env");
        if !env_file.exists() {
            debug!(path = %env_file.display(), "no .env file, skipping");
            return Ok(());
        }

        dotenvy::from_path(&env_file).map_err(|source| Error::Dotenv {
            path: env_file.clone(),
            source,
        })?;
        debug!(path = %env_file.display(), "loaded .env file");
        Ok(())
    }

    fn config_path(&self, config_name: &str) -> PathBuf {
        self.project_root
            .join("configs")
            .join(format!("{config_name}.yaml"))
    }

    /// Load `configs/{config_name}.yaml`. A missing or empty file yields an
    /// empty mapping.
    pub fn load_yaml_config(&self, config_name: &str) -> Result<Settings, Error> {
        let path = self.config_path(config_name);
        match read_yaml(&path)? {
            None | Some(Value::Null) => Ok(Settings::new()),
            Some(Value::Mapping(settings)) => Ok(settings),
            Some(_) => Err(Error::NotAMapping { path }),
        }
    }

    /// Typed variant of [`load_yaml_config`](Self::load_yaml_config).
    /// Returns `None` when the file does not exist.
    pub fn load_yaml_config_as<T: DeserializeOwned>(
        &self,
        config_name: &str,
    ) -> Result<Option<T>, Error> {
        let path = self.config_path(config_name);
        let Some(value) = read_yaml(&path)? else {
            return Ok(None);
        };

        let value = match value {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        serde_yaml::from_value(value)
            .map(Some)
            .map_err(|source| Error::Yaml { path, source })
    }

    /// Environment variable holding this bot's token.
    pub fn token_key(&self) -> String {
        match &self.bot_name {
            Some(name) => format!("{}_TOKEN", name.to_uppercase()),
            None => DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    pub fn discord_token(&self) -> Option<String> {
        env::var(self.token_key()).ok()
    }

    pub fn environment(&self) -> String {
        env::var("ENVIRONMENT")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    pub fn is_production(&self) -> bool {
        self.environment() == "production"
    }
}

/// Read and parse a YAML file, `Ok(None)` if it does not exist.
pub(crate) fn read_yaml(path: &Path) -> Result<Option<Value>, Error> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found");
        return Ok(None);
    }

    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(Some(value))
}
