use std::env::var;

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::BaseConfig;

/// Per-bot settings read from `configs/{bot}.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    pub activity: Option<String>,
    pub status_interval_secs: u64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            activity: None,
            status_interval_secs: 30,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub base: BaseConfig,
    pub discord_token: String,
    pub version: String,
    pub settings: BotSettings,
}

impl Config {
    pub fn load(bot_name: &str) -> Result<Self> {
        let base = BaseConfig::new(Some(bot_name)).context("failed to load environment")?;
        Self::from_base(base)
    }

    pub fn from_base(base: BaseConfig) -> Result<Self> {
        let discord_token = base
            .discord_token()
            .with_context(|| format!("{} not set", base.token_key()))?;

        let settings = match base.bot_name() {
            Some(name) => base
                .load_yaml_config_as::<BotSettings>(name)?
                .unwrap_or_default(),
            None => BotSettings::default(),
        };

        Ok(Self {
            discord_token,
            version: var("APP_VERSION").unwrap_or_else(|_| "Unknown".to_string()),
            settings,
            base,
        })
    }

    /// Presence text for the given rotation tick.
    pub fn status_text(&self, tick: usize) -> String {
        if tick % 2 == 0 {
            if self.version.starts_with('v') {
                self.version.clone()
            } else {
                format!("Version - {}", self.version)
            }
        } else {
            match &self.settings.activity {
                Some(activity) => activity.clone(),
                None => format!("Env - {}", self.base.environment()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::{env, fs};
    use tempfile::tempdir;

    fn set_env(key: &str, value: Option<&str>) {
        unsafe {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_reads_token_and_settings() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("configs")).unwrap();
        fs::write(
            dir.path().join("configs").join("startertest.yaml"),
            "activity: Reading feeds\nstatus_interval_secs: 60\n",
        )
        .unwrap();
        set_env("STARTERTEST_TOKEN", Some("secret"));
        set_env("APP_VERSION", Some("v1.2.3"));

        let base = BaseConfig::with_root(Some("startertest"), dir.path()).unwrap();
        let config = Config::from_base(base).unwrap();

        assert_eq!(config.discord_token, "secret");
        assert_eq!(config.settings.activity.as_deref(), Some("Reading feeds"));
        assert_eq!(config.settings.status_interval_secs, 60);
        assert_eq!(config.status_text(0), "v1.2.3");
        assert_eq!(config.status_text(1), "Reading feeds");

        set_env("STARTERTEST_TOKEN", None);
        set_env("APP_VERSION", None);
    }

    #[test]
    #[serial]
    fn test_config_defaults_without_yaml() {
        let dir = tempdir().unwrap();
        set_env("STARTERTEST_TOKEN", Some("secret"));
        set_env("APP_VERSION", None);
        set_env("ENVIRONMENT", Some("staging"));

        let base = BaseConfig::with_root(Some("startertest"), dir.path()).unwrap();
        let config = Config::from_base(base).unwrap();

        assert_eq!(config.settings, BotSettings::default());
        assert_eq!(config.status_text(0), "Version - Unknown");
        assert_eq!(config.status_text(1), "Env - staging");

        set_env("STARTERTEST_TOKEN", None);
        set_env("ENVIRONMENT", None);
    }

    #[test]
    #[serial]
    fn test_missing_token_names_the_variable() {
        let dir = tempdir().unwrap();
        set_env("STARTERTEST_TOKEN", None);

        let base = BaseConfig::with_root(Some("startertest"), dir.path()).unwrap();
        let err = Config::from_base(base).err().unwrap();

        assert_eq!(err.to_string(), "STARTERTEST_TOKEN not set");
    }
}
