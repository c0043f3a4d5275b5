use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/huddlebot/config.toml";

/// Bot configuration
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub general: General,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct General {
    pub discord_token: String,
    pub command_prefix: String,
}

/// Caps on caller-supplied delay durations.  Without these a single command
/// could park a task for an arbitrarily long time.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Limits {
    pub max_countdown_seconds: u64,
    pub max_reminder_minutes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_countdown_seconds: 3600,
            max_reminder_minutes: 1440,
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut file = tokio::fs::File::open(&path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_default_limits() {
        let cfg: Config = toml::from_str(
            "[general]\ndiscord_token = \"t\"\ncommand_prefix = \"!\"\n",
        )
        .unwrap();
        assert_eq!(cfg.general.command_prefix, "!");
        assert_eq!(cfg.limits.max_countdown_seconds, 3600);
        assert_eq!(cfg.limits.max_reminder_minutes, 1440);
    }

    #[test]
    fn explicit_limits_override_defaults() {
        let cfg: Config = toml::from_str(
            "[general]\ndiscord_token = \"t\"\ncommand_prefix = \";\"\n\
             [limits]\nmax_countdown_seconds = 10\nmax_reminder_minutes = 5\n",
        )
        .unwrap();
        assert_eq!(cfg.limits.max_countdown_seconds, 10);
        assert_eq!(cfg.limits.max_reminder_minutes, 5);
    }
}
