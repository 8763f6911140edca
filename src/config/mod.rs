use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeConfig,
    pub cover: CoverConfig,
    pub export: ExportConfig,
}

/// UI theme. Persisted across sessions; the only durable user preference.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub mode: ThemeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Cover art lookup. Provider order is configuration, not contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Providers tried in order: any of "spotify", "itunes", "qq".
    pub providers: Vec<String>,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            providers: vec!["spotify".into(), "itunes".into(), "qq".into()],
            // Public test credentials; override with your own app's.
            spotify_client_id: "4d6b7066ac2443cf82a29b79e9920e88".into(),
            spotify_client_secret: "cddfc0b1c87e4131ae0f3622bdc5b731".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported cards land. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj =
        ProjectDirs::from("dev", "lyricard", "lyricard").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        save(&cfg, Some(&path))?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg =
        toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    // The file carries API credentials.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_order() {
        let cfg = Config::default();
        assert_eq!(cfg.cover.providers, vec!["spotify", "itunes", "qq"]);
    }

    #[test]
    fn theme_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.theme.mode = ThemeMode::Light;
        let raw = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.theme.mode, ThemeMode::Light);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: Config = toml::from_str("[theme]\nmode = \"light\"\n").unwrap();
        assert_eq!(cfg.theme.mode, ThemeMode::Light);
        assert!(!cfg.cover.providers.is_empty());
    }
}
