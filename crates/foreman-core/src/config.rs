use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

use crate::seed::SeedSource;
use crate::view::Locale;

/// Per-project settings from `.foreman/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub source: SeedSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How many projects the "recent" panel shows.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

/// Per-user settings from `<config_dir>/foreman/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

fn read_toml<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str::<T>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    read_toml(&project_root.join(".foreman/config.toml"))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    read_toml(&config_dir.join("foreman/config.toml"))
}

/// Merge project and user config and settle the output mode.
///
/// `cli_format` is the explicit `--format` flag, `cli_json` the `--json`
/// shorthand.
pub fn resolve_config(
    project_root: &Path,
    cli_format: Option<&str>,
    cli_json: bool,
) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_format,
        cli_json,
        user.output.as_deref(),
        env_format.as_deref(),
        std::io::stdout().is_terminal(),
    )?;

    tracing::debug!(
        seed = %project.seed.source,
        currency = %project.locale.currency,
        output = %resolved_output,
        "configuration resolved"
    );

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

/// `--format` > `--json` > `FORMAT` > user config > TTY detection.
///
/// An unrecognised `--format` is an error; unrecognised env/config values
/// are skipped.
pub fn resolve_output(
    cli_format: Option<&str>,
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
    is_tty: bool,
) -> Result<String> {
    if let Some(raw) = cli_format {
        let mode = normalize_output_mode(raw)
            .with_context(|| format!("unknown output format '{raw}' (use pretty, text or json)"))?;
        return Ok(mode.to_string());
    }

    if cli_json {
        return Ok("json".to_string());
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return Ok(mode.to_string());
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return Ok(mode.to_string());
    }

    Ok(if is_tty { "pretty" } else { "text" }.to_string())
}

const fn default_recent_limit() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.locale.currency, "RUB");
        assert_eq!(cfg.locale.date_format, "%d.%m.%Y");
        assert_eq!(cfg.seed.source, SeedSource::Demo);
        assert_eq!(cfg.dashboard.recent_limit, 5);
    }

    #[test]
    fn project_config_parses_sections() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join(".foreman")).expect("mkdir");
        std::fs::write(
            root.path().join(".foreman/config.toml"),
            r#"
[locale]
currency = "USD"

[seed]
source = "empty"

[dashboard]
recent_limit = 3
"#,
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.locale.currency, "USD");
        assert_eq!(cfg.locale.date_format, "%d.%m.%Y");
        assert_eq!(cfg.seed.source, SeedSource::Empty);
        assert_eq!(cfg.dashboard.recent_limit, 3);
    }

    #[test]
    fn broken_project_config_reports_path() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join(".foreman")).expect("mkdir");
        std::fs::write(root.path().join(".foreman/config.toml"), "[seed\nsource=").expect("write");

        let err = load_project_config(root.path()).expect_err("parse must fail");
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn format_flag_beats_everything() {
        let output = resolve_output(Some("text"), true, Some("pretty"), Some("json"), true)
            .expect("resolve should succeed");
        assert_eq!(output, "text");
        assert!(resolve_output(Some("yaml"), false, None, None, true).is_err());
    }

    #[test]
    fn json_flag_overrides_env_and_config() {
        let output = resolve_output(None, true, Some("pretty"), Some("text"), true)
            .expect("resolve should succeed");
        assert_eq!(output, "json");
    }

    #[test]
    fn env_then_config_then_tty() {
        assert_eq!(
            resolve_output(None, false, Some("json"), Some("human"), false).unwrap(),
            "pretty"
        );
        assert_eq!(
            resolve_output(None, false, Some("table"), Some("bogus"), true).unwrap(),
            "text"
        );
        assert_eq!(resolve_output(None, false, None, None, true).unwrap(), "pretty");
        assert_eq!(resolve_output(None, false, None, None, false).unwrap(), "text");
    }
}
