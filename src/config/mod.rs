/// Configuration system for trendscope.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::TrendscopeConfig::default()`]
/// 2. **User global config** — `~/.trendscope/config.toml`
/// 3. **Project local config** — `.trendscope.toml` in the current working directory
/// 4. **Environment variables** — `TRENDSCOPE_*` overrides (highest precedence)
///
/// Later layers override earlier ones. Missing sections in a TOML file fall
/// back to the previous layer's values.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::TrendscopeConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved trendscope configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> TrendscopeConfig {
    let mut config = TrendscopeConfig::default();

    // Layer 2: user global config (~/.trendscope/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    // Layer 3: project local config (.trendscope.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A malformed file never blocks startup.
fn load_toml_file(path: Option<PathBuf>) -> Option<TrendscopeConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge a loaded config layer into the base config.
///
/// Each TOML file deserializes with `serde(default)`, so unset keys carry
/// the built-in defaults — replacing the base wholesale applies exactly the
/// explicitly-set values for the common case.
fn merge_config(base: &mut TrendscopeConfig, overlay: &TrendscopeConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.trendscope/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".trendscope").join("config.toml"))
}

/// Path to the project local config: `.trendscope.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".trendscope.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project-local config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `TRENDSCOPE_API_URL` — analysis service base URL
/// - `TRENDSCOPE_API_TIMEOUT_MS` — analysis request timeout
/// - `TRENDSCOPE_TICKER` — live ticker enabled (`1`/`true`/`yes`/`on`)
/// - `TRENDSCOPE_TICKER_PERIOD_SECS` — ticker period
/// - `TRENDSCOPE_REVEAL_CHAR_INTERVAL_MS` — reveal speed
fn apply_env_overrides(config: &mut TrendscopeConfig) {
    if let Ok(val) = std::env::var("TRENDSCOPE_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("TRENDSCOPE_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("TRENDSCOPE_TICKER") {
        config.ticker.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("TRENDSCOPE_TICKER_PERIOD_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.ticker.period_secs = secs;
    }
    if let Ok(val) = std::env::var("TRENDSCOPE_REVEAL_CHAR_INTERVAL_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.reveal.char_interval_ms = ms;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.trendscope/config.toml`.
///
/// Creates the `~/.trendscope/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.trendscope/ directory")?;
    }

    fs::write(&path, TrendscopeConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `ticker.period_secs`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut value_table: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        let toml_str = toml::to_string_pretty(&TrendscopeConfig::default())
            .context("failed to serialize default config")?;
        toml::from_str(&toml_str).context("failed to parse serialized defaults")?
    };

    set_toml_value(&mut value_table, key, value)?;

    let output = toml::to_string_pretty(&value_table).context("failed to serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // Parse according to the existing value's type so types are preserved.
    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_defaults_when_no_files_exist() {
        // If a dev environment has ~/.trendscope/config.toml, the result
        // reflects that file; the enabled flag defaults to true either way
        // unless explicitly disabled.
        let config = load();
        assert!(config.ticker.entries > 0);
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[api]
base_url = "http://localhost:5000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "api.base_url", "http://analysis:8080").unwrap();

        let table = root.as_table().unwrap();
        let api = table["api"].as_table().unwrap();
        assert_eq!(api["base_url"].as_str(), Some("http://analysis:8080"));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[ticker]
period_secs = 30
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "ticker.period_secs", "10").unwrap();

        let table = root.as_table().unwrap();
        let ticker = table["ticker"].as_table().unwrap();
        assert_eq!(ticker["period_secs"].as_integer(), Some(10));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[ticker]
enabled = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "ticker.enabled", "false").unwrap();

        let table = root.as_table().unwrap();
        let ticker = table["ticker"].as_table().unwrap();
        assert_eq!(ticker["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[api]
base_url = "http://localhost:5000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let result = show_effective_config();
        assert!(result.is_ok());
        let toml_str = result.unwrap();
        let _: TrendscopeConfig = toml::from_str(&toml_str).unwrap();
    }
}
