use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::openai::{ClientSettings, ConfigurationError};

pub const CONFIG_ENV: &str = "OT_CONFIG";
pub const MODEL_ENV: &str = "OT_MODEL";
pub const MAX_TOKENS_ENV: &str = "OT_MAX_TOKENS";
pub const TEMPERATURE_ENV: &str = "OT_TEMPERATURE";
pub const BASE_URL_ENV: &str = "OT_BASE_URL";
pub const TIMEOUT_ENV: &str = "OT_TIMEOUT";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub embedding_model: Option<String>,
    pub image_model: Option<String>,
    pub response_model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
}

impl ProfileConfig {
    fn validate(&self, name: &str) -> Result<(), ConfigurationError> {
        let field = |key: &str| format!("profiles.{name}.{key}");

        if let Some(temperature) = self.temperature {
            check_temperature(&field("temperature"), temperature)?;
        }
        if self.max_tokens == Some(0) {
            return Err(invalid(&field("max_tokens"), "0", "must be greater than zero"));
        }
        if self.timeout == Some(0) {
            return Err(invalid(&field("timeout"), "0", "must be greater than zero"));
        }
        if let Some(base_url) = &self.base_url {
            check_base_url(&field("base_url"), base_url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    profiles: Option<HashMap<String, ProfileConfig>>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
}

pub fn load_profile(name: &str) -> Result<ProfileConfig, ConfigurationError> {
    let path = config_path()?;
    let profiles = read_profiles(&path)?;
    find_profile(profiles, name, &path)
}

/// Checks the config file and, when given, one profile. Returns the file path.
pub fn validate_config(profile: Option<&str>) -> Result<PathBuf, ConfigurationError> {
    let path = config_path()?;
    let profiles = read_profiles(&path)?;

    match profile {
        Some(name) => {
            find_profile(profiles, name, &path)?;
        }
        None => {
            for (name, config) in &profiles {
                config.validate(name)?;
            }
        }
    }
    Ok(path)
}

/// Layers built-in defaults, the profile, environment variables and CLI
/// overrides, in increasing order of priority.
pub fn resolve_settings<F>(
    overrides: &SettingsOverrides,
    profile: Option<&ProfileConfig>,
    lookup: F,
) -> Result<ClientSettings, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = ClientSettings::default();
    let env_value = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(profile) = profile {
        let defaults = &mut settings.defaults;
        if let Some(model) = &profile.model {
            defaults.chat_model = model.clone();
        }
        if let Some(max_tokens) = profile.max_tokens {
            defaults.max_tokens = max_tokens;
        }
        if let Some(temperature) = profile.temperature {
            defaults.temperature = temperature;
        }
        if let Some(model) = &profile.embedding_model {
            defaults.embedding_model = model.clone();
        }
        if let Some(model) = &profile.image_model {
            defaults.image_model = model.clone();
        }
        if let Some(model) = &profile.response_model {
            defaults.response_model = model.clone();
        }
        if let Some(base_url) = &profile.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(timeout) = profile.timeout {
            settings.timeout = Some(Duration::from_secs(timeout));
        }
    }

    if let Some(model) = env_value(MODEL_ENV) {
        settings.defaults.chat_model = model;
    }
    if let Some(raw) = env_value(MAX_TOKENS_ENV) {
        settings.defaults.max_tokens = parse_positive(MAX_TOKENS_ENV, &raw)?
            .try_into()
            .map_err(|_| invalid(MAX_TOKENS_ENV, &raw, "value is too large"))?;
    }
    if let Some(raw) = env_value(TEMPERATURE_ENV) {
        let temperature = raw
            .parse::<f64>()
            .map_err(|_| invalid(TEMPERATURE_ENV, &raw, "expected a number"))?;
        check_temperature(TEMPERATURE_ENV, temperature)?;
        settings.defaults.temperature = temperature;
    }
    if let Some(base_url) = env_value(BASE_URL_ENV) {
        settings.base_url = base_url;
    }
    if let Some(raw) = env_value(TIMEOUT_ENV) {
        settings.timeout = Some(Duration::from_secs(parse_positive(TIMEOUT_ENV, &raw)?));
    }

    if let Some(base_url) = &overrides.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timeout) = overrides.timeout {
        if timeout == 0 {
            return Err(invalid("--timeout", "0", "must be greater than zero"));
        }
        settings.timeout = Some(Duration::from_secs(timeout));
    }

    check_base_url("base URL", &settings.base_url)?;
    Ok(settings)
}

/// Same as [`resolve_settings`] against the process environment.
pub fn resolve_settings_from_env(
    overrides: &SettingsOverrides,
    profile: Option<&ProfileConfig>,
) -> Result<ClientSettings, ConfigurationError> {
    resolve_settings(overrides, profile, |name| env::var(name).ok())
}

fn read_profiles(path: &Path) -> Result<HashMap<String, ProfileConfig>, ConfigurationError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigurationError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profiles(&raw, path)
}

fn parse_profiles(
    raw: &str,
    path: &Path,
) -> Result<HashMap<String, ProfileConfig>, ConfigurationError> {
    let config: ConfigFile =
        toml::from_str(raw).map_err(|source| ConfigurationError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;

    config.profiles.ok_or_else(|| ConfigurationError::NoProfiles {
        path: path.to_path_buf(),
    })
}

fn find_profile(
    mut profiles: HashMap<String, ProfileConfig>,
    name: &str,
    path: &Path,
) -> Result<ProfileConfig, ConfigurationError> {
    let profile = profiles
        .remove(name)
        .ok_or_else(|| ConfigurationError::UnknownProfile {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;
    profile.validate(name)?;
    Ok(profile)
}

pub fn config_path() -> Result<PathBuf, ConfigurationError> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed).join("oaitutor").join("config.toml"));
        }
    }

    let home = env::var("HOME").map_err(|_| ConfigurationError::NoConfigPath)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("oaitutor")
        .join("config.toml"))
}

fn invalid(name: &str, value: &str, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, ConfigurationError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(invalid(name, raw, "must be greater than zero")),
        Ok(value) => Ok(value),
        Err(_) => Err(invalid(name, raw, "expected a positive integer")),
    }
}

fn check_temperature(name: &str, temperature: f64) -> Result<(), ConfigurationError> {
    if (0.0..=2.0).contains(&temperature) {
        Ok(())
    } else {
        Err(invalid(
            name,
            &temperature.to_string(),
            "must be between 0.0 and 2.0",
        ))
    }
}

fn check_base_url(name: &str, base_url: &str) -> Result<(), ConfigurationError> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(name, base_url, "must start with http:// or https://"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    use super::{ProfileConfig, SettingsOverrides, parse_profiles, resolve_settings};
    use crate::openai::ConfigurationError;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn builtin_defaults_apply_without_any_layer() {
        let settings =
            resolve_settings(&SettingsOverrides::default(), None, env_from(&[])).unwrap();
        assert_eq!(settings.defaults.chat_model, "gpt-4o-mini");
        assert_eq!(settings.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn env_beats_profile_and_cli_beats_env() {
        let profile = ProfileConfig {
            model: Some("profile-model".to_string()),
            max_tokens: Some(300),
            base_url: Some("http://profile.local/v1".to_string()),
            timeout: Some(10),
            ..ProfileConfig::default()
        };
        let overrides = SettingsOverrides {
            base_url: None,
            timeout: Some(3),
        };
        let settings = resolve_settings(
            &overrides,
            Some(&profile),
            env_from(&[("OT_MODEL", "env-model"), ("OT_TIMEOUT", "21")]),
        )
        .unwrap();

        assert_eq!(settings.defaults.chat_model, "env-model");
        assert_eq!(settings.defaults.max_tokens, 300);
        assert_eq!(settings.base_url, "http://profile.local/v1");
        assert_eq!(settings.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let settings = resolve_settings(
            &SettingsOverrides::default(),
            None,
            env_from(&[("OT_MODEL", "  "), ("OT_TEMPERATURE", "")]),
        )
        .unwrap();
        assert_eq!(settings.defaults.chat_model, "gpt-4o-mini");
    }

    #[test]
    fn invalid_env_temperature_is_rejected() {
        let err = resolve_settings(
            &SettingsOverrides::default(),
            None,
            env_from(&[("OT_TEMPERATURE", "hot")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid OT_TEMPERATURE 'hot'"));

        let err = resolve_settings(
            &SettingsOverrides::default(),
            None,
            env_from(&[("OT_TEMPERATURE", "3.5")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }

    #[test]
    fn zero_max_tokens_is_rejected() {
        let err = resolve_settings(
            &SettingsOverrides::default(),
            None,
            env_from(&[("OT_MAX_TOKENS", "0")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must be greater than zero"));
    }

    #[test]
    fn base_url_without_scheme_is_rejected() {
        let overrides = SettingsOverrides {
            base_url: Some("api.openai.com".to_string()),
            timeout: None,
        };
        let err = resolve_settings(&overrides, None, env_from(&[])).unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));
    }

    #[test]
    fn profiles_parse_from_toml() {
        let raw = "[profiles.work]\nmodel = \"gpt-4o\"\ntemperature = 0.2\ntimeout = 30\n";
        let profiles = parse_profiles(raw, Path::new("config.toml")).unwrap();
        let work = &profiles["work"];
        assert_eq!(work.model.as_deref(), Some("gpt-4o"));
        assert_eq!(work.temperature, Some(0.2));
        assert_eq!(work.timeout, Some(30));
    }

    #[test]
    fn file_without_profiles_section_is_rejected() {
        let err = parse_profiles("title = \"x\"\n", Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoProfiles { .. }));
    }

    #[test]
    fn unknown_profile_keys_are_parse_errors() {
        let err = parse_profiles("[profiles.a]\nmodle = \"x\"\n", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::ParseConfig { .. }));
    }

    #[test]
    fn profile_validation_names_the_field() {
        let profile = ProfileConfig {
            temperature: Some(9.0),
            ..ProfileConfig::default()
        };
        let err = profile.validate("work").unwrap_err();
        assert!(err.to_string().contains("profiles.work.temperature"));
    }
}
