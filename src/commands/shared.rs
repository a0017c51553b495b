use std::io::{self, IsTerminal, Read};

use clap::Args;
use serde::Serialize;
use serde_json::json;

use crate::config::{self, SettingsOverrides};
use crate::openai::{ClientHandle, ClientSettings, ConfigurationError, Endpoint, PromptTemplate};

/// Connection flags accepted by every command that talks to the API.
#[derive(Debug, Args, Clone, Default)]
pub struct ClientArgs {
    #[arg(long, help = "Profile name from the config file")]
    pub profile: Option<String>,
    #[arg(long, help = "API root URL, e.g. https://api.openai.com/v1")]
    pub base_url: Option<String>,
    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,
}

impl ClientArgs {
    pub fn settings(&self) -> Result<ClientSettings, String> {
        let profile = self
            .profile
            .as_deref()
            .map(config::load_profile)
            .transpose()
            .map_err(configuration_error)?;
        let overrides = SettingsOverrides {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        };
        config::resolve_settings_from_env(&overrides, profile.as_ref()).map_err(configuration_error)
    }

    pub fn connect(&self) -> Result<ClientHandle, String> {
        let settings = self.settings()?;
        ClientHandle::from_env(&settings).map_err(configuration_error)
    }
}

/// Stored-prompt flags for the responses endpoint.
#[derive(Debug, Args, Clone, Default)]
pub struct TemplateArgs {
    #[arg(long, help = "Stored prompt id (pmpt_...)")]
    pub prompt_id: Option<String>,
    #[arg(long, requires = "prompt_id", help = "Stored prompt version")]
    pub prompt_version: Option<String>,
    #[arg(
        long = "var",
        value_name = "NAME=VALUE",
        requires = "prompt_id",
        value_parser = parse_variable,
        help = "Template variable, repeatable"
    )]
    pub vars: Vec<(String, String)>,
}

impl TemplateArgs {
    pub fn template(&self) -> Option<PromptTemplate> {
        let id = self.prompt_id.as_deref()?;
        let mut template = PromptTemplate::new(id);
        if let Some(version) = &self.prompt_version {
            template = template.with_version(version.as_str());
        }
        for (name, value) in &self.vars {
            template = template.with_variable(name.as_str(), value.as_str());
        }
        Some(template)
    }
}

pub fn configuration_error(err: ConfigurationError) -> String {
    format!("Configuration error: {err}")
}

/// Uses the argument when present, otherwise piped stdin.
pub fn read_text(argument: Option<String>, what: &str) -> Result<String, String> {
    if let Some(text) = argument.filter(|text| !text.trim().is_empty()) {
        return Ok(text);
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut buffer = String::new();
        stdin
            .lock()
            .read_to_string(&mut buffer)
            .map_err(|err| format!("Failed to read {what} from stdin: {err}"))?;
        let trimmed = buffer.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    Err(format!(
        "No {what} provided. Pass it as an argument or pipe it on stdin."
    ))
}

pub fn print_dry_run<P: Serialize>(endpoint: Endpoint, payload: &P) -> Result<(), String> {
    let payload = serde_json::to_value(payload)
        .map_err(|err| format!("Failed to encode {endpoint} payload: {err}"))?;
    let envelope = json!({
        "dry_run": true,
        "endpoint": endpoint.path(),
        "payload": payload,
    });
    let rendered = serde_json::to_string_pretty(&envelope)
        .map_err(|err| format!("Failed to render dry-run output: {err}"))?;
    println!("{rendered}");
    Ok(())
}

pub fn parse_temperature(raw: &str) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err("temperature must be between 0.0 and 2.0".to_string())
    }
}

pub fn parse_variable(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("variable name is empty in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
