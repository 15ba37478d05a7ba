use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const PRODUCTION_API_URL: &str = "https://knowledgebasedsearchengine.onrender.com/api";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:3001/api";
pub const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl Mode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    pub fn default_api_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_API_URL,
            Self::Development => DEVELOPMENT_API_URL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub mode: Mode,
    /// `None` waits for the remote service indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEVELOPMENT_API_URL.into(),
            mode: Mode::Development,
            request_timeout_secs: Some(120),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    mode: Option<Mode>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_with(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then environment overrides.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let file_cfg = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<FileSettings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(_) => FileSettings::default(),
    };

    let mut mode = file_cfg.mode.unwrap_or_default();
    for name in ["DOCCHAT_MODE", "APP__MODE"] {
        if let Some(raw) = read_non_empty(&env, name) {
            mode = Mode::parse(&raw).ok_or_else(|| anyhow!("unknown mode '{raw}' in {name}"))?;
        }
    }

    let mut api_base_url = file_cfg
        .api_base_url
        .unwrap_or_else(|| mode.default_api_url().to_string());
    for name in ["DOCCHAT_API_URL", "APP__API_BASE_URL"] {
        if let Some(v) = read_non_empty(&env, name) {
            api_base_url = v;
        }
    }

    let mut request_timeout_secs = match file_cfg.request_timeout_secs {
        Some(secs) => (secs > 0).then_some(secs),
        None => ClientSettings::default().request_timeout_secs,
    };
    if let Some(v) = read_non_empty(&env, "APP__REQUEST_TIMEOUT_SECS") {
        let parsed = v
            .parse::<u64>()
            .with_context(|| format!("invalid APP__REQUEST_TIMEOUT_SECS '{v}'"))?;
        request_timeout_secs = (parsed > 0).then_some(parsed);
    }

    Ok(ClientSettings {
        api_base_url: normalize_base_url(&api_base_url)?,
        mode,
        request_timeout_secs,
    })
}

fn read_non_empty(env: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    env(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "api base url '{raw}' must use http or https, got '{}'",
            parsed.scheme()
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_development_address_without_file_or_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings =
            load_settings_with(&dir.path().join("client.toml"), env_from(&[])).expect("load");
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn production_mode_selects_production_address() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_with(
            &dir.path().join("client.toml"),
            env_from(&[("DOCCHAT_MODE", "production")]),
        )
        .expect("load");
        assert_eq!(settings.mode, Mode::Production);
        assert_eq!(settings.api_base_url, PRODUCTION_API_URL);
    }

    #[test]
    fn explicit_url_overrides_mode_default_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        fs::write(
            &path,
            "api_base_url = \"http://file.example/api\"\nmode = \"production\"\nrequest_timeout_secs = 30\n",
        )
        .expect("write");

        let from_file = load_settings_with(&path, env_from(&[])).expect("load");
        assert_eq!(from_file.api_base_url, "http://file.example/api");
        assert_eq!(from_file.mode, Mode::Production);
        assert_eq!(from_file.request_timeout_secs, Some(30));

        let from_env = load_settings_with(
            &path,
            env_from(&[
                ("DOCCHAT_API_URL", "http://env.example/api/"),
                ("APP__REQUEST_TIMEOUT_SECS", "0"),
            ]),
        )
        .expect("load");
        assert_eq!(from_env.api_base_url, "http://env.example/api");
        assert_eq!(from_env.request_timeout_secs, None);
    }

    #[test]
    fn zero_timeout_in_file_disables_timeout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        fs::write(&path, "request_timeout_secs = 0\n").expect("write");

        let settings = load_settings_with(&path, env_from(&[])).expect("load");
        assert_eq!(settings.request_timeout_secs, None);

        let overridden = load_settings_with(
            &path,
            env_from(&[("APP__REQUEST_TIMEOUT_SECS", "15")]),
        )
        .expect("load");
        assert_eq!(overridden.request_timeout_secs, Some(15));
    }

    #[test]
    fn rejects_malformed_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        assert!(load_settings_with(&path, env_from(&[("DOCCHAT_MODE", "staging")])).is_err());
        assert!(load_settings_with(&path, env_from(&[("DOCCHAT_API_URL", "not a url")])).is_err());
        assert!(
            load_settings_with(&path, env_from(&[("DOCCHAT_API_URL", "ftp://host/api")])).is_err()
        );

        fs::write(&path, "mode = 42\n").expect("write");
        assert!(load_settings_with(&path, env_from(&[])).is_err());
    }
}
