//! CLI configuration: TOML profiles, credential resolution, and client
//! construction.
//!
//! Profiles live in a TOML file under the platform config directory.
//! Credentials resolve flag > environment > keyring > plaintext profile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use xhub_api::{Auth, TlsMode, TransportConfig, XnatClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Keyring service name used for stored passwords.
pub const KEYRING_SERVICE: &str = "xhub";

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named XNAT server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://xnat.example.org").
    pub server: String,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password or alias token secret (plaintext — prefer keyring).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "xnat", "xhub").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("xhub");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    load_config_from(&config_path())
}

fn load_config_from(path: &Path) -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("XHUB_CONFIG_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg).map_err(|err| CliError::Validation {
        field: "config".into(),
        reason: err.to_string(),
    })?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build an authenticated `XnatClient` from the config file, the active
/// profile, and CLI flag overrides. Flags win over environment, which
/// wins over the profile.
pub fn build_client(global: &GlobalOpts) -> Result<XnatClient, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    let server = global
        .server
        .as_deref()
        .or(profile.map(|p| p.server.as_str()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    let auth = resolve_auth(global, profile, &profile_name)?;
    let transport = resolve_transport(global, profile);

    Ok(XnatClient::new(server, auth, &transport)?)
}

fn resolve_auth(
    global: &GlobalOpts,
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<Auth, CliError> {
    // 1. Bearer token flag or env
    if let Some(ref token) = global.token {
        return Ok(Auth::Bearer(SecretString::from(token.clone())));
    }

    let username = global
        .username
        .clone()
        .or_else(|| profile.and_then(|p| p.username.clone()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 2. Password flag or env
    if let Some(ref password) = global.password {
        return Ok(Auth::Basic {
            username,
            password: SecretString::from(password.clone()),
        });
    }

    // 3. Profile's password_env → env var lookup
    if let Some(env_name) = profile.and_then(|p| p.password_env.as_deref()) {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(Auth::Basic {
                username,
                password: SecretString::from(val),
            });
        }
    }

    // 4. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(Auth::Basic {
                username,
                password: SecretString::from(secret),
            });
        }
    }

    // 5. Plaintext in config
    if let Some(password) = profile.and_then(|p| p.password.clone()) {
        return Ok(Auth::Basic {
            username,
            password: SecretString::from(password),
        });
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn resolve_transport(global: &GlobalOpts, profile: Option<&Profile>) -> TransportConfig {
    let tls = if global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsMode::CustomCa(ca_path)
    } else {
        TlsMode::System
    };

    let timeout = profile
        .and_then(|p| p.timeout)
        .map_or(global.timeout, |profile_timeout| {
            // The flag has a default value, so a profile override only
            // applies when the flag was left at that default.
            if global.timeout == default_timeout() {
                profile_timeout
            } else {
                global.timeout
            }
        });

    TransportConfig {
        tls,
        timeout: Duration::from_secs(timeout),
        ..TransportConfig::default()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write as _;

    use crate::cli::{ColorMode, OutputFormat};

    use super::*;

    fn global() -> GlobalOpts {
        GlobalOpts {
            profile: None,
            server: None,
            username: None,
            password: None,
            token: None,
            output: OutputFormat::Table,
            color: ColorMode::Auto,
            verbose: 0,
            quiet: false,
            yes: false,
            insecure: false,
            timeout: 30,
        }
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn profiles_parse_from_toml() {
        let file = write_config(
            r#"
            default_profile = "lab"

            [profiles.lab]
            server = "https://xnat.lab.example.org"
            username = "admin"
            insecure = true
            timeout = 120
            "#,
        );

        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));

        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.server, "https://xnat.lab.example.org");
        assert_eq!(lab.username.as_deref(), Some("admin"));
        assert_eq!(lab.insecure, Some(true));
        assert_eq!(lab.timeout, Some(120));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config_from(Path::new("/nonexistent/xhub-config.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_flag_beats_the_configured_default() {
        let cfg = Config {
            default_profile: Some("lab".into()),
            ..Config::default()
        };

        let mut opts = global();
        assert_eq!(active_profile_name(&opts, &cfg), "lab");

        opts.profile = Some("staging".into());
        assert_eq!(active_profile_name(&opts, &cfg), "staging");
    }

    #[test]
    fn profile_timeout_applies_only_when_the_flag_is_at_its_default() {
        let profile = Profile {
            timeout: Some(120),
            ..Profile::default()
        };

        let transport = resolve_transport(&global(), Some(&profile));
        assert_eq!(transport.timeout, Duration::from_secs(120));

        let mut opts = global();
        opts.timeout = 5;
        let transport = resolve_transport(&opts, Some(&profile));
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn insecure_flag_or_profile_accepts_invalid_certs() {
        let transport = resolve_transport(&global(), None);
        assert!(matches!(transport.tls, TlsMode::System));

        let mut opts = global();
        opts.insecure = true;
        let transport = resolve_transport(&opts, None);
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
    }
}
