//! CLI error types with miette diagnostics.
//!
//! Maps API and workflow errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use xhub_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to XNAT at {url}")]
    #[diagnostic(
        code(xhub::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             URL: {url}\n\
             Try: xhub hub status --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS certificate verification failed for {url}")]
    #[diagnostic(
        code(xhub::tls_error),
        help(
            "The server is using a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or configure ca_cert in your profile."
        )
    )]
    TlsError { url: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(xhub::auth_failed),
        help(
            "Verify your username and password, or your alias token.\n\
             Run: xhub config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(xhub::no_credentials),
        help(
            "Configure credentials with: xhub config init\n\
             Or set the XHUB_USERNAME and XHUB_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(xhub::not_found),
        help("Run: xhub {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(xhub::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(xhub::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(xhub::validation))]
    Validation { field: String, reason: String },

    /// Record validation failures, one message per failed field.
    #[error("Validation failed:\n{}", messages.iter().map(|m| format!("  - {m}")).collect::<Vec<_>>().join("\n"))]
    #[diagnostic(
        code(xhub::record_invalid),
        help("Fix the listed fields in the record file and save again.")
    )]
    RecordInvalid { messages: Vec<String> },

    // ── Launch tracking ──────────────────────────────────────────────

    #[error("Server launch failed: {message}")]
    #[diagnostic(
        code(xhub::launch_failed),
        help("Inspect the full event log with: xhub servers watch {tracking_id}")
    )]
    LaunchFailed {
        tracking_id: String,
        message: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(xhub::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: xhub config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(xhub::no_config),
        help(
            "Create one with: xhub config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(xhub::config))]
    Config(Box<figment::Error>),

    #[error("Keyring access failed: {0}")]
    #[diagnostic(
        code(xhub::keyring),
        help("Store the credential in the profile or an environment variable instead.")
    )]
    Keyring(#[from] keyring::Error),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(xhub::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(xhub::prompt))]
    Prompt(#[from] dialoguer::Error),

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(xhub::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(xhub::json), help("Check the file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML payload: {0}")]
    #[diagnostic(code(xhub::yaml), help("Check the file contents and try again."))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::RecordInvalid { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── API / core error mapping ─────────────────────────────────────────

impl From<xhub_api::Error> for CliError {
    fn from(err: xhub_api::Error) -> Self {
        match &err {
            xhub_api::Error::Authentication { .. } => CliError::AuthFailed {
                profile: "current".into(),
            },

            xhub_api::Error::Transport(source) => {
                if source.is_timeout() {
                    return CliError::Timeout { seconds: 0 };
                }
                if source.is_connect() {
                    return CliError::ConnectionFailed {
                        url: source
                            .url()
                            .map_or_else(|| "(unknown)".into(), ToString::to_string),
                        source: err.into(),
                    };
                }
                CliError::ApiError {
                    status: 0,
                    message: err.to_string(),
                }
            }

            xhub_api::Error::Api { status, message } => {
                if *status == 404 {
                    return CliError::NotFound {
                        resource_type: "resource".into(),
                        identifier: message.clone(),
                        list_command: "hub status".into(),
                    };
                }
                if *status == 409 {
                    return CliError::Conflict {
                        resource_type: "resource".into(),
                        identifier: message.clone(),
                    };
                }
                CliError::ApiError {
                    status: *status,
                    message: message.clone(),
                }
            }

            xhub_api::Error::Tls(_) => CliError::TlsError {
                url: "(configured server)".into(),
            },

            xhub_api::Error::InvalidUrl(source) => CliError::Validation {
                field: "server".into(),
                reason: source.to_string(),
            },

            xhub_api::Error::MissingId { entity } => CliError::Validation {
                field: "id".into(),
                reason: format!("{entity} has no id; create it first"),
            },

            xhub_api::Error::Deserialization { message, .. } => CliError::ApiError {
                status: 0,
                message: message.clone(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => api.into(),

            CoreError::Validation { messages } => CliError::RecordInvalid { messages },

            CoreError::NotFound { entity, id } => CliError::NotFound {
                resource_type: entity.into(),
                identifier: id,
                list_command: "hub status".into(),
            },

            CoreError::Payload(source) => CliError::Json(source),
        }
    }
}
