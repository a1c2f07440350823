//! Clap derive structures for the `xhub` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// xhub -- admin console for the XNAT JupyterHub plugin
#[derive(Debug, Parser)]
#[command(
    name = "xhub",
    version,
    about = "Administer XNAT JupyterHub compute configs, dashboards, and servers",
    long_about = "A CLI for administering the XNAT JupyterHub plugin:\n\
        compute environments, hardware and constraint configs, dashboards,\n\
        spawner profiles, hub preferences, and Jupyter server lifecycle.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "XHUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// XNAT server URL (overrides profile)
    #[arg(long, short = 's', env = "XHUB_SERVER", global = true)]
    pub server: Option<String>,

    /// XNAT username (alias token alias also works)
    #[arg(long, short = 'u', env = "XHUB_USERNAME", global = true)]
    pub username: Option<String>,

    /// XNAT password or alias token secret
    #[arg(long, env = "XHUB_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Bearer token (overrides username/password)
    #[arg(long, env = "XHUB_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "XHUB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "XHUB_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "XHUB_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage compute environment configs
    #[command(alias = "env")]
    Envs(ScopedArgs),

    /// Manage legacy compute spec configs
    #[command(alias = "spec")]
    Specs(ScopedArgs),

    /// Manage hardware configs
    #[command(alias = "hw")]
    Hardware(ScopedArgs),

    /// Manage site-wide placement constraint configs
    #[command(alias = "cons")]
    Constraints(ScopedArgs),

    /// Manage dashboard configs
    #[command(alias = "dash")]
    Dashboards(DashboardsArgs),

    /// Manage dashboard frameworks
    #[command(alias = "fw")]
    Frameworks(FrameworksArgs),

    /// Manage spawner profiles
    Profiles(ProfilesArgs),

    /// Hub status and preferences
    Hub(HubArgs),

    /// XNAT users and the Jupyter role
    Users(UsersArgs),

    /// Jupyter server lifecycle
    #[command(alias = "srv")]
    Servers(ServersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Scoped config families ───────────────────────────────────────────

/// Shared command set for the scoped config families (envs, specs,
/// hardware, constraints).
#[derive(Debug, Args)]
pub struct ScopedArgs {
    #[command(subcommand)]
    pub command: ScopedCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScopedCommand {
    /// List configs, optionally only those offered to one subsystem
    #[command(alias = "ls")]
    List {
        /// Only configs offered to this subsystem
        #[arg(long = "type", value_enum)]
        config_type: Option<ConfigTypeArg>,
    },

    /// Get one config by id
    Get {
        /// Config id
        id: i64,
    },

    /// Create or update a config from a JSON or YAML file
    Save {
        /// Path to the config definition (.json, .yaml, .yml)
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Print a copy of a config with id and name cleared, ready to edit
    Copy {
        /// Config id to duplicate
        id: i64,
    },

    /// Delete a config
    #[command(alias = "rm")]
    Delete {
        /// Config id
        id: i64,
    },

    /// Enable a config for the whole site
    Enable {
        /// Config id
        id: i64,
    },

    /// Disable a config for the whole site
    Disable {
        /// Config id
        id: i64,
    },

    /// List configs available to a user/project context
    Available {
        /// Username to resolve against
        #[arg(long)]
        user: String,

        /// Project to resolve against
        #[arg(long)]
        project: String,

        /// Subsystem the configs are offered to
        #[arg(long = "type", value_enum, default_value = "jupyterhub")]
        config_type: ConfigTypeArg,
    },
}

/// Subsystem a config is offered to.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigTypeArg {
    Jupyterhub,
    ContainerService,
    General,
}

// ── Dashboards ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DashboardsArgs {
    #[command(subcommand)]
    pub command: DashboardsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DashboardsCommand {
    /// List all dashboard configs
    #[command(alias = "ls")]
    List,

    /// Get one dashboard config by id
    Get { id: i64 },

    /// Create or update a dashboard config from a JSON or YAML file
    Save {
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Delete a dashboard config
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Enable a dashboard for the site, or for one project
    Enable {
        id: i64,

        /// Enable for this project instead of the site
        #[arg(long)]
        project: Option<String>,
    },

    /// Disable a dashboard for the site, or for one project
    Disable {
        id: i64,

        /// Disable for this project instead of the site
        #[arg(long)]
        project: Option<String>,
    },

    /// List dashboards available to an execution context
    Available {
        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        user: Option<String>,

        /// XSI data type (e.g. xnat:mrSessionData)
        #[arg(long)]
        data_type: Option<String>,
    },
}

// ── Frameworks ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FrameworksArgs {
    #[command(subcommand)]
    pub command: FrameworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum FrameworksCommand {
    /// List dashboard frameworks
    #[command(alias = "ls")]
    List,

    /// Get one framework by name
    Get { name: String },

    /// Create or update a framework
    Save {
        /// Framework name (e.g. Panel, Streamlit)
        name: String,

        /// Command template; {repo}, {branch}, {mainFilePath} expand
        #[arg(long)]
        command_template: String,
    },

    /// Delete a framework by name
    #[command(alias = "rm")]
    Delete { name: String },
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List spawner profiles
    #[command(alias = "ls")]
    List,

    /// Get one profile by id
    Get { id: i64 },

    /// Create or update a profile from a JSON or YAML file
    Save {
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Delete a profile
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// List profiles applicable to a project
    ForProject { project: String },
}

// ── Hub ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HubArgs {
    #[command(subcommand)]
    pub command: HubCommand,
}

#[derive(Debug, Subcommand)]
pub enum HubCommand {
    /// Hub reachability, version, and components
    Status,

    /// Show all preferences, or one
    Prefs {
        /// Preference name
        name: Option<String>,
    },

    /// Set one preference (value parsed as JSON, falling back to string)
    SetPref { name: String, value: String },

    /// Issue an API token for a user
    Token {
        username: String,

        /// Token lifetime in seconds
        #[arg(long, default_value = "3600")]
        expires_in: i64,

        /// Note attached to the token
        #[arg(long)]
        note: Option<String>,
    },

    /// Manage the Jupyter docker image list
    Images(ImagesArgs),
}

#[derive(Debug, Args)]
pub struct ImagesArgs {
    #[command(subcommand)]
    pub command: ImagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImagesCommand {
    /// List the enabled docker images
    #[command(alias = "ls")]
    List,

    /// Add an image (include the tag)
    Add {
        image: String,

        /// Add the image without enabling it
        #[arg(long)]
        disabled: bool,
    },

    /// Remove an image from the list
    #[command(alias = "rm")]
    Remove { image: String },

    /// Enable an image
    Enable { image: String },

    /// Disable an image without removing it
    Disable { image: String },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List site users eligible for Jupyter (service accounts excluded)
    #[command(alias = "ls")]
    List,

    /// List users holding the Jupyter role
    Authorized,

    /// Check whether a user holds the Jupyter role
    Check { username: String },

    /// Grant the Jupyter role
    Grant { username: String },

    /// Revoke the Jupyter role
    Revoke { username: String },

    /// Show a user's hub account and servers
    Hub { username: String },

    /// Create the hub account for a user if missing
    Ensure { username: String },

    /// List project ids offered in scope pickers
    Projects,
}

// ── Servers ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServersArgs {
    #[command(subcommand)]
    pub command: ServersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServersCommand {
    /// Start a Jupyter server for an XNAT item and follow its progress
    Start {
        /// User to start the server for
        #[arg(long)]
        user: String,

        /// XSI type of the launch target (e.g. xnat:projectData)
        #[arg(long, default_value = "xnat:projectData")]
        xsi_type: String,

        /// Id of the launch target
        #[arg(long)]
        item: String,

        /// Label of the launch target (defaults to the item id)
        #[arg(long)]
        label: Option<String>,

        /// Project the target belongs to
        #[arg(long)]
        project: String,

        /// Return immediately instead of following progress
        #[arg(long)]
        no_wait: bool,
    },

    /// Stop a running server
    Stop {
        #[arg(long)]
        user: String,

        /// Named server (default server when omitted)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        no_wait: bool,
    },

    /// Follow the progress of a launch by tracking id
    Watch {
        /// Event tracking id returned by start/stop
        tracking_id: String,
    },

    /// Show the spawner options of a user's running server
    Options {
        #[arg(long)]
        user: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update a profile
    Init,

    /// Show the resolved configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Store a password/token in the system keyring for a profile
    SetPassword,

    /// Remove a profile
    Remove {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
