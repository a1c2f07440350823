//! Async client for the XNAT JupyterHub plugin REST API.
//!
//! [`XnatClient`] wraps one XNAT server; endpoint groups expose the
//! scoped configuration families ([`ConfigEndpoint`]), dashboards,
//! spawner profiles, the JupyterHub passthrough, and XNAT account/role
//! management.
//!
//! ```no_run
//! use xhub_api::{Auth, TransportConfig, XnatClient};
//!
//! # async fn demo() -> Result<(), xhub_api::Error> {
//! let client = XnatClient::new(
//!     "https://xnat.example.org",
//!     Auth::Basic {
//!         username: "admin".into(),
//!         password: "secret".to_owned().into(),
//!     },
//!     &TransportConfig::default(),
//! )?;
//!
//! let envs = client.compute_environment_configs().get_all().await?;
//! println!("{} compute environments", envs.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod configs;
mod dashboards;
mod error;
mod hub;
mod profiles;
mod transport;
pub mod types;
mod users;

pub use client::{Auth, XnatClient};
pub use configs::{ConfigEndpoint, ConfigRecord};
pub use dashboards::DashboardEndpoint;
pub use error::Error;
pub use hub::{HubEndpoint, StartServerRequest};
pub use profiles::ProfileEndpoint;
pub use transport::{TlsMode, TransportConfig};
pub use users::{JUPYTER_ROLE, UserEndpoint};
