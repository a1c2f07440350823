//! Admin workflows for the XNAT JupyterHub plugin: field validation,
//! scope display and resolution, the launch progress reducer, and the
//! entity managers the CLI drives.

pub mod error;
pub mod images;
pub mod launch;
pub mod manager;
pub mod progress;
pub mod scope;
pub mod validate;

pub use error::CoreError;
pub use launch::{LaunchContext, Launcher, new_tracking_id};
pub use manager::{ConfigResource, Draft, Editable, EditorMode, Manager, eligible_users};
pub use progress::{ProgressLine, ProgressState, Severity};
