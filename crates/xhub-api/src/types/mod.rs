//! Wire models for the XNAT compute and JupyterHub REST surfaces.
//!
//! Field names follow the JSON the server emits (camelCase for the XNAT
//! plugin models, snake_case for the JupyterHub REST API passthrough).

mod compute;
mod dashboard;
mod hardware;
mod hub;
mod profile;
mod scope;

pub use compute::{
    ComputeEnvironment, ComputeEnvironmentConfig, ComputeSpec, ComputeSpecConfig, ConfigType,
    EnvironmentVariable, HardwareOptions, Mount,
};
pub use dashboard::{Dashboard, DashboardConfig, DashboardFramework};
pub use hardware::{Constraint, ConstraintConfig, GenericResource, Hardware, HardwareConfig, Operator};
pub use hub::{
    BindMount, DockerImage, HubComponent, HubInfo, HubServer, HubUser, ProgressEntry,
    ProgressStatus, ServerTrackingLog, Token, TrackingData, UserOptions,
};
pub use profile::{ContainerSpec, Placement, Profile, Resources, TaskTemplate};
pub use scope::{AccessScope, Scope, ScopeMap};
