//! Field validation for the editor workflows.
//!
//! Checks run before any network call; every failing rule contributes
//! its message and the whole list is reported at once. Messages match
//! the ones admins already know from the plugin UI.

use xhub_api::types::{
    ComputeEnvironment, ComputeEnvironmentConfig, ComputeSpecConfig, ConstraintConfig, Dashboard,
    DashboardConfig, DashboardFramework, HardwareConfig, Profile, Scope,
};

use crate::error::CoreError;

/// Collects rule failures across a form's fields.
#[derive(Debug, Default)]
pub struct Validator {
    failures: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless `ok` holds. Duplicate messages collapse,
    /// mirroring per-field rules applied across repeated rows.
    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok && !self.failures.iter().any(|m| m == message) {
            self.failures.push(message.to_owned());
        }
        self
    }

    pub fn require(&mut self, value: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), message)
    }

    pub fn finish(self) -> Result<(), CoreError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation {
                messages: self.failures,
            })
        }
    }
}

// ── Field formats ────────────────────────────────────────────────────

/// A positive integer without leading zero, followed by K, M, G, or T
/// (`512M`, `2G`).
pub fn valid_memory(value: &str) -> bool {
    let Some(digits) = value.strip_suffix(['K', 'M', 'G', 'T']) else {
        return false;
    };
    !digits.is_empty()
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// Starts with a letter or underscore; letters, digits, and underscores
/// after that.
pub fn valid_env_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Like an env key, but hyphens and periods are also allowed after the
/// first character (`node.labels.gpu`).
pub fn valid_constraint_attribute(attribute: &str) -> bool {
    let mut chars = attribute.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// `KEY==VALUE` or `KEY!=VALUE` swarm placement expression.
pub fn valid_placement_expression(expression: &str) -> bool {
    let (key, value) = match expression.split_once("==") {
        Some(parts) => parts,
        None => match expression.split_once("!=") {
            Some(parts) => parts,
            None => return false,
        },
    };
    valid_constraint_attribute(key) && !value.is_empty()
}

fn positive_or_unset(value: Option<f64>) -> bool {
    value.is_none_or(|v| v > 0.0)
}

fn memory_or_unset(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.is_empty() || valid_memory(v))
}

// ── Entities ─────────────────────────────────────────────────────────

fn check_environment(v: &mut Validator, environment: &ComputeEnvironment) {
    v.require(&environment.name, "Name is required");
    v.require(&environment.image, "Image is required");

    for variable in &environment.environment_variables {
        v.require(&variable.key, "Keys are required");
        if !variable.key.is_empty() {
            v.check(
                valid_env_key(&variable.key),
                "Keys must be valid environment variable names",
            );
        }
    }

    for mount in &environment.mounts {
        v.require(&mount.local_path, "Local paths are required");
        if !mount.local_path.is_empty() {
            v.check(
                mount.local_path.starts_with('/'),
                "Local paths must be a valid URI",
            );
        }
        v.require(&mount.container_path, "Container paths are required");
        if !mount.container_path.is_empty() {
            v.check(
                mount.container_path.starts_with('/'),
                "Container paths must be a valid URI",
            );
        }
    }
}

pub fn validate_compute_environment_config(
    config: &ComputeEnvironmentConfig,
) -> Result<(), CoreError> {
    let mut v = Validator::new();
    check_environment(&mut v, &config.compute_environment);
    v.finish()
}

pub fn validate_compute_spec_config(config: &ComputeSpecConfig) -> Result<(), CoreError> {
    let mut v = Validator::new();
    check_environment(&mut v, &config.compute_spec);
    v.finish()
}

pub fn validate_hardware_config(config: &HardwareConfig) -> Result<(), CoreError> {
    let hardware = &config.hardware;
    let mut v = Validator::new();

    v.require(&hardware.name, "Name is required");
    v.check(
        positive_or_unset(hardware.cpu_reservation),
        "CPU Reservation must be a positive number or empty",
    );
    v.check(
        positive_or_unset(hardware.cpu_limit),
        "CPU Limit must be a positive number or empty",
    );
    v.check(
        memory_or_unset(hardware.memory_reservation.as_deref()),
        "Memory Reservation must be a number followed by a suffix of K, M, G, or T or be empty",
    );
    v.check(
        memory_or_unset(hardware.memory_limit.as_deref()),
        "Memory Limit must be a number followed by a suffix of K, M, G, or T or be empty",
    );

    for variable in &hardware.environment_variables {
        v.check(
            valid_env_key(&variable.key),
            "Keys are required and must be a valid environment variable name",
        );
    }

    for constraint in &hardware.constraints {
        v.check(
            valid_constraint_attribute(&constraint.key),
            "Attributes are required and must be a valid swarm constraint attribute",
        );
        v.check(
            constraint.values.iter().any(|value| !value.is_empty()),
            "Constraint values are required",
        );
    }

    for resource in &hardware.generic_resources {
        v.require(&resource.name, "Resource names are required");
        if !resource.name.is_empty() {
            v.check(
                valid_constraint_attribute(&resource.name),
                "Invalid resource name",
            );
        }
        v.require(&resource.value, "Resource values are required");
    }

    v.finish()
}

pub fn validate_constraint_config(config: &ConstraintConfig) -> Result<(), CoreError> {
    let mut v = Validator::new();
    v.require(&config.constraint.key, "Attribute is required");
    v.check(
        config.constraint.values.iter().any(|value| !value.is_empty()),
        "Value is required",
    );
    v.finish()
}

fn check_dashboard(v: &mut Validator, dashboard: &Dashboard) {
    v.require(&dashboard.name, "Name is required");

    let framework = dashboard.framework.as_deref().unwrap_or_default();
    v.require(framework, "Framework is required");

    if framework.eq_ignore_ascii_case("custom") {
        v.require(
            dashboard.command.as_deref().unwrap_or_default(),
            "Command is required",
        );
    } else {
        let repo = dashboard.git_repo_url.as_deref().unwrap_or_default();
        v.require(repo, "Git Repo URL is required");
        if !repo.is_empty() {
            v.check(url::Url::parse(repo).is_ok(), "Git Repo must be a URL");
        }
        v.require(
            dashboard.git_repo_branch.as_deref().unwrap_or_default(),
            "Branch is required",
        );
        v.require(
            dashboard.main_file_path.as_deref().unwrap_or_default(),
            "Main File Path is required",
        );
    }
}

pub fn validate_dashboard_config(config: &DashboardConfig) -> Result<(), CoreError> {
    let mut v = Validator::new();
    check_dashboard(&mut v, &config.dashboard);

    v.check(
        config.compute_environment_config.is_some(),
        "Jupyter Environment is required",
    );
    v.check(config.hardware_config.is_some(), "Hardware is required");

    let data_types_ok = config
        .scopes
        .get(&Scope::DataType)
        .is_some_and(|rule| rule.enabled || !rule.ids.is_empty());
    v.check(data_types_ok, "At least one data type is required");

    v.finish()
}

pub fn validate_dashboard_framework(framework: &DashboardFramework) -> Result<(), CoreError> {
    let mut v = Validator::new();
    v.require(&framework.name, "Name is required");
    v.require(&framework.command_template, "Command template is required");
    v.finish()
}

pub fn validate_profile(profile: &Profile) -> Result<(), CoreError> {
    let template = &profile.task_template;
    let mut v = Validator::new();

    v.require(&profile.name, "Name is required");
    v.require(
        profile.description.as_deref().unwrap_or_default(),
        "Description is required",
    );

    let image = &template.container_spec.image;
    v.require(image, "Image is required");
    if !image.is_empty() {
        v.check(
            image.split_once(':').is_some_and(|(name, tag)| {
                !name.is_empty() && !tag.is_empty()
            }),
            "Image must be in the format of image:tag",
        );
    }

    v.check(
        positive_or_unset(template.resources.cpu_limit),
        "CPU Limit must be a number greater than 0 or be empty",
    );
    v.check(
        positive_or_unset(template.resources.cpu_reservation),
        "CPU Reservation must be a number greater than 0 or be empty",
    );
    v.check(
        memory_or_unset(template.resources.mem_limit.as_deref()),
        "Memory Limit must be a number followed by a suffix of K, M, G, or T or be empty",
    );
    v.check(
        memory_or_unset(template.resources.mem_reservation.as_deref()),
        "Memory Reservation must be a number followed by a suffix of K, M, G, or T or be empty",
    );

    for expression in &template.placement.constraints {
        v.check(
            valid_placement_expression(expression),
            "Placement Constraints must be in the form of KEY==VALUE, KEY!=VALUE or be empty",
        );
    }

    for key in template.container_spec.env.keys() {
        v.check(
            valid_env_key(key),
            "Environment Variables must be in the form of KEY=VALUE or be empty",
        );
    }

    for name in template.resources.generic_resources.keys() {
        v.check(
            valid_constraint_attribute(name),
            "Generic Resources must be in the form of KEY=VALUE or be empty",
        );
    }

    v.finish()
}

#[cfg(test)]
mod tests {
    use xhub_api::types::{
        AccessScope, Constraint, ContainerSpec, EnvironmentVariable, Hardware, Operator, Resources,
        TaskTemplate,
    };

    use super::*;

    fn hardware_named(name: &str) -> HardwareConfig {
        HardwareConfig {
            hardware: Hardware {
                name: name.to_owned(),
                ..Hardware::default()
            },
            ..HardwareConfig::default()
        }
    }

    #[test]
    fn empty_name_is_rejected_with_known_message() {
        let err = validate_hardware_config(&hardware_named("")).unwrap_err();
        assert_eq!(err.validation_messages(), ["Name is required"]);
    }

    #[test]
    fn memory_suffix_is_required() {
        let mut config = hardware_named("Large");
        config.hardware.memory_limit = Some("2G".to_owned());
        assert!(validate_hardware_config(&config).is_ok());

        config.hardware.memory_limit = Some("2".to_owned());
        let err = validate_hardware_config(&config).unwrap_err();
        assert_eq!(
            err.validation_messages(),
            ["Memory Limit must be a number followed by a suffix of K, M, G, or T or be empty"]
        );
    }

    #[test]
    fn memory_format_corners() {
        assert!(valid_memory("512M"));
        assert!(valid_memory("1T"));
        assert!(!valid_memory("0G"));
        assert!(!valid_memory("G"));
        assert!(!valid_memory("2g"));
        assert!(!valid_memory("2GB"));
    }

    #[test]
    fn env_keys_and_constraint_attributes() {
        assert!(valid_env_key("JUPYTER_ENABLE_LAB"));
        assert!(valid_env_key("_private"));
        assert!(!valid_env_key("1BAD"));
        assert!(!valid_env_key("has-dash"));

        assert!(valid_constraint_attribute("node.labels.gpu-type"));
        assert!(!valid_constraint_attribute(".starts.with.dot"));
    }

    #[test]
    fn all_failures_are_collected_at_once() {
        let mut config = hardware_named("");
        config.hardware.cpu_limit = Some(-1.0);
        config.hardware.environment_variables.push(EnvironmentVariable {
            key: "9bad".to_owned(),
            value: "x".to_owned(),
        });

        let err = validate_hardware_config(&config).unwrap_err();
        assert_eq!(err.validation_messages().len(), 3);
    }

    #[test]
    fn constraint_needs_attribute_and_value() {
        let config = ConstraintConfig {
            constraint: Constraint {
                key: String::new(),
                operator: Operator::In,
                values: std::collections::BTreeSet::new(),
            },
            ..ConstraintConfig::default()
        };
        let err = validate_constraint_config(&config).unwrap_err();
        assert_eq!(
            err.validation_messages(),
            ["Attribute is required", "Value is required"]
        );
    }

    #[test]
    fn custom_framework_needs_a_command() {
        let config = DashboardConfig {
            dashboard: Dashboard {
                name: "QC".to_owned(),
                framework: Some("Custom".to_owned()),
                ..Dashboard::default()
            },
            ..DashboardConfig::default()
        };
        let err = validate_dashboard_config(&config).unwrap_err();
        assert!(err.validation_messages().contains(&"Command is required".to_owned()));
    }

    #[test]
    fn git_framework_needs_repo_branch_and_path() {
        let mut config = DashboardConfig {
            dashboard: Dashboard {
                name: "QC".to_owned(),
                framework: Some("Panel".to_owned()),
                git_repo_url: Some("not a url".to_owned()),
                ..Dashboard::default()
            },
            ..DashboardConfig::default()
        };
        config.scopes.insert(
            Scope::DataType,
            AccessScope::only(Scope::DataType, ["xnat:mrSessionData"]),
        );

        let err = validate_dashboard_config(&config).unwrap_err();
        let messages = err.validation_messages();
        assert!(messages.contains(&"Git Repo must be a URL".to_owned()));
        assert!(messages.contains(&"Branch is required".to_owned()));
        assert!(messages.contains(&"Main File Path is required".to_owned()));
        assert!(messages.contains(&"Jupyter Environment is required".to_owned()));
        assert!(!messages.contains(&"At least one data type is required".to_owned()));
    }

    #[test]
    fn profile_image_needs_a_tag() {
        let profile = Profile {
            name: "Default".to_owned(),
            description: Some("desc".to_owned()),
            task_template: TaskTemplate {
                container_spec: ContainerSpec {
                    image: "jupyter/datascience-notebook".to_owned(),
                    ..ContainerSpec::default()
                },
                resources: Resources::default(),
                placement: xhub_api::types::Placement::default(),
            },
            ..Profile::default()
        };
        let err = validate_profile(&profile).unwrap_err();
        assert_eq!(
            err.validation_messages(),
            ["Image must be in the format of image:tag"]
        );
    }

    #[test]
    fn placement_expressions_are_checked() {
        assert!(valid_placement_expression("node.role==worker"));
        assert!(valid_placement_expression("node.labels.type!=gpu"));
        assert!(!valid_placement_expression("node.role=worker"));
        assert!(!valid_placement_expression("node.role=="));
    }
}
