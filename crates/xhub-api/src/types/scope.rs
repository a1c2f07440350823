use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Dimension along which a configuration's availability is restricted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Scope {
    Site,
    Project,
    User,
    DataType,
}

/// Enablement of a configuration along one [`Scope`] dimension.
///
/// `enabled == true` admits every id; otherwise only the ids in the
/// allow-list are admitted. A `BTreeSet` keeps serialization stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessScope {
    pub scope: Scope,
    pub enabled: bool,
    #[serde(default)]
    pub ids: BTreeSet<String>,
}

/// Scope dimension to access rule, as the server serializes it.
pub type ScopeMap = BTreeMap<Scope, AccessScope>;

impl AccessScope {
    /// An all-admitting rule for the given dimension.
    pub fn all(scope: Scope) -> Self {
        Self {
            scope,
            enabled: true,
            ids: BTreeSet::new(),
        }
    }

    /// A rule admitting only the given ids.
    pub fn only<I, S>(scope: Scope, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope,
            enabled: false,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this rule admits `id`.
    pub fn admits(&self, id: &str) -> bool {
        self.enabled || self.ids.contains(id)
    }
}

/// Whether `scopes` admits the given execution context: every dimension
/// present in the rule map must admit the context's id for it. Dimensions
/// absent from the rules are unconstrained.
pub fn admits_execution(scopes: &ScopeMap, execution: &BTreeMap<Scope, String>) -> bool {
    scopes.iter().all(|(dimension, rule)| {
        execution
            .get(dimension)
            .map_or(rule.enabled, |id| rule.admits(id))
    })
}
