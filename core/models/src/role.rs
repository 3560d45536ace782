//! Declarative role specifications.
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Token matching any namespace, resource kind or label.
pub const WILDCARD: &str = "*";

/// Operations a rule can allow on a resource kind.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Read-equivalent operations (get, list).
    Read,

    /// Write-equivalent operations (create, update, delete).
    Write,
}

impl Verb {
    /// Verbs granting read-only access.
    pub fn ro() -> BTreeSet<Verb> {
        BTreeSet::from([Verb::Read])
    }

    /// Verbs granting read and write access.
    pub fn rw() -> BTreeSet<Verb> {
        BTreeSet::from([Verb::Read, Verb::Write])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Read => "read",
            Verb::Write => "write",
        }
    }
}

/// Declarative permission unit assigned to principals by name.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Conditions granting access.
    #[serde(default)]
    pub allow: RoleConditions,

    #[serde(default)]
    pub options: RoleOptions,
}

/// Conditions under which a role grants access.
///
/// The default value grants nothing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoleConditions {
    /// Interactive logins allowed on target nodes.
    ///
    /// Entries of the form `{{internal.<trait>}}` expand to the principal's trait values.
    #[serde(default)]
    pub logins: Vec<String>,

    /// Namespaces the rules apply to.
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Label selector for compute nodes the principal may target.
    ///
    /// An empty selector allows no nodes.
    #[serde(default)]
    pub node_labels: BTreeMap<String, String>,

    /// Allowed verbs by resource kind.
    #[serde(default)]
    pub rules: BTreeMap<String, BTreeSet<Verb>>,
}

/// Auxiliary constraints of a role.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoleOptions {
    /// Maximum lifetime of sessions established with this role.
    ///
    /// When unset the checker applies its configured default.
    #[serde(default)]
    pub max_session_ttl: Option<Duration>,
}

impl RoleOptions {
    /// Session lifetime that is effectively unlimited.
    pub const MAX_SESSION_TTL: Duration = Duration::MAX;
}
