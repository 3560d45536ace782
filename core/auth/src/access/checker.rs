//! In-process evaluation of role specifications.
use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;

use warden_errors::AccessDenied;
use warden_models::RoleConditions;
use warden_models::RoleSpec;
use warden_models::Traits;
use warden_models::Verb;
use warden_models::WILDCARD;

use super::AccessChecker;

/// Prefix of role templates expanded with the principal's traits.
const TRAIT_TEMPLATE_PREFIX: &str = "internal.";

/// [`AccessChecker`] evaluating a set of named [`RoleSpec`]s.
///
/// Access is granted if any of the roles grants it.
#[derive(Clone, Debug)]
pub struct RoleSetChecker {
    default_max_session_ttl: Duration,
    roles: Vec<(String, RoleSpec)>,
}

impl RoleSetChecker {
    /// Session lifetime for roles that do not set a maximum, unless configured otherwise.
    pub const DEFAULT_MAX_SESSION_TTL: Duration = Duration::from_secs(30 * 60 * 60);

    /// Checker for a single role that is already resolved.
    pub fn from_spec<S: Into<String>>(name: S, spec: RoleSpec) -> RoleSetChecker {
        RoleSetChecker {
            default_max_session_ttl: Self::DEFAULT_MAX_SESSION_TTL,
            roles: vec![(name.into(), spec)],
        }
    }

    /// Checker for a set of roles, expanding templates with `traits` when given.
    ///
    /// Without traits templated entries are dropped.
    pub fn from_roles<I>(roles: I, traits: Option<&Traits>) -> RoleSetChecker
    where
        I: IntoIterator<Item = (String, RoleSpec)>,
    {
        let empty = Traits::new();
        let traits = traits.unwrap_or(&empty);
        let roles = roles
            .into_iter()
            .map(|(name, mut spec)| {
                spec.allow.logins = expand_logins(&spec.allow.logins, traits);
                (name, spec)
            })
            .collect();
        RoleSetChecker {
            default_max_session_ttl: Self::DEFAULT_MAX_SESSION_TTL,
            roles,
        }
    }

    /// Use a different session lifetime for roles that do not set a maximum.
    pub fn with_default_session_ttl(mut self, ttl: Duration) -> RoleSetChecker {
        self.default_max_session_ttl = ttl;
        self
    }
}

impl AccessChecker for RoleSetChecker {
    fn adjust_session_ttl(&self, requested: Duration) -> Duration {
        self.roles
            .iter()
            .map(|(_, spec)| {
                spec.options
                    .max_session_ttl
                    .unwrap_or(self.default_max_session_ttl)
            })
            .fold(requested, Duration::min)
    }

    fn check_access(&self, namespace: &str, kind: &str, verb: Verb) -> Result<()> {
        let allowed = self
            .roles
            .iter()
            .any(|(_, spec)| allows(&spec.allow, namespace, kind, verb));
        if allowed {
            return Ok(());
        }
        let reason = format!(
            "access denied to perform action {} on {} in namespace {}",
            verb.as_str(),
            kind,
            namespace
        );
        anyhow::bail!(AccessDenied::new(reason))
    }

    fn check_node_labels(&self, labels: &BTreeMap<String, String>) -> Result<()> {
        let allowed = self
            .roles
            .iter()
            .any(|(_, spec)| selects(&spec.allow.node_labels, labels));
        if allowed {
            return Ok(());
        }
        anyhow::bail!(AccessDenied::new("access to node denied"))
    }

    fn logins(&self) -> Vec<String> {
        let mut logins: Vec<String> = Vec::new();
        for (_, spec) in &self.roles {
            for login in &spec.allow.logins {
                if !logins.contains(login) {
                    logins.push(login.clone());
                }
            }
        }
        logins
    }

    fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|(name, _)| name.clone()).collect()
    }
}

fn allows(conditions: &RoleConditions, namespace: &str, kind: &str, verb: Verb) -> bool {
    let namespace_match = conditions
        .namespaces
        .iter()
        .any(|allowed| allowed == WILDCARD || allowed == namespace);
    if !namespace_match {
        return false;
    }
    [kind, WILDCARD].into_iter().any(|key| {
        conditions
            .rules
            .get(key)
            .map(|verbs| verbs.contains(&verb))
            .unwrap_or(false)
    })
}

fn selects(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
    if selector.is_empty() {
        return false;
    }
    selector.iter().all(|(key, value)| {
        if key == WILDCARD && value == WILDCARD {
            return true;
        }
        match labels.get(key) {
            None => false,
            Some(label) => value == WILDCARD || value == label,
        }
    })
}

/// Expand `{{internal.<trait>}}` login templates with trait values.
fn expand_logins(logins: &[String], traits: &Traits) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for login in logins {
        let values = match trait_template(login) {
            None => vec![login.clone()],
            Some(name) => traits.get(name).cloned().unwrap_or_default(),
        };
        for value in values {
            if !expanded.contains(&value) {
                expanded.push(value);
            }
        }
    }
    expanded
}

/// Name of the trait referenced by a template, if the value is one.
fn trait_template(value: &str) -> Option<&str> {
    let inner = value
        .trim()
        .strip_prefix("{{")?
        .strip_suffix("}}")?
        .trim();
    inner.strip_prefix(TRAIT_TEMPLATE_PREFIX)
}
