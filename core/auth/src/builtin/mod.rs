//! Fixed permissions of the builtin machine identities.
//!
//! The table is data: each [`BuiltinRole`] has exactly one entry with a minimal grant
//! for the service it represents. Tables are checked for completeness when built
//! so an identity added to [`BuiltinRole`] without a grant is a startup error.
use std::collections::BTreeMap;
use std::collections::HashMap;

use anyhow::Result;

use warden_errors::BadParameter;
use warden_errors::NotFound;
use warden_models::kind::*;
use warden_models::BuiltinRole;
use warden_models::RoleConditions;
use warden_models::RoleOptions;
use warden_models::RoleSpec;
use warden_models::Verb;
use warden_models::WILDCARD;


/// Access granted on a resource kind.
#[derive(Clone, Copy, Debug)]
enum Grant {
    Read,
    ReadWrite,
}

/// Static description of the grant for one builtin role.
struct BuiltinEntry {
    namespaces: &'static [&'static str],
    node_labels: &'static [(&'static str, &'static str)],
    role: BuiltinRole,
    rules: &'static [(&'static str, Grant)],
    unlimited_session: bool,
}

const ANY_NAMESPACE: &[&str] = &[WILDCARD];

const ENTRIES: &[BuiltinEntry] = &[
    BuiltinEntry {
        namespaces: ANY_NAMESPACE,
        node_labels: &[],
        role: BuiltinRole::Auth,
        rules: &[(KIND_AUTH_SERVER, Grant::ReadWrite)],
        unlimited_session: false,
    },
    BuiltinEntry {
        namespaces: &[],
        node_labels: &[],
        role: BuiltinRole::ProvisionToken,
        rules: &[],
        unlimited_session: false,
    },
    BuiltinEntry {
        namespaces: ANY_NAMESPACE,
        node_labels: &[],
        role: BuiltinRole::Node,
        rules: &[
            (KIND_NODE, Grant::ReadWrite),
            (KIND_SESSION, Grant::ReadWrite),
            (KIND_EVENT, Grant::ReadWrite),
            (KIND_PROXY, Grant::Read),
            (KIND_CERT_AUTHORITY, Grant::Read),
            (KIND_USER, Grant::Read),
            (KIND_NAMESPACE, Grant::Read),
            (KIND_ROLE, Grant::Read),
            (KIND_AUTH_SERVER, Grant::Read),
            (KIND_REVERSE_TUNNEL, Grant::Read),
        ],
        unlimited_session: false,
    },
    BuiltinEntry {
        namespaces: ANY_NAMESPACE,
        node_labels: &[],
        role: BuiltinRole::Proxy,
        rules: &[
            (KIND_PROXY, Grant::ReadWrite),
            (KIND_OIDC_REQUEST, Grant::ReadWrite),
            (KIND_SESSION, Grant::ReadWrite),
            (KIND_EVENT, Grant::ReadWrite),
            (KIND_SAML_REQUEST, Grant::ReadWrite),
            (KIND_OIDC, Grant::Read),
            (KIND_SAML, Grant::Read),
            (KIND_NAMESPACE, Grant::Read),
            (KIND_NODE, Grant::Read),
            (KIND_AUTH_SERVER, Grant::Read),
            (KIND_REVERSE_TUNNEL, Grant::Read),
            (KIND_CERT_AUTHORITY, Grant::Read),
            (KIND_USER, Grant::Read),
            (KIND_ROLE, Grant::Read),
            (KIND_CLUSTER_AUTH_PREFERENCE, Grant::Read),
            (KIND_CLUSTER_NAME, Grant::Read),
            (KIND_STATIC_TOKENS, Grant::Read),
        ],
        unlimited_session: false,
    },
    BuiltinEntry {
        namespaces: ANY_NAMESPACE,
        node_labels: &[],
        role: BuiltinRole::Web,
        rules: &[
            (KIND_WEB_SESSION, Grant::ReadWrite),
            (KIND_SESSION, Grant::ReadWrite),
            (KIND_AUTH_SERVER, Grant::Read),
            (KIND_USER, Grant::Read),
            (KIND_ROLE, Grant::Read),
            (KIND_NAMESPACE, Grant::Read),
            (KIND_TRUSTED_CLUSTER, Grant::Read),
        ],
        unlimited_session: false,
    },
    BuiltinEntry {
        namespaces: ANY_NAMESPACE,
        node_labels: &[],
        role: BuiltinRole::Signup,
        rules: &[
            (KIND_AUTH_SERVER, Grant::Read),
            (KIND_CLUSTER_AUTH_PREFERENCE, Grant::Read),
        ],
        unlimited_session: false,
    },
    BuiltinEntry {
        namespaces: ANY_NAMESPACE,
        node_labels: &[(WILDCARD, WILDCARD)],
        role: BuiltinRole::Admin,
        rules: &[(WILDCARD, Grant::ReadWrite)],
        unlimited_session: true,
    },
    BuiltinEntry {
        namespaces: &[],
        node_labels: &[],
        role: BuiltinRole::Nop,
        rules: &[],
        unlimited_session: false,
    },
];

impl BuiltinEntry {
    fn spec(&self) -> RoleSpec {
        let rules = self
            .rules
            .iter()
            .map(|(kind, grant)| {
                let verbs = match grant {
                    Grant::Read => Verb::ro(),
                    Grant::ReadWrite => Verb::rw(),
                };
                (kind.to_string(), verbs)
            })
            .collect();
        let node_labels: BTreeMap<String, String> = self
            .node_labels
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let max_session_ttl = if self.unlimited_session {
            Some(RoleOptions::MAX_SESSION_TTL)
        } else {
            None
        };
        RoleSpec {
            allow: RoleConditions {
                logins: Vec::new(),
                namespaces: self.namespaces.iter().map(|ns| ns.to_string()).collect(),
                node_labels,
                rules,
            },
            options: RoleOptions { max_session_ttl },
        }
    }
}

/// Role specifications of every [`BuiltinRole`].
///
/// Built once at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct BuiltinPolicyTable {
    specs: HashMap<BuiltinRole, RoleSpec>,
}

impl BuiltinPolicyTable {
    /// Build the table of builtin role specifications.
    pub fn new() -> Result<BuiltinPolicyTable> {
        Self::from_entries(ENTRIES)
    }

    fn from_entries(entries: &[BuiltinEntry]) -> Result<BuiltinPolicyTable> {
        let mut specs = HashMap::new();
        for entry in entries {
            if specs.insert(entry.role, entry.spec()).is_some() {
                let detail = format!("builtin role {} is defined more than once", entry.role);
                anyhow::bail!(BadParameter::invalid("builtin policy table", detail));
            }
        }
        let missing: Vec<&str> = BuiltinRole::ALL
            .iter()
            .filter(|role| !specs.contains_key(*role))
            .map(BuiltinRole::as_str)
            .collect();
        if !missing.is_empty() {
            let detail = format!("no policy for builtin roles: {}", missing.join(", "));
            anyhow::bail!(BadParameter::invalid("builtin policy table", detail));
        }
        Ok(BuiltinPolicyTable { specs })
    }

    /// Resolve a builtin role identifier and return its specification.
    ///
    /// Unrecognised identifiers are reported with a [`NotFound`] error.
    pub fn lookup(&self, identifier: &str) -> Result<(BuiltinRole, &RoleSpec)> {
        let role: BuiltinRole = identifier.parse()?;
        let spec = self.spec(role)?;
        Ok((role, spec))
    }

    /// Specification of a builtin role.
    pub fn spec(&self, role: BuiltinRole) -> Result<&RoleSpec> {
        self.specs
            .get(&role)
            .ok_or_else(|| anyhow::anyhow!(NotFound::new("builtin role", role.as_str())))
    }
}
