//! Resolved identities requests are authorized against.
//!
//! Principal names come in three forms:
//!
//! - Local: the name of a record in the identity store.
//! - Builtin: `builtin:<role identifier>`.
//! - Remote: `remote:<username>:<source cluster name>`.
//!
//! The synthetic forms use prefixes local names are not allowed to start with,
//! so remote and machine identities can never be mistaken for a local user.
//! [`PrincipalName`] constructors are the only way to build names.
use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use serde::Serialize;

use warden_errors::BadParameter;

use crate::BuiltinRole;

/// Trait name to trait values of a principal, used to expand role templates.
pub type Traits = BTreeMap<String, Vec<String>>;

/// Name of a [`Principal`], guaranteed not to collide across local and synthetic identities.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PrincipalName(String);

impl PrincipalName {
    /// Prefix reserved for builtin role principals.
    pub const BUILTIN_PREFIX: &'static str = "builtin:";

    /// Prefix reserved for remote user principals.
    pub const REMOTE_PREFIX: &'static str = "remote:";

    /// Name of the synthetic principal for a builtin role.
    pub fn builtin(role: BuiltinRole) -> Self {
        PrincipalName(format!("{}{}", Self::BUILTIN_PREFIX, role.as_str()))
    }

    /// Name of a local identity store record.
    ///
    /// Names that are empty or start with a reserved prefix are rejected.
    pub fn local(username: &str) -> Result<Self> {
        if username.is_empty() {
            anyhow::bail!(BadParameter::invalid("username", "local usernames can't be empty"));
        }
        let reserved = [Self::BUILTIN_PREFIX, Self::REMOTE_PREFIX]
            .into_iter()
            .find(|prefix| username.starts_with(*prefix));
        if let Some(prefix) = reserved {
            let detail = format!("local usernames can't start with reserved prefix '{prefix}'");
            anyhow::bail!(BadParameter::invalid("username", detail));
        }
        Ok(PrincipalName(username.to_string()))
    }

    /// Separator between the parts of synthetic names.
    pub const SEPARATOR: char = ':';

    /// Name of the synthetic principal for a user of a remote cluster.
    ///
    /// Empty parts and parts containing the separator are rejected so that
    /// distinct remote identities never share a name.
    pub fn remote(username: &str, cluster_name: &str) -> Result<Self> {
        for (parameter, value) in [("username", username), ("cluster_name", cluster_name)] {
            if value.is_empty() {
                let detail = "remote identities can't have empty parts";
                anyhow::bail!(BadParameter::invalid(parameter, detail));
            }
            if value.contains(Self::SEPARATOR) {
                let detail = format!("remote identities can't contain '{}'", Self::SEPARATOR);
                anyhow::bail!(BadParameter::invalid(parameter, detail));
            }
        }
        Ok(PrincipalName(format!(
            "{}{}{}{}",
            Self::REMOTE_PREFIX,
            username,
            Self::SEPARATOR,
            cluster_name
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PrincipalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the identity of a [`Principal`] comes from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrincipalOrigin {
    /// A fixed service identity.
    Builtin { role: BuiltinRole },

    /// A record of the local identity store.
    Local,

    /// A user of a trusted remote cluster. Never persisted.
    Remote {
        cluster_name: String,
        username: String,
    },
}

/// The resolved identity the rest of the system authorizes against.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Principal {
    name: PrincipalName,
    origin: PrincipalOrigin,
    roles: Vec<String>,
    traits: Traits,
}

impl Principal {
    /// Synthetic principal for a builtin role.
    pub fn builtin(role: BuiltinRole) -> Principal {
        Principal {
            name: PrincipalName::builtin(role),
            origin: PrincipalOrigin::Builtin { role },
            roles: vec![role.as_str().to_string()],
            traits: Traits::new(),
        }
    }

    /// Principal for a record of the local identity store.
    ///
    /// Role names are de-duplicated preserving the order of first appearance.
    pub fn local<I>(username: &str, roles: I, traits: Traits) -> Result<Principal>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = PrincipalName::local(username)?;
        Ok(Principal {
            name,
            origin: PrincipalOrigin::Local,
            roles: dedup_ordered(roles),
            traits,
        })
    }

    /// Synthetic principal for a user of a remote cluster holding the mapped local roles.
    ///
    /// See [`PrincipalName::remote`] for the names that are rejected.
    pub fn remote<I>(username: &str, cluster_name: &str, roles: I) -> Result<Principal>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = PrincipalName::remote(username, cluster_name)?;
        Ok(Principal {
            name,
            origin: PrincipalOrigin::Remote {
                cluster_name: cluster_name.to_string(),
                username: username.to_string(),
            },
            roles: dedup_ordered(roles),
            traits: Traits::new(),
        })
    }

    /// True for principals that do not correspond to an identity store record.
    pub fn is_synthetic(&self) -> bool {
        !matches!(self.origin, PrincipalOrigin::Local)
    }

    pub fn name(&self) -> &PrincipalName {
        &self.name
    }

    pub fn origin(&self) -> &PrincipalOrigin {
        &self.origin
    }

    /// Role names assigned to the principal.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }
}

fn dedup_ordered<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut result: Vec<String> = Vec::new();
    for item in items {
        let item = item.into();
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use warden_errors::BadParameter;

    use super::Principal;
    use super::PrincipalName;
    use super::Traits;
    use crate::BuiltinRole;

    #[test]
    fn builtin_name() {
        let principal = Principal::builtin(BuiltinRole::Node);
        assert_eq!(principal.name().as_str(), "builtin:node");
        assert_eq!(principal.roles(), ["node"]);
        assert!(principal.is_synthetic());
    }

    #[test]
    fn remote_name() {
        let principal = Principal::remote("alice", "cluster-b", ["local-viewer"]).unwrap();
        assert_eq!(principal.name().as_str(), "remote:alice:cluster-b");
        assert!(principal.is_synthetic());
        assert!(principal.traits().is_empty());
    }

    #[test]
    fn local_roles_are_deduplicated() {
        let principal =
            Principal::local("alice", ["dev", "ops", "dev"], Traits::new()).unwrap();
        assert_eq!(principal.name().as_str(), "alice");
        assert_eq!(principal.roles(), ["dev", "ops"]);
        assert!(!principal.is_synthetic());
    }

    #[test]
    fn local_names_cannot_use_reserved_prefixes() {
        for name in ["builtin:admin", "remote:alice:cluster-b", ""] {
            let error = PrincipalName::local(name).unwrap_err();
            assert!(error.is::<BadParameter>(), "{name} should be rejected");
        }
    }

    #[test]
    fn remote_never_matches_local() {
        let local = Principal::local("alice", ["dev"], Traits::new()).unwrap();
        let remote = Principal::remote("alice", "cluster-b", ["dev"]).unwrap();
        assert_ne!(local.name(), remote.name());
    }

    #[test]
    fn remote_names_reject_separator() {
        let cases = [("alice", "b:c"), ("alice:b", "c"), ("", "c"), ("alice", "")];
        for (username, cluster) in cases {
            let error = PrincipalName::remote(username, cluster).unwrap_err();
            assert!(error.is::<BadParameter>(), "{username}@{cluster} should be rejected");
        }
    }
}
