//! Trust anchors for remote clusters and their role mappings.
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use warden_errors::BadParameter;

use crate::WILDCARD;

/// Trust established with a remote cluster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TrustAnchor {
    /// Name of the remote cluster this anchor trusts.
    pub cluster_name: String,

    /// Translation of remote role names into local role names.
    #[serde(default)]
    pub role_map: RoleMap,
}

impl TrustAnchor {
    /// Translate role names assigned by the remote cluster into local role names.
    ///
    /// See [`RoleMap::map`].
    pub fn map_roles(&self, remote_roles: &[String]) -> Result<Vec<String>> {
        self.role_map.map(remote_roles)
    }
}

/// Ordered list of remote to local role name mappings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMap(pub Vec<RoleMapping>);

/// Map one remote role name, or every role name with `*`, to local role names.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoleMapping {
    pub local: Vec<String>,
    pub remote: String,
}

impl RoleMap {
    /// Check the mapping can be applied.
    ///
    /// An empty map trusts nothing and local role names must be concrete.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            anyhow::bail!(BadParameter::invalid("role_map", "no role mappings defined"));
        }
        for mapping in &self.0 {
            if mapping.local.iter().any(|local| local == WILDCARD) {
                let detail = format!(
                    "remote role '{}' can't map to the wildcard local role",
                    mapping.remote
                );
                anyhow::bail!(BadParameter::invalid("role_map", detail));
            }
        }
        Ok(())
    }

    /// Translate remote role names into local role names.
    ///
    /// Local names are returned de-duplicated in the order they are first produced.
    /// The result is empty when no mapping matches any of the remote roles.
    pub fn map(&self, remote_roles: &[String]) -> Result<Vec<String>> {
        self.validate()?;
        let mut locals: Vec<String> = Vec::new();
        for remote in remote_roles {
            let matches = self
                .0
                .iter()
                .filter(|mapping| mapping.remote == *remote || mapping.remote == WILDCARD);
            for mapping in matches {
                for local in &mapping.local {
                    if !locals.contains(local) {
                        locals.push(local.clone());
                    }
                }
            }
        }
        Ok(locals)
    }
}
