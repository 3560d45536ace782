//! Identifiers of the fixed machine identities internal to the system.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use warden_errors::NotFound;

/// Service identities with permissions fixed in code rather than looked up in a store.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum BuiltinRole {
    #[serde(rename = "auth-server")]
    Auth,
    #[serde(rename = "provision-token")]
    ProvisionToken,
    #[serde(rename = "node")]
    Node,
    #[serde(rename = "proxy")]
    Proxy,
    #[serde(rename = "web")]
    Web,
    #[serde(rename = "signup")]
    Signup,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "nop")]
    Nop,
}

impl BuiltinRole {
    /// Every builtin role known to the system.
    pub const ALL: [BuiltinRole; 8] = [
        BuiltinRole::Auth,
        BuiltinRole::ProvisionToken,
        BuiltinRole::Node,
        BuiltinRole::Proxy,
        BuiltinRole::Web,
        BuiltinRole::Signup,
        BuiltinRole::Admin,
        BuiltinRole::Nop,
    ];

    /// Identifier of the role as carried by claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinRole::Auth => "auth-server",
            BuiltinRole::ProvisionToken => "provision-token",
            BuiltinRole::Node => "node",
            BuiltinRole::Proxy => "proxy",
            BuiltinRole::Web => "web",
            BuiltinRole::Signup => "signup",
            BuiltinRole::Admin => "admin",
            BuiltinRole::Nop => "nop",
        }
    }
}

impl fmt::Display for BuiltinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinRole {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BuiltinRole::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!(NotFound::new("builtin role", value)))
    }
}
