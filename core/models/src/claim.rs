//! Identity claims asserted by the transport layer for a request.
use serde::Deserialize;
use serde::Serialize;

/// Caller-asserted identity attached to a request before authorization.
///
/// The enum is deliberately exhaustive: adding a claim kind must fail to compile
/// wherever claims are dispatched until the new kind is handled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityClaim {
    /// A user registered with the identity store of this cluster.
    LocalUser(LocalUserClaim),

    /// A user authenticated by a trusted remote cluster.
    RemoteUser(RemoteUserClaim),

    /// One of the fixed service identities of the system.
    BuiltinRole(BuiltinRoleClaim),
}

impl IdentityClaim {
    /// Claim the identity of a builtin role.
    pub fn builtin<S: Into<String>>(role: S) -> Self {
        IdentityClaim::BuiltinRole(BuiltinRoleClaim { role: role.into() })
    }

    /// Claim the identity of a local user.
    pub fn local<S: Into<String>>(username: S) -> Self {
        IdentityClaim::LocalUser(LocalUserClaim {
            username: username.into(),
        })
    }

    /// Claim the identity of a user from a remote cluster.
    pub fn remote<S1, S2, I>(username: S1, cluster_name: S2, roles: I) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        IdentityClaim::RemoteUser(RemoteUserClaim {
            cluster_name: cluster_name.into(),
            remote_roles: roles.into_iter().map(Into::into).collect(),
            username: username.into(),
        })
    }

    /// Short label of the claim variant for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityClaim::LocalUser(_) => "local",
            IdentityClaim::RemoteUser(_) => "remote",
            IdentityClaim::BuiltinRole(_) => "builtin",
        }
    }
}

/// Claim for a builtin service identity.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BuiltinRoleClaim {
    /// Identifier of the builtin role, checked against the builtin policy table.
    pub role: String,
}

/// Claim for a user of the local identity store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LocalUserClaim {
    pub username: String,
}

/// Claim for a user authenticated by a trusted remote cluster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RemoteUserClaim {
    /// Name of the cluster that authenticated the user.
    pub cluster_name: String,

    /// Role names assigned to the user by the remote cluster, in the order presented.
    pub remote_roles: Vec<String>,

    pub username: String,
}
