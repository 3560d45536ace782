//! Module to deal with the identity (who is asking) side of authorization.
use anyhow::Result;

use warden_context::Context;
use warden_models::Principal;
use warden_models::TrustAnchor;

/// Persistent records of the users local to this cluster.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up a local user by name.
    ///
    /// Unknown users are reported with a [`NotFound`](warden_errors::NotFound) error.
    async fn get_user(&self, context: &Context, username: &str) -> Result<Principal>;
}

/// Persistent records of the remote clusters this cluster trusts.
#[async_trait::async_trait]
pub trait TrustStore: Send + Sync {
    /// Look up the trust anchor for a remote cluster.
    ///
    /// Clusters that are not trusted are reported with a [`NotFound`](warden_errors::NotFound)
    /// error, never with an anchor that maps nothing.
    async fn get_trust_anchor(&self, context: &Context, cluster_name: &str) -> Result<TrustAnchor>;
}
