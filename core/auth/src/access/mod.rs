//! Module to deal with the access checking (what can be done) side of authorization.
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use warden_context::Context;
use warden_models::Traits;
use warden_models::Verb;

mod checker;

#[cfg(test)]
mod test;

pub use self::checker::RoleSetChecker;

/// Compiled, read-only permissions of a principal.
pub type Capability = Arc<dyn AccessChecker>;

/// Query the permissions compiled from one or more role specifications.
///
/// Checkers are never mutated after construction and can be shared across threads.
pub trait AccessChecker: std::fmt::Debug + Send + Sync {
    /// Adjust a requested session lifetime down to the most restrictive role limit.
    fn adjust_session_ttl(&self, requested: Duration) -> Duration;

    /// Check the principal may perform `verb` on resources of `kind` in `namespace`.
    ///
    /// Returns an [`AccessDenied`](warden_errors::AccessDenied) error if it can't.
    fn check_access(&self, namespace: &str, kind: &str, verb: Verb) -> Result<()>;

    /// Check the principal may target a compute node with the given labels.
    ///
    /// Returns an [`AccessDenied`](warden_errors::AccessDenied) error if it can't.
    fn check_node_labels(&self, labels: &BTreeMap<String, String>) -> Result<()>;

    /// Interactive logins the principal may use on target nodes.
    fn logins(&self) -> Vec<String>;

    /// Names of the roles the capability was compiled from.
    fn role_names(&self) -> Vec<String>;
}

/// Compile named role specifications into a [`Capability`].
#[async_trait::async_trait]
pub trait AccessStore: Send + Sync {
    /// Look up the named roles and compile them into a [`Capability`].
    ///
    /// [`AccessStore`] implementations must respect the following expectations:
    ///
    /// - An empty list of role names compiles into a capability that allows nothing.
    /// - When `traits` are given they expand role templates, such as login lists.
    /// - Missing roles or compilation failures are returned as errors.
    async fn compile_capability(
        &self,
        context: &Context,
        role_names: &[String],
        traits: Option<&Traits>,
    ) -> Result<Capability>;
}
