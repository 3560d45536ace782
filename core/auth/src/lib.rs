//! Authorization core: resolve the identity claimed by a request into an [`AuthContext`].
//!
//! An [`AuthContext`] pairs the resolved [`Principal`] with a [`Capability`] describing
//! exactly what the principal may do.
//! Every privileged operation is expected to obtain one before proceeding.
//!
//! Claims are resolved differently depending on who is asking:
//!
//! - Local users are looked up in the [`IdentityStore`] and their roles compiled by the
//!   [`AccessStore`], with the user's traits expanding role templates.
//! - Remote users have their roles translated through the [`TrustAnchor`] of their
//!   cluster, from the [`TrustStore`], before the mapped local roles are compiled.
//!   They are given a synthetic principal that can't match a local user.
//! - Builtin roles are machine identities with permissions fixed by the
//!   [`BuiltinPolicyTable`] and resolved without calling any store.
//!
//! Anything else, including requests with no claim at all, is denied.
//!
//! [`TrustAnchor`]: warden_models::TrustAnchor
use warden_models::Principal;

pub mod access;
pub mod authorizer;
pub mod builtin;
pub mod conf;
pub mod identity;
pub mod telemetry;

#[cfg(any(test, feature = "test-fixture"))]
mod fixture;
#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::AccessStoreFixture;
#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::IdentityStoreFixture;
#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::TrustStoreFixture;

pub use self::access::AccessChecker;
pub use self::access::AccessStore;
pub use self::access::Capability;
pub use self::access::RoleSetChecker;
pub use self::authorizer::Authorization;
pub use self::authorizer::Authorizer;
pub use self::authorizer::AuthorizerBuilder;
pub use self::authorizer::StaticAuthorizer;
pub use self::builtin::BuiltinPolicyTable;
pub use self::conf::AuthConf;
pub use self::identity::IdentityStore;
pub use self::identity::TrustStore;

/// Result of authorizing a request: who is asking and what they are allowed to do.
///
/// Built fresh for every request and never cached by the authorization core.
#[derive(Clone, Debug)]
pub struct AuthContext {
    /// Capability to check the principal's access with.
    pub checker: Capability,

    /// The resolved identity, either an identity store record or a synthetic principal.
    pub principal: Principal,
}
