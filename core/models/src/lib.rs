//! Data model shared by the Warden authorization core and its collaborators.
//!
//! - [`IdentityClaim`]s are asserted by the transport layer for each request.
//! - [`Principal`]s are the resolved identities requests are authorized against.
//! - [`RoleSpec`]s declare what a role is allowed to do.
//! - [`TrustAnchor`]s translate role names of remote clusters into local role names.
pub mod builtin;
pub mod claim;
pub mod kind;
pub mod principal;
pub mod role;
pub mod trust;

pub use self::builtin::BuiltinRole;
pub use self::claim::BuiltinRoleClaim;
pub use self::claim::IdentityClaim;
pub use self::claim::LocalUserClaim;
pub use self::claim::RemoteUserClaim;
pub use self::principal::Principal;
pub use self::principal::PrincipalName;
pub use self::principal::PrincipalOrigin;
pub use self::principal::Traits;
pub use self::role::RoleConditions;
pub use self::role::RoleOptions;
pub use self::role::RoleSpec;
pub use self::role::Verb;
pub use self::role::WILDCARD;
pub use self::trust::RoleMap;
pub use self::trust::RoleMapping;
pub use self::trust::TrustAnchor;
