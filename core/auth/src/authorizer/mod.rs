//! Resolve request identity claims into [`AuthContext`]s.
use std::sync::Arc;

use anyhow::Context as AnyContext;
use anyhow::Result;

use warden_context::Context;
use warden_errors::AccessDenied;
use warden_errors::BadParameter;
use warden_errors::ErrorKind;
use warden_errors::NotFound;
use warden_models::BuiltinRole;
use warden_models::BuiltinRoleClaim;
use warden_models::IdentityClaim;
use warden_models::LocalUserClaim;
use warden_models::Principal;
use warden_models::PrincipalName;
use warden_models::RemoteUserClaim;

use crate::access::AccessStore;
use crate::access::RoleSetChecker;
use crate::builtin::BuiltinPolicyTable;
use crate::conf::AuthConf;
use crate::identity::IdentityStore;
use crate::identity::TrustStore;
use crate::telemetry;
use crate::AuthContext;


/// Operations implemented by all authorizers.
#[async_trait::async_trait]
pub trait Authorization: Send + Sync {
    /// Resolve the identity claimed in the [`Context`] into an [`AuthContext`].
    ///
    /// Every failure is returned as an error: requests are never authorized with
    /// a default or empty capability in place of a failed lookup.
    async fn authorize(&self, context: &Context) -> Result<AuthContext>;
}

/// Authorize requests based on the identity claim attached to their [`Context`].
///
/// The authorizer holds no per-request state and can be shared freely across
/// request handlers as long as the stores it uses support concurrent access.
#[derive(Clone)]
pub struct Authorizer {
    access: Arc<dyn AccessStore>,
    builtin: Arc<BuiltinPolicyTable>,
    conf: AuthConf,
    identity: Arc<dyn IdentityStore>,
    trust: Arc<dyn TrustStore>,
}

impl Authorizer {
    /// Start building an [`Authorizer`] from its collaborators.
    pub fn builder() -> AuthorizerBuilder {
        AuthorizerBuilder::default()
    }

    /// Resolve the identity claimed in the [`Context`] into an [`AuthContext`].
    ///
    /// See [`Authorization::authorize`].
    pub async fn authorize(&self, context: &Context) -> Result<AuthContext> {
        let claim_kind = context
            .claim
            .as_ref()
            .map(IdentityClaim::kind)
            .unwrap_or("none");
        telemetry::AUTHORIZE_COUNT
            .with_label_values(&[claim_kind])
            .inc();

        let result = self.resolve(context).await;
        match &result {
            Ok(auth) => slog::debug!(
                context.logger,
                "Request authorized";
                "claim" => claim_kind,
                "principal" => auth.principal.name().as_str(),
            ),
            Err(error) => {
                let kind = ErrorKind::of(error);
                telemetry::AUTHORIZE_ERR
                    .with_label_values(&[claim_kind, kind.as_str()])
                    .inc();
                slog::warn!(
                    context.logger,
                    "Request authorization failed";
                    "claim" => claim_kind,
                    "error_kind" => kind.as_str(),
                    replisdk::utils::error::slog::ErrorAttributes::from(error),
                );
            }
        }
        result
    }

    /// Dispatch the claim to the resolution logic for its kind.
    async fn resolve(&self, context: &Context) -> Result<AuthContext> {
        let claim = match &context.claim {
            Some(claim) => claim,
            None => anyhow::bail!(AccessDenied::new("missing authentication context")),
        };
        match claim {
            IdentityClaim::BuiltinRole(claim) => self.authorize_builtin_role(claim),
            IdentityClaim::LocalUser(claim) => self.authorize_local_user(context, claim).await,
            IdentityClaim::RemoteUser(claim) => self.authorize_remote_user(context, claim).await,
        }
    }

    fn authorize_builtin_role(&self, claim: &BuiltinRoleClaim) -> Result<AuthContext> {
        context_for_builtin_role(&self.builtin, &self.conf, &claim.role)
    }

    async fn authorize_local_user(
        &self,
        context: &Context,
        claim: &LocalUserClaim,
    ) -> Result<AuthContext> {
        context_for_local_user(
            context,
            &claim.username,
            self.identity.as_ref(),
            self.access.as_ref(),
        )
        .await
        .map_err(|error| self.conceal(error))
    }

    async fn authorize_remote_user(
        &self,
        context: &Context,
        claim: &RemoteUserClaim,
    ) -> Result<AuthContext> {
        let username = &claim.username;
        let cluster = &claim.cluster_name;

        // Reject identities whose synthetic name would be ambiguous before any lookup.
        let principal_name = PrincipalName::remote(username, cluster);
        if let Err(error) = principal_name {
            let denied = AccessDenied::new(format!(
                "invalid identity for remote user {username} from cluster {cluster}"
            ));
            return Err(error.context(denied));
        }

        let anchor = self
            .trust
            .get_trust_anchor(context, cluster)
            .await
            .with_context(|| format!("unable to look up trust anchor for cluster {cluster}"))
            .map_err(|error| self.conceal(error))?;
        if anchor.cluster_name != *cluster {
            anyhow::bail!(
                "trust store returned the anchor for cluster {} when looking up cluster {}",
                anchor.cluster_name,
                cluster
            );
        }

        let roles = match anchor.map_roles(&claim.remote_roles) {
            Ok(roles) => roles,
            Err(error) => {
                let denied = AccessDenied::new(format!(
                    "failed to map roles for remote user {username} from cluster {cluster}"
                ));
                return Err(error.context(denied));
            }
        };
        if roles.is_empty() {
            anyhow::bail!(AccessDenied::new(format!(
                "no roles mapped for remote user {username} from cluster {cluster}"
            )));
        }

        // Traits belong to local identity records so none are applied to remote users.
        let checker = self
            .access
            .compile_capability(context, &roles, None)
            .await
            .with_context(|| {
                format!("unable to compile roles for remote user {username} from cluster {cluster}")
            })?;
        let principal = Principal::remote(username, cluster, roles)?;
        Ok(AuthContext { checker, principal })
    }

    /// Collapse not found errors into a generic denial when configured to.
    fn conceal(&self, error: anyhow::Error) -> anyhow::Error {
        if self.conf.conceal_not_found && error.is::<NotFound>() {
            return error.context(AccessDenied::generic());
        }
        error
    }
}

#[async_trait::async_trait]
impl Authorization for Authorizer {
    async fn authorize(&self, context: &Context) -> Result<AuthContext> {
        Authorizer::authorize(self, context).await
    }
}

/// Collect the collaborators needed to create an [`Authorizer`].
#[derive(Default)]
pub struct AuthorizerBuilder {
    access: Option<Arc<dyn AccessStore>>,
    conf: AuthConf,
    identity: Option<Arc<dyn IdentityStore>>,
    trust: Option<Arc<dyn TrustStore>>,
}

impl AuthorizerBuilder {
    /// Store to compile role names into capabilities with.
    pub fn access<T>(mut self, access: T) -> Self
    where
        T: AccessStore + 'static,
    {
        self.access = Some(Arc::new(access));
        self
    }

    /// Create the [`Authorizer`], checking all collaborators are set.
    ///
    /// Missing collaborators are reported with a [`BadParameter`] error.
    pub fn build(self) -> Result<Authorizer> {
        let access = self
            .access
            .ok_or_else(|| anyhow::anyhow!(BadParameter::missing("access")))?;
        let identity = self
            .identity
            .ok_or_else(|| anyhow::anyhow!(BadParameter::missing("identity")))?;
        let trust = self
            .trust
            .ok_or_else(|| anyhow::anyhow!(BadParameter::missing("trust")))?;
        let builtin = BuiltinPolicyTable::new()?;
        Ok(Authorizer {
            access,
            builtin: Arc::new(builtin),
            conf: self.conf,
            identity,
            trust,
        })
    }

    /// Configure the authorizer behaviour.
    pub fn conf(mut self, conf: AuthConf) -> Self {
        self.conf = conf;
        self
    }

    /// Store to look local users up in.
    pub fn identity<T>(mut self, identity: T) -> Self
    where
        T: IdentityStore + 'static,
    {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Store to look trust anchors of remote clusters up in.
    pub fn trust<T>(mut self, trust: T) -> Self
    where
        T: TrustStore + 'static,
    {
        self.trust = Some(Arc::new(trust));
        self
    }
}

/// Authorize every request with the same pre-resolved [`AuthContext`].
///
/// Helpful for tests and tools that act as a single identity.
#[derive(Clone, Debug)]
pub struct StaticAuthorizer {
    auth: AuthContext,
}

impl StaticAuthorizer {
    /// Authorize everyone as the given builtin role.
    pub fn builtin(role: BuiltinRole) -> Result<StaticAuthorizer> {
        let table = BuiltinPolicyTable::new()?;
        let auth = context_for_builtin_role(&table, &AuthConf::default(), role.as_str())?;
        Ok(StaticAuthorizer { auth })
    }

    /// Authorize everyone as the given local user, resolved once now.
    pub async fn local_user(
        context: &Context,
        username: &str,
        identity: &dyn IdentityStore,
        access: &dyn AccessStore,
    ) -> Result<StaticAuthorizer> {
        let auth = context_for_local_user(context, username, identity, access).await?;
        Ok(StaticAuthorizer { auth })
    }
}

#[async_trait::async_trait]
impl Authorization for StaticAuthorizer {
    async fn authorize(&self, _: &Context) -> Result<AuthContext> {
        Ok(self.auth.clone())
    }
}

/// Resolve a builtin role identifier using the fixed policy table.
///
/// The access store is not involved so builtin identities keep working when it is degraded.
fn context_for_builtin_role(
    table: &BuiltinPolicyTable,
    conf: &AuthConf,
    role: &str,
) -> Result<AuthContext> {
    let (role, spec) = table.lookup(role)?;
    let checker = RoleSetChecker::from_spec(role.as_str(), spec.clone())
        .with_default_session_ttl(conf.default_max_session_ttl());
    Ok(AuthContext {
        checker: Arc::new(checker),
        principal: Principal::builtin(role),
    })
}

/// Resolve a local user with the identity store and compile their roles.
async fn context_for_local_user(
    context: &Context,
    username: &str,
    identity: &dyn IdentityStore,
    access: &dyn AccessStore,
) -> Result<AuthContext> {
    let principal = identity
        .get_user(context, username)
        .await
        .with_context(|| format!("unable to look up local user {username}"))?;
    if principal.is_synthetic() || principal.name().as_str() != username {
        anyhow::bail!(
            "identity store returned record '{}' when looking up local user {}",
            principal.name(),
            username
        );
    }
    let checker = access
        .compile_capability(context, principal.roles(), Some(principal.traits()))
        .await
        .with_context(|| format!("unable to compile roles for local user {username}"))?;
    Ok(AuthContext { checker, principal })
}
