//! Inefficient in-memory collaborators for unit tests.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::Result;

use warden_context::Context;
use warden_errors::NotFound;
use warden_models::Principal;
use warden_models::RoleSpec;
use warden_models::Traits;
use warden_models::TrustAnchor;

use crate::access::AccessStore;
use crate::access::Capability;
use crate::access::RoleSetChecker;
use crate::identity::IdentityStore;
use crate::identity::TrustStore;

/// Shared in-memory state with a switch to simulate backend outages.
struct FixtureState<T> {
    calls: usize,
    records: HashMap<String, T>,
    unavailable: bool,
}

impl<T> Default for FixtureState<T> {
    fn default() -> Self {
        FixtureState {
            calls: 0,
            records: HashMap::new(),
            unavailable: false,
        }
    }
}

/// Clonable handle to [`FixtureState`] shared by a fixture and its clones.
struct Shared<T> {
    inner: Arc<Mutex<FixtureState<T>>>,
}

impl<T> Shared<T> {
    /// Lock and access the shared inner state.
    fn access(&self) -> MutexGuard<'_, FixtureState<T>> {
        self.inner.lock().expect("fixture state lock poisoned")
    }

    /// Record a call and fail it if the backend is marked as unavailable.
    fn call(&self, backend: &str) -> Result<MutexGuard<'_, FixtureState<T>>> {
        let mut state = self.access();
        state.calls += 1;
        if state.unavailable {
            anyhow::bail!("{backend} is unavailable");
        }
        Ok(state)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Shared {
            inner: Arc::new(Mutex::new(FixtureState::default())),
        }
    }
}

/// In-memory implementation of an [`AccessStore`] for unit tests.
///
/// Roles are compiled into [`RoleSetChecker`]s.
#[derive(Clone, Default)]
pub struct AccessStoreFixture {
    shared: Shared<RoleSpec>,
}

impl AccessStoreFixture {
    /// Number of capabilities requested so far.
    pub fn calls(&self) -> usize {
        self.shared.access().calls
    }

    /// Store a role specification, replacing any role with the same name.
    pub fn insert_role<S: Into<String>>(&self, name: S, spec: RoleSpec) {
        self.shared.access().records.insert(name.into(), spec);
    }

    /// Make all following calls fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.access().unavailable = unavailable;
    }
}

#[async_trait::async_trait]
impl AccessStore for AccessStoreFixture {
    async fn compile_capability(
        &self,
        _: &Context,
        role_names: &[String],
        traits: Option<&Traits>,
    ) -> Result<Capability> {
        let state = self.shared.call("access store")?;
        let mut roles = Vec::with_capacity(role_names.len());
        for name in role_names {
            let spec = state
                .records
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!(NotFound::new("role", name.as_str())))?;
            roles.push((name.clone(), spec));
        }
        let checker = RoleSetChecker::from_roles(roles, traits);
        Ok(Arc::new(checker))
    }
}

/// In-memory implementation of an [`IdentityStore`] for unit tests.
#[derive(Clone, Default)]
pub struct IdentityStoreFixture {
    shared: Shared<Principal>,
}

impl IdentityStoreFixture {
    /// Number of user lookups so far.
    pub fn calls(&self) -> usize {
        self.shared.access().calls
    }

    /// Store a local user, replacing any user with the same name.
    pub fn insert_user(&self, user: Principal) {
        let name = user.name().to_string();
        self.shared.access().records.insert(name, user);
    }

    /// Make all following calls fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.access().unavailable = unavailable;
    }
}

#[async_trait::async_trait]
impl IdentityStore for IdentityStoreFixture {
    async fn get_user(&self, _: &Context, username: &str) -> Result<Principal> {
        let state = self.shared.call("identity store")?;
        state
            .records
            .get(username)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!(NotFound::new("user", username)))
    }
}

/// In-memory implementation of a [`TrustStore`] for unit tests.
#[derive(Clone, Default)]
pub struct TrustStoreFixture {
    shared: Shared<TrustAnchor>,
}

impl TrustStoreFixture {
    /// Number of trust anchor lookups so far.
    pub fn calls(&self) -> usize {
        self.shared.access().calls
    }

    /// Store a trust anchor, replacing any anchor for the same cluster.
    pub fn insert_anchor(&self, anchor: TrustAnchor) {
        let name = anchor.cluster_name.clone();
        self.shared.access().records.insert(name, anchor);
    }

    /// Make all following calls fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.access().unavailable = unavailable;
    }
}

#[async_trait::async_trait]
impl TrustStore for TrustStoreFixture {
    async fn get_trust_anchor(&self, _: &Context, cluster_name: &str) -> Result<TrustAnchor> {
        let state = self.shared.call("trust store")?;
        state
            .records
            .get(cluster_name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!(NotFound::new("trusted cluster", cluster_name)))
    }
}
