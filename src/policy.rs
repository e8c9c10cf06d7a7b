//! Security policy: which principals are granted which permissions.
//!
//! Policies are JSON documents:
//!
//! ```json
//! { "grants": [
//!     { "principal": { "type": "role", "name": "Authenticated" },
//!       "permissions": [ { "kind": "page", "target": "*:*", "actions": "modify,rename" } ] }
//! ] }
//! ```
//!
//! A decision aggregates the grants of every principal the caller holds into a
//! sealed [`AllPermissionCollection`] and asks it whether the requested permission
//! is implied.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collection::AllPermissionCollection;
use crate::error::{PermissionError, Result};
use crate::permission::Permission;
use crate::principal::{Principal, SubjectContext};

const BUILTIN_POLICY: &str = include_str!("../policy/default.json");

/// Permissions granted to one principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub principal: Principal,
    pub permissions: Vec<Permission>,
}

/// Outcome of one authorization check, handed to a [`DecisionObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub principals: Vec<Principal>,
    pub permission: Permission,
    pub allowed: bool,
}

/// Receives every decision made through [`SecurityPolicy::check`]
pub trait DecisionObserver: Send + Sync {
    fn on_decision(&self, decision: &Decision);
}

impl<F> DecisionObserver for F
where
    F: Fn(&Decision) + Send + Sync,
{
    fn on_decision(&self, decision: &Decision) {
        self(decision)
    }
}

/// A set of grants, loaded from configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SecurityPolicy {
    grants: Vec<Grant>,
    #[serde(skip)]
    observer: Option<Arc<dyn DecisionObserver>>,
}

impl SecurityPolicy {
    pub fn new(grants: Vec<Grant>) -> Self {
        Self { grants, observer: None }
    }

    /// The stock policy shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_POLICY)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let policy = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), grants = policy.grants.len(), "security policy loaded");
        Ok(policy)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Attach an observer notified after every [`check`](Self::check)
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    fn validate(&self) -> Result<()> {
        match self.grants.iter().find(|g| g.permissions.is_empty()) {
            Some(g) => Err(PermissionError::Policy(format!("grant for {} has no permissions", g.principal))),
            None => Ok(()),
        }
    }

    /// Every permission granted directly to `principal`
    pub fn permissions_of<'a>(&'a self, principal: &'a Principal) -> impl Iterator<Item = &'a Permission> + 'a {
        self.grants
            .iter()
            .filter(move |g| &g.principal == principal)
            .flat_map(|g| g.permissions.iter())
    }

    /// Aggregate the grants of every principal `subject` holds into a sealed collection
    pub fn permissions_for(&self, subject: &SubjectContext) -> AllPermissionCollection {
        AllPermissionCollection::sealed_from(
            self.grants
                .iter()
                .filter(|g| subject.holds(&g.principal))
                .flat_map(|g| g.permissions.iter().cloned()),
        )
    }

    /// Is `subject` allowed `permission` under this policy
    pub fn check(&self, subject: &SubjectContext, permission: &Permission) -> bool {
        let allowed = self.permissions_for(subject).implies(permission, Some(subject));
        debug!(
            principals = ?subject.sorted(),
            permission = %permission,
            allowed,
            "authorization decision"
        );
        if let Some(observer) = &self.observer {
            observer.on_decision(&Decision {
                principals: subject.sorted().into_iter().cloned().collect(),
                permission: permission.clone(),
                allowed,
            });
        }
        allowed
    }
}

impl fmt::Debug for SecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityPolicy")
            .field("grants", &self.grants)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
