//! Heterogeneous, deduplicating permission collection.
//!
//! Built once (typically when a session's principals are resolved), optionally
//! sealed, then queried for every protected operation. Mutation and queries are
//! serialized through one `RwLock`; sealing is one-way.

use std::collections::HashSet;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::error::{PermissionError, Result};
use crate::permission::Permission;
use crate::principal::SubjectContext;

#[derive(Default)]
struct Inner {
    members: HashSet<Permission>,
    sealed: bool,
}

/// A set of permissions of any kind, answering "does any member imply P"
#[derive(Default)]
pub struct AllPermissionCollection {
    inner: RwLock<Inner>,
}

impl AllPermissionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Build an already-sealed collection from `permissions`, dropping duplicates
    pub fn sealed_from<I: IntoIterator<Item = Permission>>(permissions: I) -> Self {
        let members: HashSet<Permission> = permissions.into_iter().collect();
        debug!(members = members.len(), "permission collection sealed");
        Self { inner: RwLock::new(Inner { members, sealed: true }) }
    }

    /// Add a permission. Returns `Ok(false)` if an equal permission is already present.
    /// Fails with [`PermissionError::CollectionSealed`] once sealed.
    pub fn add(&self, permission: Permission) -> Result<bool> {
        let mut inner = self.write();
        if inner.sealed {
            warn!(permission = %permission, "add rejected: collection is sealed");
            return Err(PermissionError::CollectionSealed);
        }
        if inner.members.contains(&permission) {
            trace!(permission = %permission, "duplicate permission ignored");
            return Ok(false);
        }
        debug!(permission = %permission, "permission added");
        inner.members.insert(permission);
        Ok(true)
    }

    /// Add every permission; returns how many were new. Stops at the first error.
    pub fn extend<I: IntoIterator<Item = Permission>>(&self, permissions: I) -> Result<usize> {
        let mut added = 0;
        for p in permissions {
            if self.add(p)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Make the collection read-only. Idempotent.
    pub fn seal(&self) {
        let mut inner = self.write();
        if !inner.sealed {
            inner.sealed = true;
            debug!(members = inner.members.len(), "permission collection sealed");
        }
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.read().sealed
    }

    /// True if any member implies `target`. With a subject, `<groupmember>`
    /// members are also checked against the subject's group principals.
    pub fn implies(&self, target: &Permission, subject: Option<&SubjectContext>) -> bool {
        let inner = self.read();
        inner.members.iter().any(|m| {
            m.implies(target)
                || subject.is_some_and(|s| m.is_group_member() && m.implies_member(target, s))
        })
    }

    #[inline]
    pub fn contains(&self, permission: &Permission) -> bool {
        self.read().members.contains(permission)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.read().members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().members.is_empty()
    }

    /// Snapshot of the members, in no particular order
    pub fn members(&self) -> Vec<Permission> {
        self.read().members.iter().cloned().collect()
    }
}

impl fmt::Debug for AllPermissionCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        let mut members: Vec<String> = inner.members.iter().map(|p| p.to_string()).collect();
        members.sort();
        f.debug_struct("AllPermissionCollection")
            .field("members", &members)
            .field("sealed", &inner.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::all_wikis;

    #[test]
    fn test_add_dedups() {
        let c = AllPermissionCollection::new();
        assert!(c.add(all_wikis()).unwrap());
        assert!(!c.add(all_wikis()).unwrap());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_seal_blocks_add() {
        let c = AllPermissionCollection::new();
        c.add(Permission::page("*:Main", "view").unwrap()).unwrap();
        c.seal();
        c.seal();
        assert!(c.is_sealed());
        let err = c.add(Permission::page("*:Other", "view").unwrap()).unwrap_err();
        assert!(matches!(err, PermissionError::CollectionSealed));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_extend_counts_new() {
        let c = AllPermissionCollection::new();
        let n = c
            .extend([
                Permission::page("*:Main", "view").unwrap(),
                Permission::page("*:Main", "VIEW").unwrap(),
                Permission::group("*:Admin", "edit").unwrap(),
            ])
            .unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_sealed_from_dedups_and_seals() {
        let c = AllPermissionCollection::sealed_from([
            Permission::page("*:Main", "view,edit").unwrap(),
            Permission::page("*:Main", "edit,view").unwrap(),
            Permission::group("Admins", "view").unwrap(),
            Permission::group("*:Admins", "view").unwrap(),
        ]);
        assert!(c.is_sealed());
        assert_eq!(c.len(), 2);
        assert!(matches!(c.add(all_wikis()), Err(PermissionError::CollectionSealed)));
    }

    #[test]
    fn test_empty_implies_nothing() {
        let c = AllPermissionCollection::new();
        assert!(c.is_empty());
        assert!(!c.implies(&Permission::page("*:Main", "view").unwrap(), None));
    }

    #[test]
    fn test_debug_lists_members() {
        let c = AllPermissionCollection::new();
        c.add(all_wikis()).unwrap();
        let s = format!("{:?}", c);
        assert!(s.contains("all \\\"*\\\""));
        assert!(s.contains("sealed: false"));
    }
}
