//! Principals and the caller's subject context

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ROLE_ALL;
use crate::error::{PermissionError, Result};

/// An identity a caller can hold
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "lowercase")]
pub enum Principal {
    /// An authenticated or asserted user
    User(String),
    /// Membership of a wiki group
    Group(String),
    /// A built-in or container role
    Role(String),
}

impl Principal {
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self::Role(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::User(n) | Self::Group(n) | Self::Role(n) => n,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Group(_) => "group",
            Self::Role(_) => "role",
        }
    }

    /// Parse from `"user:alice"`, `"group:Editors"` or `"role:Authenticated"`
    pub fn parse(s: &str) -> Result<Self> {
        let (ty, name) = s
            .split_once(':')
            .ok_or_else(|| PermissionError::Policy(format!("Invalid principal '{}': must be 'type:name'", s)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PermissionError::Policy(format!("Invalid principal '{}': empty name", s)));
        }
        match ty.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::user(name)),
            "group" => Ok(Self::group(name)),
            "role" => Ok(Self::role(name)),
            _ => Err(PermissionError::Policy(format!("Invalid principal type '{}'", ty))),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name(), self.name())
    }
}

impl std::str::FromStr for Principal {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The unordered set of principals the current caller holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectContext {
    principals: HashSet<Principal>,
}

impl SubjectContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, principal: Principal) -> Self {
        self.principals.insert(principal);
        self
    }

    /// Returns false if the principal was already held
    pub fn insert(&mut self, principal: Principal) -> bool {
        self.principals.insert(principal)
    }

    #[inline]
    pub fn contains(&self, principal: &Principal) -> bool {
        self.principals.contains(principal)
    }

    /// True if the caller holds a group principal named exactly `name`
    pub fn holds_group(&self, name: &str) -> bool {
        self.principals.iter().any(|p| matches!(p, Principal::Group(g) if g == name))
    }

    /// True if the caller holds `principal`. The `All` role is held by everyone.
    pub fn holds(&self, principal: &Principal) -> bool {
        matches!(principal, Principal::Role(r) if r == ROLE_ALL) || self.contains(principal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.principals.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    /// Principals sorted, for stable logging
    pub fn sorted(&self) -> Vec<&Principal> {
        let mut v: Vec<_> = self.principals.iter().collect();
        v.sort();
        v
    }
}

impl FromIterator<Principal> for SubjectContext {
    fn from_iter<I: IntoIterator<Item = Principal>>(iter: I) -> Self {
        Self { principals: iter.into_iter().collect() }
    }
}

impl Extend<Principal> for SubjectContext {
    fn extend<I: IntoIterator<Item = Principal>>(&mut self, iter: I) {
        self.principals.extend(iter)
    }
}
