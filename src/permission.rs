//! Permission values and the implication decision.
//!
//! A permission pairs a target with a set of actions. Four kinds exist:
//!
//! - `page`  - pages and their attachments (`"mywiki:Main"`, `"edit"`)
//! - `group` - wiki groups (`"*:Admins"`, `"view"`)
//! - `wiki`  - wiki-wide actions (`"mywiki"`, `"createPages"`)
//! - `all`   - every action of every kind within a wiki scope (`"*"`)
//!
//! `a.implies(b)` answers "is holding `a` enough to be allowed `b`". Different
//! kinds never imply each other, except that an `all` permission implies anything
//! in its wiki scope. Nothing but `all` implies an `all` permission.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::actions::{Actions, PermissionKind};
use crate::constants::{ALL_ACTIONS, WIKI_SEPARATOR, WILDCARD};
use crate::error::{PermissionError, Result};
use crate::principal::SubjectContext;
use crate::target::{wiki_matches, TargetPattern, WikiScoping};

/// Permission on a page or attachment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagePermission {
    target: TargetPattern,
    actions: Actions,
}

impl PagePermission {
    pub fn new(target: &str, actions: &str) -> Result<Self> {
        Ok(Self {
            target: TargetPattern::parse(target)?,
            actions: Actions::parse(PermissionKind::Page, actions)?,
        })
    }

    #[inline]
    pub fn target(&self) -> &TargetPattern {
        &self.target
    }

    #[inline]
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Unqualified targets (no `wiki:` prefix) neither imply nor are implied, even by themselves.
    pub fn implies(&self, other: &PagePermission) -> bool {
        self.target.matches_wiki(other.target.wiki(), WikiScoping::Strict)
            && self.target.matches_page_name(other.target.name())
            && self.actions.implies(&other.actions)
    }
}

/// Permission on a wiki group
#[derive(Debug, Clone)]
pub struct GroupPermission {
    target: TargetPattern,
    actions: Actions,
}

impl GroupPermission {
    pub fn new(target: &str, actions: &str) -> Result<Self> {
        Ok(Self {
            target: TargetPattern::parse(target)?,
            actions: Actions::parse(PermissionKind::Group, actions)?,
        })
    }

    #[inline]
    pub fn target(&self) -> &TargetPattern {
        &self.target
    }

    #[inline]
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Static implication. Never consults group membership, so a
    /// `<groupmember>` target only implies another literal `<groupmember>` target.
    pub fn implies(&self, other: &GroupPermission) -> bool {
        self.target.matches_wiki(other.target.wiki(), WikiScoping::Lenient)
            && self.target.matches_group_name(other.target.name())
            && self.actions.implies(&other.actions)
    }

    /// Dynamic implication for `<groupmember>` targets.
    ///
    /// True if this is a `<groupmember>` permission whose wiki scope and actions
    /// cover `other`, and `subject` holds a group principal named exactly like
    /// `other`'s target.
    pub fn implies_member(&self, other: &GroupPermission, subject: &SubjectContext) -> bool {
        self.target.is_group_member()
            && self.target.matches_wiki(other.target.wiki(), WikiScoping::Lenient)
            && self.actions.implies(&other.actions)
            && subject.holds_group(other.target.name())
    }
}

/// Wiki-wide permission. A bare target names the wiki itself.
#[derive(Debug, Clone)]
pub struct WikiPermission {
    target: TargetPattern,
    actions: Actions,
}

impl WikiPermission {
    pub fn new(target: &str, actions: &str) -> Result<Self> {
        Ok(Self {
            target: TargetPattern::parse(target)?,
            actions: Actions::parse(PermissionKind::Wiki, actions)?,
        })
    }

    #[inline]
    pub fn target(&self) -> &TargetPattern {
        &self.target
    }

    #[inline]
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    pub fn implies(&self, other: &WikiPermission) -> bool {
        self.target.matches_wiki(other.target.wiki(), WikiScoping::Lenient)
            && self.target.matches_name(other.target.name())
            && self.actions.implies(&other.actions)
    }

    /// Wiki id this permission applies to: the prefix unless it is absent or `*`, else the name
    fn wiki_id(&self) -> &str {
        match self.target.wiki() {
            Some(w) if w != WILDCARD => w,
            _ => self.target.name(),
        }
    }
}

// Group and wiki targets compare with an absent prefix read as `*`,
// so `"Admins"` and `"*:Admins"` are the same permission.
macro_rules! lenient_eq {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.target.scoped_wiki(WikiScoping::Lenient) == other.target.scoped_wiki(WikiScoping::Lenient)
                    && self.target.name() == other.target.name()
                    && self.actions == other.actions
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.target.scoped_wiki(WikiScoping::Lenient).hash(state);
                self.target.name().hash(state);
                self.actions.hash(state);
            }
        }
    };
}

lenient_eq!(GroupPermission);
lenient_eq!(WikiPermission);

/// Every action on every target within a wiki scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllPermission {
    wiki: String,
}

impl AllPermission {
    /// `wiki` is a bare wiki id or `*`; an empty id or one containing `:` is rejected
    pub fn new(wiki: &str) -> Result<Self> {
        let wiki = wiki.trim();
        if wiki.is_empty() || wiki.contains(WIKI_SEPARATOR) {
            return Err(PermissionError::invalid_target(wiki));
        }
        Ok(Self { wiki: wiki.to_string() })
    }

    #[inline]
    pub fn wiki(&self) -> &str {
        &self.wiki
    }

    /// True if `other`'s wiki scope falls within this one; actions are irrelevant
    pub fn implies(&self, other: &Permission) -> bool {
        wiki_matches(Some(&self.wiki), other.wiki_scope())
    }
}

/// One permission of any kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PermissionSpec", into = "PermissionSpec")]
pub enum Permission {
    Page(PagePermission),
    Group(GroupPermission),
    Wiki(WikiPermission),
    All(AllPermission),
}

impl Permission {
    /// Build from a `(kind, target, actions)` triple.
    /// `all` permissions carry no action restriction, so their `actions` must be empty or `*`.
    pub fn new(kind: PermissionKind, target: &str, actions: &str) -> Result<Self> {
        Ok(match kind {
            PermissionKind::Page => Self::Page(PagePermission::new(target, actions)?),
            PermissionKind::Group => Self::Group(GroupPermission::new(target, actions)?),
            PermissionKind::Wiki => Self::Wiki(WikiPermission::new(target, actions)?),
            PermissionKind::All => {
                let actions = actions.trim();
                if !actions.is_empty() && actions != ALL_ACTIONS {
                    return Err(PermissionError::invalid_action(PermissionKind::All.name(), actions));
                }
                Self::All(AllPermission::new(target)?)
            }
        })
    }

    /// # Example
    /// ```
    /// use wikiperm::Permission;
    /// let p = Permission::page("*:Main", "edit").unwrap();
    /// assert!(p.implies(&Permission::page("mywiki:Main", "view").unwrap()));
    /// ```
    pub fn page(target: &str, actions: &str) -> Result<Self> {
        PagePermission::new(target, actions).map(Self::Page)
    }

    pub fn group(target: &str, actions: &str) -> Result<Self> {
        GroupPermission::new(target, actions).map(Self::Group)
    }

    pub fn wiki(target: &str, actions: &str) -> Result<Self> {
        WikiPermission::new(target, actions).map(Self::Wiki)
    }

    pub fn all(wiki: &str) -> Result<Self> {
        AllPermission::new(wiki).map(Self::All)
    }

    pub fn kind(&self) -> PermissionKind {
        match self {
            Self::Page(_) => PermissionKind::Page,
            Self::Group(_) => PermissionKind::Group,
            Self::Wiki(_) => PermissionKind::Wiki,
            Self::All(_) => PermissionKind::All,
        }
    }

    /// Target pattern; `all` permissions have none
    pub fn target(&self) -> Option<&TargetPattern> {
        match self {
            Self::Page(p) => Some(p.target()),
            Self::Group(p) => Some(p.target()),
            Self::Wiki(p) => Some(p.target()),
            Self::All(_) => None,
        }
    }

    /// Action set; `all` permissions have none
    pub fn action_set(&self) -> Option<&Actions> {
        match self {
            Self::Page(p) => Some(p.actions()),
            Self::Group(p) => Some(p.actions()),
            Self::Wiki(p) => Some(p.actions()),
            Self::All(_) => None,
        }
    }

    /// Canonical action list (`"delete,edit,view"`), or `"*"` for `all`
    pub fn actions(&self) -> String {
        self.action_set().map_or_else(|| ALL_ACTIONS.to_string(), |a| a.to_string())
    }

    /// Wiki id this permission is scoped to, as seen by an `all` permission.
    /// `None` for unqualified page targets, which no scope covers.
    pub fn wiki_scope(&self) -> Option<&str> {
        match self {
            Self::Page(p) => p.target.scoped_wiki(WikiScoping::Strict),
            Self::Group(p) => p.target.scoped_wiki(WikiScoping::Lenient),
            Self::Wiki(p) => Some(p.wiki_id()),
            Self::All(p) => Some(p.wiki()),
        }
    }

    /// Static implication: is holding `self` enough to be allowed `other`
    pub fn implies(&self, other: &Permission) -> bool {
        match (self, other) {
            (Self::All(a), _) => a.implies(other),
            (_, Self::All(_)) => false,
            (Self::Page(a), Self::Page(b)) => a.implies(b),
            (Self::Group(a), Self::Group(b)) => a.implies(b),
            (Self::Wiki(a), Self::Wiki(b)) => a.implies(b),
            _ => false,
        }
    }

    /// Group-membership implication; false unless both sides are group permissions
    pub fn implies_member(&self, other: &Permission, subject: &SubjectContext) -> bool {
        match (self, other) {
            (Self::Group(a), Self::Group(b)) => a.implies_member(b, subject),
            _ => false,
        }
    }

    /// True if this is the `<groupmember>` group permission
    pub(crate) fn is_group_member(&self) -> bool {
        matches!(self, Self::Group(g) if g.target.is_group_member())
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All(a) => write!(f, "{} \"{}\"", self.kind(), a.wiki),
            _ => match (self.target(), self.action_set()) {
                (Some(t), Some(a)) => write!(f, "{} \"{}\" \"{}\"", self.kind(), t, a),
                _ => write!(f, "{}", self.kind()),
            },
        }
    }
}

impl From<PagePermission> for Permission {
    fn from(p: PagePermission) -> Self {
        Self::Page(p)
    }
}

impl From<GroupPermission> for Permission {
    fn from(p: GroupPermission) -> Self {
        Self::Group(p)
    }
}

impl From<WikiPermission> for Permission {
    fn from(p: WikiPermission) -> Self {
        Self::Wiki(p)
    }
}

impl From<AllPermission> for Permission {
    fn from(p: AllPermission) -> Self {
        Self::All(p)
    }
}

/// Serialized form of a permission: `{ "kind": "page", "target": "*:Main", "actions": "view" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    pub kind: PermissionKind,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
}

impl TryFrom<PermissionSpec> for Permission {
    type Error = PermissionError;

    fn try_from(spec: PermissionSpec) -> Result<Self> {
        Permission::new(spec.kind, &spec.target, spec.actions.as_deref().unwrap_or(""))
    }
}

impl From<Permission> for PermissionSpec {
    fn from(p: Permission) -> Self {
        let kind = p.kind();
        match p {
            Permission::All(a) => Self { kind, target: a.wiki, actions: None },
            Permission::Page(PagePermission { target, actions })
            | Permission::Group(GroupPermission { target, actions })
            | Permission::Wiki(WikiPermission { target, actions }) => Self {
                kind,
                target: target.to_string(),
                actions: Some(actions.to_string()),
            },
        }
    }
}

/// Shorthand for `AllPermission("*")`
pub fn all_wikis() -> Permission {
    Permission::All(AllPermission { wiki: WILDCARD.to_string() })
}
