//! Per-kind action tables and mask arithmetic.
//!
//! Every permission kind has a fixed, ordered list of actions. Each action owns
//! one bit and a precomputed closure: the mask of every action it implies,
//! itself included. Masks never leave this module; callers work with [`Actions`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ACTION_SEPARATOR;
use crate::error::{PermissionError, Result};

/// Page action bits
mod page {
    pub const VIEW: u32 = 1;
    pub const COMMENT: u32 = 1 << 1;
    pub const EDIT: u32 = 1 << 2;
    pub const UPLOAD: u32 = 1 << 3;
    pub const MODIFY: u32 = 1 << 4;
    pub const RENAME: u32 = 1 << 5;
    pub const DELETE: u32 = 1 << 6;
}

/// Group action bits
mod group {
    pub const VIEW: u32 = 1;
    pub const EDIT: u32 = 1 << 1;
    pub const DELETE: u32 = 1 << 2;
}

/// Wiki action bits
mod wiki {
    pub const CREATE_PAGES: u32 = 1;
    pub const CREATE_GROUPS: u32 = 1 << 1;
    pub const EDIT_PREFERENCES: u32 = 1 << 2;
    pub const EDIT_PROFILE: u32 = 1 << 3;
    pub const LOGIN: u32 = 1 << 4;
}

/// One named action: its bit and the closure of actions it implies
struct ActionDef {
    name: &'static str,
    bit: u32,
    implies: u32,
}

const fn act(name: &'static str, bit: u32, implies: u32) -> ActionDef {
    ActionDef { name, bit, implies: bit | implies }
}

// Tables are kept in alphabetical order; rendering walks them front to back.
const PAGE_ACTIONS: &[ActionDef] = &[
    act("comment", page::COMMENT, page::VIEW),
    act(
        "delete",
        page::DELETE,
        page::MODIFY | page::RENAME | page::EDIT | page::UPLOAD | page::COMMENT | page::VIEW,
    ),
    act("edit", page::EDIT, page::COMMENT | page::VIEW),
    act("modify", page::MODIFY, page::EDIT | page::UPLOAD | page::COMMENT | page::VIEW),
    act("rename", page::RENAME, page::EDIT | page::COMMENT | page::VIEW),
    act("upload", page::UPLOAD, page::VIEW),
    act("view", page::VIEW, 0),
];

const GROUP_ACTIONS: &[ActionDef] = &[
    act("delete", group::DELETE, group::EDIT | group::VIEW),
    act("edit", group::EDIT, group::VIEW),
    act("view", group::VIEW, 0),
];

const WIKI_ACTIONS: &[ActionDef] = &[
    act("creategroups", wiki::CREATE_GROUPS, wiki::CREATE_PAGES),
    act("createpages", wiki::CREATE_PAGES, 0),
    act("editpreferences", wiki::EDIT_PREFERENCES, 0),
    act("editprofile", wiki::EDIT_PROFILE, 0),
    act("login", wiki::LOGIN, 0),
];

/// The four permission kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Page,
    Group,
    Wiki,
    All,
}

impl PermissionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Group => "group",
            Self::Wiki => "wiki",
            Self::All => "all",
        }
    }

    fn table(self) -> &'static [ActionDef] {
        match self {
            Self::Page => PAGE_ACTIONS,
            Self::Group => GROUP_ACTIONS,
            Self::Wiki => WIKI_ACTIONS,
            Self::All => &[],
        }
    }

    /// Canonical action names for this kind, alphabetical
    pub fn action_names(self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|a| a.name)
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PermissionKind {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" => Ok(Self::Page),
            "group" => Ok(Self::Group),
            "wiki" => Ok(Self::Wiki),
            "all" => Ok(Self::All),
            _ => Err(PermissionError::Policy(format!("Unknown permission kind '{}'", s))),
        }
    }
}

/// Parse a comma-separated action list into a mask.
/// Case-insensitive; blank tokens are skipped, but at least one action is required.
pub(crate) fn parse_mask(kind: PermissionKind, csv: &str) -> Result<u32> {
    let table = kind.table();
    let mut mask = 0u32;
    let mut seen = false;
    for token in csv.split(ACTION_SEPARATOR) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let lower = token.to_ascii_lowercase();
        let def = table
            .iter()
            .find(|a| a.name == lower)
            .ok_or_else(|| PermissionError::invalid_action(kind.name(), token))?;
        mask |= def.bit;
        seen = true;
    }
    if !seen {
        return Err(PermissionError::invalid_action(kind.name(), csv));
    }
    Ok(mask)
}

/// Closure of a single action bit (0 for an unknown bit)
#[inline]
pub(crate) fn implied_mask(kind: PermissionKind, bit: u32) -> u32 {
    kind.table().iter().find(|a| a.bit == bit).map_or(0, |a| a.implies)
}

/// Union of the closures of every bit set in `mask`
#[inline]
fn closure(kind: PermissionKind, mask: u32) -> u32 {
    kind.table()
        .iter()
        .filter(|a| mask & a.bit != 0)
        .fold(0, |acc, a| acc | implied_mask(kind, a.bit))
}

/// True if every action in `want` is implied by some action in `have`
#[inline]
pub(crate) fn implies_actions(kind: PermissionKind, have: u32, want: u32) -> bool {
    closure(kind, have) & want == want
}

/// Render a mask as a canonical action list: alphabetical, lower case, no spaces
pub(crate) fn render(kind: PermissionKind, mask: u32) -> String {
    kind.table()
        .iter()
        .filter(|a| mask & a.bit != 0)
        .map(|a| a.name)
        .collect::<Vec<_>>()
        .join(",")
}

/// A validated set of actions for one permission kind
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actions {
    kind: PermissionKind,
    mask: u32,
}

impl Actions {
    /// Parse a comma-separated action list, e.g. `"VIEW, edit"`.
    ///
    /// # Example
    /// ```
    /// use wikiperm::{Actions, PermissionKind};
    /// let a = Actions::parse(PermissionKind::Page, "VIEW,edit,delete").unwrap();
    /// assert_eq!(a.to_string(), "delete,edit,view");
    /// ```
    pub fn parse(kind: PermissionKind, csv: &str) -> Result<Self> {
        Ok(Self { kind, mask: parse_mask(kind, csv)? })
    }

    #[inline]
    pub fn kind(&self) -> PermissionKind {
        self.kind
    }

    /// True if holding these actions authorizes all of `other`.
    /// Action sets of different kinds never imply each other.
    #[inline]
    pub fn implies(&self, other: &Actions) -> bool {
        self.kind == other.kind && implies_actions(self.kind, self.mask, other.mask)
    }

    /// True if `name` was granted explicitly
    pub fn contains(&self, name: &str) -> bool {
        let lower = name.trim().to_ascii_lowercase();
        self.kind.table().iter().any(|a| a.name == lower && self.mask & a.bit != 0)
    }

    /// True if `name` is granted explicitly or implied by a granted action
    pub fn allows(&self, name: &str) -> bool {
        let lower = name.trim().to_ascii_lowercase();
        self.kind
            .table()
            .iter()
            .find(|a| a.name == lower)
            .is_some_and(|a| implies_actions(self.kind, self.mask, a.bit))
    }

    /// Explicitly granted action names, alphabetical
    pub fn names(&self) -> Vec<&'static str> {
        self.kind.table().iter().filter(|a| self.mask & a.bit != 0).map(|a| a.name).collect()
    }

    /// Every action these actions authorize, alphabetical
    pub fn implied_names(&self) -> Vec<&'static str> {
        let implied = closure(self.kind, self.mask);
        self.kind.table().iter().filter(|a| implied & a.bit != 0).map(|a| a.name).collect()
    }
}

impl fmt::Display for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self.kind, self.mask))
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actions")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(kind: PermissionKind, csv: &str) -> u32 {
        parse_mask(kind, csv).unwrap()
    }

    #[test]
    fn test_each_action_implies_its_closure() {
        for kind in [PermissionKind::Page, PermissionKind::Group, PermissionKind::Wiki] {
            for def in kind.table() {
                assert!(implies_actions(kind, def.bit, implied_mask(kind, def.bit)), "{}", def.name);
                for other in kind.table() {
                    let expected = def.implies & other.bit != 0;
                    assert_eq!(
                        implies_actions(kind, def.bit, other.bit),
                        expected,
                        "{} {} -> {}",
                        kind,
                        def.name,
                        other.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_page_lattice() {
        let k = PermissionKind::Page;
        assert!(implies_actions(k, mask(k, "delete"), mask(k, "modify")));
        assert!(implies_actions(k, mask(k, "rename"), mask(k, "edit")));
        assert!(!implies_actions(k, mask(k, "rename"), mask(k, "upload")));
        assert!(!implies_actions(k, mask(k, "edit"), mask(k, "upload")));
        assert!(implies_actions(k, mask(k, "modify"), mask(k, "upload,comment")));
        assert!(!implies_actions(k, mask(k, "view"), mask(k, "comment")));
    }

    #[test]
    fn test_combined_mask_needs_every_action() {
        let k = PermissionKind::Page;
        assert!(implies_actions(k, mask(k, "rename,upload"), mask(k, "edit,upload")));
        assert!(!implies_actions(k, mask(k, "rename"), mask(k, "edit,upload")));
    }

    #[test]
    fn test_group_and_wiki_lattice() {
        let g = PermissionKind::Group;
        assert!(implies_actions(g, mask(g, "delete"), mask(g, "edit,view")));
        assert!(!implies_actions(g, mask(g, "edit"), mask(g, "delete")));

        let w = PermissionKind::Wiki;
        assert!(implies_actions(w, mask(w, "createGroups"), mask(w, "createPages")));
        assert!(!implies_actions(w, mask(w, "createPages"), mask(w, "createGroups")));
        assert!(!implies_actions(w, mask(w, "editProfile"), mask(w, "editPreferences")));
    }

    #[test]
    fn test_render_is_canonical() {
        let k = PermissionKind::Page;
        assert_eq!(render(k, mask(k, "VIEW,edit,delete")), "delete,edit,view");
        assert_eq!(render(k, mask(k, " view , view ")), "view");
        let w = PermissionKind::Wiki;
        assert_eq!(render(w, mask(w, "login,createPages,CreateGroups")), "creategroups,createpages,login");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_mask(PermissionKind::Page, "").is_err());
        assert!(parse_mask(PermissionKind::Page, " , ").is_err());
        assert!(parse_mask(PermissionKind::Page, "view,fly").is_err());
        assert!(parse_mask(PermissionKind::Group, "upload").is_err());
        assert!(parse_mask(PermissionKind::All, "view").is_err());
    }

    #[test]
    fn test_parse_error_names_the_action() {
        match parse_mask(PermissionKind::Page, "view,Fly") {
            Err(PermissionError::InvalidAction { kind, action }) => {
                assert_eq!(kind, "page");
                assert_eq!(action, "Fly");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_blank_tokens_skipped() {
        let k = PermissionKind::Page;
        assert_eq!(mask(k, "view,,edit,"), mask(k, "edit,view"));
    }

    #[test]
    fn test_actions_value() {
        let a = Actions::parse(PermissionKind::Page, "rename").unwrap();
        assert!(a.contains("RENAME"));
        assert!(!a.contains("edit"));
        assert!(a.allows("edit"));
        assert!(!a.allows("upload"));
        assert!(!a.allows("nonsense"));
        assert_eq!(a.names(), vec!["rename"]);
        assert_eq!(a.implied_names(), vec!["comment", "edit", "rename", "view"]);
    }

    #[test]
    fn test_actions_of_different_kinds_never_imply() {
        let page = Actions::parse(PermissionKind::Page, "delete").unwrap();
        let group = Actions::parse(PermissionKind::Group, "view").unwrap();
        assert!(!page.implies(&group));
        assert!(!group.implies(&page));
    }

    #[test]
    fn test_equal_regardless_of_order() {
        let a = Actions::parse(PermissionKind::Page, "view,edit").unwrap();
        let b = Actions::parse(PermissionKind::Page, "EDIT,view").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Page".parse::<PermissionKind>().unwrap(), PermissionKind::Page);
        assert_eq!(" all ".parse::<PermissionKind>().unwrap(), PermissionKind::All);
        assert!("attachment".parse::<PermissionKind>().is_err());
    }
}
