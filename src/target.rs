//! Wiki-qualified target patterns.
//!
//! Format: `wikiId:name` or bare `name`
//!
//! - `wikiId` may be `*` (every wiki) or absent (no prefix given)
//! - `name` may be `*`, `prefix*`, `*suffix` or a literal
//! - `<groupmember>` is only ever matched literally

use std::fmt;

use crate::constants::{ATTACHMENT_SEPARATOR, GROUP_MEMBER, WIKI_SEPARATOR, WILDCARD};
use crate::error::{PermissionError, Result};

/// How an absent wiki prefix is treated when comparing wiki scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WikiScoping {
    /// Absent on either side never matches (page permissions)
    Strict,
    /// Absent behaves like `*` (group and wiki permissions)
    Lenient,
}

/// A parsed `wikiId:name` pattern. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetPattern {
    wiki: Option<String>,
    name: String,
}

impl TargetPattern {
    /// Parse from `"wiki:name"` or `"name"`.
    ///
    /// Splits on the first `:`. An empty wiki part (`":Main"`) is the same as no prefix.
    ///
    /// # Example
    /// ```
    /// use wikiperm::TargetPattern;
    /// let t = TargetPattern::parse("mywiki:Main").unwrap();
    /// assert_eq!(t.wiki(), Some("mywiki"));
    /// assert_eq!(t.name(), "Main");
    /// assert_eq!(TargetPattern::parse("Main").unwrap().wiki(), None);
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let (wiki, name) = match spec.split_once(WIKI_SEPARATOR) {
            Some((w, n)) => {
                let w = w.trim();
                ((!w.is_empty()).then(|| w.to_string()), n)
            }
            None => (None, spec),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(PermissionError::invalid_target(spec));
        }
        Ok(Self { wiki, name: name.to_string() })
    }

    #[inline]
    pub fn wiki(&self) -> Option<&str> {
        self.wiki.as_deref()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if a wiki prefix was given
    #[inline]
    pub fn is_qualified(&self) -> bool {
        self.wiki.is_some()
    }

    #[inline]
    pub fn is_group_member(&self) -> bool {
        self.name == GROUP_MEMBER
    }

    /// Wiki id this pattern covers under the given scoping (`None` means "matches nothing")
    #[inline]
    pub(crate) fn scoped_wiki(&self, scoping: WikiScoping) -> Option<&str> {
        match scoping {
            WikiScoping::Strict => self.wiki(),
            WikiScoping::Lenient => Some(self.wiki().unwrap_or(WILDCARD)),
        }
    }

    /// True if this pattern's wiki scope covers `other`
    pub fn matches_wiki(&self, other: Option<&str>, scoping: WikiScoping) -> bool {
        let other = match scoping {
            WikiScoping::Strict => other,
            WikiScoping::Lenient => Some(other.unwrap_or(WILDCARD)),
        };
        wiki_matches(self.scoped_wiki(scoping), other)
    }

    /// True if this pattern's name covers `other`
    #[inline]
    pub fn matches_name(&self, other: &str) -> bool {
        name_matches(&self.name, other)
    }

    /// Name match for group targets: `<groupmember>` on either side only matches itself
    #[inline]
    pub fn matches_group_name(&self, other: &str) -> bool {
        group_name_matches(&self.name, other)
    }

    /// Name match for page targets: a page and its attachments are the same target
    pub fn matches_page_name(&self, other: &str) -> bool {
        self.matches_name(other)
            || attachment_parent(other).is_some_and(|page| self.matches_name(page))
            || names_equivalent_under_attachment(&self.name, other)
    }
}

impl fmt::Display for TargetPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.wiki {
            Some(w) => write!(f, "{}{}{}", w, WIKI_SEPARATOR, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl std::str::FromStr for TargetPattern {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Wiki scope subset test: `*` covers everything, otherwise exact match. Absent never matches.
#[inline]
pub(crate) fn wiki_matches(pattern: Option<&str>, other: Option<&str>) -> bool {
    match (pattern, other) {
        (Some(p), Some(o)) => p == WILDCARD || p == o,
        _ => false,
    }
}

/// Match a name pattern against a name.
///
/// Supports four modes:
/// - exact match
/// - `*` matches any name
/// - `*suffix` matches names ending with `suffix`
/// - `prefix*` matches names starting with `prefix`
pub fn name_matches(pattern: &str, name: &str) -> bool {
    if pattern == name || pattern == WILDCARD {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return name.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return name.starts_with(prefix);
    }
    false
}

/// [`name_matches`] for group names, where `<groupmember>` is never crossed by a wildcard
pub fn group_name_matches(pattern: &str, name: &str) -> bool {
    if pattern == GROUP_MEMBER || name == GROUP_MEMBER {
        return pattern == name;
    }
    name_matches(pattern, name)
}

/// Page an attachment belongs to: `"Main/test.png"` -> `"Main"`
#[inline]
pub fn attachment_parent(name: &str) -> Option<&str> {
    name.split_once(ATTACHMENT_SEPARATOR)
        .map(|(page, _)| page)
        .filter(|page| !page.is_empty())
}

/// True if `a` and `b` are the same name, or one is an attachment of the other
pub fn names_equivalent_under_attachment(a: &str, b: &str) -> bool {
    a == b || attachment_parent(a) == Some(b) || attachment_parent(b) == Some(a)
}
