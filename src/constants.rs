//! Reserved tokens, separators and built-in role names

/// Matches any wiki id or any name
pub const WILDCARD: &str = "*";

/// Separates the wiki id from the name in a target ("mywiki:Main")
pub const WIKI_SEPARATOR: char = ':';

/// Separates a page name from an attachment name ("Main/diagram.png")
pub const ATTACHMENT_SEPARATOR: char = '/';

/// Action separator in an action list ("view,edit")
pub const ACTION_SEPARATOR: char = ',';

/// Group target standing for "any group the caller is a member of".
/// Only ever matched literally; wildcards never cross it.
pub const GROUP_MEMBER: &str = "<groupmember>";

/// Rendered in place of an action list for permissions that carry no action restriction
pub const ALL_ACTIONS: &str = "*";

// Built-in roles
pub const ROLE_ALL: &str = "All";
pub const ROLE_ANONYMOUS: &str = "Anonymous";
pub const ROLE_ASSERTED: &str = "Asserted";
pub const ROLE_AUTHENTICATED: &str = "Authenticated";
pub const ROLE_ADMIN: &str = "Admin";

pub const BUILTIN_ROLES: &[&str] = &[ROLE_ALL, ROLE_ANONYMOUS, ROLE_ASSERTED, ROLE_AUTHENTICATED, ROLE_ADMIN];
