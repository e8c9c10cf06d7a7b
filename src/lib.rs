//! wikiperm - wiki permission model
//!
//! Permissions pair a wiki-qualified target pattern (`"mywiki:Main"`, `"*:Admin*"`)
//! with a set of actions (`"view,edit"`). Each kind's actions form a small fixed
//! lattice encoded as bitmasks, so `delete` implies `modify`, `modify` implies
//! `edit`, and so on. An [`AllPermissionCollection`] holds everything a caller was
//! granted and answers "is this permission implied".
//!
//! ```
//! use wikiperm::{AllPermissionCollection, Permission};
//!
//! let granted = AllPermissionCollection::new();
//! granted.add(Permission::page("*:*", "modify")?)?;
//! granted.seal();
//!
//! assert!(granted.implies(&Permission::page("mywiki:Main/diagram.png", "upload")?, None));
//! assert!(!granted.implies(&Permission::page("mywiki:Main", "rename")?, None));
//! # Ok::<(), wikiperm::PermissionError>(())
//! ```

pub mod actions;
pub mod collection;
pub mod constants;
pub mod error;
pub mod permission;
pub mod policy;
pub mod principal;
pub mod target;

// Re-exports
pub use actions::{Actions, PermissionKind};
pub use collection::AllPermissionCollection;
pub use constants::*;
pub use error::{PermissionError, Result};
pub use permission::{
    all_wikis, AllPermission, GroupPermission, PagePermission, Permission, PermissionSpec, WikiPermission,
};
pub use policy::{Decision, DecisionObserver, Grant, SecurityPolicy};
pub use principal::{Principal, SubjectContext};
pub use target::{attachment_parent, group_name_matches, name_matches, names_equivalent_under_attachment, TargetPattern, WikiScoping};
