//! Page permission implication tests
//!
//! These tests pin down wiki scoping, wildcard names, attachment equivalence and
//! the page action lattice.

use wikiperm::{PagePermission, Permission, PermissionError};

fn page(target: &str, actions: &str) -> Permission {
    Permission::page(target, actions).unwrap()
}

// ============================================================================
// Action Lattice
// ============================================================================

/// delete implies everything below it
#[test]
fn delete_implies_all_page_actions() {
    let p = page("*:Main", "delete");
    for action in ["delete", "modify", "rename", "edit", "upload", "comment", "view"] {
        assert!(p.implies(&page("*:Main", action)), "delete should imply {}", action);
    }
}

#[test]
fn rename_implies_edit_but_not_upload() {
    let p = page("mywiki:Main", "rename");
    assert!(p.implies(&page("mywiki:Main", "edit")));
    assert!(p.implies(&page("mywiki:Main", "comment")));
    assert!(!p.implies(&page("mywiki:Main", "upload")));
    assert!(!p.implies(&page("mywiki:Main", "modify")));
}

#[test]
fn modify_implies_upload_and_edit() {
    let p = page("mywiki:Main", "modify");
    assert!(p.implies(&page("mywiki:Main", "upload,edit")));
    assert!(!p.implies(&page("mywiki:Main", "rename")));
    assert!(!p.implies(&page("mywiki:Main", "delete")));
}

#[test]
fn upload_and_comment_only_imply_view() {
    assert!(page("mywiki:Main", "upload").implies(&page("mywiki:Main", "view")));
    assert!(!page("mywiki:Main", "upload").implies(&page("mywiki:Main", "comment")));
    assert!(page("mywiki:Main", "comment").implies(&page("mywiki:Main", "view")));
    assert!(!page("mywiki:Main", "comment").implies(&page("mywiki:Main", "edit")));
}

/// A request for several actions needs every one of them covered
#[test]
fn multi_action_request_needs_full_cover() {
    assert!(page("mywiki:Main", "edit,upload").implies(&page("mywiki:Main", "comment,upload")));
    assert!(!page("mywiki:Main", "edit").implies(&page("mywiki:Main", "comment,upload")));
}

// ============================================================================
// Action Strings
// ============================================================================

#[test]
fn actions_render_canonically() {
    assert_eq!(page("mywiki:Main", "VIEW,edit,delete").actions(), "delete,edit,view");
    assert_eq!(page("mywiki:Main", "view, Edit").actions(), "edit,view");
}

#[test]
fn actions_order_does_not_affect_equality() {
    assert_eq!(page("mywiki:Main", "view,edit"), page("mywiki:Main", "edit,view"));
}

#[test]
fn invalid_action_rejected() {
    let err = PagePermission::new("mywiki:Main", "view,destroy").unwrap_err();
    assert!(matches!(err, PermissionError::InvalidAction { .. }));
    assert!(err.to_string().contains("destroy"));
}

#[test]
fn empty_actions_rejected() {
    assert!(PagePermission::new("mywiki:Main", "").is_err());
}

#[test]
fn empty_target_rejected() {
    assert!(matches!(PagePermission::new("", "view"), Err(PermissionError::InvalidTarget(_))));
    assert!(matches!(PagePermission::new("mywiki:", "view"), Err(PermissionError::InvalidTarget(_))));
}

// ============================================================================
// Wiki Scoping
// ============================================================================

#[test]
fn wildcard_wiki_implies_specific_wiki() {
    assert!(page("*:Main", "edit").implies(&page("mywiki:Main", "edit")));
}

#[test]
fn specific_wiki_does_not_imply_wildcard_wiki() {
    assert!(!page("mywiki:Main", "edit").implies(&page("*:Main", "edit")));
}

#[test]
fn different_wikis_do_not_imply() {
    assert!(!page("mywiki:Main", "edit").implies(&page("otherwiki:Main", "edit")));
}

/// Unqualified page targets never imply and are never implied, not even by themselves
#[test]
fn unqualified_page_matches_nothing() {
    let bare = page("Main", "edit");
    assert!(!bare.implies(&bare));
    assert!(!bare.implies(&page("Main", "edit")));
    assert!(!bare.implies(&page("mywiki:Main", "edit")));
    assert!(!page("*:Main", "edit").implies(&bare));
    assert!(!page("*:*", "delete").implies(&bare));
}

// ============================================================================
// Name Wildcards
// ============================================================================

#[test]
fn universal_name_wildcard() {
    let p = page("mywiki:*", "view");
    assert!(p.implies(&page("mywiki:Main", "view")));
    assert!(p.implies(&page("mywiki:AnythingAtAll", "view")));
    assert!(!p.implies(&page("otherwiki:Main", "view")));
}

#[test]
fn prefix_wildcard() {
    let p = page("mywiki:Main*", "view");
    assert!(p.implies(&page("mywiki:Main", "view")));
    assert!(p.implies(&page("mywiki:MainPage", "view")));
    assert!(!p.implies(&page("mywiki:TheMain", "view")));
}

#[test]
fn suffix_wildcard() {
    let p = page("mywiki:*Page", "view");
    assert!(p.implies(&page("mywiki:MainPage", "view")));
    assert!(!p.implies(&page("mywiki:PageOne", "view")));
}

#[test]
fn interior_wildcard_is_literal() {
    let p = page("mywiki:Ma*n", "view");
    assert!(!p.implies(&page("mywiki:Main", "view")));
    assert!(p.implies(&page("mywiki:Ma*n", "view")));
}

#[test]
fn specific_name_does_not_imply_wildcard() {
    assert!(!page("mywiki:Main", "view").implies(&page("mywiki:*", "view")));
}

/// `<groupmember>` is only special for group permissions; a page may carry that name
#[test]
fn wildcard_covers_page_named_like_group_member_token() {
    assert!(page("*:*", "view").implies(&page("mywiki:<groupmember>", "view")));
    assert!(page("mywiki:<group*", "edit").implies(&page("mywiki:<groupmember>/a.png", "view")));
}

// ============================================================================
// Attachments
// ============================================================================

#[test]
fn page_implies_its_attachment() {
    assert!(page("mywiki:Main", "view").implies(&page("mywiki:Main/test.png", "view")));
}

#[test]
fn attachment_implies_its_page() {
    assert!(page("mywiki:Main/test.png", "view").implies(&page("mywiki:Main", "view")));
}

#[test]
fn attachment_equivalence_respects_actions_and_wiki() {
    assert!(!page("mywiki:Main", "view").implies(&page("mywiki:Main/test.png", "upload")));
    assert!(!page("mywiki:Main", "view").implies(&page("otherwiki:Main/test.png", "view")));
    assert!(!page("Main", "view").implies(&page("Main/test.png", "view")));
}

#[test]
fn sibling_attachments_are_distinct() {
    assert!(!page("mywiki:Main/a.png", "view").implies(&page("mywiki:Main/b.png", "view")));
    assert!(!page("mywiki:Main", "view").implies(&page("mywiki:Other/test.png", "view")));
}

#[test]
fn wildcard_page_covers_attachments() {
    assert!(page("*:Ma*", "upload").implies(&page("mywiki:Main/test.png", "upload")));
    assert!(page("*:*", "view").implies(&page("mywiki:Main/test.png", "view")));
}

// ============================================================================
// Targets
// ============================================================================

#[test]
fn target_accessors() {
    let p = PagePermission::new("mywiki:Main", "view").unwrap();
    assert_eq!(p.target().wiki(), Some("mywiki"));
    assert_eq!(p.target().name(), "Main");
    assert_eq!(p.actions().to_string(), "view");
}
