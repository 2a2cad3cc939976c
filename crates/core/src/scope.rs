//! Access scoper: the single place listing-case authorization is decided.
//!
//! Two entry points:
//! - [`listing_scope`] narrows the listing universe for list/search
//!   queries. Repositories translate the returned [`ListingScope`] into a
//!   WHERE fragment; the scoper itself performs no I/O.
//! - [`authorize`] decides a single action against a single listing,
//!   given the minimal [`ListingAccess`] projection the caller fetched.
//!
//! Denials distinguish [`AccessDenied::NotFound`] (the caller has no
//! visibility at all, so the record must look nonexistent) from
//! [`AccessDenied::Forbidden`] (visible, but the action is not permitted).

use crate::roles::RoleSet;
use crate::types::UserId;

/// The subset of listing cases a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Admin: unrestricted.
    All,
    /// Photography company: listings it created.
    OwnedBy(UserId),
    /// Agent: listings it is assigned to.
    AssignedTo(UserId),
    /// No recognized role: empty scope.
    Nothing,
}

/// Derive the visibility scope for a caller. Admin wins over any other
/// role the caller also holds.
pub fn listing_scope(roles: &RoleSet, user_id: UserId) -> ListingScope {
    if roles.is_admin() {
        ListingScope::All
    } else if roles.is_agent() {
        ListingScope::AssignedTo(user_id)
    } else if roles.is_photography_company() {
        ListingScope::OwnedBy(user_id)
    } else {
        ListingScope::Nothing
    }
}

/// Actions a caller can attempt against a listing case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAction {
    Read,
    Update,
    ChangeStatus,
    Publish,
    Delete,
    UploadMedia,
    SubmitSelection,
    ViewSelection,
    AddContact,
    ViewContacts,
    ViewMedia,
}

/// The minimal per-listing facts authorization needs.
#[derive(Debug, Clone, Copy)]
pub struct ListingAccess {
    /// The creating user (photography company) of the listing.
    pub owner_user_id: UserId,
    /// Whether the calling agent is assigned to this listing.
    pub assigned_to_caller: bool,
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// Zero visibility; reads must answer as if the record did not exist.
    NotFound,
    /// The record is visible but the action is not permitted.
    Forbidden(&'static str),
}

/// True when the caller may create listings at all (no per-listing facts
/// are involved in creation).
pub fn can_create(roles: &RoleSet) -> bool {
    roles.is_admin() || roles.is_photography_company()
}

/// Decide `action` for the caller against one listing.
pub fn authorize(
    action: ListingAction,
    access: &ListingAccess,
    roles: &RoleSet,
    user_id: UserId,
) -> Result<(), AccessDenied> {
    if roles.is_admin() {
        return Ok(());
    }
    let is_owner = roles.is_photography_company() && access.owner_user_id == user_id;
    let is_assigned = roles.is_agent() && access.assigned_to_caller;

    match action {
        // Reads outside scope hide existence entirely.
        ListingAction::Read => {
            if is_owner || is_assigned {
                Ok(())
            } else {
                Err(AccessDenied::NotFound)
            }
        }
        ListingAction::Update => Err(AccessDenied::Forbidden("Only Admin can update a listing")),
        ListingAction::Delete => Err(AccessDenied::Forbidden("Only Admin can delete a listing")),
        ListingAction::ChangeStatus => {
            if is_owner {
                Ok(())
            } else {
                Err(AccessDenied::Forbidden(
                    "You are not allowed to change the status of this listing",
                ))
            }
        }
        ListingAction::Publish => {
            if roles.is_photography_company() {
                if is_owner {
                    Ok(())
                } else {
                    Err(AccessDenied::Forbidden(
                        "You are not allowed to publish this listing",
                    ))
                }
            } else {
                Err(AccessDenied::Forbidden(
                    "Only Admin or PhotographyCompany can publish listings",
                ))
            }
        }
        ListingAction::UploadMedia => {
            if roles.is_photography_company() {
                if is_owner {
                    Ok(())
                } else {
                    // An uploading company never learns about foreign listings.
                    Err(AccessDenied::NotFound)
                }
            } else {
                Err(AccessDenied::Forbidden(
                    "Only Admin or PhotographyCompany can upload media",
                ))
            }
        }
        ListingAction::SubmitSelection => {
            if roles.is_agent() {
                if is_assigned {
                    Ok(())
                } else {
                    Err(AccessDenied::Forbidden("You are not assigned to this listing"))
                }
            } else {
                Err(AccessDenied::Forbidden(
                    "Only Admin or Agent can update the selection",
                ))
            }
        }
        ListingAction::ViewSelection => {
            if roles.is_agent() {
                if is_assigned {
                    Ok(())
                } else {
                    Err(AccessDenied::Forbidden("You are not assigned to this listing"))
                }
            } else {
                Err(AccessDenied::Forbidden(
                    "Only Admin or Agent can view the final selection",
                ))
            }
        }
        ListingAction::AddContact => {
            if is_owner || is_assigned {
                Ok(())
            } else {
                Err(AccessDenied::Forbidden(
                    "You are not allowed to add contacts to this listing",
                ))
            }
        }
        ListingAction::ViewContacts => {
            if is_owner || is_assigned {
                Ok(())
            } else {
                Err(AccessDenied::Forbidden(
                    "You are not allowed to view contacts of this listing",
                ))
            }
        }
        ListingAction::ViewMedia => {
            if is_owner || is_assigned {
                Ok(())
            } else {
                Err(AccessDenied::Forbidden(
                    "You are not allowed to view media of this listing",
                ))
            }
        }
    }
}
