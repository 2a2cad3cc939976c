//! Listing case entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use proplens_core::types::{DbId, Timestamp, UserId};

use crate::models::status::{ListingStatus, PropertyType, SaleCategory};

/// A listing case row from the `listing_cases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingCase {
    pub id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub garages: i32,
    pub floor_area: Option<f64>,
    pub price: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub property_type: PropertyType,
    pub sale_category: SaleCategory,
    pub status: ListingStatus,
    pub is_deleted: bool,
    pub cover_image_url: Option<String>,
    pub public_url: Option<String>,
    pub owner_user_id: UserId,
    pub created_at: Timestamp,
}

/// DTO for creating a new listing case. Status and owner are assigned by
/// the service, never supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListingCase {
    pub title: String,
    pub description: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub garages: i32,
    pub floor_area: Option<f64>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: PropertyType,
    pub sale_category: SaleCategory,
}

/// DTO for rewriting a listing's descriptive and numeric fields.
///
/// This is a full rewrite of the property facts, not a patch; status,
/// owner, cover image, and publication state are never touched by it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListingCase {
    pub title: String,
    pub description: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub garages: i32,
    pub floor_area: Option<f64>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: PropertyType,
    pub sale_category: SaleCategory,
}

/// Raw operational view of a listing, bypassing scope and soft-delete
/// filters. For diagnostics only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingDebugState {
    pub id: DbId,
    pub status: ListingStatus,
    pub is_deleted: bool,
}

/// Minimal projection the access scoper needs for per-listing decisions.
#[derive(Debug, Clone, FromRow)]
pub struct ListingAccessRow {
    pub id: DbId,
    pub owner_user_id: UserId,
    pub status: ListingStatus,
    pub assigned_to_caller: bool,
}
