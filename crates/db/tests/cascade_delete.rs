//! Integration tests for the cascading soft delete.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Deleting a listing flips it and soft-deletes its media in one go
//! - Assignment and contact rows are removed outright
//! - A neighbouring listing and its dependents are untouched
//! - The cascade is idempotent and reports a missing listing as `false`

use sqlx::PgPool;

use proplens_db::models::case_contact::CreateCaseContact;
use proplens_db::models::listing_case::CreateListingCase;
use proplens_db::models::media_asset::CreateMediaAsset;
use proplens_db::models::status::{MediaType, PropertyType, SaleCategory};
use proplens_db::repositories::{
    AgentAssignmentRepo, CaseContactRepo, ListingCaseRepo, MediaAssetRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_listing(title: &str) -> CreateListingCase {
    CreateListingCase {
        title: title.to_string(),
        description: None,
        street: "12 Harbour St".to_string(),
        city: "Sydney".to_string(),
        state: "NSW".to_string(),
        postal_code: 2000,
        bedrooms: 3,
        bathrooms: 2,
        garages: 1,
        floor_area: Some(140.0),
        price: Some(950_000.0),
        latitude: None,
        longitude: None,
        property_type: PropertyType::House,
        sale_category: SaleCategory::ForSale,
    }
}

fn new_photo(listing_case_id: i64, url: &str) -> CreateMediaAsset {
    CreateMediaAsset {
        listing_case_id,
        media_type: MediaType::Photo,
        url: url.to_string(),
        uploader_user_id: 10,
    }
}

fn new_contact(email: &str) -> CreateCaseContact {
    CreateCaseContact {
        first_name: "Ada".to_string(),
        last_name: "Nguyen".to_string(),
        company_name: None,
        profile_url: None,
        email: email.to_string(),
        phone: "0400000000".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: cascade flips listing, soft-deletes media, removes dependents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cascade_hits_every_dependent_kind(pool: PgPool) {
    let listing = ListingCaseRepo::create(&pool, &new_listing("Full Cascade"), 10)
        .await
        .unwrap();
    let media = MediaAssetRepo::create_many(
        &pool,
        &[
            new_photo(listing.id, "s3://m/1.jpg"),
            new_photo(listing.id, "s3://m/2.jpg"),
        ],
    )
    .await
    .unwrap();
    AgentAssignmentRepo::assign(&pool, 77, listing.id).await.unwrap();
    CaseContactRepo::create(&pool, listing.id, &new_contact("ada@example.com"))
        .await
        .unwrap();

    let deleted = ListingCaseRepo::soft_delete_cascade(&pool, listing.id)
        .await
        .unwrap();
    assert!(deleted, "cascade should report success for an existing listing");

    // Listing is hidden but the row survives.
    assert!(
        ListingCaseRepo::find_by_id(&pool, listing.id).await.unwrap().is_none(),
        "listing should be hidden after cascade"
    );
    let raw = ListingCaseRepo::find_by_id_include_deleted(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert!(raw.is_deleted);

    // Media rows survive but are flagged deleted.
    for m in &media {
        let row = MediaAssetRepo::find_by_id(&pool, m.id).await.unwrap().unwrap();
        assert!(row.is_deleted, "media {} should be soft-deleted", m.id);
    }
    assert!(
        MediaAssetRepo::list_by_listing(&pool, listing.id).await.unwrap().is_empty(),
        "live media list should be empty after cascade"
    );

    // Assignment and contact rows are gone.
    assert!(!AgentAssignmentRepo::is_assigned(&pool, 77, listing.id).await.unwrap());
    assert!(
        CaseContactRepo::list_by_listing(&pool, listing.id).await.unwrap().is_empty(),
        "contacts should be removed by the cascade"
    );
}

// ---------------------------------------------------------------------------
// Test: a neighbouring listing is untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cascade_leaves_neighbour_alone(pool: PgPool) {
    let doomed = ListingCaseRepo::create(&pool, &new_listing("Doomed"), 10)
        .await
        .unwrap();
    let neighbour = ListingCaseRepo::create(&pool, &new_listing("Neighbour"), 10)
        .await
        .unwrap();
    MediaAssetRepo::create_many(&pool, &[new_photo(neighbour.id, "s3://n/1.jpg")])
        .await
        .unwrap();
    AgentAssignmentRepo::assign(&pool, 77, neighbour.id).await.unwrap();

    ListingCaseRepo::soft_delete_cascade(&pool, doomed.id).await.unwrap();

    assert!(
        ListingCaseRepo::find_by_id(&pool, neighbour.id).await.unwrap().is_some(),
        "neighbour listing should still be live"
    );
    assert_eq!(
        MediaAssetRepo::list_by_listing(&pool, neighbour.id).await.unwrap().len(),
        1,
        "neighbour media should survive"
    );
    assert!(AgentAssignmentRepo::is_assigned(&pool, 77, neighbour.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: cascade is idempotent and missing listings report false
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cascade_idempotent_and_missing(pool: PgPool) {
    let listing = ListingCaseRepo::create(&pool, &new_listing("Twice"), 10)
        .await
        .unwrap();

    assert!(ListingCaseRepo::soft_delete_cascade(&pool, listing.id).await.unwrap());
    assert!(
        ListingCaseRepo::soft_delete_cascade(&pool, listing.id).await.unwrap(),
        "second cascade on a deleted listing should still converge"
    );
    let raw = ListingCaseRepo::find_by_id_include_deleted(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert!(raw.is_deleted, "listing stays deleted after repeat cascade");

    assert!(
        !ListingCaseRepo::soft_delete_cascade(&pool, 999_999).await.unwrap(),
        "cascade on a missing listing should report false"
    );
}
