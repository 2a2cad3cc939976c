//! Integration tests for the scoped, filtered, paged listing search.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Scope narrows results to owned / assigned listings, and `Nothing`
//!   returns an empty page with a zero total
//! - Keyword, field, and range filters compose
//! - Sort whitelist is honoured and unknown fields fall back
//! - Paging reports the unpaged total and respects the clamp

use sqlx::PgPool;

use proplens_core::scope::ListingScope;
use proplens_db::models::listing_case::CreateListingCase;
use proplens_db::models::page::{ListingCaseQuery, SortDir, MAX_PAGE_SIZE};
use proplens_db::models::status::{PropertyType, SaleCategory};
use proplens_db::repositories::{AgentAssignmentRepo, ListingCaseRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn listing(title: &str, city: &str, bedrooms: i32, price: f64) -> CreateListingCase {
    CreateListingCase {
        title: title.to_string(),
        description: Some("search fixture".to_string()),
        street: "1 Test Ln".to_string(),
        city: city.to_string(),
        state: "NSW".to_string(),
        postal_code: 2000,
        bedrooms,
        bathrooms: 1,
        garages: 1,
        floor_area: None,
        price: Some(price),
        latitude: None,
        longitude: None,
        property_type: PropertyType::House,
        sale_category: SaleCategory::ForSale,
    }
}

fn query() -> ListingCaseQuery {
    ListingCaseQuery::default()
}

// ---------------------------------------------------------------------------
// Test: ownership scope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_scope_filters_rows(pool: PgPool) {
    ListingCaseRepo::create(&pool, &listing("Mine A", "Sydney", 3, 900_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Mine B", "Sydney", 2, 700_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Theirs", "Sydney", 4, 1_200_000.0), 20)
        .await
        .unwrap();

    let page = ListingCaseRepo::search(&pool, &ListingScope::OwnedBy(10), &query())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|l| l.owner_user_id == 10));

    let all = ListingCaseRepo::search(&pool, &ListingScope::All, &query())
        .await
        .unwrap();
    assert_eq!(all.total, 3, "All scope sees every live listing");
}

// ---------------------------------------------------------------------------
// Test: assignment scope and the empty scope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_assignment_and_nothing_scopes(pool: PgPool) {
    let assigned = ListingCaseRepo::create(&pool, &listing("Assigned", "Perth", 3, 800_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Unassigned", "Perth", 3, 800_000.0), 10)
        .await
        .unwrap();
    AgentAssignmentRepo::assign(&pool, 55, assigned.id).await.unwrap();

    let page = ListingCaseRepo::search(&pool, &ListingScope::AssignedTo(55), &query())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, assigned.id);

    let none = ListingCaseRepo::search(&pool, &ListingScope::Nothing, &query())
        .await
        .unwrap();
    assert_eq!(none.total, 0);
    assert!(none.items.is_empty(), "Nothing scope yields an empty page");
}

// ---------------------------------------------------------------------------
// Test: filters compose
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_filters_compose(pool: PgPool) {
    ListingCaseRepo::create(&pool, &listing("Harbour View", "Sydney", 4, 1_500_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Harbour Shack", "Sydney", 1, 400_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Hill House", "Hobart", 4, 600_000.0), 10)
        .await
        .unwrap();

    let params = ListingCaseQuery {
        keyword: Some("harbour".to_string()),
        city: Some("Sydney".to_string()),
        min_bedrooms: Some(3),
        min_price: Some(1_000_000.0),
        ..query()
    };
    let page = ListingCaseRepo::search(&pool, &ListingScope::All, &params)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title.as_deref(), Some("Harbour View"));
}

// ---------------------------------------------------------------------------
// Test: soft-deleted listings never appear
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_excludes_deleted(pool: PgPool) {
    let doomed = ListingCaseRepo::create(&pool, &listing("Doomed", "Sydney", 3, 900_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Alive", "Sydney", 3, 900_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::soft_delete_cascade(&pool, doomed.id).await.unwrap();

    let page = ListingCaseRepo::search(&pool, &ListingScope::All, &query())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title.as_deref(), Some("Alive"));
}

// ---------------------------------------------------------------------------
// Test: sorting by whitelist column
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_sort_by_price_ascending(pool: PgPool) {
    ListingCaseRepo::create(&pool, &listing("Mid", "Sydney", 3, 800_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Cheap", "Sydney", 3, 500_000.0), 10)
        .await
        .unwrap();
    ListingCaseRepo::create(&pool, &listing("Dear", "Sydney", 3, 1_100_000.0), 10)
        .await
        .unwrap();

    let params = ListingCaseQuery {
        sort_by: Some("price".to_string()),
        sort_dir: Some(SortDir::Asc),
        ..query()
    };
    let page = ListingCaseRepo::search(&pool, &ListingScope::All, &params)
        .await
        .unwrap();
    let titles: Vec<_> = page.items.iter().map(|l| l.title.as_deref().unwrap()).collect();
    assert_eq!(titles, vec!["Cheap", "Mid", "Dear"]);
}

// ---------------------------------------------------------------------------
// Test: paging clamp and totals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_paging_clamps_and_totals(pool: PgPool) {
    for i in 0..5 {
        ListingCaseRepo::create(&pool, &listing(&format!("L{i}"), "Sydney", 3, 500_000.0), 10)
            .await
            .unwrap();
    }

    // Oversized page size is clamped, not rejected.
    let params = ListingCaseQuery {
        page: 1,
        page_size: 5_000,
        ..query()
    };
    let page = ListingCaseRepo::search(&pool, &ListingScope::All, &params)
        .await
        .unwrap();
    assert_eq!(page.page_size, MAX_PAGE_SIZE);
    assert_eq!(page.total, 5);

    // Page zero is floored to one.
    let params = ListingCaseQuery {
        page: 0,
        page_size: 2,
        ..query()
    };
    let page = ListingCaseRepo::search(&pool, &ListingScope::All, &params)
        .await
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 5, "total is the unpaged count");

    // Last partial page.
    let params = ListingCaseQuery {
        page: 3,
        page_size: 2,
        ..query()
    };
    let page = ListingCaseRepo::search(&pool, &ListingScope::All, &params)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
}
