//! Shared fixtures for the service integration tests: in-memory and
//! always-failing storage doubles, service constructors, and a listing
//! builder.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use proplens_core::roles::RoleSet;
use proplens_core::types::UserId;
use proplens_db::models::listing_case::{CreateListingCase, ListingCase};
use proplens_db::models::status::{MediaType, PropertyType, SaleCategory};
use proplens_services::config::PublicListingConfig;
use proplens_services::final_selection::FinalSelectionService;
use proplens_services::history::{CaseHistorySink, SqlCaseHistorySink};
use proplens_services::listing_case::ListingCaseService;
use proplens_services::media::{MediaService, UploadFile};
use proplens_services::storage::{ObjectStorage, StorageError};

/// Storage double backed by a map. Object URLs are `mem://{path}`.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn contains(&self, url: &str) -> bool {
        self.objects.lock().unwrap().contains_key(url)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bytes: &[u8],
        _content_type: &str,
        path: &str,
    ) -> Result<String, StorageError> {
        let url = format!("mem://{path}");
        self.objects.lock().unwrap().insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        Ok(self.objects.lock().unwrap().remove(url).is_some())
    }

    async fn read_url(&self, url: &str, ttl: Duration) -> Result<String, StorageError> {
        if !self.contains(url) {
            return Err(StorageError::NotFound(url.to_string()));
        }
        Ok(format!("{url}?ttl={}", ttl.as_secs()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(url.to_string()))
    }
}

/// Storage double whose every call fails, for swallow-proof tests.
pub struct FailingStorage;

#[async_trait]
impl ObjectStorage for FailingStorage {
    async fn upload(&self, _: &[u8], _: &str, _: &str) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("upload refused".to_string()))
    }

    async fn delete(&self, _: &str) -> Result<bool, StorageError> {
        Err(StorageError::Unavailable("delete refused".to_string()))
    }

    async fn read_url(&self, _: &str, _: Duration) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("read refused".to_string()))
    }

    async fn download(&self, _: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::Unavailable("download refused".to_string()))
    }
}

pub fn history_sink(pool: &PgPool) -> Arc<dyn CaseHistorySink> {
    Arc::new(SqlCaseHistorySink::new(pool.clone()))
}

pub fn lifecycle_service(pool: &PgPool) -> ListingCaseService {
    ListingCaseService::new(
        pool.clone(),
        history_sink(pool),
        PublicListingConfig::new("https://listings.test/l"),
    )
}

pub fn selection_service(pool: &PgPool) -> FinalSelectionService {
    FinalSelectionService::new(pool.clone(), history_sink(pool))
}

pub fn media_service(pool: &PgPool, storage: Arc<dyn ObjectStorage>) -> MediaService {
    MediaService::new(pool.clone(), storage, history_sink(pool))
}

pub fn new_listing(title: &str) -> CreateListingCase {
    CreateListingCase {
        title: title.to_string(),
        description: Some("service test fixture".to_string()),
        street: "5 Service Way".to_string(),
        city: "Adelaide".to_string(),
        state: "SA".to_string(),
        postal_code: 5000,
        bedrooms: 3,
        bathrooms: 2,
        garages: 1,
        floor_area: Some(150.0),
        price: Some(650_000.0),
        latitude: None,
        longitude: None,
        property_type: PropertyType::House,
        sale_category: SaleCategory::ForSale,
    }
}

/// Create a listing through the service as a photography company.
pub async fn seed_listing(
    svc: &ListingCaseService,
    owner: UserId,
    title: &str,
) -> ListingCase {
    svc.create(owner, &RoleSet::photography_company(), new_listing(title))
        .await
        .unwrap()
}

pub fn photo_file(name: &str) -> UploadFile {
    UploadFile {
        file_name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

pub fn photo_type() -> MediaType {
    MediaType::Photo
}
