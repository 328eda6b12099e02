use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::api::{ItemId, UserId, UserSummary};
use crate::booking_service::BookingService;
use crate::bookings_repository::BookingsRepository;
use crate::clock::Clock;
use crate::item_catalog::{CatalogItem, ItemCatalog, ItemCatalogError};
use crate::user_directory::{UserDirectory, UserDirectoryError};

/// Deterministic base instant for tests.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap()
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub struct FakeUserDirectory {
    users: HashMap<UserId, UserSummary>,
}

impl FakeUserDirectory {
    pub fn with_users(users: Vec<UserSummary>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

#[async_trait::async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn resolve_user(&self, user_id: UserId) -> Result<UserSummary, UserDirectoryError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or(UserDirectoryError::NotFound(user_id))
    }
}

#[derive(Default)]
pub struct FakeItemCatalog {
    items: HashMap<ItemId, CatalogItem>,
}

impl FakeItemCatalog {
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id, i)).collect(),
        }
    }
}

#[async_trait::async_trait]
impl ItemCatalog for FakeItemCatalog {
    async fn resolve_item(&self, item_id: ItemId) -> Result<CatalogItem, ItemCatalogError> {
        self.items
            .get(&item_id)
            .cloned()
            .ok_or(ItemCatalogError::NotFound(item_id))
    }
}

pub fn user(id: UserId, name: &str) -> UserSummary {
    UserSummary {
        id,
        name: name.to_string(),
    }
}

pub fn item(id: ItemId, name: &str, owner_id: UserId, available: bool) -> CatalogItem {
    CatalogItem {
        id,
        name: name.to_string(),
        owner_id,
        available,
    }
}

pub fn service_with(
    repository: Arc<dyn BookingsRepository>,
    users: Vec<UserSummary>,
    items: Vec<CatalogItem>,
    now: DateTime<Utc>,
) -> BookingService {
    BookingService::new(
        repository,
        Arc::new(FakeUserDirectory::with_users(users)),
        Arc::new(FakeItemCatalog::with_items(items)),
        Arc::new(FixedClock(now)),
    )
}

/// Users 1 (booker) and 2 (owner of items 10 and 11; 11 unavailable),
/// clocked at `now`.
pub fn standard_service(
    repository: Arc<dyn BookingsRepository>,
    now: DateTime<Utc>,
) -> BookingService {
    service_with(
        repository,
        vec![user(1, "booker"), user(2, "owner"), user(3, "stranger")],
        vec![item(10, "drill", 2, true), item(11, "ladder", 2, false)],
        now,
    )
}
