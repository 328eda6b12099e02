pub use in_memory_bookings_repository::InMemoryBookingsRepository;
pub use postgres_bookings_repository::{
    PostgresBookingsRepository, PostgresBookingsRepositoryConfig,
};

use chrono::{DateTime, Utc};

use crate::api::{Booking, BookingId, BookingStatus, ItemId, ItemSummary, UserId, UserSummary};

mod in_memory_bookings_repository;
mod postgres_bookings_repository;

#[derive(Debug, thiserror::Error)]
pub enum BookingsRepositoryError {
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

/// Input for a new booking. The store assigns the id and stores it in
/// `Waiting` status.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookingDraft {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item: ItemSummary,
    pub booker: UserSummary,
}

/// One of the fixed shapes the list queries are served from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BookingFilter {
    All,
    /// `start < now < end`
    Current(DateTime<Utc>),
    /// `end < now`
    Past(DateTime<Utc>),
    /// `start > now`
    Future(DateTime<Utc>),
    Status(BookingStatus),
}

/// Page bounds for the list queries, already snapped to a page boundary:
/// `offset` is a multiple of `limit`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

#[async_trait::async_trait]
pub trait BookingsRepository: Send + Sync {
    /// Persists a new booking in `Waiting` status and returns it with its
    /// assigned id.
    async fn add_booking(&self, draft: BookingDraft) -> Result<Booking, BookingsRepositoryError>;

    async fn get_booking(&self, booking_id: BookingId)
        -> Result<Booking, BookingsRepositoryError>;

    /// Flips the status of a booking that is still `Waiting`. Returns `None`
    /// when no waiting booking with that id exists, so two concurrent
    /// decisions cannot both apply: the store serializes the writes and the
    /// loser sees `None`.
    async fn update_status_if_waiting(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingsRepositoryError>;

    /// Bookings made by `booker_id`, newest start first.
    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError>;

    /// Bookings of items owned by `owner_id`, newest start first.
    async fn find_by_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError>;

    /// The booking of the item that ended most recently before `now`.
    async fn find_last_booking(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError>;

    /// The booking of the item that starts soonest after `now`.
    async fn find_next_booking(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError>;

    /// An approved booking of `item_id` by `booker_id` that ended before
    /// `now`; which one is store-defined if several match.
    async fn find_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError>;
}
