use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::{
    AddBookingRequest, Booking, BookingId, BookingState, BookingStatus, ItemId, ItemSummary,
    UserId, UserSummary,
};
use crate::auth;
use crate::bookings_repository::{
    BookingDraft, BookingFilter, BookingsRepository, BookingsRepositoryError, Page,
};
use crate::clock::Clock;
use crate::item_catalog::{CatalogItem, ItemCatalog, ItemCatalogError};
use crate::user_directory::{UserDirectory, UserDirectoryError};

#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),

    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    #[error("User {user_id} is not allowed to book own item {item_id}")]
    OwnItemBooking { user_id: UserId, item_id: ItemId },

    #[error("Item {0} is unavailable for booking")]
    ItemUnavailable(ItemId),

    #[error("Booking end ({end}) is not after start ({start})")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Booking start ({0}) is in the past")]
    StartInPast(DateTime<Utc>),

    #[error("User {user_id} is not allowed to change booking {booking_id}")]
    NotItemOwner {
        user_id: UserId,
        booking_id: BookingId,
    },

    #[error("Booking {0} is already approved")]
    AlreadyApproved(BookingId),

    #[error("Booking {0} is already rejected")]
    AlreadyRejected(BookingId),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Invalid page bounds: from={from} size={size}")]
    InvalidPageBounds { from: i64, size: i64 },

    #[error(transparent)]
    Repository(BookingsRepositoryError),

    #[error("User directory failure: {0}")]
    UserDirectory(UserDirectoryError),

    #[error("Item catalog failure: {0}")]
    ItemCatalog(ItemCatalogError),
}

/// Booking lifecycle and the queries served from the booking store.
///
/// Holds no booking state of its own: every operation re-reads the store,
/// and the only wall-clock access goes through the injected [`Clock`].
pub struct BookingService {
    repository: Arc<dyn BookingsRepository>,
    user_directory: Arc<dyn UserDirectory>,
    item_catalog: Arc<dyn ItemCatalog>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        repository: Arc<dyn BookingsRepository>,
        user_directory: Arc<dyn UserDirectory>,
        item_catalog: Arc<dyn ItemCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            user_directory,
            item_catalog,
            clock,
        }
    }

    pub async fn add_booking(
        &self,
        requester_id: UserId,
        request: AddBookingRequest,
    ) -> Result<Booking, BookingServiceError> {
        let booker = self.resolve_user(requester_id).await?;
        let item = self.resolve_item(request.item_id).await?;
        self.validate_new_booking(requester_id, &item, &request)?;

        let booking = self
            .repository
            .add_booking(BookingDraft {
                start: request.start,
                end: request.end,
                item: ItemSummary {
                    id: item.id,
                    name: item.name,
                    owner_id: item.owner_id,
                },
                booker,
            })
            .await
            .map_err(BookingServiceError::Repository)?;
        tracing::info!("Booking {} successfully added", booking.id);
        Ok(booking)
    }

    fn validate_new_booking(
        &self,
        requester_id: UserId,
        item: &CatalogItem,
        request: &AddBookingRequest,
    ) -> Result<(), BookingServiceError> {
        if requester_id == item.owner_id {
            tracing::warn!("User {} attempted to book own item {}", requester_id, item.id);
            return Err(BookingServiceError::OwnItemBooking {
                user_id: requester_id,
                item_id: item.id,
            });
        }
        if !item.available {
            return Err(BookingServiceError::ItemUnavailable(item.id));
        }
        if request.end <= request.start {
            return Err(BookingServiceError::EndNotAfterStart {
                start: request.start,
                end: request.end,
            });
        }
        // end > start together with this check also keeps end in the future.
        if request.start < self.clock.now() {
            return Err(BookingServiceError::StartInPast(request.start));
        }
        Ok(())
    }

    pub async fn update_booking_status(
        &self,
        actor_id: UserId,
        booking_id: BookingId,
        approved: bool,
    ) -> Result<Booking, BookingServiceError> {
        let booking = self.get_stored_booking(booking_id).await?;
        // Ownership is asserted against the live item record, not the
        // snapshot taken at creation time.
        let item = self.resolve_item(booking.item.id).await?;
        if !auth::can_decide(actor_id, item.owner_id) {
            return Err(BookingServiceError::NotItemOwner {
                user_id: actor_id,
                booking_id,
            });
        }
        match booking.status {
            BookingStatus::Approved => {
                tracing::warn!("Booking {} is already approved", booking_id);
                return Err(BookingServiceError::AlreadyApproved(booking_id));
            }
            BookingStatus::Rejected => {
                tracing::warn!("Booking {} is already rejected", booking_id);
                return Err(BookingServiceError::AlreadyRejected(booking_id));
            }
            BookingStatus::Waiting => {}
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        match self
            .repository
            .update_status_if_waiting(booking_id, status)
            .await
            .map_err(BookingServiceError::Repository)?
        {
            Some(updated) => {
                tracing::info!("Booking {} status successfully updated", updated.id);
                Ok(updated)
            }
            None => {
                // A concurrent decision got there first; report the terminal
                // state it left behind.
                let current = self.get_stored_booking(booking_id).await?;
                Err(match current.status {
                    BookingStatus::Rejected => BookingServiceError::AlreadyRejected(booking_id),
                    _ => BookingServiceError::AlreadyApproved(booking_id),
                })
            }
        }
    }

    pub async fn get_booking(
        &self,
        actor_id: UserId,
        booking_id: BookingId,
    ) -> Result<Booking, BookingServiceError> {
        self.resolve_user(actor_id).await?;
        let booking = self.get_stored_booking(booking_id).await?;
        if !auth::can_view(actor_id, &booking) {
            // Deliberately indistinguishable from an absent booking.
            tracing::warn!("User {} is not allowed to view booking {}", actor_id, booking_id);
            return Err(BookingServiceError::BookingNotFound(booking_id));
        }
        Ok(booking)
    }

    pub async fn get_requester_bookings(
        &self,
        user_id: UserId,
        state: &str,
        from: i64,
        size: i64,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        let state = parse_state(state)?;
        self.resolve_user(user_id).await?;
        let page = page_bounds(from, size)?;
        self.repository
            .find_by_booker(user_id, self.filter_for(state), page)
            .await
            .map_err(BookingServiceError::Repository)
    }

    pub async fn get_owner_bookings(
        &self,
        user_id: UserId,
        state: &str,
        from: i64,
        size: i64,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        let state = parse_state(state)?;
        self.resolve_user(user_id).await?;
        let page = page_bounds(from, size)?;
        self.repository
            .find_by_owner(user_id, self.filter_for(state), page)
            .await
            .map_err(BookingServiceError::Repository)
    }

    /// The most recently finished booking of the item, for item-detail
    /// enrichment.
    pub async fn last_booking_of_item(
        &self,
        item_id: ItemId,
    ) -> Result<Option<Booking>, BookingServiceError> {
        self.repository
            .find_last_booking(item_id, self.clock.now())
            .await
            .map_err(BookingServiceError::Repository)
    }

    /// The soonest upcoming booking of the item, for item-detail enrichment.
    pub async fn next_booking_of_item(
        &self,
        item_id: ItemId,
    ) -> Result<Option<Booking>, BookingServiceError> {
        self.repository
            .find_next_booking(item_id, self.clock.now())
            .await
            .map_err(BookingServiceError::Repository)
    }

    /// An approved, already finished booking of the item by the user.
    /// The comment subsystem uses this to decide who may review an item.
    pub async fn completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Booking>, BookingServiceError> {
        self.repository
            .find_completed_booking(booker_id, item_id, self.clock.now())
            .await
            .map_err(BookingServiceError::Repository)
    }

    fn filter_for(&self, state: BookingState) -> BookingFilter {
        match state {
            BookingState::All => BookingFilter::All,
            BookingState::Current => BookingFilter::Current(self.clock.now()),
            BookingState::Past => BookingFilter::Past(self.clock.now()),
            BookingState::Future => BookingFilter::Future(self.clock.now()),
            BookingState::Waiting => BookingFilter::Status(BookingStatus::Waiting),
            BookingState::Rejected => BookingFilter::Status(BookingStatus::Rejected),
        }
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<UserSummary, BookingServiceError> {
        self.user_directory
            .resolve_user(user_id)
            .await
            .map_err(|err| match err {
                UserDirectoryError::NotFound(id) => BookingServiceError::UserNotFound(id),
                other => BookingServiceError::UserDirectory(other),
            })
    }

    async fn resolve_item(&self, item_id: ItemId) -> Result<CatalogItem, BookingServiceError> {
        self.item_catalog
            .resolve_item(item_id)
            .await
            .map_err(|err| match err {
                ItemCatalogError::NotFound(id) => BookingServiceError::ItemNotFound(id),
                other => BookingServiceError::ItemCatalog(other),
            })
    }

    async fn get_stored_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Booking, BookingServiceError> {
        self.repository
            .get_booking(booking_id)
            .await
            .map_err(|err| match err {
                BookingsRepositoryError::BookingNotFound(id) => {
                    BookingServiceError::BookingNotFound(id)
                }
                other => BookingServiceError::Repository(other),
            })
    }
}

fn parse_state(value: &str) -> Result<BookingState, BookingServiceError> {
    BookingState::parse(value).ok_or_else(|| {
        tracing::warn!("Unknown state: {}", value);
        BookingServiceError::UnknownState(value.to_string())
    })
}

/// Pages are selected as `page = from / size`, so a `from` that is not a
/// multiple of `size` snaps down to the containing page boundary.
fn page_bounds(from: i64, size: i64) -> Result<Page, BookingServiceError> {
    if from < 0 || size < 1 {
        return Err(BookingServiceError::InvalidPageBounds { from, size });
    }
    Ok(Page {
        offset: from / size * size,
        limit: size,
    })
}

#[cfg(test)]
mod booking_service_tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::bookings_repository::InMemoryBookingsRepository;
    use crate::test_support::{base_time, standard_service};

    fn window(hours_from_now: i64, duration_hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = base_time() + Duration::hours(hours_from_now);
        (start, start + Duration::hours(duration_hours))
    }

    fn request(item_id: ItemId, window: (DateTime<Utc>, DateTime<Utc>)) -> AddBookingRequest {
        AddBookingRequest {
            item_id,
            start: window.0,
            end: window.1,
        }
    }

    #[tokio::test]
    async fn add_booking_starts_waiting_and_round_trips() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let booking = service.add_booking(1, request(10, window(1, 1))).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Waiting);
        assert_eq!(booking.booker.id, 1);
        assert_eq!(booking.item.id, 10);
        assert_eq!(booking.item.owner_id, 2);

        // Both participants read back identical field values.
        let seen_by_booker = service.get_booking(1, booking.id).await.unwrap();
        let seen_by_owner = service.get_booking(2, booking.id).await.unwrap();
        assert_eq!(seen_by_booker, booking);
        assert_eq!(seen_by_owner, booking);
    }

    #[tokio::test]
    async fn add_booking_rejects_unknown_user_and_item() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let unknown_user = service.add_booking(99, request(10, window(1, 1))).await;
        assert!(matches!(
            unknown_user,
            Err(BookingServiceError::UserNotFound(99))
        ));

        let unknown_item = service.add_booking(1, request(99, window(1, 1))).await;
        assert!(matches!(
            unknown_item,
            Err(BookingServiceError::ItemNotFound(99))
        ));
    }

    #[tokio::test]
    async fn add_booking_forbids_booking_own_item() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let result = service.add_booking(2, request(10, window(1, 1))).await;
        assert!(matches!(
            result,
            Err(BookingServiceError::OwnItemBooking {
                user_id: 2,
                item_id: 10
            })
        ));

        // The owner check wins even when the window is broken too.
        let broken_window = service.add_booking(2, request(10, window(1, -2))).await;
        assert!(matches!(
            broken_window,
            Err(BookingServiceError::OwnItemBooking { .. })
        ));
    }

    #[tokio::test]
    async fn add_booking_rejects_unavailable_item() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let result = service.add_booking(1, request(11, window(1, 1))).await;
        assert!(matches!(
            result,
            Err(BookingServiceError::ItemUnavailable(11))
        ));
    }

    #[tokio::test]
    async fn add_booking_rejects_bad_windows() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let reversed = service.add_booking(1, request(10, window(2, -1))).await;
        assert!(matches!(
            reversed,
            Err(BookingServiceError::EndNotAfterStart { .. })
        ));

        let empty = service.add_booking(1, request(10, window(2, 0))).await;
        assert!(matches!(
            empty,
            Err(BookingServiceError::EndNotAfterStart { .. })
        ));

        let in_past = service.add_booking(1, request(10, window(-2, 1))).await;
        assert!(matches!(in_past, Err(BookingServiceError::StartInPast(_))));

        // A window starting exactly now is still allowed.
        let starts_now = service.add_booking(1, request(10, window(0, 1))).await;
        assert!(starts_now.is_ok());
    }

    #[tokio::test]
    async fn decide_transitions_are_one_way() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let booking = service.add_booking(1, request(10, window(1, 1))).await.unwrap();

        let approved = service
            .update_booking_status(2, booking.id, true)
            .await
            .unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let again = service.update_booking_status(2, booking.id, true).await;
        assert!(matches!(
            again,
            Err(BookingServiceError::AlreadyApproved(_))
        ));
        let flip = service.update_booking_status(2, booking.id, false).await;
        assert!(matches!(flip, Err(BookingServiceError::AlreadyApproved(_))));

        // Status stayed what the first decision made it.
        assert_eq!(
            service.get_booking(2, booking.id).await.unwrap().status,
            BookingStatus::Approved
        );

        let rejected_booking = service.add_booking(1, request(10, window(3, 1))).await.unwrap();
        let rejected = service
            .update_booking_status(2, rejected_booking.id, false)
            .await
            .unwrap();
        assert_eq!(rejected.status, BookingStatus::Rejected);
        let again = service
            .update_booking_status(2, rejected_booking.id, true)
            .await;
        assert!(matches!(
            again,
            Err(BookingServiceError::AlreadyRejected(_))
        ));
    }

    #[tokio::test]
    async fn decide_requires_the_item_owner() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let booking = service.add_booking(1, request(10, window(1, 1))).await.unwrap();

        let by_booker = service.update_booking_status(1, booking.id, true).await;
        assert!(matches!(
            by_booker,
            Err(BookingServiceError::NotItemOwner {
                user_id: 1,
                ..
            })
        ));
        let by_stranger = service.update_booking_status(3, booking.id, true).await;
        assert!(matches!(
            by_stranger,
            Err(BookingServiceError::NotItemOwner { .. })
        ));

        let missing = service.update_booking_status(2, 9999, true).await;
        assert!(matches!(
            missing,
            Err(BookingServiceError::BookingNotFound(9999))
        ));
    }

    #[tokio::test]
    async fn get_booking_conceals_existence_from_strangers() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let booking = service.add_booking(1, request(10, window(1, 1))).await.unwrap();

        let by_stranger = service.get_booking(3, booking.id).await;
        assert!(matches!(
            by_stranger,
            Err(BookingServiceError::BookingNotFound(_))
        ));

        let by_unknown_user = service.get_booking(99, booking.id).await;
        assert!(matches!(
            by_unknown_user,
            Err(BookingServiceError::UserNotFound(99))
        ));
    }

    #[tokio::test]
    async fn list_states_split_on_the_clock() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository.clone(), base_time());

        // One booking per temporal bucket; windows placed around base_time
        // but all created through a clock pinned before they start.
        let early_service = standard_service(repository.clone(), base_time() - Duration::days(7));
        let past = early_service
            .add_booking(1, request(10, (base_time() - Duration::hours(3), base_time() - Duration::hours(1))))
            .await
            .unwrap();
        let current = early_service
            .add_booking(1, request(10, (base_time() - Duration::hours(1), base_time() + Duration::hours(1))))
            .await
            .unwrap();
        let future = early_service
            .add_booking(1, request(10, (base_time() + Duration::hours(1), base_time() + Duration::hours(2))))
            .await
            .unwrap();

        let ids = |bookings: Vec<Booking>| bookings.iter().map(|b| b.id).collect::<Vec<_>>();

        let all = service.get_requester_bookings(1, "ALL", 0, 10).await.unwrap();
        assert_eq!(ids(all), vec![future.id, current.id, past.id]);
        let current_list = service.get_requester_bookings(1, "CURRENT", 0, 10).await.unwrap();
        assert_eq!(ids(current_list), vec![current.id]);
        let past_list = service.get_requester_bookings(1, "PAST", 0, 10).await.unwrap();
        assert_eq!(ids(past_list), vec![past.id]);
        let future_list = service.get_requester_bookings(1, "FUTURE", 0, 10).await.unwrap();
        assert_eq!(ids(future_list), vec![future.id]);

        // Owner sees the same bookings through the owner view; the booker
        // owns nothing.
        let owner_all = service.get_owner_bookings(2, "ALL", 0, 10).await.unwrap();
        assert_eq!(owner_all.len(), 3);
        assert!(service.get_owner_bookings(1, "ALL", 0, 10).await.unwrap().is_empty());

        // Moving the clock across the current booking's end flips buckets.
        let later_service = standard_service(repository, base_time() + Duration::hours(2));
        let current_later = later_service
            .get_requester_bookings(1, "CURRENT", 0, 10)
            .await
            .unwrap();
        assert!(current_later.is_empty());
        let past_later = later_service
            .get_requester_bookings(1, "PAST", 0, 10)
            .await
            .unwrap();
        assert_eq!(ids(past_later), vec![current.id, past.id]);
    }

    #[tokio::test]
    async fn waiting_list_empties_after_approval() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let booking = service.add_booking(1, request(10, window(1, 1))).await.unwrap();

        let waiting = service.get_requester_bookings(1, "WAITING", 0, 10).await.unwrap();
        assert_eq!(waiting.iter().map(|b| b.id).collect::<Vec<_>>(), vec![booking.id]);

        service.update_booking_status(2, booking.id, true).await.unwrap();
        assert!(service
            .get_requester_bookings(1, "WAITING", 0, 10)
            .await
            .unwrap()
            .is_empty());

        // APPROVED is not a recognized listing state.
        let approved_list = service.get_requester_bookings(1, "APPROVED", 0, 10).await;
        assert!(matches!(
            approved_list,
            Err(BookingServiceError::UnknownState(_))
        ));

        let rejected_booking = service.add_booking(1, request(10, window(3, 1))).await.unwrap();
        service
            .update_booking_status(2, rejected_booking.id, false)
            .await
            .unwrap();
        let rejected_list = service.get_requester_bookings(1, "REJECTED", 0, 10).await.unwrap();
        assert_eq!(
            rejected_list.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![rejected_booking.id]
        );
    }

    #[tokio::test]
    async fn list_rejects_bad_state_user_and_page_bounds() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let unknown_state = service.get_requester_bookings(1, "SOON", 0, 10).await;
        assert!(matches!(
            unknown_state,
            Err(BookingServiceError::UnknownState(ref s)) if s == "SOON"
        ));
        // Lowercase is not recognized either.
        assert!(service.get_requester_bookings(1, "all", 0, 10).await.is_err());

        // The state is checked before the user is resolved.
        let unknown_both = service.get_requester_bookings(99, "SOON", 0, 10).await;
        assert!(matches!(
            unknown_both,
            Err(BookingServiceError::UnknownState(_))
        ));
        let unknown_user = service.get_owner_bookings(99, "ALL", 0, 10).await;
        assert!(matches!(
            unknown_user,
            Err(BookingServiceError::UserNotFound(99))
        ));

        let negative_from = service.get_requester_bookings(1, "ALL", -1, 10).await;
        assert!(matches!(
            negative_from,
            Err(BookingServiceError::InvalidPageBounds { .. })
        ));
        let zero_size = service.get_requester_bookings(1, "ALL", 0, 0).await;
        assert!(matches!(
            zero_size,
            Err(BookingServiceError::InvalidPageBounds { .. })
        ));
    }

    #[tokio::test]
    async fn list_pages_snap_to_page_boundaries() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository, base_time());

        let mut ids = vec![];
        for hour in 1..=5 {
            let booking = service
                .add_booking(1, request(10, window(hour, 1)))
                .await
                .unwrap();
            ids.push(booking.id);
        }
        // Newest start first.
        ids.reverse();

        let page = service.get_requester_bookings(1, "ALL", 2, 2).await.unwrap();
        assert_eq!(page.iter().map(|b| b.id).collect::<Vec<_>>(), ids[2..4].to_vec());

        // from=3 is inside page 1 (3 / 2 == 1), so the same page comes back.
        let snapped = service.get_requester_bookings(1, "ALL", 3, 2).await.unwrap();
        assert_eq!(snapped.iter().map(|b| b.id).collect::<Vec<_>>(), ids[2..4].to_vec());

        let tail = service.get_requester_bookings(1, "ALL", 4, 2).await.unwrap();
        assert_eq!(tail.iter().map(|b| b.id).collect::<Vec<_>>(), ids[4..5].to_vec());
    }

    #[tokio::test]
    async fn item_queries_pick_last_next_and_completed() {
        let repository = Arc::new(InMemoryBookingsRepository::default());
        let service = standard_service(repository.clone(), base_time());

        let early_service = standard_service(repository, base_time() - Duration::days(7));
        let past = early_service
            .add_booking(1, request(10, (base_time() - Duration::days(1), base_time() - Duration::hours(20))))
            .await
            .unwrap();
        let future = early_service
            .add_booking(1, request(10, (base_time() + Duration::days(1), base_time() + Duration::days(2))))
            .await
            .unwrap();

        let last = service.last_booking_of_item(10).await.unwrap().unwrap();
        assert_eq!(last.id, past.id);
        let next = service.next_booking_of_item(10).await.unwrap().unwrap();
        assert_eq!(next.id, future.id);
        assert!(service.last_booking_of_item(11).await.unwrap().is_none());
        assert!(service.next_booking_of_item(11).await.unwrap().is_none());

        // Only an approved, finished rental makes the booker comment-eligible.
        assert!(service.completed_booking(1, 10).await.unwrap().is_none());
        service.update_booking_status(2, past.id, true).await.unwrap();
        let completed = service.completed_booking(1, 10).await.unwrap().unwrap();
        assert_eq!(completed.id, past.id);
        assert!(service.completed_booking(3, 10).await.unwrap().is_none());
    }
}
