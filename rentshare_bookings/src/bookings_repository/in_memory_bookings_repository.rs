use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::api::{Booking, BookingId, BookingStatus, ItemId, UserId};
use crate::bookings_repository::{
    BookingDraft, BookingFilter, BookingsRepository, BookingsRepositoryError, Page,
};

pub struct InMemoryBookingsRepository {
    bookings: parking_lot::RwLock<HashMap<BookingId, Booking>>,
    booking_sequence_generator: AtomicI64,
}

impl Default for InMemoryBookingsRepository {
    fn default() -> Self {
        Self {
            bookings: Default::default(),
            booking_sequence_generator: Default::default(),
        }
    }
}

fn matches(booking: &Booking, filter: &BookingFilter) -> bool {
    match filter {
        BookingFilter::All => true,
        BookingFilter::Current(now) => booking.start < *now && booking.end > *now,
        BookingFilter::Past(now) => booking.end < *now,
        BookingFilter::Future(now) => booking.start > *now,
        BookingFilter::Status(status) => booking.status == *status,
    }
}

fn page_of(mut selected: Vec<Booking>, page: &Page) -> Vec<Booking> {
    selected.sort_by(|a, b| b.start.cmp(&a.start));
    selected
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait::async_trait]
impl BookingsRepository for InMemoryBookingsRepository {
    async fn add_booking(&self, draft: BookingDraft) -> Result<Booking, BookingsRepositoryError> {
        let id = self.booking_sequence_generator.fetch_add(1, Ordering::Relaxed);
        let booking = Booking {
            id,
            start: draft.start,
            end: draft.end,
            item: draft.item,
            booker: draft.booker,
            status: BookingStatus::Waiting,
        };
        self.bookings.write().insert(id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Booking, BookingsRepositoryError> {
        self.bookings
            .read()
            .get(&booking_id)
            .cloned()
            .ok_or(BookingsRepositoryError::BookingNotFound(booking_id))
    }

    async fn update_status_if_waiting(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        let mut locked_bookings = self.bookings.write();
        match locked_bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == BookingStatus::Waiting => {
                booking.status = status;
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError> {
        let selected = self
            .bookings
            .read()
            .values()
            .filter(|b| b.booker.id == booker_id && matches(b, &filter))
            .cloned()
            .collect();
        Ok(page_of(selected, &page))
    }

    async fn find_by_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError> {
        let selected = self
            .bookings
            .read()
            .values()
            .filter(|b| b.item.owner_id == owner_id && matches(b, &filter))
            .cloned()
            .collect();
        Ok(page_of(selected, &page))
    }

    async fn find_last_booking(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        Ok(self
            .bookings
            .read()
            .values()
            .filter(|b| b.item.id == item_id && b.end < now)
            .max_by_key(|b| b.end)
            .cloned())
    }

    async fn find_next_booking(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        Ok(self
            .bookings
            .read()
            .values()
            .filter(|b| b.item.id == item_id && b.start > now)
            .min_by_key(|b| b.start)
            .cloned())
    }

    async fn find_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        Ok(self
            .bookings
            .read()
            .values()
            .find(|b| {
                b.booker.id == booker_id
                    && b.item.id == item_id
                    && b.status == BookingStatus::Approved
                    && b.end < now
            })
            .cloned())
    }
}
