use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ItemId = i64;
pub type BookingId = i64;

/// Header carrying the id of the user a request acts as.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WAITING" => Some(BookingStatus::Waiting),
            "APPROVED" => Some(BookingStatus::Approved),
            "REJECTED" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }
}

/// Filter applied to the booking list endpoints.
///
/// CURRENT/PAST/FUTURE filter on the window relative to "now";
/// WAITING/REJECTED filter on the status literal. There is no APPROVED-only
/// listing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    /// Accepts the exact uppercase wire values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ALL" => Some(BookingState::All),
            "CURRENT" => Some(BookingState::Current),
            "PAST" => Some(BookingState::Past),
            "FUTURE" => Some(BookingState::Future),
            "WAITING" => Some(BookingState::Waiting),
            "REJECTED" => Some(BookingState::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }
}

/// Snapshot of the booked item taken when the booking is created.
/// Not re-synced if the item changes later.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub owner_id: UserId,
}

/// Snapshot of the requesting user taken when the booking is created.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct Booking {
    pub id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item: ItemSummary,
    pub booker: UserSummary,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct AddBookingRequest {
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
