use crate::api::{Booking, UserId};

/// A booking is visible only to its booker and to the owner of the booked
/// item. Callers translate a failed check into "not found" so unrelated
/// users cannot probe for existence.
pub fn can_view(user_id: UserId, booking: &Booking) -> bool {
    user_id == booking.booker.id || user_id == booking.item.owner_id
}

/// Only the current owner of the booked item may approve or reject.
pub fn can_decide(user_id: UserId, item_owner_id: UserId) -> bool {
    user_id == item_owner_id
}
