use anyhow::{bail, Context};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{AddBookingRequest, Booking, BookingId, ItemId, UserId, USER_ID_HEADER};

pub struct RentshareBookingsClient {
    url: String,
    client: ClientWithMiddleware,
}

impl RentshareBookingsClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls POST /api/bookings endpoint
    /// Returns the created booking in Waiting status
    pub async fn add_booking(
        &self,
        user_id: UserId,
        request: &AddBookingRequest,
    ) -> anyhow::Result<Booking> {
        let response = self
            .client
            .post(format!("{}/api/bookings", self.url))
            .header(USER_ID_HEADER, user_id.to_string())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to add booking {}", error)
        }

        Ok(response.json().await?)
    }

    /// Calls PATCH /api/bookings/{booking_id}?approved= endpoint
    /// Returns the booking with its new terminal status
    pub async fn update_booking_status(
        &self,
        user_id: UserId,
        booking_id: BookingId,
        approved: bool,
    ) -> anyhow::Result<Booking> {
        let response = self
            .client
            .patch(format!(
                "{}/api/bookings/{}?approved={}",
                self.url, booking_id, approved
            ))
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to update booking status {}", error)
        }

        Ok(response.json().await?)
    }

    /// Calls GET /api/bookings/{booking_id} endpoint
    /// Returns the booking if it exists and the user is booker or item owner
    /// None otherwise (absence and no-relation are indistinguishable)
    /// and error in case of any other failure
    pub async fn get_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> anyhow::Result<Option<Booking>> {
        let response = self
            .client
            .get(format!("{}/api/bookings/{}", self.url, booking_id))
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to get booking {}", error)
        }
    }

    /// Calls GET /api/bookings endpoint (requester view)
    pub async fn requester_bookings(
        &self,
        user_id: UserId,
        state: &str,
        from: i64,
        size: i64,
    ) -> anyhow::Result<Vec<Booking>> {
        let response = self
            .client
            .get(format!(
                "{}/api/bookings?state={}&from={}&size={}",
                self.url, state, from, size
            ))
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to list bookings {}", error)
        }
    }

    /// Calls GET /api/bookings/owner endpoint (owner view)
    pub async fn owner_bookings(
        &self,
        user_id: UserId,
        state: &str,
        from: i64,
        size: i64,
    ) -> anyhow::Result<Vec<Booking>> {
        let response = self
            .client
            .get(format!(
                "{}/api/bookings/owner?state={}&from={}&size={}",
                self.url, state, from, size
            ))
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to list bookings {}", error)
        }
    }

    /// Calls GET /api/bookings/item/{item_id}/last endpoint
    pub async fn last_booking(&self, item_id: ItemId) -> anyhow::Result<Option<Booking>> {
        self.item_booking(item_id, "last").await
    }

    /// Calls GET /api/bookings/item/{item_id}/next endpoint
    pub async fn next_booking(&self, item_id: ItemId) -> anyhow::Result<Option<Booking>> {
        self.item_booking(item_id, "next").await
    }

    async fn item_booking(&self, item_id: ItemId, which: &str) -> anyhow::Result<Option<Booking>> {
        let response = self
            .client
            .get(format!("{}/api/bookings/item/{}/{}", self.url, item_id, which))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to get {} booking {}", which, error)
        }
    }

    /// Calls GET /api/bookings/item/{item_id}/completed endpoint
    /// Returns an approved, finished booking of the item by the user if any
    pub async fn completed_booking(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> anyhow::Result<Option<Booking>> {
        let response = self
            .client
            .get(format!(
                "{}/api/bookings/item/{}/completed",
                self.url, item_id
            ))
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to get completed booking {}", error)
        }
    }
}
