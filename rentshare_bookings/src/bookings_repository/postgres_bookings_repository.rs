use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::api::{Booking, BookingId, BookingStatus, ItemId, ItemSummary, UserId, UserSummary};
use crate::bookings_repository::{
    BookingDraft, BookingFilter, BookingsRepository, BookingsRepositoryError, Page,
};

const BOOKING_COLUMNS: &str =
    "id, start_date, end_date, item_id, item_name, item_owner_id, booker_id, booker_name, status";

pub struct PostgresBookingsRepository {
    client: Client,
}

pub struct PostgresBookingsRepositoryConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

impl PostgresBookingsRepository {
    pub async fn init(config: PostgresBookingsRepositoryConfig) -> anyhow::Result<Self> {
        let connection_str = format!(
            "postgresql://{}:{}@{}",
            config.username, config.password, config.hostname
        );
        tracing::info!("Postgres connection_str: {}", connection_str);
        let (client, connection) = tokio_postgres::connect(&connection_str, NoTls)
            .await
            .context("Failed to start postgres")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("connection error: {}", e);
            }
        });

        client
            .batch_execute(
                "
        CREATE TABLE IF NOT EXISTS bookings (
            id              BIGSERIAL PRIMARY KEY,
            start_date      TIMESTAMPTZ NOT NULL,
            end_date        TIMESTAMPTZ NOT NULL,
            item_id         BIGINT NOT NULL,
            item_name       TEXT NOT NULL,
            item_owner_id   BIGINT NOT NULL,
            booker_id       BIGINT NOT NULL,
            booker_name     TEXT NOT NULL,
            status          TEXT NOT NULL
            )
        ",
            )
            .await
            .context("Failed to setup table")?;
        Ok(Self { client })
    }

    /// Shared body of the booker/owner list queries; `user_column` is one of
    /// the two indexed id columns.
    async fn find_for_user_column(
        &self,
        user_column: &str,
        user_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError> {
        let rows = match filter {
            BookingFilter::All => {
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "SELECT {BOOKING_COLUMNS} FROM bookings \
                         WHERE {user_column} = $1 \
                         ORDER BY start_date DESC OFFSET $2 LIMIT $3"
                    ))
                    .await?;
                self.client
                    .query(&stmt, &[&user_id, &page.offset, &page.limit])
                    .await?
            }
            BookingFilter::Current(now) => {
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "SELECT {BOOKING_COLUMNS} FROM bookings \
                         WHERE {user_column} = $1 AND start_date < $2 AND end_date > $2 \
                         ORDER BY start_date DESC OFFSET $3 LIMIT $4"
                    ))
                    .await?;
                self.client
                    .query(&stmt, &[&user_id, &now, &page.offset, &page.limit])
                    .await?
            }
            BookingFilter::Past(now) => {
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "SELECT {BOOKING_COLUMNS} FROM bookings \
                         WHERE {user_column} = $1 AND end_date < $2 \
                         ORDER BY start_date DESC OFFSET $3 LIMIT $4"
                    ))
                    .await?;
                self.client
                    .query(&stmt, &[&user_id, &now, &page.offset, &page.limit])
                    .await?
            }
            BookingFilter::Future(now) => {
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "SELECT {BOOKING_COLUMNS} FROM bookings \
                         WHERE {user_column} = $1 AND start_date > $2 \
                         ORDER BY start_date DESC OFFSET $3 LIMIT $4"
                    ))
                    .await?;
                self.client
                    .query(&stmt, &[&user_id, &now, &page.offset, &page.limit])
                    .await?
            }
            BookingFilter::Status(status) => {
                let status = status.as_str();
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "SELECT {BOOKING_COLUMNS} FROM bookings \
                         WHERE {user_column} = $1 AND status = $2 \
                         ORDER BY start_date DESC OFFSET $3 LIMIT $4"
                    ))
                    .await?;
                self.client
                    .query(&stmt, &[&user_id, &status, &page.offset, &page.limit])
                    .await?
            }
        };

        rows.iter().map(booking_from_row).collect()
    }
}

fn booking_from_row(row: &Row) -> Result<Booking, BookingsRepositoryError> {
    let status_value: String = row.try_get("status")?;
    let status = BookingStatus::parse(&status_value).ok_or_else(|| {
        BookingsRepositoryError::Other(format!("Unknown booking status {}", status_value))
    })?;

    Ok(Booking {
        id: row.try_get("id")?,
        start: row.try_get("start_date")?,
        end: row.try_get("end_date")?,
        item: ItemSummary {
            id: row.try_get("item_id")?,
            name: row.try_get("item_name")?,
            owner_id: row.try_get("item_owner_id")?,
        },
        booker: UserSummary {
            id: row.try_get("booker_id")?,
            name: row.try_get("booker_name")?,
        },
        status,
    })
}

#[async_trait::async_trait]
impl BookingsRepository for PostgresBookingsRepository {
    async fn add_booking(&self, draft: BookingDraft) -> Result<Booking, BookingsRepositoryError> {
        let status = BookingStatus::Waiting.as_str();
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO bookings \
                 (start_date, end_date, item_id, item_name, item_owner_id, \
                  booker_id, booker_name, status) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &draft.start,
                    &draft.end,
                    &draft.item.id,
                    &draft.item.name,
                    &draft.item.owner_id,
                    &draft.booker.id,
                    &draft.booker.name,
                    &status,
                ],
            )
            .await?;

        let booking_id: BookingId = rows
            .first()
            .ok_or_else(|| BookingsRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;

        Ok(Booking {
            id: booking_id,
            start: draft.start,
            end: draft.end,
            item: draft.item,
            booker: draft.booker,
            status: BookingStatus::Waiting,
        })
    }

    async fn get_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Booking, BookingsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
            ))
            .await?;

        let rows = self.client.query(&stmt, &[&booking_id]).await?;

        let row = rows
            .first()
            .ok_or(BookingsRepositoryError::BookingNotFound(booking_id))?;
        booking_from_row(row)
    }

    async fn update_status_if_waiting(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        // The WHERE clause is what serializes racing decisions: only one
        // update can move the row out of WAITING.
        let waiting = BookingStatus::Waiting.as_str();
        let status = status.as_str();
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "UPDATE bookings SET status = $2 \
                 WHERE id = $1 AND status = $3 \
                 RETURNING {BOOKING_COLUMNS}"
            ))
            .await?;

        let rows = self
            .client
            .query(&stmt, &[&booking_id, &status, &waiting])
            .await?;

        rows.first().map(booking_from_row).transpose()
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError> {
        self.find_for_user_column("booker_id", booker_id, filter, page)
            .await
    }

    async fn find_by_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: Page,
    ) -> Result<Vec<Booking>, BookingsRepositoryError> {
        self.find_for_user_column("item_owner_id", owner_id, filter, page)
            .await
    }

    async fn find_last_booking(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings \
                 WHERE item_id = $1 AND end_date < $2 \
                 ORDER BY end_date DESC LIMIT 1"
            ))
            .await?;

        let rows = self.client.query(&stmt, &[&item_id, &now]).await?;
        rows.first().map(booking_from_row).transpose()
    }

    async fn find_next_booking(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings \
                 WHERE item_id = $1 AND start_date > $2 \
                 ORDER BY start_date ASC LIMIT 1"
            ))
            .await?;

        let rows = self.client.query(&stmt, &[&item_id, &now]).await?;
        rows.first().map(booking_from_row).transpose()
    }

    async fn find_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingsRepositoryError> {
        let approved = BookingStatus::Approved.as_str();
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings \
                 WHERE booker_id = $1 AND item_id = $2 AND status = $3 AND end_date < $4 \
                 LIMIT 1"
            ))
            .await?;

        let rows = self
            .client
            .query(&stmt, &[&booker_id, &item_id, &approved, &now])
            .await?;
        rows.first().map(booking_from_row).transpose()
    }
}
