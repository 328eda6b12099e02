use actix_web::web::Data;
use actix_web::{Error, HttpRequest, HttpResponse};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
    Apiv2Schema,
};
use serde::Deserialize;

use crate::api::{AddBookingRequest, BookingId, ItemId, UserId, USER_ID_HEADER};
use crate::booking_service::{BookingService, BookingServiceError};

#[derive(Debug, Deserialize, Apiv2Schema)]
pub struct ListQuery {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize, Apiv2Schema)]
pub struct DecisionQuery {
    pub approved: bool,
}

fn user_id_from_headers(request: &HttpRequest) -> Result<UserId, HttpResponse> {
    request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest()
                .json(format!("Missing or invalid {} header", USER_ID_HEADER))
        })
}

fn error_response(operation: &str, err: BookingServiceError) -> HttpResponse {
    use BookingServiceError::*;
    match err {
        BookingNotFound(_) | UserNotFound(_) | ItemNotFound(_) => {
            HttpResponse::NotFound().json(err.to_string())
        }
        OwnItemBooking { .. } | NotItemOwner { .. } => {
            HttpResponse::Forbidden().json(err.to_string())
        }
        ItemUnavailable(_)
        | EndNotAfterStart { .. }
        | StartInPast(_)
        | AlreadyApproved(_)
        | AlreadyRejected(_)
        | UnknownState(_)
        | InvalidPageBounds { .. } => HttpResponse::BadRequest().json(err.to_string()),
        Repository(_) | UserDirectory(_) | ItemCatalog(_) => {
            tracing::error!("{} failed {}", operation, err);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn add_booking(
    request: HttpRequest,
    booking_service: Data<BookingService>,
    body: web::Json<AddBookingRequest>,
) -> Result<HttpResponse, Error> {
    let user_id = match user_id_from_headers(&request) {
        Ok(user_id) => user_id,
        Err(response) => return Ok(response),
    };
    Ok(
        match booking_service.add_booking(user_id, body.into_inner()).await {
            Ok(booking) => HttpResponse::Ok().json(booking),
            Err(err) => error_response("Add booking", err),
        },
    )
}

#[api_v2_operation]
pub async fn update_booking_status(
    request: HttpRequest,
    booking_service: Data<BookingService>,
    booking_id: web::Path<BookingId>,
    query: web::Query<DecisionQuery>,
) -> Result<HttpResponse, Error> {
    let user_id = match user_id_from_headers(&request) {
        Ok(user_id) => user_id,
        Err(response) => return Ok(response),
    };
    Ok(
        match booking_service
            .update_booking_status(user_id, booking_id.into_inner(), query.approved)
            .await
        {
            Ok(booking) => HttpResponse::Ok().json(booking),
            Err(err) => error_response("Update booking status", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_booking(
    request: HttpRequest,
    booking_service: Data<BookingService>,
    booking_id: web::Path<BookingId>,
) -> Result<HttpResponse, Error> {
    let user_id = match user_id_from_headers(&request) {
        Ok(user_id) => user_id,
        Err(response) => return Ok(response),
    };
    Ok(
        match booking_service
            .get_booking(user_id, booking_id.into_inner())
            .await
        {
            Ok(booking) => HttpResponse::Ok().json(booking),
            Err(err) => error_response("Get booking", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_requester_bookings(
    request: HttpRequest,
    booking_service: Data<BookingService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    let user_id = match user_id_from_headers(&request) {
        Ok(user_id) => user_id,
        Err(response) => return Ok(response),
    };
    let state = query.state.clone().unwrap_or_else(|| "ALL".to_string());
    Ok(
        match booking_service
            .get_requester_bookings(
                user_id,
                &state,
                query.from.unwrap_or(0),
                query.size.unwrap_or(10),
            )
            .await
        {
            Ok(bookings) => HttpResponse::Ok().json(bookings),
            Err(err) => error_response("Get requester bookings", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_owner_bookings(
    request: HttpRequest,
    booking_service: Data<BookingService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    let user_id = match user_id_from_headers(&request) {
        Ok(user_id) => user_id,
        Err(response) => return Ok(response),
    };
    let state = query.state.clone().unwrap_or_else(|| "ALL".to_string());
    Ok(
        match booking_service
            .get_owner_bookings(
                user_id,
                &state,
                query.from.unwrap_or(0),
                query.size.unwrap_or(10),
            )
            .await
        {
            Ok(bookings) => HttpResponse::Ok().json(bookings),
            Err(err) => error_response("Get owner bookings", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_last_booking(
    booking_service: Data<BookingService>,
    item_id: web::Path<ItemId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match booking_service.last_booking_of_item(item_id.into_inner()).await {
            Ok(Some(booking)) => HttpResponse::Ok().json(booking),
            Ok(None) => HttpResponse::NotFound().finish(),
            Err(err) => error_response("Get last booking", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_next_booking(
    booking_service: Data<BookingService>,
    item_id: web::Path<ItemId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match booking_service.next_booking_of_item(item_id.into_inner()).await {
            Ok(Some(booking)) => HttpResponse::Ok().json(booking),
            Ok(None) => HttpResponse::NotFound().finish(),
            Err(err) => error_response("Get next booking", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_completed_booking(
    request: HttpRequest,
    booking_service: Data<BookingService>,
    item_id: web::Path<ItemId>,
) -> Result<HttpResponse, Error> {
    let user_id = match user_id_from_headers(&request) {
        Ok(user_id) => user_id,
        Err(response) => return Ok(response),
    };
    Ok(
        match booking_service
            .completed_booking(user_id, item_id.into_inner())
            .await
        {
            Ok(Some(booking)) => HttpResponse::Ok().json(booking),
            Ok(None) => HttpResponse::NotFound().finish(),
            Err(err) => error_response("Get completed booking", err),
        },
    )
}
