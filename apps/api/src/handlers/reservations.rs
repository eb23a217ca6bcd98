use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use tabern_application::CreateReservationInput;
use tabern_core::{AccountIdentity, AppError};
use tabern_domain::{TableId, VenueId, parse_reservation_date};

use crate::dto::{CreateReservationRequest, ReservationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ReservationListQuery {
    pub date: String,
}

pub async fn create_reservation_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Json(payload): Json<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationResponse>)> {
    let reservation = state
        .reservation_service
        .create_reservation(
            &identity,
            CreateReservationInput {
                table_id: TableId::new(payload.table_id),
                date: payload.date,
                from_time: payload.from_time,
                to_time: payload.to_time,
                persons: payload.persons,
                guest: payload.guest,
                comment: payload.comment,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from(reservation)),
    ))
}

pub async fn list_venue_reservations_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Path(venue_id): Path<i64>,
    Query(query): Query<ReservationListQuery>,
) -> ApiResult<Json<Vec<ReservationResponse>>> {
    let date = parse_reservation_date(query.date.as_str()).ok_or_else(|| {
        AppError::Validation(format!(
            "date: '{}' is not a valid DD.MM.YYYY date",
            query.date
        ))
    })?;

    let reservations = state
        .reservation_service
        .reservations_for_venue(&identity, VenueId::new(venue_id), date)
        .await?
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(Json(reservations))
}
