use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use tabern_application::CreateVenueInput;
use tabern_core::AccountIdentity;
use tabern_domain::{VenueId, WorkHours};

use crate::dto::{CreateVenueRequest, UpdateVenueRequest, VenueResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_venue_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Json(payload): Json<CreateVenueRequest>,
) -> ApiResult<(StatusCode, Json<VenueResponse>)> {
    let venue = state
        .venue_service
        .create_venue(
            &identity,
            CreateVenueInput {
                email: payload.email,
                phone: payload.phone,
                name: payload.name,
                description: payload.description,
                address: payload.address,
                work_hours: payload.work_hours.into_iter().map(WorkHours::from).collect(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(VenueResponse::from(venue))))
}

pub async fn list_venues_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
) -> ApiResult<Json<Vec<VenueResponse>>> {
    let venues = state
        .venue_service
        .venues_for_owner(&identity)
        .await?
        .into_iter()
        .map(VenueResponse::from)
        .collect();

    Ok(Json(venues))
}

pub async fn get_venue_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Path(venue_id): Path<i64>,
) -> ApiResult<Json<VenueResponse>> {
    let venue = state
        .venue_service
        .venue_by_id(&identity, VenueId::new(venue_id))
        .await?;

    Ok(Json(VenueResponse::from(venue)))
}

pub async fn update_venue_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Path(venue_id): Path<i64>,
    Json(payload): Json<UpdateVenueRequest>,
) -> ApiResult<Json<VenueResponse>> {
    let venue = state
        .venue_service
        .update_venue(&identity, VenueId::new(venue_id), payload.into())
        .await?;

    Ok(Json(VenueResponse::from(venue)))
}
