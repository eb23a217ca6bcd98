use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use tabern_application::CreateTableInput;
use tabern_core::AccountIdentity;
use tabern_domain::{TableId, VenueId};

use crate::dto::{CreateTableRequest, TableResponse, UpdateTableRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_table_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Path(venue_id): Path<i64>,
    Json(payload): Json<CreateTableRequest>,
) -> ApiResult<(StatusCode, Json<TableResponse>)> {
    let table = state
        .table_service
        .create_table(
            &identity,
            VenueId::new(venue_id),
            CreateTableInput {
                name: payload.name,
                description: payload.description,
                capacity: payload.capacity,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TableResponse::from(table))))
}

pub async fn list_tables_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Path(venue_id): Path<i64>,
) -> ApiResult<Json<Vec<TableResponse>>> {
    let tables = state
        .table_service
        .tables_for_venue(&identity, VenueId::new(venue_id))
        .await?
        .into_iter()
        .map(TableResponse::from)
        .collect();

    Ok(Json(tables))
}

pub async fn update_table_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
    Path(table_id): Path<i64>,
    Json(payload): Json<UpdateTableRequest>,
) -> ApiResult<Json<TableResponse>> {
    let table = state
        .table_service
        .update_table(&identity, TableId::new(table_id), payload.into())
        .await?;

    Ok(Json(TableResponse::from(table)))
}
