//! Session-based authentication handlers.
//!
//! Registration and login establish a server-side session carrying an
//! [`AccountIdentity`]; everything downstream consumes that identity and
//! never sees credentials.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tabern_application::{AccountRecord, AuthOutcome, RegisterOwnerParams};
use tabern_core::{AccountIdentity, AppError};
use tower_sessions::Session;

use crate::dto::{AccountResponse, LoginRequest, RegisterOwnerRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// Session key holding the authenticated identity.
pub const SESSION_ACCOUNT_KEY: &str = "account_identity";

fn identity_for(record: &AccountRecord) -> AccountIdentity {
    AccountIdentity::new(
        record.id,
        format!("{} {}", record.name, record.surname),
        record.email.clone(),
        record.role,
    )
}

async fn establish_session(session: &Session, identity: &AccountIdentity) -> ApiResult<()> {
    // Regenerate the session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_ACCOUNT_KEY, identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(())
}

pub async fn register_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterOwnerRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let record = state
        .account_service
        .register_owner(RegisterOwnerParams {
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
            name: payload.name,
            surname: payload.surname,
            patronymic: payload.patronymic,
        })
        .await?;

    establish_session(&session, &identity_for(&record)).await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(record))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AccountResponse>> {
    match state
        .account_service
        .login(payload.email.as_str(), payload.password.as_str())
        .await?
    {
        AuthOutcome::Authenticated(record) => {
            establish_session(&session, &identity_for(&record)).await?;
            Ok(Json(AccountResponse::from(record)))
        }
        AuthOutcome::Failed => {
            Err(AppError::Unauthorized("invalid email or password".to_owned()).into())
        }
    }
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AccountIdentity>,
) -> ApiResult<Json<AccountResponse>> {
    let record = state
        .account_service
        .find_by_id(identity.account_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

    Ok(Json(AccountResponse::from(record)))
}
