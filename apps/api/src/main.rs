//! Tabern API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch, post};
use sqlx::postgres::PgPoolOptions;
use tabern_application::{
    AccountService, ReservationService, TableRepository, TableService, VenueRepository,
    VenueService,
};
use tabern_core::AppError;
use tabern_infrastructure::{
    Argon2PasswordHasher, PostgresAccountRepository, PostgresReservationRepository,
    PostgresTableRepository, PostgresVenueRepository,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let venue_repository: Arc<dyn VenueRepository> =
        Arc::new(PostgresVenueRepository::new(pool.clone()));
    let table_repository: Arc<dyn TableRepository> =
        Arc::new(PostgresTableRepository::new(pool.clone()));
    let reservation_repository = Arc::new(PostgresReservationRepository::new(pool.clone()));
    let account_repository = Arc::new(PostgresAccountRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());

    let app_state = AppState {
        account_service: AccountService::new(account_repository, password_hasher),
        venue_service: VenueService::new(venue_repository.clone()),
        table_service: TableService::new(table_repository.clone(), venue_repository.clone()),
        reservation_service: ReservationService::new(
            reservation_repository,
            table_repository,
            venue_repository,
        ),
        frontend_url: frontend_url.clone(),
    };

    let protected_routes = Router::new()
        .route(
            "/api/venues",
            get(handlers::venues::list_venues_handler)
                .post(handlers::venues::create_venue_handler),
        )
        .route(
            "/api/venues/{venue_id}",
            get(handlers::venues::get_venue_handler)
                .patch(handlers::venues::update_venue_handler),
        )
        .route(
            "/api/venues/{venue_id}/tables",
            get(handlers::tables::list_tables_handler).post(handlers::tables::create_table_handler),
        )
        .route(
            "/api/tables/{table_id}",
            patch(handlers::tables::update_table_handler),
        )
        .route(
            "/api/reservations",
            post(handlers::reservations::create_reservation_handler),
        )
        .route(
            "/api/venues/{venue_id}/reservations",
            get(handlers::reservations::list_venue_reservations_handler),
        )
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "tabern-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
