//! Wire shapes for the HTTP boundary and their domain conversions.

use serde::{Deserialize, Serialize};
use tabern_application::AccountRecord;
use tabern_core::Patch;
use tabern_domain::{
    RESERVATION_DATE_FORMAT, Reservation, Table, UpdateTablePatch, UpdateVenuePatch, Venue,
    WorkHours,
};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Incoming payload for owner registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-owner-request.ts"
)]
pub struct RegisterOwnerRequest {
    pub email: String,
    pub phone: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
}

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of an account profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/account-response.ts"
)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub role: String,
}

impl From<AccountRecord> for AccountResponse {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id.value(),
            email: record.email,
            phone: record.phone,
            name: record.name,
            surname: record.surname,
            patronymic: record.patronymic,
            role: record.role.as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Venues
// ---------------------------------------------------------------------------

/// One weekday's opening and closing time pair on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/work-hours.ts"
)]
pub struct WorkHoursPayload {
    pub weekday: u8,
    pub from: String,
    pub to: String,
}

impl From<WorkHoursPayload> for WorkHours {
    fn from(payload: WorkHoursPayload) -> Self {
        WorkHours::new(payload.weekday, payload.from, payload.to)
    }
}

impl From<WorkHours> for WorkHoursPayload {
    fn from(entry: WorkHours) -> Self {
        Self {
            weekday: entry.weekday,
            from: entry.from,
            to: entry.to,
        }
    }
}

/// Incoming payload for venue creation; every field is required.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-venue-request.ts"
)]
pub struct CreateVenueRequest {
    pub email: String,
    pub phone: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub work_hours: Vec<WorkHoursPayload>,
}

/// Incoming payload for a sparse venue profile update.
///
/// Absent keys leave fields untouched; an explicit `null` is rejected with
/// a field-scoped validation error.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-venue-request.ts"
)]
pub struct UpdateVenueRequest {
    #[serde(default)]
    #[ts(type = "string | null")]
    pub email: Patch<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub phone: Patch<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub name: Patch<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub description: Patch<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub address: Patch<String>,
    #[serde(default)]
    #[ts(type = "Array<WorkHoursPayload> | null")]
    pub work_hours: Patch<Vec<WorkHoursPayload>>,
    #[serde(default)]
    #[ts(type = "boolean | null")]
    pub is_visible_to_user: Patch<bool>,
}

impl From<UpdateVenueRequest> for UpdateVenuePatch {
    fn from(request: UpdateVenueRequest) -> Self {
        Self {
            email: request.email,
            phone: request.phone,
            name: request.name,
            description: request.description,
            address: request.address,
            work_hours: request
                .work_hours
                .map(|entries| entries.into_iter().map(WorkHours::from).collect()),
            is_visible: request.is_visible_to_user,
        }
    }
}

/// API representation of a venue profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/venue-response.ts"
)]
pub struct VenueResponse {
    pub id: i64,
    pub owner_id: i64,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub description: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub logo_url: Option<String>,
    pub is_visible_for_clients: bool,
    pub admin_ids: Vec<i64>,
    pub work_hours: Vec<WorkHoursPayload>,
}

impl From<Venue> for VenueResponse {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id.value(),
            owner_id: venue.owner_id.value(),
            email: venue.email,
            name: venue.name,
            phone: venue.phone,
            description: venue.description,
            address: venue.address,
            logo_url: venue.logo_url,
            is_visible_for_clients: venue.is_visible,
            admin_ids: venue
                .admin_ids
                .into_iter()
                .map(|account_id| account_id.value())
                .collect(),
            work_hours: venue
                .work_hours
                .into_iter()
                .map(WorkHoursPayload::from)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Incoming payload for table creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-table-request.ts"
)]
pub struct CreateTableRequest {
    pub name: String,
    #[serde(rename = "persons")]
    pub capacity: u8,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload for a sparse table update.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-table-request.ts"
)]
pub struct UpdateTableRequest {
    #[serde(default)]
    #[ts(type = "string | null")]
    pub name: Patch<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub description: Patch<String>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub capacity: Patch<u8>,
}

impl From<UpdateTableRequest> for UpdateTablePatch {
    fn from(request: UpdateTableRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            capacity: request.capacity,
        }
    }
}

/// API representation of a venue table.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/table-response.ts"
)]
pub struct TableResponse {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    pub persons: u8,
}

impl From<Table> for TableResponse {
    fn from(table: Table) -> Self {
        Self {
            id: table.id.value(),
            venue_id: table.venue_id.value(),
            name: table.name,
            description: table.description,
            persons: table.capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// Incoming payload for reservation creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-reservation-request.ts"
)]
pub struct CreateReservationRequest {
    pub table_id: i64,
    pub date: String,
    pub from_time: String,
    pub to_time: String,
    pub persons: u8,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// API representation of a reservation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reservation-response.ts"
)]
pub struct ReservationResponse {
    pub id: i64,
    pub venue_id: i64,
    pub table_id: i64,
    pub date: String,
    pub from_time: String,
    pub to_time: String,
    pub persons: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub guest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub comment: Option<String>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id.value(),
            venue_id: reservation.venue_id.value(),
            table_id: reservation.table_id.value(),
            date: reservation
                .date
                .format(RESERVATION_DATE_FORMAT)
                .to_string(),
            from_time: reservation.from_time,
            to_time: reservation.to_time,
            persons: reservation.persons,
            guest: reservation.guest,
            comment: reservation.comment,
        }
    }
}
