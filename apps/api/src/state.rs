use tabern_application::{AccountService, ReservationService, TableService, VenueService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub venue_service: VenueService,
    pub table_service: TableService,
    pub reservation_service: ReservationService,
    pub frontend_url: String,
}
