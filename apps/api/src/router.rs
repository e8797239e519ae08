use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::{booking_routes, stats_routes, BookingCellState};
use booking_cell::services::{BookingService, HistoryService};
use booking_cell::store::SupabaseBookingStore;
use directory_cell::store::{DirectoryLookup, SupabaseDirectory};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use slot_cell::router::slot_routes;
use slot_cell::services::{ExpirySweeper, SlotService};
use slot_cell::store::{SlotRepository, SupabaseSlotStore};

pub fn create_router(config: AppConfig) -> Router {
    let supabase = Arc::new(SupabaseClient::new(&config));

    let slot_store: Arc<dyn SlotRepository> =
        Arc::new(SupabaseSlotStore::new(Arc::clone(&supabase)));
    let booking_store = Arc::new(SupabaseBookingStore::new(Arc::clone(&supabase)));
    let directory: Arc<dyn DirectoryLookup> =
        Arc::new(SupabaseDirectory::new(Arc::clone(&supabase)));

    let slot_service = Arc::new(SlotService::new(Arc::clone(&slot_store)));
    let booking_service = Arc::new(BookingService::new(
        booking_store.clone(),
        Arc::clone(&slot_store),
        directory,
    ));
    let history_service = Arc::new(HistoryService::new(booking_store, Arc::clone(&slot_store)));

    ExpirySweeper::new(Arc::clone(&slot_store), config.sweep_interval_secs).spawn();

    let booking_state = BookingCellState {
        booking: booking_service,
        history: history_service,
    };

    Router::new()
        .route("/", get(|| async { "DocAvail booking API is running!" }))
        .nest("/api/slots", slot_routes(slot_service))
        .nest("/api/bookings", booking_routes(booking_state.clone()))
        .nest("/api/stats", stats_routes(booking_state))
}
