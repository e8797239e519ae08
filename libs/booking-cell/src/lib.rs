pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use router::{booking_routes, stats_routes, BookingCellState};
pub use services::{BookingService, HistoryService};
pub use store::{BookingRepository, MemoryBookingStore, SupabaseBookingStore};
