pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use router::slot_routes;
pub use services::{ExpirySweeper, SlotService};
pub use store::{MemorySlotStore, SlotRepository, SupabaseSlotStore};
