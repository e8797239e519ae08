pub mod booking;
pub mod history;

pub use booking::BookingService;
pub use history::HistoryService;
