pub mod slots;
pub mod sweeper;

pub use slots::SlotService;
pub use sweeper::ExpirySweeper;
