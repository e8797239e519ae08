pub mod error;
pub mod owner;

pub use error::AppError;
pub use owner::OwnerKind;
