pub mod amortization;
pub mod assumptions;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use assumptions::ProgramAssumptions;
pub use error::LendingError;
pub use types::*;

/// Standard result type for all lending-hub operations
pub type LendingResult<T> = Result<T, LendingError>;
