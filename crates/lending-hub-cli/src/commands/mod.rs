pub mod format;
pub mod mortgage;
pub mod schedule;
