pub mod me;
pub mod schedule;
