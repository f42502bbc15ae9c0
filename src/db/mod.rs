pub mod devices;
pub mod helpers;
pub mod measurements;
pub mod users;
