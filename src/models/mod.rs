pub mod auth;
pub mod common;
pub mod device;
pub mod measurement;
pub mod user;
