pub mod auth;
pub mod orders;
