pub mod catalog;
pub mod config;
pub mod dto;
pub mod error;
pub mod events;
pub mod models;
pub mod params;
pub mod response;
pub mod services;
pub mod state;
pub mod store;
