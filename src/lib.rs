//! Accommodation search view: filter criteria, cursor pagination against
//! the listing service, and export of whatever has been loaded.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod search;
