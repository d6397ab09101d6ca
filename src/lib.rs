//! Daily activity and leave tracker.
//!
//! The accounting core lives in [`engine`]; [`api`] and [`routes`] put a thin
//! actix-web JSON surface over it.

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod docs;
pub mod engine;
pub mod error;
pub mod model;
pub mod routes;
pub mod store;
pub mod utils;

pub use engine::Tracker;
pub use error::{TrackerError, TrackerResult};
