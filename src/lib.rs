//! Golf course records: course metadata plus per-hole pars and handicaps,
//! stored in SQLite and served over a small axum API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
