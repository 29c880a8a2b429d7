//! Instagram Wrapped backend
//!
//! Cache-fronted Instagram aggregations with per-owner invalidation and
//! yearly recap reports.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod imaging;
pub mod instagram;
pub mod models;
pub mod services;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
