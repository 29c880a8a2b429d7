//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: evicts expired cache entries nobody reads again

mod sweep;

pub use sweep::spawn_sweep_task;
