//! Dashboard state, persistence and rendering for Stormdeck.
//!
//! `DashboardController` owns the state and is the only thing the binary
//! talks to. Forecasts arrive asynchronously through `services` and are
//! applied on the controller's thread.

pub mod controller;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod services;
pub mod store;

pub use controller::{DashboardController, StartupOutcome};
pub use error_mapping::DashboardError;
pub use models::dashboard_model::{AddDialog, ApplyOutcome, Dashboard, DashboardSnapshot, ForecastCard};
pub use render::{CardRenderer, TextRenderer};
pub use store::{CityStore, JsonFileStore, MemoryStore};
