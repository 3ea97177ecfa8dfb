//! Forecast data for Stormdeck
//!
//! Fetches multi-day forecasts from OpenWeatherMap's `forecast/daily`
//! endpoint and turns them into card view-models. Nothing in here touches
//! the terminal; rendering lives in `stormdeck-ui`.

pub mod catalog;
pub mod provider;
pub mod sample;
pub mod types;
pub mod view;

pub use catalog::{find_city, CITY_CATALOG};
pub use provider::{ForecastProvider, ForecastSource};
pub use sample::{initial_city, initial_forecast};
pub use types::*;
pub use view::{CardView, CurrentConditions, DayOutlook, DayPhase};
