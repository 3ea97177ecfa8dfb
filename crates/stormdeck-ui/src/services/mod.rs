pub mod forecast_service;

pub use forecast_service::{
    fetch_or_fallback, request_fetch, FetchedForecast, ForecastServiceMessage,
};
