//! Dashboard errors and their mapping to stormdeck_core::AppError for
//! consistent user-facing messages.

use stormdeck_core::AppError;
use stormdeck_weather::WeatherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("The add-city dialog is not open")]
    DialogNotOpen,

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error(transparent)]
    Forecast(#[from] WeatherError),
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::DialogNotOpen => AppError::Other(anyhow::anyhow!(
                "City confirmed without opening the add dialog"
            )),
            DashboardError::UnknownCity(name) => {
                AppError::Weather(stormdeck_core::WeatherError::CityNotFound(name))
            }
            DashboardError::Forecast(err) => err.into(),
        }
    }
}
