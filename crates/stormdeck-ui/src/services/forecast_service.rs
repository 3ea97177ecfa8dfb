//! Forecast backend: async fetching.
//! Each request runs as its own task; results come back over an mpsc channel.

use std::sync::Arc;

use stormdeck_weather::{initial_forecast, ForecastSource, SelectedCity, StampedForecast, WeatherError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// A forecast ready to apply, and whether it is the built-in sample
#[derive(Debug, Clone)]
pub struct FetchedForecast {
    pub forecast: StampedForecast,
    pub fallback: bool,
}

/// Messages sent from fetch tasks back to the controller
#[derive(Debug)]
pub enum ForecastServiceMessage {
    FetchDone {
        city: SelectedCity,
        result: Result<FetchedForecast, WeatherError>,
    },
    /// The fetch task panicked or was cancelled before producing a result
    FetchAborted { city: SelectedCity, reason: String },
}

/// Fetch `city`, substituting the sample forecast when the request fails
/// or the provider answers with anything but 200.
///
/// A 200 response that cannot be decoded is returned as `Err` and leaves the
/// card untouched.
pub async fn fetch_or_fallback(
    source: &dyn ForecastSource,
    city: &SelectedCity,
) -> Result<FetchedForecast, WeatherError> {
    match source.fetch(city).await {
        Ok(forecast) => Ok(FetchedForecast {
            forecast,
            fallback: false,
        }),
        Err(e @ (WeatherError::Network(_) | WeatherError::Status { .. })) => {
            tracing::warn!("Forecast for {} ({}) failed, showing sample data: {}", city.label, city.key, e);
            Ok(FetchedForecast {
                forecast: initial_forecast()?,
                fallback: true,
            })
        }
        Err(e) => Err(e),
    }
}

/// Spawn a fetch for `city` on `runtime`.
///
/// Sends exactly one message on the channel when the request settles:
/// `FetchDone` normally, `FetchAborted` if the fetch task dies.
pub fn request_fetch(
    tx: &UnboundedSender<ForecastServiceMessage>,
    runtime: &Handle,
    source: Arc<dyn ForecastSource>,
    city: SelectedCity,
) {
    let tx = tx.clone();
    let inner = runtime.clone();
    runtime.spawn(async move {
        let target = city.clone();
        let task = inner.spawn(async move { fetch_or_fallback(source.as_ref(), &target).await });

        let message = match task.await {
            Ok(result) => ForecastServiceMessage::FetchDone { city, result },
            Err(e) => ForecastServiceMessage::FetchAborted {
                city,
                reason: e.to_string(),
            },
        };
        if tx.send(message).is_err() {
            tracing::debug!("Dashboard gone before forecast arrived");
        }
    });
}
