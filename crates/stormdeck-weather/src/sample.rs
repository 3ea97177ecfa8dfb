//! Built-in example forecast.
//!
//! Shown on first run, when nothing has been saved yet, and substituted for
//! any forecast request that fails.

use chrono::DateTime;

use crate::types::{ForecastResponse, SelectedCity, StampedForecast, WeatherError};

const INITIAL_FORECAST_JSON: &str = include_str!("../data/initial_forecast.json");

/// Creation stamp of the sample: 2017-01-20 10:00:00 UTC.
pub const INITIAL_FORECAST_CREATED: i64 = 1_484_906_400;

/// The sample forecast, stamped with its own city and creation time.
///
/// Its `created` is fixed in the past, so it never overwrites a card that
/// already shows live data.
pub fn initial_forecast() -> Result<StampedForecast, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(INITIAL_FORECAST_JSON)
        .map_err(|e| WeatherError::Parse(format!("embedded sample forecast: {}", e)))?;
    let created = DateTime::from_timestamp(INITIAL_FORECAST_CREATED, 0).ok_or_else(|| {
        WeatherError::Parse("embedded sample timestamp out of range".to_string())
    })?;
    let city = SelectedCity::new(response.city.id.to_string(), response.city.name.clone());

    Ok(StampedForecast::new(&city, created, response))
}

/// The city the sample forecast describes
pub fn initial_city() -> Result<SelectedCity, WeatherError> {
    let sample = initial_forecast()?;
    Ok(SelectedCity::new(sample.key, sample.label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_parses_with_eight_days() {
        let sample = initial_forecast().unwrap();
        assert_eq!(sample.response.list.len(), 8);
        assert_eq!(sample.response.cnt, 8);
        assert_eq!(sample.city_id(), 5128638);
        assert_eq!(sample.created.timestamp(), INITIAL_FORECAST_CREATED);
    }

    #[test]
    fn test_initial_city_is_new_york() {
        let city = initial_city().unwrap();
        assert_eq!(city, SelectedCity::new("5128638", "New York"));
    }

    #[test]
    fn test_sample_second_day_is_clear() {
        let sample = initial_forecast().unwrap();
        let today = &sample.response.list[1];
        assert_eq!(today.condition().map(|c| c.id), Some(800));
        assert_eq!(today.rain, Some(0.4));
        assert_eq!(sample.response.list[4].snow, Some(1.94));
    }
}
