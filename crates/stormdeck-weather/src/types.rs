use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use stormdeck_core::{AppError, ReqwestErrorExt};

/// A city the user tracks: provider city id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCity {
    #[serde(deserialize_with = "string_or_number")]
    pub key: String,
    pub label: String,
}

impl SelectedCity {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Icon classes a weather code can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    ClearDay,
    Rain,
    Thunderstorms,
    Snow,
    Fog,
    Windy,
    Cloudy,
    PartlyCloudyDay,
}

impl WeatherIcon {
    /// Map an OpenWeatherMap condition code to an icon.
    /// See: https://openweathermap.org/weather-conditions
    ///
    /// Codes outside the table (including the drizzle group) have no icon.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            800 => Some(Self::ClearDay),
            500..=504 | 511 | 520..=522 | 531 => Some(Self::Rain),
            200..=202 | 210..=212 | 221 | 230..=232 => Some(Self::Thunderstorms),
            600..=602 | 611 | 612 | 615 | 616 | 620..=622 => Some(Self::Snow),
            701 | 711 | 721 | 731 | 741 | 751 | 761 | 762 | 771 | 781 => Some(Self::Fog),
            900..=906 => Some(Self::Windy),
            803 | 804 => Some(Self::Cloudy),
            801 | 802 => Some(Self::PartlyCloudyDay),
            _ => None,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::ClearDay => "clear-day",
            Self::Rain => "rain",
            Self::Thunderstorms => "thunderstorms",
            Self::Snow => "snow",
            Self::Fog => "fog",
            Self::Windy => "windy",
            Self::Cloudy => "cloudy",
            Self::PartlyCloudyDay => "partly-cloudy-day",
        }
    }

    /// Glyph used by the terminal renderer
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::ClearDay => "☀",
            Self::Rain => "☂",
            Self::Thunderstorms => "⚡",
            Self::Snow => "❄",
            Self::Fog => "≡",
            Self::Windy => "~",
            Self::Cloudy => "☁",
            Self::PartlyCloudyDay => "⛅",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

/// City metadata from the forecast payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTemp {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i32,
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// One day of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Unix seconds
    pub dt: i64,
    pub temp: DailyTemp,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Wind speed
    #[serde(default)]
    pub speed: f64,
    /// Wind direction in degrees
    #[serde(default)]
    pub deg: f64,
    #[serde(default)]
    pub clouds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<f64>,
}

impl DailyRecord {
    /// The primary condition, if the provider sent one
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// Payload of `GET /forecast/daily`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub city: City,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cod: String,
    #[serde(default)]
    pub message: f64,
    #[serde(default)]
    pub cnt: u32,
    pub list: Vec<DailyRecord>,
}

/// A forecast as received: the payload stamped with who asked and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedForecast {
    pub key: String,
    pub label: String,
    pub created: DateTime<Utc>,
    #[serde(flatten)]
    pub response: ForecastResponse,
}

impl StampedForecast {
    pub fn new(city: &SelectedCity, created: DateTime<Utc>, response: ForecastResponse) -> Self {
        Self {
            key: city.key.clone(),
            label: city.label.clone(),
            created,
            response,
        }
    }

    pub fn city_id(&self) -> u64 {
        self.response.city.id
    }
}

// The provider sends `cod` as "200" on success but a bare number on errors, and
// city lists saved by the browser dashboard stored numeric keys.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Forecast provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        use stormdeck_core::WeatherError as CoreWeatherError;

        match e {
            WeatherError::Network(err) => AppError::Network(err.into_network_error()),
            WeatherError::Status { status: 401, .. } => {
                AppError::Weather(CoreWeatherError::InvalidApiKey)
            }
            WeatherError::Status { status: 404, body } => {
                AppError::Weather(CoreWeatherError::CityNotFound(body))
            }
            WeatherError::Status { status, .. } if status >= 500 => {
                AppError::Weather(CoreWeatherError::ServiceUnavailable)
            }
            WeatherError::Status { status, body } => {
                AppError::Weather(CoreWeatherError::ApiError(format!("{}: {}", status, body)))
            }
            WeatherError::Parse(msg) => AppError::Weather(CoreWeatherError::MalformedForecast(msg)),
            WeatherError::InvalidRequest(msg) => {
                AppError::Config(stormdeck_core::ConfigError::Invalid(msg))
            }
        }
    }
}
