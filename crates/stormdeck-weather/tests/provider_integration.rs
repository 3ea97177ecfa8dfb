//! Integration tests for ForecastProvider using wiremock.

use stormdeck_core::WeatherConfig;
use stormdeck_weather::{ForecastProvider, SelectedCity, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body(city_id: u64, name: &str) -> serde_json::Value {
    let day = |dt: i64, code: i32, main: &str| {
        serde_json::json!({
            "dt": dt,
            "temp": { "day": 71.6, "min": 60.1, "max": 75.4, "night": 62.0, "eve": 70.0, "morn": 61.0 },
            "pressure": 1012.0,
            "humidity": 55,
            "weather": [{ "id": code, "main": main, "description": main, "icon": "01d" }],
            "speed": 6.2,
            "deg": 180,
            "clouds": 0
        })
    };
    serde_json::json!({
        "city": { "id": city_id, "name": name, "coord": { "lon": -97.74, "lat": 30.27 }, "country": "US", "population": 0 },
        "cod": "200",
        "message": 0.01,
        "cnt": 8,
        "list": (0..8).map(|i| day(1_700_000_000 + i * 86_400, 800, "Clear")).collect::<Vec<_>>()
    })
}

fn provider_for(server: &MockServer) -> ForecastProvider {
    let config = WeatherConfig {
        api_base_url: server.uri(),
        app_id: "test-key".to_string(),
        ..WeatherConfig::default()
    };
    ForecastProvider::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_success_stamps_key_label_and_created() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/daily"))
        .and(query_param("id", "4671654"))
        .and(query_param("units", "imperial"))
        .and(query_param("appid", "test-key"))
        .and(query_param("cnt", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(4671654, "Austin")))
        .expect(1)
        .mount(&server)
        .await;

    let before = chrono::Utc::now();
    let city = SelectedCity::new("4671654", "Austin, TX");
    let forecast = provider_for(&server).fetch(&city).await.unwrap();

    assert_eq!(forecast.key, "4671654");
    assert_eq!(forecast.label, "Austin, TX");
    assert_eq!(forecast.city_id(), 4671654);
    assert_eq!(forecast.response.list.len(), 8);
    assert!(forecast.created >= before);
}

#[tokio::test]
async fn test_fetch_non_200_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/daily"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let city = SelectedCity::new("4671654", "Austin, TX");
    let err = provider_for(&server).fetch(&city).await.unwrap_err();

    match err {
        WeatherError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_other_success_codes_are_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/daily"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let city = SelectedCity::new("1", "Nowhere");
    let err = provider_for(&server).fetch(&city).await.unwrap_err();
    assert!(matches!(err, WeatherError::Status { status: 204, .. }));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/daily"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let city = SelectedCity::new("1", "Nowhere");
    let err = provider_for(&server).fetch(&city).await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    drop(server);

    let city = SelectedCity::new("1", "Nowhere");
    let err = provider.fetch(&city).await.unwrap_err();
    assert!(matches!(err, WeatherError::Network(_)));
}
