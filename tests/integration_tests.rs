//! Integration tests for the weather icebreaker against mock HTTP servers.

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use weather_icebreaker::config::WeatherConfig;
use weather_icebreaker::weather::open_meteo::HOURLY_FIELDS;
use weather_icebreaker::{
    Coordinates, Field, GeolocationError, GeolocationProvider, IpGeolocation, LocationResolver,
    LocationSource, MemoryDisplay, PositionOptions, VisualState, WeatherFetcher, WeatherSource,
    Widget, WidgetError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 10:30 in Stockholm
fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap()
}

fn hourly_body(times: &[&str], temps: &[f64], wind: f64, rain: f64) -> serde_json::Value {
    serde_json::json!({
        "latitude": 59.33,
        "longitude": 18.07,
        "timezone": "Europe/Stockholm",
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "precipitation_probability": "%",
            "windspeed_10m": "km/h"
        },
        "hourly": {
            "time": times,
            "temperature_2m": temps,
            "precipitation_probability": vec![rain; temps.len()],
            "windspeed_10m": vec![wind; temps.len()]
        }
    })
}

fn config_for(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        forecast_url: format!("{}/v1/forecast", server.uri()),
        archive_url: format!("{}/v1/archive", server.uri()),
        ..WeatherConfig::default()
    }
}

async fn mount_forecast(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("hourly", HOURLY_FIELDS))
        .and(query_param("timezone", "Europe/Stockholm"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_archive(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("start_date", "2024-03-01"))
        .and(query_param("end_date", "2024-03-01"))
        .and(query_param("hourly", HOURLY_FIELDS))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(hourly_body(
            &["2024-03-02T09:00", "2024-03-02T10:00", "2024-03-02T11:00"],
            &[3.0, 4.5, 6.0],
            13.0,
            70.0,
        )),
    )
    .await;
    mount_archive(
        &server,
        ResponseTemplate::new(200).set_body_json(hourly_body(
            &["2024-03-01T09:00", "2024-03-01T10:00", "2024-03-01T11:00"],
            &[0.5, 1.3, 2.0],
            0.0,
            0.0,
        )),
    )
    .await;
    server
}

#[tokio::test]
async fn test_fetch_aligns_now_with_yesterday() {
    let server = healthy_server().await;
    let fetcher = WeatherFetcher::new(&config_for(&server)).unwrap();

    let reading = fetcher
        .fetch(Coordinates::new(59.3293, 18.0686), fixed_now())
        .await
        .unwrap();

    assert_eq!(reading.snapshot.temp_now, 4.5);
    assert_eq!(reading.snapshot.temp_yesterday, 1.3);
    assert_eq!(reading.snapshot.temp_delta, 4.5 - 1.3);
    assert_eq!(reading.snapshot.wind_now, 13.0);
    assert_eq!(reading.snapshot.rain_prob_now, 70.0);
    assert_eq!(reading.units.temperature, "°C");
}

#[tokio::test]
async fn test_fetch_fails_on_non_success_status() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(hourly_body(&["2024-03-02T10:00"], &[4.5], 1.0, 1.0)),
    )
    .await;
    mount_archive(&server, ResponseTemplate::new(500)).await;

    let fetcher = WeatherFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .fetch(Coordinates::new(59.3293, 18.0686), fixed_now())
        .await
        .unwrap_err();

    assert!(matches!(err, WidgetError::WeatherRequestFailed { status: 500 }));
    assert_eq!(err.to_string(), "weather request failed");
}

#[tokio::test]
async fn test_fetch_fails_when_hour_missing() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(hourly_body(&["2024-03-02T10:00"], &[4.5], 1.0, 1.0)),
    )
    .await;
    mount_archive(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(hourly_body(&["2024-03-01T03:00"], &[1.0], 1.0, 1.0)),
    )
    .await;

    let fetcher = WeatherFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .fetch(Coordinates::new(59.3293, 18.0686), fixed_now())
        .await
        .unwrap_err();

    match err {
        WidgetError::HourNotFound { stamp } => assert_eq!(stamp, "2024-03-01T10:00"),
        other => panic!("expected HourNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_fails_on_malformed_body() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_string("not json")).await;
    mount_archive(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(hourly_body(&["2024-03-01T10:00"], &[1.0], 1.0, 1.0)),
    )
    .await;

    let fetcher = WeatherFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .fetch(Coordinates::new(59.3293, 18.0686), fixed_now())
        .await
        .unwrap_err();

    assert!(matches!(err, WidgetError::Parse { .. }));
}

#[tokio::test]
async fn test_widget_renders_link_location_end_to_end() {
    let server = healthy_server().await;
    let fetcher = Arc::new(WeatherFetcher::new(&config_for(&server)).unwrap());

    let mut widget = Widget::new(
        MemoryDisplay::new(),
        StdRng::seed_from_u64(11),
        fetcher,
        LocationResolver::default(),
        "https://example.com/?lat=59.3293&lon=18.0686",
    )
    .with_clock(fixed_now);

    assert!(widget.start().await);

    let state = widget.state();
    assert_eq!(
        state.location.as_ref().map(|l| l.source),
        Some(LocationSource::Link)
    );
    assert!(state.weather_error.is_none());

    let display = widget.display();
    assert_eq!(display.text(Field::TempNow), Some("4.5°C"));
    assert_eq!(display.text(Field::TempYesterday), Some("1.3°C"));
    assert_eq!(display.text(Field::TempDelta), Some("+3.2°C"));
    assert_eq!(display.text(Field::WindNow), Some("13.0 km/h"));
    assert_eq!(display.text(Field::RainNow), Some("70%"));
    assert_eq!(display.text(Field::Summary), Some("Chilly, rainy, light breeze."));
    assert!(display.text(Field::Say).is_some());
    assert_eq!(
        widget.share_link().unwrap(),
        "https://example.com/?lat=59.3293&lon=18.0686"
    );
}

#[tokio::test]
async fn test_widget_shows_placeholders_when_weather_fails() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(503)).await;
    mount_archive(&server, ResponseTemplate::new(503)).await;
    let fetcher = Arc::new(WeatherFetcher::new(&config_for(&server)).unwrap());

    let mut widget = Widget::new(
        MemoryDisplay::new(),
        StdRng::seed_from_u64(11),
        fetcher,
        LocationResolver::default(),
        "https://example.com/?lat=59.3293&lon=18.0686",
    )
    .with_clock(fixed_now);
    widget.start().await;

    let display = widget.display();
    assert_eq!(display.text(Field::TempNow), Some("--"));
    assert_eq!(display.text(Field::RainNow), Some("--"));
    assert_eq!(display.text(Field::Summary), Some("Weather unavailable"));
    assert!(display.is_on(VisualState::WeatherError));
    assert_eq!(
        widget.state().weather_error.as_deref(),
        Some("weather request failed")
    );
}

#[tokio::test]
async fn test_ip_geolocation_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "203.0.113.7",
            "latitude": 57.7089,
            "longitude": 11.9746
        })))
        .mount(&server)
        .await;

    let provider = IpGeolocation::new(format!("{}/json/", server.uri())).unwrap();
    let coordinates = provider
        .current_position(PositionOptions::default())
        .await
        .unwrap();
    assert_eq!(coordinates, Coordinates::new(57.7089, 11.9746));

    let result = LocationResolver::default().locate(Some(&provider)).await;
    assert_eq!(result.source, LocationSource::Gps);
}

#[tokio::test]
async fn test_ip_geolocation_denied_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let provider = IpGeolocation::new(format!("{}/json/", server.uri())).unwrap();
    let err = provider
        .current_position(PositionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GeolocationError::PermissionDenied(_)));

    let result = LocationResolver::default().locate(Some(&provider)).await;
    assert_eq!(result.source, LocationSource::Fallback);
    assert_eq!(
        result.error_reason.as_deref(),
        Some("position request denied (403 forbidden)")
    );
}
