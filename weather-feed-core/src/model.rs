use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conditions::Condition;

/// A city the feed reports on. Loaded once from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub icon: String,
}

impl City {
    pub fn new(name: &str, latitude: f64, longitude: f64, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            icon: icon.to_string(),
        }
    }
}

/// Current weather for one city, as pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    pub city_icon: String,
    /// Degrees Celsius, one decimal place.
    pub temperature: f64,
    /// km/h, one decimal place.
    pub wind_speed: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    pub description: String,
    pub weather_icon: String,
    pub timestamp: DateTime<Utc>,
}

impl WeatherRecord {
    /// Build a record from a complete set of current conditions.
    pub fn from_current(
        city: &City,
        current: &CurrentConditions,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let Condition { description, icon } = crate::conditions::describe(current.weathercode);

        Self {
            city: city.name.clone(),
            city_icon: city.icon.clone(),
            temperature: round_one_decimal(current.temperature_2m),
            wind_speed: round_one_decimal(current.windspeed_10m),
            humidity: current.relativehumidity_2m,
            description: description.to_string(),
            weather_icon: icon.to_string(),
            timestamp,
        }
    }
}

/// Body returned by the forecast endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub windspeed_10m: f64,
    pub relativehumidity_2m: u8,
    pub weathercode: i32,
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
