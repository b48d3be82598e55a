//! Mock weather and forecast tools.
//!
//! Values are random stand-ins for a real data source.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Mutex;
use tracing::debug;

use super::{ToolCall, ToolError, ToolResult, ToolService};

const WEATHER_CONDITIONS: [&str; 3] = ["sunny", "cloudy", "rainy"];
const FORECAST_CONDITIONS: [&str; 3] = ["partly cloudy", "scattered showers", "clear"];

pub const DEFAULT_FORECAST_DAYS: u8 = 3;
pub const MAX_FORECAST_DAYS: u8 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Upper-case initial used in formatted temperatures.
    pub fn initial(self) -> char {
        match self {
            TemperatureUnit::Celsius => 'C',
            TemperatureUnit::Fahrenheit => 'F',
        }
    }
}

/// Input for `get_weather`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct WeatherInput {
    /// City and state/country (e.g., 'Paris, France' or 'San Francisco, CA')
    pub location: String,
    /// Temperature unit (optional, defaults to celsius)
    #[serde(default)]
    pub unit: TemperatureUnit,
}

impl WeatherInput {
    pub fn validate(&self) -> Result<(), String> {
        validate_location(&self.location)
    }
}

/// Input for `get_forecast`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ForecastInput {
    /// City and state/country
    pub location: String,
    /// Temperature unit (optional, defaults to celsius)
    #[serde(default)]
    pub unit: TemperatureUnit,
    /// Number of days to forecast (optional, defaults to 3)
    #[serde(default = "default_days", deserialize_with = "whole_days")]
    #[schemars(with = "f64", range(min = 1, max = 7))]
    pub days: u8,
}

impl ForecastInput {
    pub fn validate(&self) -> Result<(), String> {
        validate_location(&self.location)?;
        if !(1..=MAX_FORECAST_DAYS).contains(&self.days) {
            return Err(format!(
                "days must be between 1 and {}, got {}",
                MAX_FORECAST_DAYS, self.days
            ));
        }
        Ok(())
    }
}

fn default_days() -> u8 {
    DEFAULT_FORECAST_DAYS
}

/// Accepts any JSON number with no fractional part, so `5` and `5.0` agree.
fn whole_days<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let days = f64::deserialize(deserializer)?;
    if days.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&days) {
        return Err(serde::de::Error::custom(format!(
            "days must be a whole number between 1 and {}, got {}",
            MAX_FORECAST_DAYS, days
        )));
    }
    Ok(days as u8)
}

fn validate_location(location: &str) -> Result<(), String> {
    if location.trim().is_empty() {
        return Err("location must not be empty".to_string());
    }
    Ok(())
}

/// Weather data returned by both tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: i32,
    pub unit: TemperatureUnit,
    pub conditions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<u8>,
}

/// Random weather generator backing `get_weather` and `get_forecast`.
pub struct WeatherTools {
    rng: Mutex<StdRng>,
}

impl Default for WeatherTools {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherTools {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// A generator producing the same sequence for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn sample(&self, conditions: &[&str]) -> Result<(i32, String), ToolError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ToolError::Execution("weather generator poisoned".to_string()))?;
        let temperature = rng.gen_range(0..30);
        let conditions = conditions
            .choose(&mut *rng)
            .copied()
            .unwrap_or_default()
            .to_string();
        Ok((temperature, conditions))
    }

    pub fn current(&self, input: &WeatherInput) -> Result<WeatherReport, ToolError> {
        debug!("Getting weather for {} in {:?}", input.location, input.unit);
        let (temperature, conditions) = self.sample(&WEATHER_CONDITIONS)?;
        Ok(WeatherReport {
            location: input.location.clone(),
            temperature,
            unit: input.unit,
            conditions,
            forecast_days: None,
        })
    }

    pub fn forecast(&self, input: &ForecastInput) -> Result<WeatherReport, ToolError> {
        debug!(
            "Getting {}-day forecast for {} in {:?}",
            input.days, input.location, input.unit
        );
        let (temperature, conditions) = self.sample(&FORECAST_CONDITIONS)?;
        Ok(WeatherReport {
            location: input.location.clone(),
            temperature,
            unit: input.unit,
            conditions,
            forecast_days: Some(input.days),
        })
    }
}

#[async_trait]
impl ToolService for WeatherTools {
    async fn call(&self, call: ToolCall) -> ToolResult {
        let report = match &call {
            ToolCall::GetWeather(input) => self.current(input)?,
            ToolCall::GetForecast(input) => self.forecast(input)?,
        };
        debug!("{} data for {}: {:?}", call.name(), report.location, report);
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generators_agree() {
        let input = WeatherInput {
            location: "Paris, France".into(),
            unit: TemperatureUnit::Celsius,
        };
        let a = WeatherTools::seeded(7).current(&input).unwrap();
        let b = WeatherTools::seeded(7).current(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn generated_values_stay_in_range() {
        let tools = WeatherTools::seeded(42);
        let input = ForecastInput {
            location: "Tokyo".into(),
            unit: TemperatureUnit::Fahrenheit,
            days: 5,
        };
        for _ in 0..50 {
            let report = tools.forecast(&input).unwrap();
            assert!((0..30).contains(&report.temperature));
            assert!(FORECAST_CONDITIONS.contains(&report.conditions.as_str()));
            assert_eq!(report.unit, TemperatureUnit::Fahrenheit);
            assert_eq!(report.forecast_days, Some(5));
        }
    }
}
