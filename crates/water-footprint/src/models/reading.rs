use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{Result, WaterError};

/// A stored sensor or user-submitted reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reading {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    /// Liters per minute
    pub flow_rate_lpm: f64,
    pub total_liters: f64,
    pub reading_seconds: Option<f64>,
    pub family_size: Option<i64>,
    pub appliances: Option<i64>,
    pub usage_hours: Option<f64>,
    pub primary_appliance: Option<String>,
    pub water_saving_device: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateReading {
    #[schema(example = "esp32_01")]
    pub device_id: String,
    #[schema(example = 0.0)]
    pub flow_rate_lpm: f64,
    #[serde(default)]
    #[schema(example = 7.24)]
    pub total_liters: Option<f64>,
    #[serde(default)]
    pub reading_seconds: Option<f64>,
    #[serde(default)]
    #[schema(example = 4)]
    pub family_size: Option<i64>,
    #[serde(default)]
    #[schema(example = 3)]
    pub appliances: Option<i64>,
    #[serde(default)]
    #[schema(example = 6.0)]
    pub usage_hours: Option<f64>,
    #[serde(default)]
    #[schema(example = "Sink")]
    pub primary_appliance: Option<String>,
    #[serde(default)]
    #[schema(example = true)]
    pub water_saving_device: Option<bool>,
}

impl CreateReading {
    pub fn new(device_id: impl Into<String>, flow_rate_lpm: f64) -> Self {
        Self {
            device_id: device_id.into(),
            flow_rate_lpm,
            ..Default::default()
        }
    }

    pub fn with_total_liters(mut self, total_liters: f64) -> Self {
        self.total_liters = Some(total_liters);
        self
    }

    pub fn with_household(mut self, family_size: i64, appliances: i64, usage_hours: f64) -> Self {
        self.family_size = Some(family_size);
        self.appliances = Some(appliances);
        self.usage_hours = Some(usage_hours);
        self
    }

    pub fn with_primary_appliance(mut self, primary_appliance: impl Into<String>) -> Self {
        self.primary_appliance = Some(primary_appliance.into());
        self
    }

    pub fn with_water_saving_device(mut self, present: bool) -> Self {
        self.water_saving_device = Some(present);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.device_id.trim().is_empty() {
            return Err(WaterError::invalid_input("device_id", "must not be empty"));
        }
        non_negative("flow_rate_lpm", Some(self.flow_rate_lpm))?;
        non_negative("total_liters", self.total_liters)?;
        non_negative("usage_hours", self.usage_hours)?;
        at_least_one("family_size", self.family_size)?;
        at_least_one("appliances", self.appliances)?;
        if let Some(seconds) = self.reading_seconds {
            if !seconds.is_finite() {
                return Err(WaterError::invalid_input("reading_seconds", "must be finite"));
            }
        }
        Ok(())
    }
}

/// Query parameters for listing readings
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReadingQuery {
    pub limit: Option<i64>,
}

pub const MAX_READINGS_LIMIT: i64 = 1000;

impl ReadingQuery {
    /// Resolve the effective limit, rejecting values outside `1..=MAX_READINGS_LIMIT`.
    pub fn resolve_limit(&self, default_limit: i64) -> Result<i64> {
        let limit = self.limit.unwrap_or(default_limit);
        if !(1..=MAX_READINGS_LIMIT).contains(&limit) {
            return Err(WaterError::invalid_input(
                "limit",
                format!("must be between 1 and {}", MAX_READINGS_LIMIT),
            ));
        }
        Ok(limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadingCreated {
    pub id: i64,
    pub status: String,
}

impl ReadingCreated {
    pub fn saved(id: i64) -> Self {
        Self {
            id,
            status: "saved".to_string(),
        }
    }
}

pub(crate) fn non_negative(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(WaterError::invalid_input(
            field,
            "must be a finite value greater than or equal to 0",
        )),
        _ => Ok(()),
    }
}

pub(crate) fn at_least_one(field: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 1 => Err(WaterError::invalid_input(field, "must be at least 1")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_reading_is_valid() {
        assert!(CreateReading::new("esp32_01", 0.0).validate().is_ok());
    }

    #[test]
    fn test_full_reading_is_valid() {
        let reading = CreateReading::new("esp32_01", 1.5)
            .with_total_liters(7.24)
            .with_household(4, 3, 6.0)
            .with_primary_appliance("Sink")
            .with_water_saving_device(true);
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_device() {
        let err = CreateReading::new("  ", 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("device_id"));
    }

    #[test]
    fn test_rejects_negative_flow() {
        let err = CreateReading::new("esp32_01", -0.1).validate().unwrap_err();
        assert!(err.to_string().contains("flow_rate_lpm"));
    }

    #[test]
    fn test_rejects_zero_family_size() {
        let err = CreateReading::new("esp32_01", 1.0)
            .with_household(0, 1, 1.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("family_size"));
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let reading: CreateReading =
            serde_json::from_str(r#"{"device_id":"esp32_01","flow_rate_lpm":0.5}"#).unwrap();
        assert_eq!(reading.total_liters, None);
        assert_eq!(reading.water_saving_device, None);
    }

    #[test]
    fn test_resolve_limit() {
        assert_eq!(ReadingQuery::default().resolve_limit(50).unwrap(), 50);
        assert_eq!(ReadingQuery { limit: Some(5) }.resolve_limit(50).unwrap(), 5);
        assert!(ReadingQuery { limit: Some(0) }.resolve_limit(50).is_err());
        assert!(ReadingQuery { limit: Some(1001) }.resolve_limit(50).is_err());
    }
}
