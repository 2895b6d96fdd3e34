use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::reading::{at_least_one, non_negative};
use crate::error::Result;
use crate::ml::{DeviceFlag, FeatureInputs, PredictionResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictRequest {
    #[schema(example = 4)]
    pub family_size: i64,
    #[schema(example = 6.0)]
    pub usage_hours: f64,
    #[schema(example = 3)]
    pub appliances: i64,
    #[schema(example = "Sink")]
    pub primary_appliance: String,
    #[schema(example = true)]
    pub water_saving_device: bool,
}

impl PredictRequest {
    pub fn validate(&self) -> Result<()> {
        at_least_one("family_size", Some(self.family_size))?;
        at_least_one("appliances", Some(self.appliances))?;
        non_negative("usage_hours", Some(self.usage_hours))?;
        Ok(())
    }

    pub fn to_inputs(&self) -> FeatureInputs {
        FeatureInputs {
            family_size: Some(self.family_size),
            usage_hours: Some(self.usage_hours),
            appliances: Some(self.appliances),
            primary_appliance: Some(self.primary_appliance.clone()),
            water_saving_device: Some(DeviceFlag::Bool(self.water_saving_device)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictResponse {
    pub predicted_water_usage_liters: f64,
    pub predicted_savings_liters: f64,
    /// False when the appliance label was unknown and encoded with the fallback code
    pub primary_appliance_recognized: bool,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_water_usage_liters: round3(result.predicted_usage),
            predicted_savings_liters: round3(result.predicted_savings),
            primary_appliance_recognized: result.primary_appliance_recognized,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
