use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::categories::CategoryTable;
use super::features::{FeatureBuilder, FeatureColumn, FeatureColumnOrder, FeatureInputs, FeatureVector};
use super::model::{ModelArtifact, Regressor};
use crate::error::Result;

/// Immutable set of loaded artifacts shared by every prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionContext {
    pub model: ModelArtifact,
    pub columns: FeatureColumnOrder,
    pub categories: CategoryTable,
}

impl PredictionContext {
    pub fn new(model: ModelArtifact, columns: FeatureColumnOrder, categories: CategoryTable) -> Self {
        Self {
            model,
            columns,
            categories,
        }
    }

    pub fn feature_builder(&self) -> FeatureBuilder<'_> {
        FeatureBuilder::new(&self.columns, &self.categories)
    }
}

/// Predicted usage and the counterfactual savings of the water-saving device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_usage: f64,
    /// Zero unless a device was asserted; may be negative for degenerate models
    pub predicted_savings: f64,
    pub primary_appliance_recognized: bool,
}

/// Runs inference against a shared [`PredictionContext`].
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    context: Arc<PredictionContext>,
}

impl PredictionEngine {
    pub fn new(context: Arc<PredictionContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    pub fn model_kind(&self) -> &'static str {
        self.context.model.kind()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        self.context.model.predict(features)
    }

    pub fn predict_with_savings(&self, inputs: &FeatureInputs) -> Result<PredictionResult> {
        let built = self.context.feature_builder().build_detailed(inputs)?;
        let usage = self.predict(&built.vector)?;

        let savings = if built.water_saving_device {
            let without_device = built.vector.with(FeatureColumn::WaterSavingDevice, 0.0)?;
            let usage_without_device = self.predict(&without_device)?;
            usage_without_device - usage
        } else {
            0.0
        };

        tracing::debug!(
            usage,
            savings,
            recognized = built.primary_appliance.recognized,
            "prediction computed"
        );

        Ok(PredictionResult {
            predicted_usage: usage,
            predicted_savings: savings,
            primary_appliance_recognized: built.primary_appliance.recognized,
        })
    }
}
