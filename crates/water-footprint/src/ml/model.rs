use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::features::{FeatureColumn, FeatureVector};
use crate::error::{Result, WaterError};

/// Inference over a single feature row
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &FeatureVector) -> Result<f64>;

    fn kind(&self) -> &'static str;
}

/// Persisted regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Predicts the training-target mean regardless of input.
    Mean { constant: f64 },
    /// `intercept + sum(coefficient * value)`, coefficients keyed by column name.
    Linear {
        intercept: f64,
        coefficients: BTreeMap<String, f64>,
    },
}

impl ModelArtifact {
    /// Fit the placeholder mean model.
    pub fn fit_mean(targets: &[f64]) -> Result<Self> {
        if targets.is_empty() {
            return Err(WaterError::artifact("cannot fit mean model on empty targets"));
        }
        let constant = targets.iter().sum::<f64>() / targets.len() as f64;
        if !constant.is_finite() {
            return Err(WaterError::artifact("mean model target is not finite"));
        }
        Ok(ModelArtifact::Mean { constant })
    }

    /// Reject models referring to columns the feature builder cannot produce.
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Mean { constant } if !constant.is_finite() => {
                Err(WaterError::artifact("mean model constant is not finite"))
            }
            ModelArtifact::Linear {
                intercept,
                coefficients,
            } => {
                if !intercept.is_finite() {
                    return Err(WaterError::artifact("linear model intercept is not finite"));
                }
                for (name, weight) in coefficients {
                    if FeatureColumn::from_name(name).is_none() {
                        return Err(WaterError::artifact(format!(
                            "linear model references unknown column '{}'",
                            name
                        )));
                    }
                    if !weight.is_finite() {
                        return Err(WaterError::artifact(format!(
                            "coefficient for '{}' is not finite",
                            name
                        )));
                    }
                }
                Ok(())
            }
            ModelArtifact::Mean { .. } => Ok(()),
        }
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, row: &FeatureVector) -> Result<f64> {
        match self {
            ModelArtifact::Mean { constant } => Ok(*constant),
            ModelArtifact::Linear {
                intercept,
                coefficients,
            } => {
                let dot: f64 = row
                    .iter()
                    .map(|(column, value)| {
                        coefficients.get(column.name()).copied().unwrap_or(0.0) * value
                    })
                    .sum();
                Ok(intercept + dot)
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Mean { .. } => "mean",
            ModelArtifact::Linear { .. } => "linear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::features::FeatureColumnOrder;

    fn row(values: Vec<f64>) -> FeatureVector {
        FeatureVector::new(&FeatureColumnOrder::default(), values).unwrap()
    }

    #[test]
    fn test_fit_mean() {
        let model = ModelArtifact::fit_mean(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(model, ModelArtifact::Mean { constant: 20.0 });
        assert_eq!(model.kind(), "mean");
    }

    #[test]
    fn test_fit_mean_empty() {
        assert!(ModelArtifact::fit_mean(&[]).is_err());
    }

    #[test]
    fn test_mean_ignores_input() {
        let model = ModelArtifact::Mean { constant: 42.5 };
        let a = model.predict(&row(vec![0.0; 7])).unwrap();
        let b = model.predict(&row(vec![9.0; 7])).unwrap();
        assert_eq!(a, 42.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_linear_uses_column_names() {
        let model = ModelArtifact::Linear {
            intercept: 5.0,
            coefficients: BTreeMap::from([
                ("Usage_Hours".to_string(), 10.0),
                ("Water_Saving_Device".to_string(), -3.0),
            ]),
        };
        // Usage_Hours=2, Water_Saving_Device=1
        let prediction = model
            .predict(&row(vec![2.0, 4.0, 3.0, 0.0, 1.0, 0.0, 6.0]))
            .unwrap();
        assert_eq!(prediction, 5.0 + 20.0 - 3.0);
    }

    #[test]
    fn test_validate_rejects_unknown_coefficient() {
        let model = ModelArtifact::Linear {
            intercept: 0.0,
            coefficients: BTreeMap::from([("Rainfall".to_string(), 1.0)]),
        };
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("Rainfall"));
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(ModelArtifact::Mean { constant: 1.5 }).unwrap();
        assert_eq!(json["kind"], "mean");
        assert_eq!(json["constant"], 1.5);

        let parsed: ModelArtifact = serde_json::from_str(
            r#"{"kind":"linear","intercept":1.0,"coefficients":{"Appliances":2.0}}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind(), "linear");
    }
}
