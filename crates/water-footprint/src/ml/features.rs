//! Feature engineering: raw request fields to the fixed-order numeric row the
//! model consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::categories::{CategoryTable, EncodedCategory};
use crate::error::{Result, WaterError};

/// Every feature the builder knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    UsageHours,
    FamilySize,
    Appliances,
    PrimaryAppliance,
    WaterSavingDevice,
    WaterUsagePerCapita,
    UsageXAppliances,
}

impl FeatureColumn {
    /// Canonical emission order, also the order written for a synthesized model.
    pub const ALL: [FeatureColumn; 7] = [
        FeatureColumn::UsageHours,
        FeatureColumn::FamilySize,
        FeatureColumn::Appliances,
        FeatureColumn::PrimaryAppliance,
        FeatureColumn::WaterSavingDevice,
        FeatureColumn::WaterUsagePerCapita,
        FeatureColumn::UsageXAppliances,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::UsageHours => "Usage_Hours",
            FeatureColumn::FamilySize => "Family_Size",
            FeatureColumn::Appliances => "Appliances",
            FeatureColumn::PrimaryAppliance => "Primary_Appliance",
            FeatureColumn::WaterSavingDevice => "Water_Saving_Device",
            FeatureColumn::WaterUsagePerCapita => "Water_Usage_Per_Capita",
            FeatureColumn::UsageXAppliances => "Usage_X_Appliances",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The column order a model was trained with.
///
/// Construction checks that the declared names and [`FeatureColumn::ALL`] are
/// set-equal, so a vector built against this order always covers every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumnOrder {
    columns: Vec<FeatureColumn>,
}

impl FeatureColumnOrder {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            let column = FeatureColumn::from_name(name).ok_or_else(|| {
                WaterError::artifact(format!("unknown feature column '{}'", name))
            })?;
            if !seen.insert(column) {
                return Err(WaterError::artifact(format!(
                    "feature column '{}' declared more than once",
                    name
                )));
            }
            columns.push(column);
        }

        let missing: Vec<&str> = FeatureColumn::ALL
            .iter()
            .filter(|c| !seen.contains(*c))
            .map(FeatureColumn::name)
            .collect();
        if !missing.is_empty() {
            return Err(WaterError::artifact(format!(
                "feature columns missing from model metadata: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for FeatureColumnOrder {
    fn default() -> Self {
        Self {
            columns: FeatureColumn::ALL.to_vec(),
        }
    }
}

/// Water-saving device assertion, accepted as a JSON boolean or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceFlag {
    Bool(bool),
    Text(String),
}

impl DeviceFlag {
    pub fn is_truthy(&self) -> bool {
        match self {
            DeviceFlag::Bool(b) => *b,
            DeviceFlag::Text(s) => {
                matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y")
            }
        }
    }
}

impl From<bool> for DeviceFlag {
    fn from(value: bool) -> Self {
        DeviceFlag::Bool(value)
    }
}

impl From<&str> for DeviceFlag {
    fn from(value: &str) -> Self {
        DeviceFlag::Text(value.to_string())
    }
}

/// Raw, partially optional inputs of one prediction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureInputs {
    pub family_size: Option<i64>,
    pub usage_hours: Option<f64>,
    pub appliances: Option<i64>,
    pub primary_appliance: Option<String>,
    /// Absent means no device
    pub water_saving_device: Option<DeviceFlag>,
}

impl FeatureInputs {
    pub fn has_water_saving_device(&self) -> bool {
        self.water_saving_device
            .as_ref()
            .is_some_and(DeviceFlag::is_truthy)
    }
}

/// One model input row, values aligned with a [`FeatureColumnOrder`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<FeatureColumn>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(order: &FeatureColumnOrder, values: Vec<f64>) -> Result<Self> {
        if values.len() != order.len() {
            return Err(WaterError::internal(format!(
                "feature vector has {} values for {} declared columns",
                values.len(),
                order.len()
            )));
        }
        Ok(Self {
            columns: order.columns().to_vec(),
            values,
        })
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: FeatureColumn) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureColumn, f64)> + '_ {
        self.columns.iter().copied().zip(self.values.iter().copied())
    }

    /// Copy of this row with a single column overridden.
    pub fn with(&self, column: FeatureColumn, value: f64) -> Result<Self> {
        let index = self
            .columns
            .iter()
            .position(|c| *c == column)
            .ok_or_else(|| WaterError::internal(format!("column {} not in vector", column)))?;
        let mut values = self.values.clone();
        values[index] = value;
        Ok(Self {
            columns: self.columns.clone(),
            values,
        })
    }
}

/// Builder output along with the diagnostics gathered on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFeatures {
    pub vector: FeatureVector,
    pub primary_appliance: EncodedCategory,
    pub water_saving_device: bool,
}

/// Turns [`FeatureInputs`] into a [`FeatureVector`] for a given column order.
pub struct FeatureBuilder<'a> {
    order: &'a FeatureColumnOrder,
    categories: &'a CategoryTable,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(order: &'a FeatureColumnOrder, categories: &'a CategoryTable) -> Self {
        Self { order, categories }
    }

    pub fn build(&self, inputs: &FeatureInputs) -> Result<FeatureVector> {
        self.build_detailed(inputs).map(|built| built.vector)
    }

    pub fn build_detailed(&self, inputs: &FeatureInputs) -> Result<BuiltFeatures> {
        let usage_hours = inputs.usage_hours.unwrap_or(0.0);
        let family_size = inputs.family_size.unwrap_or(1) as f64;
        let appliances = inputs.appliances.unwrap_or(1) as f64;

        let primary = self.categories.encode(inputs.primary_appliance.as_deref());
        let device = inputs.has_water_saving_device();
        let usage_x_appliances = usage_hours * appliances;
        // Per-capita usage is not derived yet; kept at zero for model compatibility.
        let water_usage_per_capita = 0.0;

        let values = self
            .order
            .columns()
            .iter()
            .map(|column| match column {
                FeatureColumn::UsageHours => usage_hours,
                FeatureColumn::FamilySize => family_size,
                FeatureColumn::Appliances => appliances,
                FeatureColumn::PrimaryAppliance => f64::from(primary.code),
                FeatureColumn::WaterSavingDevice => {
                    if device {
                        1.0
                    } else {
                        0.0
                    }
                }
                FeatureColumn::WaterUsagePerCapita => water_usage_per_capita,
                FeatureColumn::UsageXAppliances => usage_x_appliances,
            })
            .collect();

        Ok(BuiltFeatures {
            vector: FeatureVector::new(self.order, values)?,
            primary_appliance: primary,
            water_saving_device: device,
        })
    }
}
