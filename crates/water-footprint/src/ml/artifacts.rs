//! Model and metadata persistence.
//!
//! Three JSON blobs live in the artifact directory: `model.json`,
//! `feature_columns.json` and `primary_categories.json`. When the first two are
//! missing a placeholder mean model is fit on a small seeded synthetic set and
//! all three files are written before loading.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::categories::CategoryTable;
use super::engine::PredictionContext;
use super::features::{FeatureColumn, FeatureColumnOrder};
use super::model::{ModelArtifact, Regressor};
use crate::error::{Result, WaterError};

pub const MODEL_FILE: &str = "model.json";
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const PRIMARY_CATEGORIES_FILE: &str = "primary_categories.json";

const SYNTHETIC_ROWS: usize = 10;
const SYNTHETIC_SEED: u64 = 0;

/// Rows and targets the placeholder model is fit on
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub columns: FeatureColumnOrder,
    pub rows: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl TrainingSet {
    /// Seeded synthetic rows; target = 10*hours + 5*family + 2*appliances.
    pub fn synthetic(rows: usize, seed: u64) -> Self {
        let columns = FeatureColumnOrder::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = Vec::with_capacity(rows);
        let mut targets = Vec::with_capacity(rows);

        for _ in 0..rows {
            let usage_hours: f64 = rng.gen_range(1.0..8.0);
            let family_size = rng.gen_range(1..6) as f64;
            let appliances = rng.gen_range(1..6) as f64;

            let row = columns
                .columns()
                .iter()
                .map(|column| match column {
                    FeatureColumn::UsageHours => usage_hours,
                    FeatureColumn::FamilySize => family_size,
                    FeatureColumn::Appliances => appliances,
                    FeatureColumn::PrimaryAppliance => rng.gen_range(0..4) as f64,
                    FeatureColumn::WaterSavingDevice => rng.gen_range(0..2) as f64,
                    FeatureColumn::WaterUsagePerCapita => rng.gen_range(10.0..100.0),
                    FeatureColumn::UsageXAppliances => rng.gen_range(1.0..50.0),
                })
                .collect();

            data.push(row);
            targets.push(usage_hours * 10.0 + family_size * 5.0 + appliances * 2.0);
        }

        Self {
            columns,
            rows: data,
            targets,
        }
    }
}

/// Filesystem location of the prediction artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.base_dir.join(MODEL_FILE)
    }

    pub fn feature_columns_path(&self) -> PathBuf {
        self.base_dir.join(FEATURE_COLUMNS_FILE)
    }

    pub fn primary_categories_path(&self) -> PathBuf {
        self.base_dir.join(PRIMARY_CATEGORIES_FILE)
    }

    pub fn has_model(&self) -> bool {
        self.model_path().exists() && self.feature_columns_path().exists()
    }

    /// Load the artifacts, synthesizing placeholders first if the model or
    /// its column metadata is missing.
    ///
    /// A missing or corrupt model or column list is fatal. A missing or corrupt
    /// category list degrades to the default table.
    pub fn ensure_artifacts(&self) -> Result<PredictionContext> {
        fs::create_dir_all(&self.base_dir)?;

        if !self.has_model() {
            tracing::info!(dir = %self.base_dir.display(), "no model found, creating placeholder model");
            self.write_placeholder()?;
        }

        let context = self.load()?;
        tracing::info!(
            model = context.model.kind(),
            columns = context.columns.len(),
            categories = context.categories.len(),
            "prediction artifacts loaded"
        );
        Ok(context)
    }

    pub fn load(&self) -> Result<PredictionContext> {
        let model: ModelArtifact = read_json(&self.model_path())?;
        model.validate()?;

        let names: Vec<String> = read_json(&self.feature_columns_path())?;
        let columns = FeatureColumnOrder::from_names(&names)?;

        let categories = match read_json::<Vec<String>>(&self.primary_categories_path()) {
            Ok(labels) => CategoryTable::new(labels),
            Err(err) => {
                tracing::warn!(error = %err, "primary categories unavailable, using defaults");
                CategoryTable::default()
            }
        };

        Ok(PredictionContext::new(model, columns, categories))
    }

    fn write_placeholder(&self) -> Result<()> {
        let training = TrainingSet::synthetic(SYNTHETIC_ROWS, SYNTHETIC_SEED);
        let model = ModelArtifact::fit_mean(&training.targets)?;

        write_json(&self.model_path(), &model)?;
        write_json(&self.feature_columns_path(), &training.columns.names())?;
        write_json(
            &self.primary_categories_path(),
            CategoryTable::default().labels(),
        )?;
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)
        .map_err(|e| WaterError::artifact(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| WaterError::artifact(format!("cannot parse {}: {}", path.display(), e)))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes)
        .map_err(|e| WaterError::artifact(format!("cannot write {}: {}", path.display(), e)))
}
