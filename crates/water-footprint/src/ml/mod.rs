//! Prediction core: category encoding, feature engineering, inference and
//! artifact bootstrap.

pub mod artifacts;
pub mod categories;
pub mod engine;
pub mod features;
pub mod model;

pub use artifacts::{ArtifactStore, TrainingSet};
pub use categories::{CategoryTable, EncodedCategory, DEFAULT_PRIMARY_CATEGORIES, FALLBACK_CODE};
pub use engine::{PredictionContext, PredictionEngine, PredictionResult};
pub use features::{
    BuiltFeatures, DeviceFlag, FeatureBuilder, FeatureColumn, FeatureColumnOrder, FeatureInputs,
    FeatureVector,
};
pub use model::{ModelArtifact, Regressor};
