//! Water footprint service: stores water-usage readings and predicts household
//! usage plus the savings attributable to a water-saving device.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ml;
pub mod models;

pub use config::Config;
pub use error::{Result, WaterError};
pub use ml::{ArtifactStore, PredictionContext, PredictionEngine, PredictionResult};
