pub mod prediction;
pub mod reading;

pub use prediction::{PredictRequest, PredictResponse};
pub use reading::{CreateReading, Reading, ReadingCreated, ReadingQuery, MAX_READINGS_LIMIT};
