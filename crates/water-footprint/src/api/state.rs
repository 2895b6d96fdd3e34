use crate::db::ReadingRepository;
use crate::ml::PredictionEngine;

pub struct AppState {
    pub engine: PredictionEngine,
    pub repository: ReadingRepository,
    pub readings_default_limit: i64,
}

impl AppState {
    pub fn new(engine: PredictionEngine, repository: ReadingRepository) -> Self {
        Self {
            engine,
            repository,
            readings_default_limit: 50,
        }
    }

    pub fn with_readings_default_limit(mut self, limit: i64) -> Self {
        self.readings_default_limit = limit;
        self
    }
}
