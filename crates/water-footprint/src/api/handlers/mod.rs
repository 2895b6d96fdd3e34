pub mod health;
pub mod predict;
pub mod readings;

pub use health::health_check;
pub use predict::predict;
pub use readings::{create_reading, get_reading, list_readings};

// utoipa path items live next to their handlers
pub use health::__path_health_check;
pub use predict::__path_predict;
pub use readings::{__path_create_reading, __path_get_reading, __path_list_readings};
