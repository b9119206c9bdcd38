pub mod health;
pub mod heatmap;

pub use health::health_check;
pub use heatmap::{filter_options, query_hazards};
