pub mod heatmap;

pub use heatmap::{HeatmapQuery, HeatmapResponse};
