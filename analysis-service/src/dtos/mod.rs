pub mod analysis;

pub use analysis::AnalyzePhotoRequest;
