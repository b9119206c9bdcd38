pub mod analyzer;
pub mod parser;
pub mod providers;

pub use analyzer::PhotoAnalyzer;
