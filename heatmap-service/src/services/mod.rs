pub mod filter;
pub mod repository;

pub use filter::{FieldFilter, FilterOptions, HazardFilters};
pub use repository::{HazardRepository, StaticHazardRepository};
