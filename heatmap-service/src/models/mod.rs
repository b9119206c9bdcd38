pub mod hazard;

pub use hazard::{HazardRecord, Location, Severity};
