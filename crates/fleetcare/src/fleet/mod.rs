mod decode;
pub mod domain;
pub mod export;
pub mod report;
pub mod snapshot;

pub use report::{FleetReport, IntervalOrdering};
pub use snapshot::{FleetSnapshot, SnapshotError};
