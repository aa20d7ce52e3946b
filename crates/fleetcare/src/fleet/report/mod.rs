mod aggregates;
mod insights;
mod summary;
pub mod views;

pub use aggregates::{
    average_days_between_services, average_interval_days, completion_percentage,
    completion_progress_per_workshop, cost_per_vehicle, cost_per_workshop, recurring_repairs,
    service_frequency_per_vehicle, service_frequency_per_workshop,
};
pub use summary::FleetReport;
pub use views::IntervalOrdering;

pub(crate) use insights::generate_highlights;
