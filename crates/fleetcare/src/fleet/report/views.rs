use super::super::domain::{VehicleId, WorkshopId};
use serde::{Deserialize, Serialize};

/// Order in which a vehicle's services are differenced when averaging the
/// days between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalOrdering {
    /// Services are differenced in the order the backend returned them.
    /// Out-of-order records yield negative deltas that are averaged in as-is.
    #[default]
    Arrival,
    /// Services are sorted by date first; undated records keep their relative
    /// order after every dated one.
    Chronological,
}

impl IntervalOrdering {
    pub const fn from_sort_flag(sort_by_date: bool) -> Self {
        if sort_by_date {
            Self::Chronological
        } else {
            Self::Arrival
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Arrival => "arrival order",
            Self::Chronological => "chronological order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleCostEntry {
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_label: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkshopCostEntry {
    pub workshop_id: Option<WorkshopId>,
    pub workshop_name: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleFrequencyEntry {
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_label: String,
    pub services: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkshopFrequencyEntry {
    pub workshop_id: Option<WorkshopId>,
    pub workshop_name: String,
    pub services: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurringRepairEntry {
    pub description: String,
    pub occurrences: usize,
}

impl RecurringRepairEntry {
    /// A repair is recurring once the same description shows up twice.
    pub fn is_recurring(&self) -> bool {
        self.occurrences > 1
    }
}

/// Share of a workshop's services that are completed. A workshop with no
/// services reports `percentage == 0.0` and `total == 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkshopProgressEntry {
    pub workshop_id: Option<WorkshopId>,
    pub workshop_name: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub fully_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceIntervalEntry {
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_label: String,
    pub services: usize,
    pub average_days: f64,
}

/// Input for the accumulated cost bar/pie charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostChart {
    pub vehicle_labels: Vec<String>,
    pub vehicle_costs: Vec<f64>,
    pub workshop_labels: Vec<String>,
    pub workshop_costs: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetTotals {
    pub vehicles: usize,
    pub workshops: usize,
    pub services: usize,
    pub unattributed_services: usize,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetHighlights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costliest_vehicle: Option<VehicleCostEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_workshop: Option<WorkshopFrequencyEntry>,
    pub average_cost_per_service: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repeated_repairs: Vec<RecurringRepairEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workshops_with_open_work: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub cost_chart: CostChart,
    pub workshop_frequency: Vec<WorkshopFrequencyEntry>,
    pub recurring_repairs: Vec<RecurringRepairEntry>,
    pub workshop_progress: Vec<WorkshopProgressEntry>,
}
