use super::super::domain::{ServiceRecord, Vehicle, Workshop};
use super::aggregates;
use super::views::{
    CostChart, DashboardReport, FleetHighlights, FleetTotals, IntervalOrdering,
    RecurringRepairEntry, ServiceIntervalEntry, VehicleCostEntry, VehicleFrequencyEntry,
    WorkshopCostEntry, WorkshopFrequencyEntry, WorkshopProgressEntry,
};
use serde::Serialize;

/// Every display metric for one snapshot of vehicles, workshops and services.
/// Built from scratch on each call; nothing is cached between reports.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub interval_ordering: IntervalOrdering,
    pub totals: FleetTotals,
    pub cost_chart: CostChart,
    pub vehicle_costs: Vec<VehicleCostEntry>,
    pub workshop_costs: Vec<WorkshopCostEntry>,
    pub vehicle_frequency: Vec<VehicleFrequencyEntry>,
    pub workshop_frequency: Vec<WorkshopFrequencyEntry>,
    pub recurring_repairs: Vec<RecurringRepairEntry>,
    pub workshop_progress: Vec<WorkshopProgressEntry>,
    pub service_intervals: Vec<ServiceIntervalEntry>,
}

impl FleetReport {
    pub fn build(
        vehicles: &[Vehicle],
        workshops: &[Workshop],
        services: &[ServiceRecord],
        interval_ordering: IntervalOrdering,
    ) -> Self {
        let vehicle_totals = aggregates::cost_per_vehicle(vehicles, services);
        let workshop_totals = aggregates::cost_per_workshop(workshops, services);

        let vehicle_costs = vehicles
            .iter()
            .zip(&vehicle_totals)
            .map(|(vehicle, &total_cost)| VehicleCostEntry {
                vehicle_id: vehicle.id,
                vehicle_label: vehicle.display_label(),
                total_cost,
            })
            .collect();

        let workshop_costs = workshops
            .iter()
            .zip(&workshop_totals)
            .map(|(workshop, &total_cost)| WorkshopCostEntry {
                workshop_id: workshop.id,
                workshop_name: workshop.name.clone(),
                total_cost,
            })
            .collect();

        let cost_chart = CostChart {
            vehicle_labels: vehicles.iter().map(Vehicle::display_label).collect(),
            vehicle_costs: vehicle_totals,
            workshop_labels: workshops
                .iter()
                .map(|workshop| workshop.name.clone())
                .collect(),
            workshop_costs: workshop_totals,
        };

        let totals = FleetTotals {
            vehicles: vehicles.len(),
            workshops: workshops.len(),
            services: services.len(),
            unattributed_services: services
                .iter()
                .filter(|service| service.is_unattributed())
                .count(),
            total_cost: services.iter().map(ServiceRecord::billable_cost).sum(),
        };

        Self {
            interval_ordering,
            totals,
            cost_chart,
            vehicle_costs,
            workshop_costs,
            vehicle_frequency: aggregates::service_frequency_per_vehicle(vehicles, services),
            workshop_frequency: aggregates::service_frequency_per_workshop(workshops, services),
            recurring_repairs: aggregates::recurring_repairs(services),
            workshop_progress: aggregates::completion_progress_per_workshop(workshops, services),
            service_intervals: aggregates::average_days_between_services(
                vehicles,
                services,
                interval_ordering,
            ),
        }
    }

    /// The subset rendered on the landing dashboard.
    pub fn dashboard(&self) -> DashboardReport {
        DashboardReport {
            cost_chart: self.cost_chart.clone(),
            workshop_frequency: self.workshop_frequency.clone(),
            recurring_repairs: self.recurring_repairs.clone(),
            workshop_progress: self.workshop_progress.clone(),
        }
    }

    pub fn highlights(&self) -> FleetHighlights {
        super::generate_highlights(self)
    }
}
