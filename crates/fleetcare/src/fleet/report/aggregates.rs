//! Pure metrics over already-fetched collections.
//!
//! A service belongs to a vehicle (workshop) only when both sides carry an
//! identity and the identities are equal. Services without a reference never
//! show up in a per-entity grouping, and entities without an identity never
//! collect services.

use super::super::domain::{ServiceRecord, Vehicle, VehicleId, Workshop, WorkshopId};
use super::views::{
    IntervalOrdering, RecurringRepairEntry, ServiceIntervalEntry, VehicleFrequencyEntry,
    WorkshopFrequencyEntry, WorkshopProgressEntry,
};
use std::collections::HashMap;

const MILLIS_PER_DAY: f64 = 1000.0 * 3600.0 * 24.0;

fn services_for_vehicle<'a>(
    id: Option<VehicleId>,
    services: &'a [ServiceRecord],
) -> impl Iterator<Item = &'a ServiceRecord> + 'a {
    services
        .iter()
        .filter(move |service| id.is_some() && service.vehicle_id() == id)
}

fn services_for_workshop<'a>(
    id: Option<WorkshopId>,
    services: &'a [ServiceRecord],
) -> impl Iterator<Item = &'a ServiceRecord> + 'a {
    services
        .iter()
        .filter(move |service| id.is_some() && service.workshop_id() == id)
}

/// Accumulated cost per vehicle, index-aligned with `vehicles`.
pub fn cost_per_vehicle(vehicles: &[Vehicle], services: &[ServiceRecord]) -> Vec<f64> {
    vehicles
        .iter()
        .map(|vehicle| {
            services_for_vehicle(vehicle.id, services)
                .map(ServiceRecord::billable_cost)
                .sum::<f64>()
        })
        .collect()
}

/// Accumulated cost per workshop, index-aligned with `workshops`.
pub fn cost_per_workshop(workshops: &[Workshop], services: &[ServiceRecord]) -> Vec<f64> {
    workshops
        .iter()
        .map(|workshop| {
            services_for_workshop(workshop.id, services)
                .map(ServiceRecord::billable_cost)
                .sum::<f64>()
        })
        .collect()
}

pub fn service_frequency_per_workshop(
    workshops: &[Workshop],
    services: &[ServiceRecord],
) -> Vec<WorkshopFrequencyEntry> {
    workshops
        .iter()
        .map(|workshop| WorkshopFrequencyEntry {
            workshop_id: workshop.id,
            workshop_name: workshop.name.clone(),
            services: services_for_workshop(workshop.id, services).count(),
        })
        .collect()
}

pub fn service_frequency_per_vehicle(
    vehicles: &[Vehicle],
    services: &[ServiceRecord],
) -> Vec<VehicleFrequencyEntry> {
    vehicles
        .iter()
        .map(|vehicle| VehicleFrequencyEntry {
            vehicle_id: vehicle.id,
            vehicle_label: vehicle.display_label(),
            services: services_for_vehicle(vehicle.id, services).count(),
        })
        .collect()
}

/// Counts services per exact description, in order of first appearance.
pub fn recurring_repairs(services: &[ServiceRecord]) -> Vec<RecurringRepairEntry> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<RecurringRepairEntry> = Vec::new();

    for description in services.iter().filter_map(ServiceRecord::repair_description) {
        match positions.get(description) {
            Some(&index) => entries[index].occurrences += 1,
            None => {
                positions.insert(description, entries.len());
                entries.push(RecurringRepairEntry {
                    description: description.to_string(),
                    occurrences: 1,
                });
            }
        }
    }

    entries
}

/// `100 * completed / total`, or `0.0` when there is nothing to complete.
pub fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

pub fn completion_progress_per_workshop(
    workshops: &[Workshop],
    services: &[ServiceRecord],
) -> Vec<WorkshopProgressEntry> {
    workshops
        .iter()
        .map(|workshop| {
            let (completed, total) = services_for_workshop(workshop.id, services).fold(
                (0usize, 0usize),
                |(completed, total), service| {
                    (completed + usize::from(service.is_completed()), total + 1)
                },
            );
            let percentage = completion_percentage(completed, total);

            WorkshopProgressEntry {
                workshop_id: workshop.id,
                workshop_name: workshop.name.clone(),
                completed,
                total,
                percentage,
                fully_completed: total > 0 && percentage >= 100.0,
            }
        })
        .collect()
}

/// Mean elapsed days between consecutive services. Fewer than two services
/// yield `0.0`; a pair with a missing date contributes a zero-day delta.
pub fn average_interval_days(services: &[&ServiceRecord], ordering: IntervalOrdering) -> f64 {
    if services.len() < 2 {
        return 0.0;
    }

    let mut ordered: Vec<&ServiceRecord> = services.to_vec();
    if ordering == IntervalOrdering::Chronological {
        // Stable sort; undated records sink to the end.
        ordered.sort_by_key(|service| (service.performed_at.is_none(), service.performed_at));
    }

    let total_days: f64 = ordered
        .windows(2)
        .map(|pair| match (pair[0].performed_at, pair[1].performed_at) {
            (Some(previous), Some(current)) => {
                (current - previous).num_milliseconds() as f64 / MILLIS_PER_DAY
            }
            _ => 0.0,
        })
        .sum();

    total_days / (ordered.len() - 1) as f64
}

pub fn average_days_between_services(
    vehicles: &[Vehicle],
    services: &[ServiceRecord],
    ordering: IntervalOrdering,
) -> Vec<ServiceIntervalEntry> {
    vehicles
        .iter()
        .map(|vehicle| {
            let history: Vec<&ServiceRecord> = services_for_vehicle(vehicle.id, services).collect();
            ServiceIntervalEntry {
                vehicle_id: vehicle.id,
                vehicle_label: vehicle.display_label(),
                services: history.len(),
                average_days: average_interval_days(&history, ordering),
            }
        })
        .collect()
}
