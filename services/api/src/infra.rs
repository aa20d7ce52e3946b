use chrono::{DateTime, TimeZone, Utc};
use fleetcare::fleet::domain::{
    ServiceRecord, ServiceStatus, ServiceType, Vehicle, VehicleCategory, Workshop,
};
use fleetcare::fleet::{FleetSnapshot, IntervalOrdering};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) interval_ordering: IntervalOrdering,
}

pub(crate) fn log_snapshot(snapshot: &FleetSnapshot, ordering: IntervalOrdering) {
    debug!(
        vehicles = snapshot.vehicles.len(),
        workshops = snapshot.workshops.len(),
        services = snapshot.services.len(),
        ordering = ordering.label(),
        "computing fleet report"
    );

    let unattributed = snapshot.unattributed_services();
    if unattributed > 0 {
        warn!(
            unattributed,
            "service records without a vehicle or workshop reference are excluded from per-entity totals"
        );
    }
}

fn on(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single()
}

fn sample_vehicle(
    id: i64,
    make: &str,
    model: &str,
    plate: &str,
    category: VehicleCategory,
) -> Vehicle {
    Vehicle {
        plate: plate.to_string(),
        category,
        ..Vehicle::new(id, make, model)
    }
}

fn sample_workshop(id: i64, name: &str, address: &str, specialties: &[&str]) -> Workshop {
    Workshop {
        address: address.to_string(),
        specialties: specialties.iter().map(|item| item.to_string()).collect(),
        ..Workshop::new(id, name)
    }
}

/// Small fleet used by the `demo` command. Service 6 arrives out of date
/// order on purpose so the two interval orderings disagree.
pub(crate) fn sample_snapshot() -> FleetSnapshot {
    let vehicles = vec![
        sample_vehicle(1, "Toyota", "Hilux", "HLX-204", VehicleCategory::Truck),
        sample_vehicle(2, "Chevrolet", "Aveo", "AVE-881", VehicleCategory::Automobile),
        sample_vehicle(3, "Yamaha", "FZ25", "MTO-019", VehicleCategory::Motorcycle),
    ];

    let workshops = vec![
        sample_workshop(10, "Taller Central", "Av. Principal 120", &["motor", "frenos"]),
        sample_workshop(11, "Motos Express", "Calle 8 #45", &["motocicletas"]),
        sample_workshop(12, "Diagnóstico Norte", "Km 4 vía norte", &["electricidad"]),
    ];

    let services = vec![
        ServiceRecord::new(1, on(2024, 1, 15), 180.0)
            .for_vehicle(1)
            .at_workshop(10)
            .with_type(ServiceType::PreventiveMaintenance)
            .with_description("Cambio de aceite y filtros")
            .with_status(ServiceStatus::Completed),
        ServiceRecord::new(2, on(2024, 2, 2), 95.5)
            .for_vehicle(2)
            .at_workshop(10)
            .with_type(ServiceType::TechnicalInspection)
            .with_description("Revisión técnica anual")
            .with_status(ServiceStatus::Completed),
        ServiceRecord::new(3, on(2024, 4, 14), 640.0)
            .for_vehicle(1)
            .at_workshop(10)
            .with_type(ServiceType::CorrectiveRepair)
            .with_description("Reemplazo de pastillas de freno")
            .with_status(ServiceStatus::InProgress),
        ServiceRecord::new(4, on(2024, 3, 1), 60.0)
            .for_vehicle(3)
            .at_workshop(11)
            .with_type(ServiceType::PreventiveMaintenance)
            .with_description("Cambio de aceite y filtros")
            .with_status(ServiceStatus::Completed),
        ServiceRecord::new(5, on(2024, 5, 20), 75.0)
            .for_vehicle(3)
            .at_workshop(11)
            .with_type(ServiceType::PreventiveMaintenance)
            .with_description("Ajuste de cadena")
            .with_status(ServiceStatus::Completed),
        ServiceRecord::new(6, on(2024, 3, 15), 210.0)
            .for_vehicle(1)
            .at_workshop(10)
            .with_type(ServiceType::PreventiveMaintenance)
            .with_description("Cambio de aceite y filtros")
            .with_status(ServiceStatus::Pending),
        ServiceRecord::new(7, on(2024, 6, 3), 120.0)
            .at_workshop(10)
            .with_type(ServiceType::CorrectiveRepair)
            .with_description("Diagnóstico eléctrico"),
    ];

    FleetSnapshot::new(vehicles, workshops, services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_snapshot_exercises_every_metric() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.unattributed_services(), 1);

        let report = snapshot.report(IntervalOrdering::Arrival);
        assert!(report.recurring_repairs.iter().any(|entry| entry.is_recurring()));
        assert!(report
            .workshop_progress
            .iter()
            .any(|entry| entry.total == 0));
        assert!(report
            .workshop_progress
            .iter()
            .any(|entry| entry.fully_completed));

        let sorted = snapshot.report(IntervalOrdering::Chronological);
        assert_ne!(
            report.service_intervals[0].average_days,
            sorted.service_intervals[0].average_days
        );
    }
}
