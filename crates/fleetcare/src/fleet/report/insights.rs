use super::summary::FleetReport;
use super::views::FleetHighlights;

pub(crate) fn generate_highlights(report: &FleetReport) -> FleetHighlights {
    let costliest_vehicle = report
        .vehicle_costs
        .iter()
        .filter(|entry| entry.total_cost > 0.0)
        // max_by keeps the last maximum; walk backwards so the first one wins.
        .rev()
        .max_by(|left, right| left.total_cost.total_cmp(&right.total_cost))
        .cloned();

    let busiest_workshop = report
        .workshop_frequency
        .iter()
        .filter(|entry| entry.services > 0)
        .rev()
        .max_by_key(|entry| entry.services)
        .cloned();

    let average_cost_per_service = if report.totals.services > 0 {
        report.totals.total_cost / report.totals.services as f64
    } else {
        0.0
    };

    let repeated_repairs: Vec<_> = report
        .recurring_repairs
        .iter()
        .filter(|entry| entry.is_recurring())
        .cloned()
        .collect();

    let workshops_with_open_work: Vec<String> = report
        .workshop_progress
        .iter()
        .filter(|entry| entry.total > 0 && !entry.fully_completed)
        .map(|entry| entry.workshop_name.clone())
        .collect();

    let mut observations = Vec::new();
    if report.totals.services > 0 {
        observations.push(format!(
            "{} service record(s) totalling {:.2} across {} vehicle(s)",
            report.totals.services, report.totals.total_cost, report.totals.vehicles
        ));
    }

    if report.totals.unattributed_services > 0 {
        observations.push(format!(
            "{} service record(s) lack a vehicle or workshop reference and are excluded from per-entity totals",
            report.totals.unattributed_services
        ));
    }

    if let Some(entry) = repeated_repairs.first() {
        observations.push(format!(
            "\"{}\" was performed {} times; review for a root cause",
            entry.description, entry.occurrences
        ));
    }

    let idle_workshops = report
        .workshop_progress
        .iter()
        .filter(|entry| entry.total == 0)
        .count();
    if idle_workshops > 0 {
        observations.push(format!(
            "{idle_workshops} workshop(s) have no service history yet"
        ));
    }

    if observations.is_empty() {
        observations.push("No service history loaded".to_string());
    }

    FleetHighlights {
        costliest_vehicle,
        busiest_workshop,
        average_cost_per_service,
        repeated_repairs,
        workshops_with_open_work,
        observations,
    }
}
