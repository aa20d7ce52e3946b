use crate::infra::{log_snapshot, sample_snapshot};
use clap::Args;
use fleetcare::config::ReportConfig;
use fleetcare::error::AppError;
use fleetcare::fleet::export::export_report;
use fleetcare::fleet::{FleetReport, FleetSnapshot, IntervalOrdering};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Average service intervals in date order instead of arrival order.
    #[arg(long)]
    pub(crate) sort_by_date: bool,
    /// Write every report table as CSV into this directory.
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Combined snapshot holding `vehiculos`, `talleres` and `servicios`
    #[arg(
        long,
        conflicts_with_all = ["vehicles", "workshops", "services"],
        required_unless_present_all = ["vehicles", "workshops", "services"]
    )]
    pub(crate) snapshot: Option<PathBuf>,
    /// Vehicle list as returned by the vehicles endpoint
    #[arg(long)]
    pub(crate) vehicles: Option<PathBuf>,
    /// Workshop list as returned by the workshops endpoint
    #[arg(long)]
    pub(crate) workshops: Option<PathBuf>,
    /// Service list as returned by the services endpoint
    #[arg(long)]
    pub(crate) services: Option<PathBuf>,
    /// Average service intervals in date order instead of arrival order
    #[arg(long)]
    pub(crate) sort_by_date: bool,
    /// Write every report table as CSV into this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        vehicles,
        workshops,
        services,
        sort_by_date,
        export_dir,
    } = args;

    let (snapshot, source) = match (snapshot, vehicles, workshops, services) {
        (Some(path), _, _, _) => {
            let source = format!("snapshot {}", path.display());
            (FleetSnapshot::from_path(&path)?, source)
        }
        (None, Some(vehicles), Some(workshops), Some(services)) => {
            let source = format!(
                "collections {}, {}, {}",
                vehicles.display(),
                workshops.display(),
                services.display()
            );
            (
                FleetSnapshot::from_collection_paths(&vehicles, &workshops, &services)?,
                source,
            )
        }
        _ => {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "either --snapshot or all of --vehicles, --workshops and --services is required",
            )))
        }
    };

    let ordering = resolve_ordering(sort_by_date)?;
    log_snapshot(&snapshot, ordering);
    let report = snapshot.report(ordering);
    render_fleet_report(&report, &source);

    if let Some(dir) = export_dir {
        export_tables(&report, &dir)?;
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        sort_by_date,
        export_dir,
    } = args;

    println!("Fleet maintenance demo");
    let snapshot = sample_snapshot();
    let ordering = IntervalOrdering::from_sort_flag(sort_by_date);
    let report = snapshot.report(ordering);
    render_fleet_report(&report, "built-in sample fleet");

    let alternate = match ordering {
        IntervalOrdering::Arrival => IntervalOrdering::Chronological,
        IntervalOrdering::Chronological => IntervalOrdering::Arrival,
    };
    let comparison = snapshot.report(alternate);
    println!("\nInterval ordering comparison");
    for (current, other) in report
        .service_intervals
        .iter()
        .zip(&comparison.service_intervals)
    {
        println!(
            "- {}: {:.1} days ({}) vs {:.1} days ({})",
            current.vehicle_label,
            current.average_days,
            ordering.label(),
            other.average_days,
            alternate.label()
        );
    }

    if let Some(dir) = export_dir {
        export_tables(&report, &dir)?;
    }

    Ok(())
}

/// An explicit `--sort-by-date` wins; otherwise `APP_SORT_INTERVALS_BY_DATE`
/// decides. Server settings are not consulted.
fn resolve_ordering(sort_by_date: bool) -> Result<IntervalOrdering, AppError> {
    if sort_by_date {
        return Ok(IntervalOrdering::Chronological);
    }
    Ok(ReportConfig::load()?.interval_ordering)
}

fn export_tables(report: &FleetReport, dir: &Path) -> Result<(), AppError> {
    let written = export_report(report, dir)?;
    println!("\nExported {} tables to {}", written.len(), dir.display());
    for path in written {
        println!("- {}", path.display());
    }
    Ok(())
}

fn interval_heading(ordering: IntervalOrdering) -> String {
    format!("Average days between services ({})", ordering.label())
}

pub(crate) fn render_fleet_report(report: &FleetReport, source: &str) {
    let totals = &report.totals;
    println!("Data source: {}", source);
    println!(
        "{} vehicles | {} workshops | {} services | total cost {:.2}",
        totals.vehicles, totals.workshops, totals.services, totals.total_cost
    );
    if totals.unattributed_services > 0 {
        println!(
            "{} services lack a vehicle or workshop reference",
            totals.unattributed_services
        );
    }

    println!("\nAccumulated cost per vehicle");
    for entry in &report.vehicle_costs {
        println!("- {}: {:.2}", entry.vehicle_label, entry.total_cost);
    }

    println!("\nAccumulated cost per workshop");
    for entry in &report.workshop_costs {
        println!("- {}: {:.2}", entry.workshop_name, entry.total_cost);
    }

    println!("\nServices per workshop");
    for entry in &report.workshop_frequency {
        println!("- {}: {}", entry.workshop_name, entry.services);
    }

    println!("\nServices per vehicle");
    for entry in &report.vehicle_frequency {
        println!("- {}: {}", entry.vehicle_label, entry.services);
    }

    if report.recurring_repairs.is_empty() {
        println!("\nRepairs: none described");
    } else {
        println!("\nRepairs by description");
        for entry in &report.recurring_repairs {
            let marker = if entry.is_recurring() { " (recurring)" } else { "" };
            println!("- {}: {}{}", entry.description, entry.occurrences, marker);
        }
    }

    println!("\nCompletion progress per workshop");
    for entry in &report.workshop_progress {
        println!(
            "- {}: {}/{} completed ({:.0}%)",
            entry.workshop_name, entry.completed, entry.total, entry.percentage
        );
    }

    println!("\n{}", interval_heading(report.interval_ordering));
    for entry in &report.service_intervals {
        println!(
            "- {}: {:.1} days over {} services",
            entry.vehicle_label, entry.average_days, entry.services
        );
    }

    let highlights = report.highlights();
    if let Some(vehicle) = &highlights.costliest_vehicle {
        println!(
            "\nCostliest vehicle: {} ({:.2})",
            vehicle.vehicle_label, vehicle.total_cost
        );
    }
    if let Some(workshop) = &highlights.busiest_workshop {
        println!(
            "Busiest workshop: {} ({} services)",
            workshop.workshop_name, workshop.services
        );
    }
    println!(
        "Average cost per service: {:.2}",
        highlights.average_cost_per_service
    );

    if !highlights.observations.is_empty() {
        println!("\nObservations");
        for note in &highlights.observations {
            println!("- {}", note);
        }
    }
}
