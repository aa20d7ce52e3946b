//! CSV export of the report tables.

use super::report::views::{
    RecurringRepairEntry, ServiceIntervalEntry, VehicleCostEntry, VehicleFrequencyEntry,
    WorkshopCostEntry, WorkshopFrequencyEntry, WorkshopProgressEntry,
};
use super::report::FleetReport;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to prepare {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One row of an exported table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn optional_id<T: Display>(id: Option<T>) -> String {
    id.map(|value| value.to_string()).unwrap_or_default()
}

impl TableRow for VehicleCostEntry {
    const HEADERS: &'static [&'static str] = &["vehicle_id", "vehicle", "total_cost"];

    fn cells(&self) -> Vec<String> {
        vec![
            optional_id(self.vehicle_id),
            self.vehicle_label.clone(),
            self.total_cost.to_string(),
        ]
    }
}

impl TableRow for WorkshopCostEntry {
    const HEADERS: &'static [&'static str] = &["workshop_id", "workshop", "total_cost"];

    fn cells(&self) -> Vec<String> {
        vec![
            optional_id(self.workshop_id),
            self.workshop_name.clone(),
            self.total_cost.to_string(),
        ]
    }
}

impl TableRow for VehicleFrequencyEntry {
    const HEADERS: &'static [&'static str] = &["vehicle_id", "vehicle", "services"];

    fn cells(&self) -> Vec<String> {
        vec![
            optional_id(self.vehicle_id),
            self.vehicle_label.clone(),
            self.services.to_string(),
        ]
    }
}

impl TableRow for WorkshopFrequencyEntry {
    const HEADERS: &'static [&'static str] = &["workshop_id", "workshop", "services"];

    fn cells(&self) -> Vec<String> {
        vec![
            optional_id(self.workshop_id),
            self.workshop_name.clone(),
            self.services.to_string(),
        ]
    }
}

impl TableRow for RecurringRepairEntry {
    const HEADERS: &'static [&'static str] = &["description", "occurrences"];

    fn cells(&self) -> Vec<String> {
        vec![self.description.clone(), self.occurrences.to_string()]
    }
}

impl TableRow for WorkshopProgressEntry {
    const HEADERS: &'static [&'static str] = &[
        "workshop_id",
        "workshop",
        "completed",
        "total",
        "percentage",
        "fully_completed",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            optional_id(self.workshop_id),
            self.workshop_name.clone(),
            self.completed.to_string(),
            self.total.to_string(),
            self.percentage.to_string(),
            self.fully_completed.to_string(),
        ]
    }
}

impl TableRow for ServiceIntervalEntry {
    const HEADERS: &'static [&'static str] =
        &["vehicle_id", "vehicle", "services", "average_days"];

    fn cells(&self) -> Vec<String> {
        vec![
            optional_id(self.vehicle_id),
            self.vehicle_label.clone(),
            self.services.to_string(),
            self.average_days.to_string(),
        ]
    }
}

/// Writes `rows` to `path` with a header row, even when `rows` is empty.
pub fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let csv_error = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(T::HEADERS).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row.cells()).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub const TABLE_FILES: [&str; 7] = [
    "vehicle_costs.csv",
    "workshop_costs.csv",
    "vehicle_frequency.csv",
    "workshop_frequency.csv",
    "recurring_repairs.csv",
    "workshop_progress.csv",
    "service_intervals.csv",
];

/// Writes every report table into `dir`, creating it when missing.
/// Returns the written paths in `TABLE_FILES` order.
pub fn export_report(report: &FleetReport, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths: Vec<PathBuf> = TABLE_FILES.iter().map(|file| dir.join(file)).collect();
    write_table(&paths[0], &report.vehicle_costs)?;
    write_table(&paths[1], &report.workshop_costs)?;
    write_table(&paths[2], &report.vehicle_frequency)?;
    write_table(&paths[3], &report.workshop_frequency)?;
    write_table(&paths[4], &report.recurring_repairs)?;
    write_table(&paths[5], &report.workshop_progress)?;
    write_table(&paths[6], &report.service_intervals)?;

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::super::domain::{ServiceRecord, Vehicle, Workshop};
    use super::super::report::IntervalOrdering;
    use super::*;

    #[test]
    fn exports_every_table_with_headers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let vehicles = vec![Vehicle::new(1, "Renault", "Duster")];
        let workshops = vec![Workshop::new(3, "Taller \"El Rayo\"")];
        let services = vec![ServiceRecord::new(1, None, 99.5)
            .for_vehicle(1)
            .at_workshop(3)
            .with_description("Cambio de llantas, delanteras")];
        let report = FleetReport::build(&vehicles, &workshops, &services, IntervalOrdering::Arrival);

        let written = export_report(&report, dir.path()).expect("export succeeds");
        assert_eq!(written.len(), 7);

        let costs = std::fs::read_to_string(dir.path().join("vehicle_costs.csv")).expect("costs");
        assert_eq!(costs, "vehicle_id,vehicle,total_cost\n1,Renault Duster,99.5\n");

        let mut reader = csv::Reader::from_path(dir.path().join("recurring_repairs.csv"))
            .expect("recurring repairs readable");
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("rows parse");
        assert_eq!(&rows[0][0], "Cambio de llantas, delanteras");
        assert_eq!(&rows[0][1], "1");
    }

    #[test]
    fn empty_tables_still_carry_headers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report = FleetReport::build(&[], &[], &[], IntervalOrdering::Arrival);

        export_report(&report, dir.path()).expect("export succeeds");
        let progress =
            std::fs::read_to_string(dir.path().join("workshop_progress.csv")).expect("progress");
        assert_eq!(
            progress,
            "workshop_id,workshop,completed,total,percentage,fully_completed\n"
        );
    }
}
