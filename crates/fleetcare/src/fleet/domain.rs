use super::decode::{
    lenient_label, lenient_number, lenient_optional_integer, lenient_optional_number,
    lenient_optional_text, lenient_text, lenient_text_set, lenient_timestamp,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkshopId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub i64);

impl From<i64> for VehicleId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<i64> for WorkshopId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<i64> for ServiceId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WorkshopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle category as labelled by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleCategory {
    Automobile,
    Truck,
    Motorcycle,
    Other(String),
}

impl VehicleCategory {
    pub fn label(&self) -> &str {
        match self {
            Self::Automobile => "automóvil",
            Self::Truck => "camión",
            Self::Motorcycle => "motocicleta",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for VehicleCategory {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for VehicleCategory {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "automóvil" => Self::Automobile,
            "camión" => Self::Truck,
            "motocicleta" => Self::Motorcycle,
            _ => Self::Other(raw),
        }
    }
}

impl From<VehicleCategory> for String {
    fn from(category: VehicleCategory) -> Self {
        category.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    PreventiveMaintenance,
    CorrectiveRepair,
    TechnicalInspection,
    Other(String),
}

impl ServiceType {
    pub fn label(&self) -> &str {
        match self {
            Self::PreventiveMaintenance => "mantenimiento preventivo",
            Self::CorrectiveRepair => "reparación correctiva",
            Self::TechnicalInspection => "revisión técnica",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ServiceType {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "mantenimiento preventivo" => Self::PreventiveMaintenance,
            "reparación correctiva" => Self::CorrectiveRepair,
            "revisión técnica" => Self::TechnicalInspection,
            _ => Self::Other(raw),
        }
    }
}

impl From<ServiceType> for String {
    fn from(kind: ServiceType) -> Self {
        kind.label().to_string()
    }
}

/// Lifecycle state of a service record. A record without a status is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceStatus {
    #[default]
    Pending,
    Completed,
    InProgress,
    Other(String),
}

impl ServiceStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pendiente",
            Self::Completed => "Completado",
            Self::InProgress => "En Proceso",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ServiceStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Pendiente" => Self::Pending,
            "Completado" => Self::Completed,
            "En Proceso" => Self::InProgress,
            _ => Self::Other(raw),
        }
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        status.label().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "idVehiculo", default, deserialize_with = "lenient_optional_integer")]
    pub id: Option<VehicleId>,
    #[serde(rename = "marca", default, deserialize_with = "lenient_text")]
    pub make: String,
    #[serde(rename = "modelo", default, deserialize_with = "lenient_text")]
    pub model: String,
    #[serde(rename = "anio", default, deserialize_with = "lenient_optional_integer")]
    pub year: Option<i32>,
    #[serde(rename = "numeroPlaca", default, deserialize_with = "lenient_text")]
    pub plate: String,
    #[serde(
        rename = "color",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    #[serde(
        rename = "tipoCombustible",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_type: Option<String>,
    #[serde(
        rename = "odometro",
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub odometer: Option<f64>,
    #[serde(rename = "tipoVehiculo", default, deserialize_with = "lenient_label")]
    pub category: VehicleCategory,
    #[serde(
        rename = "fechaCreacion",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "ultimaActualizacion",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    pub fn new(id: i64, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: Some(VehicleId(id)),
            make: make.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Label used by every per-vehicle chart and table.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    #[serde(rename = "idTaller", default, deserialize_with = "lenient_optional_integer")]
    pub id: Option<WorkshopId>,
    #[serde(rename = "nombre", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "direccion", default, deserialize_with = "lenient_text")]
    pub address: String,
    #[serde(rename = "telefono", default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(
        rename = "correoContacto",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_email: Option<String>,
    #[serde(
        rename = "horariosAtencion",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub opening_hours: Option<String>,
    #[serde(rename = "especialidades", default, deserialize_with = "lenient_text_set")]
    pub specialties: BTreeSet<String>,
    #[serde(
        rename = "fechaCreacion",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "ultimaActualizacion",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workshop {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(WorkshopId(id)),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Back-reference embedded in a service record. The backend nests the whole
/// vehicle object; only its identity matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRef {
    #[serde(rename = "idVehiculo", default, deserialize_with = "lenient_optional_integer")]
    pub id: Option<VehicleId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkshopRef {
    #[serde(rename = "idTaller", default, deserialize_with = "lenient_optional_integer")]
    pub id: Option<WorkshopId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "idServicio", default, deserialize_with = "lenient_optional_integer")]
    pub id: Option<ServiceId>,
    #[serde(rename = "fechaServicio", default, deserialize_with = "lenient_timestamp")]
    pub performed_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "descripcion",
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "costo", default, deserialize_with = "lenient_number")]
    pub cost: f64,
    #[serde(rename = "tipoServicio", default, deserialize_with = "lenient_label")]
    pub service_type: ServiceType,
    #[serde(rename = "kilometraje", default, deserialize_with = "lenient_number")]
    pub mileage: f64,
    #[serde(rename = "estado", default, deserialize_with = "lenient_label")]
    pub status: ServiceStatus,
    #[serde(rename = "vehiculos", default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleRef>,
    #[serde(rename = "talleres", default, skip_serializing_if = "Option::is_none")]
    pub workshop: Option<WorkshopRef>,
    #[serde(
        rename = "fechaCreacion",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "ultimaActualizacion",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServiceRecord {
    pub fn new(id: i64, performed_at: Option<DateTime<Utc>>, cost: f64) -> Self {
        Self {
            id: Some(ServiceId(id)),
            performed_at,
            cost,
            ..Self::default()
        }
    }

    pub fn for_vehicle(mut self, id: i64) -> Self {
        self.vehicle = Some(VehicleRef {
            id: Some(VehicleId(id)),
        });
        self
    }

    pub fn at_workshop(mut self, id: i64) -> Self {
        self.workshop = Some(WorkshopRef {
            id: Some(WorkshopId(id)),
        });
        self
    }

    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = service_type;
        self
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        self.vehicle.as_ref().and_then(|reference| reference.id)
    }

    pub fn workshop_id(&self) -> Option<WorkshopId> {
        self.workshop.as_ref().and_then(|reference| reference.id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == ServiceStatus::Completed
    }

    /// Description text, ignoring absent or empty values.
    pub fn repair_description(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }

    /// Cost clamped to a finite contribution.
    pub fn billable_cost(&self) -> f64 {
        if self.cost.is_finite() {
            self.cost
        } else {
            0.0
        }
    }

    pub fn is_unattributed(&self) -> bool {
        self.vehicle_id().is_none() || self.workshop_id().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_service_shape() {
        let record: ServiceRecord = serde_json::from_value(json!({
            "idServicio": 7,
            "fechaServicio": "2024-05-02T10:30:00.000Z",
            "descripcion": "Cambio de aceite",
            "costo": "120.50",
            "tipoServicio": "mantenimiento preventivo",
            "kilometraje": 45000,
            "estado": "Completado",
            "vehiculos": { "idVehiculo": 3, "marca": "Toyota", "modelo": "Hilux" },
            "talleres": { "idTaller": 9, "nombre": "Taller Central" }
        }))
        .expect("service decodes");

        assert_eq!(record.id, Some(ServiceId(7)));
        assert_eq!(record.cost, 120.5);
        assert_eq!(record.service_type, ServiceType::PreventiveMaintenance);
        assert_eq!(record.mileage, 45000.0);
        assert!(record.is_completed());
        assert_eq!(record.vehicle_id(), Some(VehicleId(3)));
        assert_eq!(record.workshop_id(), Some(WorkshopId(9)));
        assert_eq!(record.repair_description(), Some("Cambio de aceite"));
        assert!(!record.is_unattributed());
    }

    #[test]
    fn sparse_service_decodes_with_defaults() {
        let record: ServiceRecord = serde_json::from_value(json!({
            "costo": null,
            "estado": "Cancelado",
            "descripcion": "",
            "vehiculos": null
        }))
        .expect("sparse service decodes");

        assert_eq!(record.cost, 0.0);
        assert_eq!(record.status, ServiceStatus::Other("Cancelado".to_string()));
        assert!(!record.is_completed());
        assert_eq!(record.repair_description(), None);
        assert_eq!(record.vehicle_id(), None);
        assert!(record.is_unattributed());
        assert_eq!(record.performed_at, None);
    }

    #[test]
    fn status_labels_round_trip_through_wire_strings() {
        for status in [
            ServiceStatus::Pending,
            ServiceStatus::Completed,
            ServiceStatus::InProgress,
        ] {
            let wire = serde_json::to_value(&status).expect("status serializes");
            let decoded: ServiceStatus = serde_json::from_value(wire).expect("status decodes");
            assert_eq!(decoded, status);
        }
    }

    #[test]
    fn workshop_specialties_are_deduplicated() {
        let workshop: Workshop = serde_json::from_value(json!({
            "idTaller": 2,
            "nombre": "Frenos del Norte",
            "direccion": "Av. Siempre Viva 742",
            "telefono": "555-0101",
            "especialidades": ["frenos", "suspensión", "frenos"]
        }))
        .expect("workshop decodes");

        assert_eq!(workshop.specialties.len(), 2);
        assert!(workshop.specialties.contains("suspensión"));
    }

    #[test]
    fn vehicle_label_joins_make_and_model() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "idVehiculo": 1,
            "marca": "Ford",
            "modelo": "Ranger",
            "anio": 2021,
            "numeroPlaca": "ABC-123",
            "odometro": "15200",
            "tipoVehiculo": "camión"
        }))
        .expect("vehicle decodes");

        assert_eq!(vehicle.display_label(), "Ford Ranger");
        assert_eq!(vehicle.category, VehicleCategory::Truck);
        assert_eq!(vehicle.odometer, Some(15200.0));
    }

    #[test]
    fn stringly_typed_ids_and_years_still_decode() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "idVehiculo": "4",
            "marca": "Nissan",
            "modelo": "Frontier",
            "anio": "2021",
            "color": 7
        }))
        .expect("vehicle decodes");

        assert_eq!(vehicle.id, Some(VehicleId(4)));
        assert_eq!(vehicle.year, Some(2021));
        assert_eq!(vehicle.color.as_deref(), Some("7"));

        let record: ServiceRecord = serde_json::from_value(json!({
            "idServicio": "11",
            "descripcion": 3,
            "vehiculos": { "idVehiculo": "4" },
            "talleres": { "idTaller": 2.0 }
        }))
        .expect("service decodes");

        assert_eq!(record.id, Some(ServiceId(11)));
        assert_eq!(record.vehicle_id(), Some(VehicleId(4)));
        assert_eq!(record.workshop_id(), Some(WorkshopId(2)));
        assert_eq!(record.repair_description(), Some("3"));
    }

    #[test]
    fn unreadable_fields_degrade_to_absent() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "idVehiculo": "uno",
            "marca": null,
            "anio": "dos mil",
            "tipoVehiculo": 3
        }))
        .expect("vehicle decodes");

        assert_eq!(vehicle.id, None);
        assert_eq!(vehicle.make, "");
        assert_eq!(vehicle.year, None);
        assert_eq!(vehicle.category, VehicleCategory::Other("3".to_string()));

        let workshop: Workshop = serde_json::from_value(json!({
            "idTaller": 2,
            "nombre": "Frenos del Norte",
            "especialidades": ["frenos", null]
        }))
        .expect("workshop decodes");

        assert_eq!(workshop.specialties.len(), 1);
        assert!(workshop.specialties.contains("frenos"));
    }
}
