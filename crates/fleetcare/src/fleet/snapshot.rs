use super::decode::null_as_default;
use super::domain::{ServiceRecord, Vehicle, Workshop};
use super::report::{FleetReport, IntervalOrdering};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json {
        collection: &'static str,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read fleet snapshot: {}", err),
            SnapshotError::Json { collection, source } => {
                write!(f, "invalid {} data: {}", collection, source)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Json { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// The three collections as fetched from the backend list endpoints.
/// Missing or `null` collections load as empty so a partial snapshot still
/// renders, just with empty groupings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(rename = "vehiculos", default, deserialize_with = "null_as_default")]
    pub vehicles: Vec<Vehicle>,
    #[serde(rename = "talleres", default, deserialize_with = "null_as_default")]
    pub workshops: Vec<Workshop>,
    #[serde(rename = "servicios", default, deserialize_with = "null_as_default")]
    pub services: Vec<ServiceRecord>,
}

impl FleetSnapshot {
    pub fn new(
        vehicles: Vec<Vehicle>,
        workshops: Vec<Workshop>,
        services: Vec<ServiceRecord>,
    ) -> Self {
        Self {
            vehicles,
            workshops,
            services,
        }
    }

    /// Reads a combined `{ "vehiculos": [...], "talleres": [...], "servicios": [...] }` document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        serde_json::from_reader(reader).map_err(|source| json_error("snapshot", source))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Reads one list-endpoint payload per collection.
    pub fn from_collection_readers<V: Read, W: Read, S: Read>(
        vehicles: V,
        workshops: W,
        services: S,
    ) -> Result<Self, SnapshotError> {
        Ok(Self {
            vehicles: read_collection(vehicles, "vehicle")?,
            workshops: read_collection(workshops, "workshop")?,
            services: read_collection(services, "service")?,
        })
    }

    pub fn from_collection_paths<V, W, S>(
        vehicles: V,
        workshops: W,
        services: S,
    ) -> Result<Self, SnapshotError>
    where
        V: AsRef<Path>,
        W: AsRef<Path>,
        S: AsRef<Path>,
    {
        Self::from_collection_readers(
            std::io::BufReader::new(std::fs::File::open(vehicles)?),
            std::io::BufReader::new(std::fs::File::open(workshops)?),
            std::io::BufReader::new(std::fs::File::open(services)?),
        )
    }

    pub fn unattributed_services(&self) -> usize {
        self.services
            .iter()
            .filter(|service| service.is_unattributed())
            .count()
    }

    pub fn report(&self, ordering: IntervalOrdering) -> FleetReport {
        FleetReport::build(&self.vehicles, &self.workshops, &self.services, ordering)
    }
}

fn json_error(collection: &'static str, source: serde_json::Error) -> SnapshotError {
    if source.is_io() {
        return SnapshotError::Io(source.into());
    }
    SnapshotError::Json { collection, source }
}

/// An empty body or a literal `null` is read as an empty list, matching how
/// the list endpoints answer when nothing is stored.
fn read_collection<T, R>(mut reader: R, collection: &'static str) -> Result<Vec<T>, SnapshotError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str::<Option<Vec<T>>>(&raw)
        .map(Option::unwrap_or_default)
        .map_err(|source| json_error(collection, source))
}
