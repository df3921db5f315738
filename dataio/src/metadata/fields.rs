//! Blocks shared by case, ensemble and object metadata documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::enums::{Classification, FmuContext, SimulationMode, TracklogEventType};

/// The acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
}

impl User {
    /// Creates a user block.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// `fmu.case`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Case name.
    pub name: String,
    /// Case UUID.
    pub uuid: Uuid,
    /// Case owner.
    pub user: User,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

/// `fmu.model`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model name.
    pub name: String,
    /// Model revision.
    pub revision: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

/// `fmu.context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Stage the document was produced in.
    pub stage: FmuContext,
}

/// `fmu.workflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow reference.
    pub reference: String,
}

/// `fmu.ensemble`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ensemble {
    /// Ensemble number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Ensemble name, e.g. `iter-0` or `pred`.
    pub name: String,
    /// Derived ensemble UUID.
    pub uuid: Uuid,
    /// Ensemble this one restarted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_from: Option<Uuid>,
}

/// `fmu.realization`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realization {
    /// Realization number.
    pub id: i64,
    /// Realization folder name.
    pub name: String,
    /// Derived realization UUID.
    pub uuid: Uuid,
}

/// `fmu.ert.experiment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

/// `fmu.ert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ert {
    /// Experiment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment: Option<Experiment>,
    /// Simulation mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_mode: Option<SimulationMode>,
}

/// `fmu.entity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// UUID shared by the same logical object across realizations.
    pub uuid: Uuid,
}

/// The `fmu` block of an object document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fmu {
    /// Case.
    pub case: Case,
    /// Context.
    pub context: Context,
    /// Model.
    pub model: Model,
    /// Workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,
    /// Ensemble.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensemble: Option<Ensemble>,
    /// Realization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realization: Option<Realization>,
    /// Orchestrator information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ert: Option<Ert>,
    /// Entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

/// The `fmu` block of a case document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmuCase {
    /// Case.
    pub case: Case,
    /// Model.
    pub model: Model,
}

/// `access.asset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset name.
    pub name: String,
}

/// `access.ssdl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ssdl {
    /// Access level.
    pub access_level: Classification,
    /// Include in reporting.
    pub rep_include: bool,
}

/// `access`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    /// Asset.
    pub asset: Asset,
    /// Classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    /// Legacy access block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssdl: Option<Ssdl>,
}

/// An SMDA reference by identifier and UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmdaRef {
    /// Identifier.
    pub identifier: String,
    /// UUID.
    pub uuid: Uuid,
}

/// An SMDA discovery reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRef {
    /// Short identifier.
    pub short_identifier: String,
    /// UUID.
    pub uuid: Uuid,
}

/// `masterdata.smda`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smda {
    /// Coordinate system.
    pub coordinate_system: SmdaRef,
    /// Countries.
    pub country: Vec<SmdaRef>,
    /// Discoveries.
    pub discovery: Vec<DiscoveryRef>,
    /// Fields.
    pub field: Vec<SmdaRef>,
    /// Stratigraphic column.
    pub stratigraphic_column: SmdaRef,
}

/// `masterdata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Masterdata {
    /// SMDA references.
    pub smda: Smda,
}

/// A version marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Version string.
    pub version: String,
}

/// Operating system details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingSystem {
    /// Family, e.g. `unix`.
    pub system: String,
    /// Operating system, e.g. `linux-x86_64`.
    pub operating_system: String,
    /// Host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// `tracklog[].sysinfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInformation {
    /// Version of this library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmu_dataio: Option<Version>,
    /// Operating system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<OperatingSystem>,
}

impl SystemInformation {
    /// Information about the running process.
    #[must_use]
    pub fn current(hostname: Option<String>) -> Self {
        Self {
            fmu_dataio: Some(Version {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            operating_system: Some(OperatingSystem {
                system: std::env::consts::FAMILY.to_string(),
                operating_system: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
                hostname,
            }),
        }
    }
}

/// One lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracklogEvent {
    /// When.
    pub datetime: DateTime<Utc>,
    /// What.
    pub event: TracklogEventType,
    /// Who.
    pub user: User,
    /// Where.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysinfo: Option<SystemInformation>,
}

impl TracklogEvent {
    /// A new event stamped now.
    #[must_use]
    pub fn now(event: TracklogEventType, user: impl Into<String>, sysinfo: Option<SystemInformation>) -> Self {
        Self {
            datetime: Utc::now(),
            event,
            user: User::new(user),
            sysinfo,
        }
    }
}

/// `file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Absolute path of the data file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_path: Option<PathBuf>,
    /// Path relative to the export root.
    pub relative_path: PathBuf,
    /// MD5 checksum of the data file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_md5: Option<String>,
    /// Size of the data file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// `display`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
