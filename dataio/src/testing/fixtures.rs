//! Test fixtures.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

use crate::config::GlobalConfiguration;
use crate::definitions::{CASE_METADATA_FILE, SCHEMA, SOURCE, UNDEF, VERSION};
use crate::diagnostics::NoOpDiagnosticSink;
use crate::enums::{
    AxisOrientation, Classification, Content, DomainReference, FmuClass, Layout, TracklogEventType,
    VerticalDomain,
};
use crate::metadata::data::{BoundingBox, DataBlock, Specification, SurfaceSpecification};
use crate::metadata::fields::{
    Access, Asset, Case, Display, File, FmuCase, Masterdata, Model, Ssdl, TracklogEvent, User,
};
use crate::metadata::{CaseMetadata, ObjectMetadata};
use crate::objects::RegularSurface;

/// UUID of the fixture case.
pub const CASE_UUID: &str = "a40b05e8-e47f-47b1-8fee-f52a5116bd37";

const FIXTURE_USER: &str = "fixture_user";

/// Raw static configuration for the Drogon test model.
pub fn global_config_value() -> Value {
    json!({
        "access": {
            "asset": {"name": "Drogon"},
            "classification": "internal",
        },
        "masterdata": {
            "smda": {
                "coordinate_system": {
                    "identifier": "ST_WGS84_UTM37N_P32637",
                    "uuid": "ad214d85-dac7-19da-e053-c918a4889309",
                },
                "country": [{
                    "identifier": "Norway",
                    "uuid": "ad214d85-8a1d-19da-e053-c918a4889309",
                }],
                "discovery": [{
                    "short_identifier": "DROGON",
                    "uuid": "ad214d85-8a1d-19da-e053-c918a4889309",
                }],
                "field": [{
                    "identifier": "DROGON",
                    "uuid": "00000000-0000-0000-0000-000000000000",
                }],
                "stratigraphic_column": {
                    "identifier": "DROGON_HAS_NO_STRATCOLUMN",
                    "uuid": "00000000-0000-0000-0000-000000000000",
                },
            }
        },
        "model": {"name": "Drogon", "revision": "21.0.0"},
        "stratigraphy": {
            "TopVolantis": {
                "name": "VOLANTIS GP. Top",
                "stratigraphic": true,
                "alias": ["TopVOLANTIS", "TOP_VOLANTIS"],
            },
            "BaseVolantis": {
                "name": "VOLANTIS GP. Base",
                "stratigraphic": true,
            },
            "Valysar": {
                "name": "Valysar Fm.",
                "stratigraphic": true,
                "top": "TopVolantis",
                "base": "BaseVolantis",
            },
        },
    })
}

/// Validated form of [`global_config_value`].
pub fn global_config() -> GlobalConfiguration {
    GlobalConfiguration::from_value(&global_config_value(), &NoOpDiagnosticSink)
        .expect("fixture config is valid")
}

fn masterdata() -> Masterdata {
    serde_json::from_value(global_config_value()["masterdata"].clone())
        .expect("fixture masterdata is valid")
}

fn access() -> Access {
    Access {
        asset: Asset {
            name: "Drogon".into(),
        },
        classification: Some(Classification::Internal),
        ssdl: Some(Ssdl {
            access_level: Classification::Internal,
            rep_include: false,
        }),
    }
}

/// A case folder with case metadata, removed on drop.
pub struct CaseFixture {
    _tmp: TempDir,
    casepath: PathBuf,
}

impl CaseFixture {
    /// Creates `<tmp>/mycase/share/metadata/fmu_case.yml`.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("temp dir");
        let casepath = tmp
            .path()
            .canonicalize()
            .expect("canonical temp dir")
            .join("mycase");

        let meta = CaseMetadata {
            schema: SCHEMA.to_string(),
            version: VERSION.to_string(),
            source: SOURCE.to_string(),
            class: FmuClass::Case,
            fmu: FmuCase {
                case: Case {
                    name: "mycase".into(),
                    uuid: Uuid::parse_str(CASE_UUID).expect("valid uuid"),
                    user: User::new(FIXTURE_USER),
                    description: None,
                },
                model: Model {
                    name: "Drogon".into(),
                    revision: "21.0.0".into(),
                    description: None,
                },
            },
            access: access(),
            masterdata: masterdata(),
            tracklog: vec![TracklogEvent::now(TracklogEventType::Created, FIXTURE_USER, None)],
            description: None,
        };

        let file = casepath.join(CASE_METADATA_FILE);
        std::fs::create_dir_all(file.parent().expect("metadata folder")).expect("create case folders");
        std::fs::write(&file, serde_yaml::to_string(&meta).expect("serialize case")).expect("write case");
        Self { _tmp: tmp, casepath }
    }

    /// Case root.
    pub fn casepath(&self) -> &Path {
        &self.casepath
    }

    /// Creates and returns `<case>/realization-<real>/<ensemble>`.
    pub fn runpath(&self, real: i64, ensemble: &str) -> PathBuf {
        let runpath = self.casepath.join(format!("realization-{real}")).join(ensemble);
        std::fs::create_dir_all(&runpath).expect("create runpath");
        runpath
    }

    /// User recorded in the case metadata.
    pub fn user(&self) -> &'static str {
        FIXTURE_USER
    }
}

/// A small unrotated 3 x 2 surface with one undefined node.
pub fn surface(name: &str) -> RegularSurface {
    RegularSurface {
        name: name.to_string(),
        ncol: 3,
        nrow: 2,
        xori: 0.0,
        yori: 0.0,
        xinc: 25.0,
        yinc: 25.0,
        yflip: AxisOrientation::Normal,
        rotation: 0.0,
        values: vec![Some(1640.0), Some(1650.5), None, Some(1700.0), Some(1720.0), Some(1690.0)],
    }
}

/// A valid surface document outside any orchestrated run.
pub fn object_metadata() -> ObjectMetadata {
    ObjectMetadata {
        schema: SCHEMA.to_string(),
        version: VERSION.to_string(),
        source: SOURCE.to_string(),
        class: FmuClass::Surface,
        fmu: None,
        access: access(),
        masterdata: masterdata(),
        tracklog: vec![TracklogEvent::now(TracklogEventType::Created, FIXTURE_USER, None)],
        data: DataBlock {
            content: Content::Depth,
            payload: None,
            name: "VOLANTIS GP. Top".into(),
            stratigraphic: true,
            alias: Some(vec!["TopVolantis".into()]),
            tagname: None,
            offset: 0.0,
            top: None,
            base: None,
            description: None,
            geometry: None,
            bbox: Some(BoundingBox::new_3d(0.0, 50.0, 0.0, 25.0, 1640.0, 1720.0)),
            format: "irap_binary".into(),
            layout: Some(Layout::Regular),
            unit: "m".into(),
            vertical_domain: Some(VerticalDomain::Depth),
            domain_reference: Some(DomainReference::Msl),
            spec: Some(Specification::Surface(SurfaceSpecification {
                ncol: 3,
                nrow: 2,
                xori: 0.0,
                yori: 0.0,
                xinc: 25.0,
                yinc: 25.0,
                yflip: AxisOrientation::Normal,
                rotation: 0.0,
                undef: UNDEF,
            })),
            table_index: None,
            time: None,
            undef_is_zero: Some(false),
            is_prediction: true,
            is_observation: false,
        },
        file: File {
            absolute_path: Some(PathBuf::from("/work/project/share/results/maps/topvolantis.gri")),
            relative_path: PathBuf::from("share/results/maps/topvolantis.gri"),
            checksum_md5: None,
            size_bytes: None,
        },
        display: Display {
            name: Some("VOLANTIS GP. Top".into()),
        },
        preprocessed: None,
    }
}
