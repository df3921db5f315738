//! Assembles the metadata document of one exported object.

use tracing::{debug, info};

use super::data::{DataBlock, Time, TimestampEntry};
use super::document::{MetadataDocument, ObjectMetadata};
use super::fields::{Access, Display, Ssdl, SystemInformation, TracklogEvent};
use super::schema::validate_document;
use crate::config::{ExportConfig, GlobalConfiguration, TimedataEntry};
use crate::definitions::{SCHEMA, SOURCE, VERSION};
use crate::diagnostics::DiagnosticSink;
use crate::enums::{Content, FmuClass, TracklogEventType};
use crate::errors::{ConfigurationError, Result};
use crate::identity::FmuBlockBuilder;
use crate::objects::{DataObject, NamedStratigraphy, ObjectDescriptor};
use crate::share_path::{file_block, geometry_reference, get_share_path};
use crate::utils::convert_datestr_to_isoformat;

/// Merges identity, access, masterdata, file and data blocks.
pub struct MetadataAssembler<'a> {
    config: &'a ExportConfig,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> MetadataAssembler<'a> {
    /// Creates an assembler for `config`.
    #[must_use]
    pub const fn new(config: &'a ExportConfig, sink: &'a dyn DiagnosticSink) -> Self {
        Self { config, sink }
    }

    /// Builds and validates the document for `obj`.
    ///
    /// Requires a valid static configuration.
    pub fn assemble(&self, obj: &DataObject) -> Result<MetadataDocument> {
        let global = self.config.config().ok_or_else(|| {
            ConfigurationError::new(
                "Metadata can not be produced without a valid global configuration",
            )
        })?;

        let descriptor = ObjectDescriptor::describe(obj, self.config, self.sink)?;
        let share_path = get_share_path(self.config, &descriptor, self.sink)?;
        let fmu = FmuBlockBuilder::new(self.config.runcontext(), self.sink)
            .with_model(Some(&global.model))
            .with_workflow(self.config.workflow())
            .with_share_path(&share_path)
            .build()?;

        let data = self.data_block(&descriptor, global)?;
        let display = Display {
            name: self
                .config
                .display()
                .name
                .clone()
                .or_else(|| Some(data.name.clone())),
        };

        let doc = MetadataDocument::Object(Box::new(ObjectMetadata {
            schema: SCHEMA.to_string(),
            version: VERSION.to_string(),
            source: SOURCE.to_string(),
            class: descriptor.classname,
            fmu,
            access: self.access(global),
            masterdata: global.masterdata.clone(),
            tracklog: vec![TracklogEvent::now(
                TracklogEventType::Created,
                self.config.runcontext().user(),
                Some(SystemInformation::current(None)),
            )],
            data,
            file: file_block(self.config, &share_path),
            display,
            preprocessed: self.config.flags().preprocessed.then_some(true),
        }));

        validate_document(&doc)?;
        info!(class = %descriptor.classname, path = %share_path.display(), "Metadata assembled");
        Ok(doc)
    }

    fn access(&self, global: &GlobalConfiguration) -> Access {
        let classification = self.config.classification();
        Access {
            asset: global.access.asset.clone(),
            classification: Some(classification),
            ssdl: Some(Ssdl {
                access_level: classification,
                rep_include: self.config.rep_include(),
            }),
        }
    }

    fn data_block(&self, descriptor: &ObjectDescriptor, global: &GlobalConfiguration) -> Result<DataBlock> {
        let cfg = self.config;
        let named = NamedStratigraphy::resolve(&descriptor.name, global.stratigraphy.as_ref());
        let naming = cfg.naming();

        let geometry = match &naming.geometry {
            Some(path) if matches!(descriptor.classname, FmuClass::Surface | FmuClass::CpgridProperty) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    cfg.runcontext().exportroot().join(path)
                };
                Some(geometry_reference(&path, descriptor.classname)?)
            }
            Some(path) => {
                debug!(path = %path.display(), class = %descriptor.classname, "Geometry ignored for class");
                None
            }
            None => None,
        };

        let flags = cfg.flags();
        Ok(DataBlock {
            content: cfg.content().unwrap_or(Content::Unset),
            payload: cfg.content_metadata().cloned(),
            name: named.name,
            stratigraphic: named.stratigraphic,
            alias: (!named.alias.is_empty()).then_some(named.alias),
            tagname: (!naming.tagname.is_empty()).then(|| naming.tagname.clone()),
            offset: named.offset,
            top: named.top,
            base: named.base,
            description: cfg.description().map(<[String]>::to_vec),
            geometry,
            bbox: descriptor.bbox,
            format: descriptor.fmt.clone(),
            layout: Some(descriptor.layout),
            unit: cfg.unit().to_string(),
            vertical_domain: Some(cfg.vertical_domain()),
            domain_reference: Some(cfg.domain_reference()),
            spec: descriptor.spec.clone(),
            table_index: descriptor.table_index.clone(),
            time: time_block(cfg)?,
            undef_is_zero: Some(flags.undef_is_zero),
            is_prediction: flags.is_prediction,
            is_observation: flags.is_observation,
        })
    }
}

fn timestamp(entry: &TimedataEntry) -> Result<TimestampEntry> {
    Ok(TimestampEntry {
        value: convert_datestr_to_isoformat(&entry.date)?,
        label: entry.label.clone(),
    })
}

fn time_block(config: &ExportConfig) -> Result<Option<Time>> {
    match config.time_markers() {
        (Some(t0), t1) => Ok(Some(Time {
            t0: timestamp(t0)?,
            t1: t1.map(timestamp).transpose()?,
        })),
        (None, _) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::config::{ExportInput, NamingConfig};
    use crate::diagnostics::CollectingDiagnosticSink;
    use crate::enums::{Classification, FmuContext};
    use crate::runcontext::{Environment, FmuEnv, RunContextResolver};
    use crate::testing::{global_config, global_config_value, surface, CaseFixture};

    fn outside_config(naming: NamingConfig) -> ExportConfig {
        let env = Environment::new("/work/project");
        let sink = CollectingDiagnosticSink::new();
        let rc = RunContextResolver::new(&env, &sink).resolve().unwrap();
        ExportConfig::builder()
            .content(Content::Depth, None)
            .naming(naming)
            .timedata(Some(vec![
                TimedataEntry {
                    date: "20200101".into(),
                    label: Some("monitor".into()),
                },
                TimedataEntry {
                    date: "20180101".into(),
                    label: Some("base".into()),
                },
            ]))
            .global_config(Some(global_config()))
            .run_context(rc)
            .build()
            .unwrap()
    }

    #[test]
    fn test_outside_context_document() {
        let cfg = outside_config(NamingConfig::default());
        let sink = CollectingDiagnosticSink::new();
        let doc = MetadataAssembler::new(&cfg, &sink)
            .assemble(&DataObject::RegularSurface(surface("TopVolantis")))
            .unwrap();
        let meta = doc.as_object().unwrap();

        assert_eq!(meta.class, FmuClass::Surface);
        assert!(meta.fmu.is_none());
        assert_eq!(meta.data.name, "VOLANTIS GP. Top");
        assert!(meta.data.stratigraphic);
        assert_eq!(meta.display.name.as_deref(), Some("VOLANTIS GP. Top"));
        assert_eq!(meta.access.classification, Some(Classification::Internal));
        assert_eq!(meta.access.ssdl.as_ref().unwrap().access_level, Classification::Internal);
        assert_eq!(meta.tracklog.len(), 1);
        assert_eq!(
            meta.file.relative_path,
            PathBuf::from("share/results/maps/topvolantis--20200101_20180101.gri")
        );

        let time = meta.data.time.as_ref().unwrap();
        assert_eq!(time.t0.value, "2018-01-01T00:00:00");
        assert_eq!(time.t0.label.as_deref(), Some("base"));
        assert_eq!(time.t1.as_ref().unwrap().value, "2020-01-01T00:00:00");
        assert!(meta.preprocessed.is_none());
    }

    #[test]
    fn test_realization_document_has_identity() {
        let fixture = CaseFixture::new();
        let runpath = fixture.runpath(0, "iter-0");
        let env = Environment::new(&runpath)
            .with_fmu(FmuEnv::RealizationNumber, "0")
            .with_fmu(FmuEnv::Runpath, runpath.to_string_lossy());
        let sink = CollectingDiagnosticSink::new();
        let input = ExportInput::new()
            .with_config(global_config_value())
            .with_content("depth")
            .with_name("TopVolantis");
        let cfg = ExportConfig::resolve(&input, &env, &sink).unwrap();

        let doc = MetadataAssembler::new(&cfg, &sink)
            .assemble(&DataObject::RegularSurface(surface("ignored")))
            .unwrap();
        let meta = doc.as_object().unwrap();
        let fmu = meta.fmu.as_ref().unwrap();
        assert_eq!(fmu.context.stage, FmuContext::Realization);
        assert_eq!(fmu.realization.as_ref().unwrap().id, 0);
        assert!(fmu.entity.is_some());
        assert_eq!(
            meta.file.absolute_path.as_ref().unwrap(),
            &runpath.join("share/results/maps/topvolantis.gri")
        );
    }

    #[test]
    fn test_missing_global_config() {
        let env = Environment::new("/work/project");
        let sink = CollectingDiagnosticSink::new();
        let rc = RunContextResolver::new(&env, &sink).resolve().unwrap();
        let cfg = ExportConfig::builder()
            .content(Content::Depth, None)
            .run_context(rc)
            .build()
            .unwrap();
        let err = MetadataAssembler::new(&cfg, &sink)
            .assemble(&DataObject::RegularSurface(surface("x")))
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
