//! End to end export tests against a case laid out on disk.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::config::{ExportInput, LegacyAccess};
    use crate::diagnostics::{CollectingDiagnosticSink, DiagnosticKind};
    use crate::enums::{Classification, FmuContext};
    use crate::errors::Result;
    use crate::export::{ExportData, MockObjectEncoder, ObjectEncoder};
    use crate::identity::derive_entity_uuid;
    use crate::manifest::load_export_manifest;
    use crate::objects::{CellValue, Column, DataObject, Table, TableLayout};
    use crate::runcontext::{Environment, FmuEnv};
    use crate::share_path::read_metadata;
    use crate::testing::{global_config_value, surface, CaseFixture, CASE_UUID};
    use crate::utils::md5sum_bytes;

    const PAYLOAD: &[u8] = b"IRAP surface bytes";

    struct BytesEncoder;

    impl ObjectEncoder for BytesEncoder {
        fn encode(&self, _obj: &DataObject, _format: &str, out: &Path) -> Result<()> {
            std::fs::write(out, PAYLOAD)?;
            Ok(())
        }
    }

    fn realization_env(fixture: &CaseFixture, real: i64) -> Environment {
        let runpath = fixture.runpath(real, "iter-0");
        Environment::new(&runpath)
            .with_var("USER", "tester")
            .with_fmu(FmuEnv::RealizationNumber, real.to_string())
            .with_fmu(FmuEnv::IterationNumber, "0")
            .with_fmu(FmuEnv::Runpath, runpath.to_string_lossy())
    }

    fn exporter(input: &ExportInput, env: &Environment) -> (ExportData, Arc<CollectingDiagnosticSink>) {
        let sink = Arc::new(CollectingDiagnosticSink::new());
        let exporter = ExportData::from_input(input, env, sink.clone()).unwrap();
        (exporter, sink)
    }

    fn depth_input(name: &str) -> ExportInput {
        ExportInput::new()
            .with_config(global_config_value())
            .with_content("depth")
            .with_name(name)
    }

    #[test]
    fn test_realization_export_writes_data_sidecar_and_manifest() {
        let fixture = CaseFixture::new();
        let env = realization_env(&fixture, 1);
        let (exporter, _) = exporter(&depth_input("TopVolantis"), &env);

        let outcome = exporter
            .export(&DataObject::RegularSurface(surface("x")), &BytesEncoder)
            .unwrap();

        let runpath = fixture.casepath().join("realization-1/iter-0");
        assert_eq!(outcome.data_path, runpath.join("share/results/maps/topvolantis.gri"));
        assert_eq!(std::fs::read(&outcome.data_path).unwrap(), PAYLOAD);
        assert_eq!(
            outcome.metadata_path.as_deref(),
            Some(runpath.join("share/results/maps/.topvolantis.gri.yml").as_path())
        );
        assert_eq!(outcome.manifest_path.as_deref().map(Path::parent), Some(Some(runpath.as_path())));

        let meta = outcome.metadata.as_ref().unwrap().as_object().unwrap();
        assert_eq!(meta.file.checksum_md5.as_deref(), Some(md5sum_bytes(PAYLOAD).as_str()));
        assert_eq!(meta.file.size_bytes, Some(PAYLOAD.len() as u64));
        assert_eq!(meta.fmu.as_ref().unwrap().context.stage, FmuContext::Realization);
        assert_eq!(meta.tracklog[0].user.id, "tester");
    }

    #[test]
    fn test_sidecar_matches_generated_document() {
        let fixture = CaseFixture::new();
        let env = realization_env(&fixture, 0);
        let (exporter, _) = exporter(&depth_input("TopVolantis"), &env);
        let obj = DataObject::RegularSurface(surface("x"));

        let outcome = exporter.export(&obj, &BytesEncoder).unwrap();
        let written = read_metadata(&outcome.data_path).unwrap();
        let expected = outcome.metadata.as_ref().unwrap().to_value().unwrap();
        assert_eq!(written, expected);

        let mut generated = exporter.generate_metadata(&obj).unwrap().to_value().unwrap();
        let mut written = written;
        for doc in [&mut generated, &mut written] {
            let map = doc.as_object_mut().unwrap();
            map.remove("tracklog");
            map["file"].as_object_mut().unwrap().remove("checksum_md5");
            map["file"].as_object_mut().unwrap().remove("size_bytes");
        }
        assert_eq!(written, generated);
    }

    #[test]
    fn test_manifest_lists_exports_in_order() {
        let fixture = CaseFixture::new();
        let env = realization_env(&fixture, 2);
        let (first, _) = exporter(&depth_input("TopVolantis"), &env);
        let (second, _) = exporter(&depth_input("BaseVolantis"), &env);
        let obj = DataObject::RegularSurface(surface("x"));

        let a = first.export(&obj, &BytesEncoder).unwrap();
        let b = second.export(&obj, &BytesEncoder).unwrap();

        let manifest = load_export_manifest(first.config().runcontext()).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entries()[0].absolute_path, a.data_path);
        assert_eq!(manifest.entries()[1].absolute_path, b.data_path);
        assert_eq!(manifest.entries()[1].exported_by, "tester");
    }

    #[test]
    fn test_entity_uuid_is_stable_across_realizations() {
        let fixture = CaseFixture::new();
        let obj = DataObject::RegularSurface(surface("x"));
        let (one, _) = exporter(&depth_input("TopVolantis"), &realization_env(&fixture, 0));
        let (two, _) = exporter(&depth_input("TopVolantis"), &realization_env(&fixture, 1));

        let a = one.generate_metadata(&obj).unwrap();
        let b = two.generate_metadata(&obj).unwrap();
        let fmu_a = a.as_object().unwrap().fmu.clone().unwrap();
        let fmu_b = b.as_object().unwrap().fmu.clone().unwrap();

        let case_uuid = Uuid::parse_str(CASE_UUID).unwrap();
        let expected = derive_entity_uuid(&case_uuid, "share/results/maps/topvolantis.gri");
        assert_eq!(fmu_a.entity.unwrap().uuid, expected);
        assert_eq!(fmu_b.entity.unwrap().uuid, expected);
        assert_eq!(fmu_a.ensemble, fmu_b.ensemble);
        assert_ne!(fmu_a.realization.unwrap().uuid, fmu_b.realization.unwrap().uuid);
    }

    #[test]
    fn test_filename_is_sanitized_outside_context() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path());
        let input = depth_input("Valysar Top.Fm").with_tagname("DS Extract");
        let (exporter, _) = exporter(&input, &env);

        let outcome = exporter
            .export(&DataObject::RegularSurface(surface("x")), &BytesEncoder)
            .unwrap();
        assert_eq!(
            outcome.data_path,
            tmp.path().join("share/results/maps/valysar_top_fm--ds_extract.gri")
        );
        assert!(outcome.manifest_path.is_none());
        let meta = outcome.metadata.as_ref().unwrap().as_object().unwrap();
        assert!(meta.fmu.is_none());
        assert_eq!(meta.data.name, "Valysar Top.Fm");
        assert_eq!(meta.data.tagname.as_deref(), Some("DS Extract"));
    }

    #[test]
    fn test_legacy_asset_access_level_becomes_restricted() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path());
        let mut input = depth_input("TopVolantis");
        input.access_ssdl = Some(LegacyAccess {
            access_level: Some("asset".into()),
            rep_include: None,
        });
        let (exporter, sink) = exporter(&input, &env);

        let doc = exporter
            .generate_metadata(&DataObject::RegularSurface(surface("x")))
            .unwrap();
        let access = &doc.as_object().unwrap().access;
        assert_eq!(access.classification, Some(Classification::Restricted));
        assert_eq!(access.ssdl.unwrap().access_level, Classification::Restricted);

        let deprecations = sink.of_kind(DiagnosticKind::Deprecation);
        assert_eq!(deprecations.len(), 1);
        assert!(deprecations[0]
            .message
            .contains("'asset' for access.ssdl.access_level is deprecated"));
    }

    #[test]
    fn test_missing_config_exports_data_only() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path());
        let input = ExportInput::new().with_content("depth").with_name("TopVolantis");
        let (exporter, sink) = exporter(&input, &env);

        let outcome = exporter
            .export(&DataObject::RegularSurface(surface("x")), &BytesEncoder)
            .unwrap();
        assert!(outcome.data_path.exists());
        assert!(outcome.metadata.is_none());
        assert!(outcome.metadata_path.is_none());
        assert!(!outcome.data_path.with_file_name(".topvolantis.gri.yml").exists());
        assert!(sink.contains("without a valid global configuration"));
    }

    #[test]
    fn test_preprocessed_export_is_marked() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path());
        let mut input = depth_input("TopVolantis");
        input.preprocessed = true;
        let (exporter, _) = exporter(&input, &env);

        let outcome = exporter
            .export(&DataObject::RegularSurface(surface("x")), &BytesEncoder)
            .unwrap();
        assert_eq!(
            outcome.data_path,
            tmp.path().join("share/preprocessed/maps/topvolantis.gri")
        );
        let sidecar = read_metadata(&outcome.data_path).unwrap();
        assert_eq!(sidecar["_preprocessed"], true);
    }

    #[test]
    fn test_invalid_metadata_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path());
        let input = ExportInput::new()
            .with_config(global_config_value())
            .with_content("volumes")
            .with_name("geogrid")
            .with_table_index(["ZONE", "BOGUS"]);
        let (exporter, _) = exporter(&input, &env);
        let table = DataObject::Table(Table {
            name: String::new(),
            layout: TableLayout::Columnar,
            columns: vec![
                Column::new("ZONE", vec![CellValue::Text("Valysar".into())]),
                Column::new("STOIIP_OIL", vec![CellValue::Float(1.5e6)]),
            ],
        });

        let mut encoder = MockObjectEncoder::new();
        encoder.expect_encode().times(0);
        let err = exporter.export(&table, &encoder).unwrap_err();
        assert!(err.to_string().contains("BOGUS is not in table"));
        assert!(!tmp.path().join("share").exists());
    }

    #[test]
    fn test_encoder_failure_leaves_no_partial_file() {
        let fixture = CaseFixture::new();
        let env = realization_env(&fixture, 0);
        let (exporter, _) = exporter(&depth_input("TopVolantis"), &env);

        let mut encoder = MockObjectEncoder::new();
        encoder
            .expect_encode()
            .withf(|_, format, _| format == "irap_binary")
            .times(1)
            .returning(|_, _, _| Err(crate::DataioError::Encoding("disk full".into())));

        let err = exporter
            .export(&DataObject::RegularSurface(surface("x")), &encoder)
            .unwrap_err();
        assert!(matches!(err, crate::DataioError::Encoding(_)));

        let maps = fixture.casepath().join("realization-0/iter-0/share/results/maps");
        assert_eq!(std::fs::read_dir(&maps).unwrap().count(), 0);
        assert!(load_export_manifest(exporter.config().runcontext()).is_err());
    }

    #[test]
    fn test_sidecar_failure_removes_data_file() {
        let fixture = CaseFixture::new();
        let env = realization_env(&fixture, 0);
        let (exporter, _) = exporter(&depth_input("TopVolantis"), &env);

        let maps = fixture.casepath().join("realization-0/iter-0/share/results/maps");
        std::fs::create_dir_all(maps.join(".topvolantis.gri.yml")).unwrap();

        let err = exporter
            .export(&DataObject::RegularSurface(surface("x")), &BytesEncoder)
            .unwrap_err();
        assert!(matches!(err, crate::DataioError::Io(_)));
        assert!(!maps.join("topvolantis.gri").exists());
        let leftovers: Vec<_> = std::fs::read_dir(&maps)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from(".topvolantis.gri.yml")]);
        assert!(load_export_manifest(exporter.config().runcontext()).is_err());
    }
}
