//! Structural validation of metadata documents.
//!
//! The record class selects the rule set; object documents are further
//! checked against their content kind and shape class.

use serde_json::Value;

use super::data::{DataBlock, Specification};
use super::document::{CaseMetadata, ContextMetadata, MetadataDocument, ObjectMetadata};
use super::fields::Fmu;
use crate::definitions::SOURCE;
use crate::enums::{Content, FmuClass, FmuContext};
use crate::errors::{DataioError, ErrorInfo, Result, ValidationError};

const SCHEMA_ERROR_CODE: &str = "METADATA_SCHEMA";

fn violation(field: &str, message: impl Into<String>) -> DataioError {
    let message = message.into();
    ValidationError::new(message.clone())
        .with_field(field)
        .with_error_info(ErrorInfo::new(SCHEMA_ERROR_CODE, message).with_context_entry("field", field))
        .into()
}

/// Validates a document against the rules of its class.
pub fn validate_document(doc: &MetadataDocument) -> Result<()> {
    match doc {
        MetadataDocument::Case(m) => validate_case(m),
        MetadataDocument::Ensemble(m) => validate_context(m, &[FmuClass::Ensemble, FmuClass::Iteration]),
        MetadataDocument::Realization(m) => validate_context(m, &[FmuClass::Realization]),
        MetadataDocument::Object(m) => validate_object(m),
    }
}

/// Parses and validates a raw JSON document.
pub fn validate_value(value: &Value) -> Result<MetadataDocument> {
    let doc = MetadataDocument::from_value(value.clone())?;
    validate_document(&doc)?;
    Ok(doc)
}

fn validate_header(schema: &str, version: &str, source: &str) -> Result<()> {
    if schema.is_empty() {
        return Err(violation("$schema", "The '$schema' field is empty"));
    }
    if version.is_empty() {
        return Err(violation("version", "The 'version' field is empty"));
    }
    if source != SOURCE {
        return Err(violation("source", format!("Expected source '{SOURCE}', got '{source}'")));
    }
    Ok(())
}

fn validate_case(m: &CaseMetadata) -> Result<()> {
    validate_header(&m.schema, &m.version, &m.source)?;
    if m.class != FmuClass::Case {
        return Err(violation("class", format!("Expected class 'case', got '{}'", m.class)));
    }
    if m.fmu.case.name.is_empty() {
        return Err(violation("fmu.case.name", "The case has no name"));
    }
    Ok(())
}

fn validate_context(m: &ContextMetadata, classes: &[FmuClass]) -> Result<()> {
    validate_header(&m.schema, &m.version, &m.source)?;
    if !classes.contains(&m.class) {
        return Err(violation("class", format!("Unexpected class '{}'", m.class)));
    }
    if m.fmu.ensemble.is_none() {
        return Err(violation("fmu.ensemble", format!("A '{}' record requires 'fmu.ensemble'", m.class)));
    }
    match (m.class, &m.fmu.realization) {
        (FmuClass::Realization, None) => Err(violation(
            "fmu.realization",
            "A 'realization' record requires 'fmu.realization'",
        )),
        (FmuClass::Ensemble | FmuClass::Iteration, Some(_)) => Err(violation(
            "fmu.realization",
            format!("A '{}' record cannot carry 'fmu.realization'", m.class),
        )),
        _ => Ok(()),
    }
}

fn validate_object(m: &ObjectMetadata) -> Result<()> {
    validate_header(&m.schema, &m.version, &m.source)?;
    if !m.class.is_object() {
        return Err(violation("class", format!("'{}' is not a data object class", m.class)));
    }
    if m.access.classification.is_none() {
        return Err(violation("access.classification", "The access block has no classification"));
    }
    if let Some(fmu) = &m.fmu {
        validate_object_fmu(fmu)?;
    }
    if m.file.relative_path.as_os_str().is_empty() {
        return Err(violation("file.relative_path", "The file block has no relative path"));
    }
    validate_data(m.class, &m.data)
}

fn validate_object_fmu(fmu: &Fmu) -> Result<()> {
    if fmu.context.stage == FmuContext::Realization && (fmu.ensemble.is_none() || fmu.realization.is_none()) {
        return Err(violation(
            "fmu",
            "Objects exported in realization context require 'fmu.ensemble' and 'fmu.realization'",
        ));
    }
    Ok(())
}

fn validate_data(class: FmuClass, data: &DataBlock) -> Result<()> {
    if data.name.is_empty() {
        return Err(violation("data.name", "The data block has no name"));
    }
    if data.top.is_some() != data.base.is_some() {
        return Err(violation(
            "data.top",
            "Both 'top' and 'base' must be set together or both be unset",
        ));
    }
    validate_content(data)?;

    if let Some(spec) = &data.spec {
        if !spec_matches_class(spec, class) {
            return Err(violation(
                "data.spec",
                format!("The specification does not describe a '{class}' object"),
            ));
        }
    }
    if data.bbox.is_some_and(|b| !b.is_finite()) {
        return Err(violation("data.bbox", "The bounding box contains non-finite values"));
    }
    Ok(())
}

fn validate_content(data: &DataBlock) -> Result<()> {
    match &data.payload {
        Some(payload) if payload.content() != data.content => Err(violation(
            "data.content",
            format!(
                "The content payload '{}' does not match content '{}'",
                payload.content(),
                data.content
            ),
        )),
        None if data.content.requires_payload() && data.content != Content::Property => Err(violation(
            data.content.as_str(),
            format!("Content '{}' requires its content specific block", data.content),
        )),
        _ => Ok(()),
    }
}

fn spec_matches_class(spec: &Specification, class: FmuClass) -> bool {
    matches!(
        (spec, class),
        (Specification::Surface(_), FmuClass::Surface)
            | (Specification::Cube(_), FmuClass::Cube)
            | (Specification::CpGrid(_), FmuClass::Cpgrid)
            | (Specification::CpGridProperty(_), FmuClass::CpgridProperty)
            | (Specification::Table(_), FmuClass::Table)
            | (Specification::Points(_), FmuClass::Points)
            | (Specification::Polygons(_), FmuClass::Polygons)
            | (Specification::TriangulatedSurface(_), FmuClass::TriangulatedSurface)
    )
}
