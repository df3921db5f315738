//! Content kind and content specific payload resolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::enums::{Content, FluidContactType};
use crate::errors::{DataioError, ErrorInfo, Result, ValidationError};

/// `data.field_outline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOutline {
    /// Contact the outline follows.
    pub contact: String,
}

/// `data.field_region`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRegion {
    /// Region id.
    pub id: i64,
}

/// `data.fluid_contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FluidContact {
    /// Contact kind.
    pub contact: FluidContactType,
    /// Truncated to stratigraphy.
    #[serde(default)]
    pub truncated: bool,
}

/// `data.property`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Property {
    /// Property attribute, e.g. `porosity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Discrete or continuous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_discrete: Option<bool>,
}

/// `data.seismic`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seismic {
    /// Attribute, e.g. `amplitude`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Calculation, e.g. `mean`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,
    /// Filter size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_size: Option<f64>,
    /// Scaling factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<f64>,
    /// Stacking offset, e.g. `0-15`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacking_offset: Option<String>,
    /// Vertical range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zrange: Option<f64>,
}

/// Payload attached to content kinds that require one.
///
/// Serialized under the content name, e.g. `fluid_contact: {contact: owc}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPayload {
    /// Field outline.
    FieldOutline(FieldOutline),
    /// Field region.
    FieldRegion(FieldRegion),
    /// Fluid contact.
    FluidContact(FluidContact),
    /// Property.
    Property(Property),
    /// Seismic.
    Seismic(Seismic),
}

impl ContentPayload {
    /// The content kind this payload belongs to.
    #[must_use]
    pub const fn content(&self) -> Content {
        match self {
            Self::FieldOutline(_) => Content::FieldOutline,
            Self::FieldRegion(_) => Content::FieldRegion,
            Self::FluidContact(_) => Content::FluidContact,
            Self::Property(_) => Content::Property,
            Self::Seismic(_) => Content::Seismic,
        }
    }
}

/// Raw `content` input: a name or the legacy `{name: payload}` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentInput {
    /// Current form.
    Name(String),
    /// Legacy form.
    Legacy(Map<String, Value>),
}

impl From<&str> for ContentInput {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<Content> for ContentInput {
    fn from(c: Content) -> Self {
        Self::Name(c.to_string())
    }
}

/// Resolved content kind and payload; `None` content means `unset`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    /// Content kind.
    pub content: Option<Content>,
    /// Payload.
    pub payload: Option<ContentPayload>,
}

/// Python-style truthiness for raw payload values.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(m) => !m.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

fn payload_error(content: Content, message: impl Into<String>) -> DataioError {
    DataioError::Validation(
        ValidationError::new(message)
            .with_field("content_metadata")
            .with_error_info(
                ErrorInfo::new("DATAIO-CONTENT-PAYLOAD", "Invalid content payload")
                    .with_context_entry("content", content.as_str()),
            ),
    )
}

/// Resolves the content kind from raw input.
pub fn resolve_content_enum(input: Option<&ContentInput>) -> Result<Option<Content>> {
    match input {
        None => {
            debug!("content not set from input");
            Ok(None)
        }
        Some(ContentInput::Name(name)) => name.parse().map(Some),
        Some(ContentInput::Legacy(map)) => match map.keys().next() {
            Some(key) => key.parse().map(Some),
            None => Err(DataioError::Validation(
                ValidationError::new("The 'content' dictionary is empty").with_field("content"),
            )),
        },
    }
}

/// Resolves content kind and payload.
///
/// Explicit `content_metadata` wins over a payload embedded in the legacy
/// mapping form.
pub fn resolve_content(
    input: Option<&ContentInput>,
    content_metadata: Option<&Value>,
    sink: &dyn DiagnosticSink,
) -> Result<ResolvedContent> {
    let content = resolve_content_enum(input)?.filter(|c| *c != Content::Unset);

    let legacy_payload = match (input, content) {
        (Some(ContentInput::Legacy(map)), Some(c)) => map.get(c.as_str()),
        _ => None,
    };
    let raw = content_metadata.or(legacy_payload).filter(|v| is_present(v));

    let Some(content) = content else {
        sink.emit(Diagnostic::warning(
            "The <content> is not provided which defaults to 'unset'. It is strongly \
             recommended that content is given explicitly!",
        ));
        if raw.is_some() {
            sink.emit(Diagnostic::warning(
                "Content 'unset' does not require 'content_metadata', ignoring input.",
            ));
        }
        return Ok(ResolvedContent {
            content: None,
            payload: None,
        });
    };

    if !content.requires_payload() {
        if raw.is_some() {
            sink.emit(Diagnostic::warning(format!(
                "Content '{content}' does not require 'content_metadata', ignoring input."
            )));
        }
        return Ok(ResolvedContent {
            content: Some(content),
            payload: None,
        });
    }

    let Some(raw) = raw else {
        if content == Content::Property {
            sink.emit(Diagnostic::deprecation(
                "When using content \"property\", please use the 'content_metadata' argument \
                 to provide more required information, e.g. \
                 content_metadata={\"attribute\": \"porosity\", \"is_discrete\": false}. \
                 The use of \"property\" without content_metadata will be disallowed in \
                 future versions.",
            ));
            return Ok(ResolvedContent {
                content: Some(content),
                payload: None,
            });
        }
        return Err(payload_error(
            content,
            format!(
                "Content '{content}' requires additional input in the form of 'content_metadata'."
            ),
        ));
    };

    let Value::Object(map) = raw else {
        return Err(payload_error(
            content,
            format!("'content_metadata' must be a dictionary for content '{content}'."),
        ));
    };

    let payload = parse_payload(content, map.clone(), sink)?;
    Ok(ResolvedContent {
        content: Some(content),
        payload: Some(payload),
    })
}

fn parse_payload(
    content: Content,
    mut map: Map<String, Value>,
    sink: &dyn DiagnosticSink,
) -> Result<ContentPayload> {
    let invalid = |e: serde_json::Error| {
        payload_error(content, format!("Invalid 'content_metadata' for content '{content}': {e}"))
    };
    let value = |map: Map<String, Value>| Value::Object(map);

    let payload = match content {
        Content::FieldOutline => {
            ContentPayload::FieldOutline(serde_json::from_value(value(map)).map_err(invalid)?)
        }
        Content::FieldRegion => {
            ContentPayload::FieldRegion(serde_json::from_value(value(map)).map_err(invalid)?)
        }
        Content::FluidContact => {
            if let Some(Value::String(contact)) = map.get_mut("contact") {
                if contact.chars().any(char::is_uppercase) {
                    let lower = contact.to_lowercase();
                    sink.emit(Diagnostic::warning(format!(
                        "You've defined the fluid contact as '{contact}' which contains uppercase \
                         characters. To ensure future compatibility you should change this value \
                         to '{lower}'."
                    )));
                    *contact = lower;
                }
            }
            ContentPayload::FluidContact(serde_json::from_value(value(map)).map_err(invalid)?)
        }
        Content::Property => {
            ContentPayload::Property(serde_json::from_value(value(map)).map_err(invalid)?)
        }
        Content::Seismic => {
            ContentPayload::Seismic(serde_json::from_value(value(map)).map_err(invalid)?)
        }
        other => {
            return Err(payload_error(
                other,
                format!("No content_metadata model exists for content '{other}'"),
            ))
        }
    };
    Ok(payload)
}
