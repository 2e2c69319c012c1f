//! Core data model shared across the compiler, transport, and executor

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// One input record of a batch run.
///
/// Carries the flat parameter set describing a single operation. Immutable
/// once created; the executor owns the iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    index: usize,
    parameters: Map<String, Value>,
}

impl BatchItem {
    /// Create an item from an already-built parameter map.
    pub fn new(index: usize, parameters: Map<String, Value>) -> Self {
        Self { index, parameters }
    }

    /// Create an item from a JSON value, which must be an object.
    pub fn from_value(index: usize, parameters: Value) -> Result<Self> {
        match parameters {
            Value::Object(parameters) => Ok(Self { index, parameters }),
            other => Err(ClientError::InvalidParameter {
                name: "parameters".to_string(),
                message: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }

    /// Position of this item in the input sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Look up a parameter by name. JSON null counts as absent.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name).filter(|value| !value.is_null())
    }
}

/// The closed set of supported processing operations.
///
/// Variant wire names match the remote API's operation identifiers; any
/// other string is a compilation error, never silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "convert")]
    Convert,
    #[serde(rename = "trim")]
    Trim,
    #[serde(rename = "compress")]
    Compress,
    #[serde(rename = "burnCaptions")]
    BurnCaptions,
    #[serde(rename = "remove_silence")]
    RemoveSilence,
    #[serde(rename = "stitch")]
    Stitch,
    #[serde(rename = "generateClips")]
    GenerateClips,
    #[serde(rename = "splitScreen")]
    SplitScreen,
}

impl OperationKind {
    /// Parse an operation identifier, rejecting anything outside the set.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "convert" => Ok(Self::Convert),
            "trim" => Ok(Self::Trim),
            "compress" => Ok(Self::Compress),
            "burnCaptions" => Ok(Self::BurnCaptions),
            "remove_silence" => Ok(Self::RemoveSilence),
            "stitch" => Ok(Self::Stitch),
            "generateClips" => Ok(Self::GenerateClips),
            "splitScreen" => Ok(Self::SplitScreen),
            other => Err(ClientError::UnknownOperation(other.to_string())),
        }
    }

    /// Wire name of the operation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Convert => "convert",
            Self::Trim => "trim",
            Self::Compress => "compress",
            Self::BurnCaptions => "burnCaptions",
            Self::RemoveSilence => "remove_silence",
            Self::Stitch => "stitch",
            Self::GenerateClips => "generateClips",
            Self::SplitScreen => "splitScreen",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a trim segment's end point is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndMode {
    /// Absolute end timestamp
    End,
    /// Length measured from the start point
    Duration,
}

impl Default for EndMode {
    fn default() -> Self {
        Self::Duration
    }
}

/// One trim segment.
///
/// Exactly one of `end`/`duration` reaches the compiled output, selected by
/// `end_mode`; the other is dropped entirely, never emitted as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in HH:MM:SS format or seconds
    pub start: String,
    /// Which of the two end fields applies
    #[serde(rename = "endMode", default)]
    pub end_mode: EndMode,
    /// End time, used when `end_mode` is [`EndMode::End`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Duration, used when `end_mode` is [`EndMode::Duration`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// HTTP methods the remote API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiled, transport-agnostic description of an HTTP call.
///
/// Query and body are mutually exclusive: GET requests carry a query map and
/// an empty body, POST requests the reverse.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the configured base URL
    pub path: &'static str,
    /// Query parameters (GET only)
    pub query: Map<String, Value>,
    /// JSON body fields (POST only)
    pub body: Map<String, Value>,
}

impl RequestDescriptor {
    /// Build a GET descriptor.
    pub fn get(path: &'static str, query: Map<String, Value>) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            query,
            body: Map::new(),
        }
    }

    /// Build a POST descriptor.
    pub fn post(path: &'static str, body: Map<String, Value>) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            query: Map::new(),
            body,
        }
    }

    /// The populated side of the query/body pair, per the method.
    pub fn payload(&self) -> &Map<String, Value> {
        match self.method {
            HttpMethod::Get => &self.query,
            HttpMethod::Post => &self.body,
        }
    }
}

/// Raw response handed back by the transport collaborator.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers with lowercased names
    pub headers: HashMap<String, String>,
    /// Raw response body
    pub body: Bytes,
}

/// Normalized response payload, split by content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedResult {
    /// Media payload with metadata extracted from the response headers
    Binary {
        /// Raw media bytes, kept out of the JSON record
        payload: Bytes,
        /// Name from content-disposition, or `"output"`
        filename: String,
        /// Value of the content-type header
        content_type: String,
    },
    /// Decoded JSON body, or `{"raw": <text>}` when undecodable
    Json(Value),
}

/// Outcome of processing one batch item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// The full pipeline completed
    Success {
        /// Operation that was executed
        operation: OperationKind,
        /// Classified response payload
        result: ClassifiedResult,
    },
    /// Some stage failed; the message carries the error text
    Failure {
        /// Rendered error message
        message: String,
    },
}

/// One output record of a batch run, position-matched to its input item.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Index of the originating [`BatchItem`]
    pub index: usize,
    /// What happened to the item
    pub outcome: ItemOutcome,
}

impl ExecutionResult {
    pub fn new(index: usize, outcome: ItemOutcome) -> Self {
        Self { index, outcome }
    }

    /// Whether the item completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Success { .. })
    }

    /// Render the externally visible record shape.
    ///
    /// Success: `{success: true, operation, ...}` with the decoded fields
    /// merged in for JSON results, or `{filename, contentType}` metadata for
    /// binary results (the payload itself stays a separate attachment).
    /// Failure: `{success: false, error}`.
    pub fn to_record(&self) -> Value {
        match &self.outcome {
            ItemOutcome::Success { operation, result } => {
                let mut record = Map::new();
                record.insert("success".to_string(), Value::Bool(true));
                record.insert(
                    "operation".to_string(),
                    Value::String(operation.as_str().to_string()),
                );
                match result {
                    ClassifiedResult::Binary {
                        filename,
                        content_type,
                        ..
                    } => {
                        record.insert("filename".to_string(), Value::String(filename.clone()));
                        record.insert(
                            "contentType".to_string(),
                            Value::String(content_type.clone()),
                        );
                    }
                    ClassifiedResult::Json(Value::Object(fields)) => {
                        for (key, value) in fields {
                            record.insert(key.clone(), value.clone());
                        }
                    }
                    // Non-object JSON has no fields to merge
                    ClassifiedResult::Json(other) => {
                        record.insert("data".to_string(), other.clone());
                    }
                }
                Value::Object(record)
            }
            ItemOutcome::Failure { message } => serde_json::json!({
                "success": false,
                "error": message,
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
