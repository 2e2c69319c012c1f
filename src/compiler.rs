//! Operation request compiler
//!
//! Pure mapping from (operation kind, resolved parameters) to a
//! [`RequestDescriptor`]. The per-operation rules live in a static table —
//! one row per kind — so supporting a new operation means adding a row, not
//! new control flow. Field inclusion is governed by explicit per-field
//! policies (non-empty strings, positive numbers, always-included booleans),
//! not a generic "omit falsy" rule.

use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::params::ParameterResolver;
use crate::types::{BatchItem, EndMode, HttpMethod, OperationKind, RequestDescriptor, Segment};

/// One row of the compilation rule table.
struct OperationRule {
    kind: OperationKind,
    method: HttpMethod,
    path: &'static str,
    build: fn(&ParameterResolver<'_>) -> Result<Map<String, Value>>,
}

static RULES: &[OperationRule] = &[
    OperationRule {
        kind: OperationKind::Convert,
        method: HttpMethod::Get,
        path: "/convert",
        build: build_convert,
    },
    OperationRule {
        kind: OperationKind::Trim,
        method: HttpMethod::Post,
        path: "/operations/trim",
        build: build_trim,
    },
    OperationRule {
        kind: OperationKind::Compress,
        method: HttpMethod::Post,
        path: "/operations/compress",
        build: build_compress,
    },
    OperationRule {
        kind: OperationKind::BurnCaptions,
        method: HttpMethod::Post,
        path: "/operations/burn-captions",
        build: build_burn_captions,
    },
    OperationRule {
        kind: OperationKind::RemoveSilence,
        method: HttpMethod::Post,
        path: "/operations/remove-silence",
        build: build_remove_silence,
    },
    OperationRule {
        kind: OperationKind::Stitch,
        method: HttpMethod::Post,
        path: "/operations/stitch",
        build: build_stitch,
    },
    OperationRule {
        kind: OperationKind::GenerateClips,
        method: HttpMethod::Post,
        path: "/workflows/generate-clips",
        build: build_generate_clips,
    },
    OperationRule {
        kind: OperationKind::SplitScreen,
        method: HttpMethod::Post,
        path: "/operations/split-screen",
        build: build_split_screen,
    },
];

fn rule_for(kind: OperationKind) -> &'static OperationRule {
    RULES
        .iter()
        .find(|rule| rule.kind == kind)
        .expect("rule table covers every operation kind")
}

/// Compile one operation into a transport-agnostic request descriptor.
///
/// Deterministic: no randomness, no network access. Parameter errors
/// ([`ClientError::MissingParameter`], [`ClientError::InvalidParameter`])
/// are local to this item.
pub fn compile(kind: OperationKind, item: &BatchItem) -> Result<RequestDescriptor> {
    let rule = rule_for(kind);
    let params = ParameterResolver::new(item);
    let payload = (rule.build)(&params)?;
    Ok(match rule.method {
        HttpMethod::Get => RequestDescriptor::get(rule.path, payload),
        HttpMethod::Post => RequestDescriptor::post(rule.path, payload),
    })
}

fn build_convert(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), params.require("url")?.clone());
    payload.insert(
        "output_format".to_string(),
        params.require("outputFormat")?.clone(),
    );

    if let Some(resolution) = params.optional_str("resolution").filter(|s| !s.is_empty()) {
        payload.insert(
            "resolution".to_string(),
            Value::String(resolution.to_string()),
        );
    }

    if let Some(bitrate) = params.optional_i64("bitrateKbps").filter(|kbps| *kbps > 0) {
        payload.insert("bitrate_kbps".to_string(), Value::from(bitrate));
    }

    Ok(payload)
}

fn build_trim(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), params.require("url")?.clone());
    payload.insert(
        "output_format".to_string(),
        params.require("outputFormat")?.clone(),
    );

    if let Some(filename) = params
        .optional_str("outputFilename")
        .filter(|s| !s.is_empty())
    {
        payload.insert(
            "output_filename".to_string(),
            Value::String(filename.to_string()),
        );
    }

    match params.optional_str("trimMode").unwrap_or("single") {
        "multiple" => {
            let segments = match params.optional("segments") {
                Some(value) => serde_json::from_value::<Vec<Segment>>(value.clone()).map_err(
                    |e| ClientError::InvalidParameter {
                        name: "segments".to_string(),
                        message: e.to_string(),
                    },
                )?,
                None => Vec::new(),
            };
            let compiled = segments.iter().map(compile_segment).collect();
            payload.insert("segments".to_string(), Value::Array(compiled));
        }
        _ => {
            payload.insert("start".to_string(), params.require("start")?.clone());
            match params.optional_str("endMode").unwrap_or("duration") {
                "end" => {
                    payload.insert("end".to_string(), params.require("end")?.clone());
                }
                _ => {
                    payload.insert("duration".to_string(), params.require("duration")?.clone());
                }
            }
        }
    }

    Ok(payload)
}

/// Compile one segment, keeping only the end field selected by `end_mode`.
fn compile_segment(segment: &Segment) -> Value {
    let mut compiled = Map::new();
    compiled.insert("start".to_string(), Value::String(segment.start.clone()));
    match segment.end_mode {
        EndMode::End => {
            if let Some(end) = &segment.end {
                compiled.insert("end".to_string(), Value::String(end.clone()));
            }
        }
        EndMode::Duration => {
            if let Some(duration) = &segment.duration {
                compiled.insert("duration".to_string(), Value::String(duration.clone()));
            }
        }
    }
    Value::Object(compiled)
}

fn build_compress(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), params.require("url")?.clone());
    payload.insert("preset".to_string(), params.require("preset")?.clone());
    payload.insert("crf".to_string(), params.require("crf")?.clone());
    payload.insert(
        "output_format".to_string(),
        params.require("outputFormat")?.clone(),
    );
    Ok(payload)
}

fn build_burn_captions(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), params.require("url")?.clone());
    payload.insert(
        "subtitle_url".to_string(),
        params.require("subtitleUrl")?.clone(),
    );
    payload.insert("font_size".to_string(), params.require("fontSize")?.clone());
    payload.insert(
        "primary_color".to_string(),
        params.require("fontColor")?.clone(),
    );
    payload.insert(
        "subtitle_position".to_string(),
        params.require("subtitlePosition")?.clone(),
    );
    payload.insert(
        "output_format".to_string(),
        params.require("outputFormat")?.clone(),
    );

    if let Some(font_name) = params.optional_str("fontName").filter(|s| !s.is_empty()) {
        payload.insert(
            "font_name".to_string(),
            Value::String(font_name.to_string()),
        );
    }

    if let Some(resolution) = params.optional_str("resolution").filter(|s| !s.is_empty()) {
        payload.insert(
            "resolution".to_string(),
            Value::String(resolution.to_string()),
        );
    }

    if let Some(orientation) = params.optional_str("orientation").filter(|s| !s.is_empty()) {
        payload.insert(
            "orientation".to_string(),
            Value::String(orientation.to_string()),
        );
    }

    if let Some(outline) = params.optional_i64("outline").filter(|width| *width > 0) {
        payload.insert("outline".to_string(), Value::from(outline));
    }

    // boxed is always sent, defaulting to false
    payload.insert(
        "boxed".to_string(),
        Value::Bool(params.optional_bool("boxed").unwrap_or(false)),
    );

    if let Some(filename) = params
        .optional_str("outputFilename")
        .filter(|s| !s.is_empty())
    {
        payload.insert(
            "output_filename".to_string(),
            Value::String(filename.to_string()),
        );
    }

    Ok(payload)
}

fn build_remove_silence(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), params.require("url")?.clone());
    payload.insert(
        "noise_threshold".to_string(),
        params.require("noiseThreshold")?.clone(),
    );
    payload.insert("duration".to_string(), params.require("duration")?.clone());
    payload.insert("preset".to_string(), params.require("preset")?.clone());
    payload.insert("crf".to_string(), params.require("crf")?.clone());
    payload.insert(
        "output_format".to_string(),
        params.require("outputFormat")?.clone(),
    );

    if let Some(filename) = params
        .optional_str("outputFilename")
        .filter(|s| !s.is_empty())
    {
        payload.insert(
            "output_filename".to_string(),
            Value::String(filename.to_string()),
        );
    }

    Ok(payload)
}

fn build_stitch(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert(
        "urls".to_string(),
        parse_stitch_urls(params.require_str("urls")?),
    );
    payload.insert(
        "output_format".to_string(),
        params.require("outputFormat")?.clone(),
    );

    if let Some(filename) = params
        .optional_str("outputFilename")
        .filter(|s| !s.is_empty())
    {
        payload.insert(
            "output_filename".to_string(),
            Value::String(filename.to_string()),
        );
    }

    Ok(payload)
}

/// Parse the stitch `urls` parameter.
///
/// Strict JSON-array parsing first; anything else degrades to best-effort
/// comma splitting with trimmed, non-empty entries. Never fails.
fn parse_stitch_urls(raw: &str) -> Value {
    if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
        if parsed.is_array() {
            return parsed;
        }
    }
    Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| Value::String(entry.to_string()))
            .collect(),
    )
}

fn build_generate_clips(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), params.require("url")?.clone());
    let subtitles = params.require_bool("subtitles")?;
    payload.insert("subtitles".to_string(), Value::Bool(subtitles));

    // Soft-resolved regardless of the subtitles flag
    if let Some(resolution) = params.optional("resolution") {
        payload.insert("resolution".to_string(), resolution.clone());
    }
    if let Some(orientation) = params.optional("orientation") {
        payload.insert("orientation".to_string(), orientation.clone());
    }

    if subtitles {
        const STYLE_FIELDS: &[(&str, &str)] = &[
            ("highlightColor", "highlight_color"),
            ("primaryColor", "primary_color"),
            ("fontName", "font_name"),
            ("fontSize", "font_size"),
            ("shadowColor", "shadow_color"),
            ("shadowIntensity", "shadow_intensity"),
            ("displayMode", "display_mode"),
            ("subtitlePosition", "subtitle_position"),
        ];
        for (param, field) in STYLE_FIELDS {
            if let Some(value) = params.optional(param) {
                payload.insert((*field).to_string(), value.clone());
            }
        }
        if let Some(weight) = params.optional_str("fontWeight") {
            let mapped = if weight == "bold" { 1 } else { 0 };
            payload.insert("font_weight".to_string(), Value::from(mapped));
        }
    }

    Ok(payload)
}

fn build_split_screen(params: &ParameterResolver<'_>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    payload.insert("url_a".to_string(), params.require("urlA")?.clone());
    payload.insert("url_b".to_string(), params.require("urlB")?.clone());
    payload.insert(
        "orientation".to_string(),
        params.require("orientation")?.clone(),
    );
    payload.insert("volume_a".to_string(), params.require("volumeA")?.clone());
    payload.insert("volume_b".to_string(), params.require("volumeB")?.clone());
    // Split-screen output is always mp4
    payload.insert(
        "output_format".to_string(),
        Value::String("mp4".to_string()),
    );

    if let Some(crop) = params.optional_str("cropPartA").filter(|s| !s.is_empty()) {
        payload.insert("crop_part_a".to_string(), Value::String(crop.to_string()));
    }
    if let Some(crop) = params.optional_str("cropPartB").filter(|s| !s.is_empty()) {
        payload.insert("crop_part_b".to_string(), Value::String(crop.to_string()));
    }
    if let Some(filename) = params
        .optional_str("outputFilename")
        .filter(|s| !s.is_empty())
    {
        payload.insert(
            "output_filename".to_string(),
            Value::String(filename.to_string()),
        );
    }

    Ok(payload)
}
