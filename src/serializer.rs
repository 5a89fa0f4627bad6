//! Record <-> transport mapping.
//!
//! Encoding emits an ordered field map restricted to an allow-list. Decoding coerces loosely typed
//! input (JSON bodies, form strings) into the stored representation and reports problems per field.

use crate::auth::hash_password;
use crate::config::{EntityDescriptor, FieldKind, FieldSpec, Record, ID_FIELD};
use crate::error::FieldErrors;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";

/// How missing fields are treated when decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Required fields must be present; defaults fill the rest.
    Create,
    /// Required fields must be present; absent optional fields keep their stored value.
    Replace,
    /// Only the fields present are decoded.
    Partial,
}

/// Encode `record` as an ordered map of the allow-listed, readable fields.
/// File references become `media_url + path`; choice fields keep their stored code.
pub fn serialize(entity: &EntityDescriptor, record: &Record, fields: &[&str], media_url: &str) -> Record {
    let mut out = Map::with_capacity(fields.len());
    for &name in fields {
        let value = record.get(name).cloned().unwrap_or(Value::Null);
        if name == ID_FIELD {
            out.insert(name.to_string(), value);
            continue;
        }
        let Some(spec) = entity.field(name) else { continue };
        if !spec.is_readable() {
            continue;
        }
        let value = match (&spec.kind, value) {
            (FieldKind::File { .. }, Value::String(path)) if !path.is_empty() => {
                Value::String(file_url(media_url, &path))
            }
            (FieldKind::File { .. }, _) => Value::Null,
            (_, v) => v,
        };
        out.insert(name.to_string(), value);
    }
    out
}

/// Encode with the entity's default allow-list.
pub fn serialize_default(entity: &EntityDescriptor, record: &Record, media_url: &str) -> Record {
    serialize(entity, record, &entity.api_fields, media_url)
}

/// Decode input into stored field values. Unknown and read-only keys are ignored.
pub fn deserialize(
    entity: &EntityDescriptor,
    input: &Map<String, Value>,
    mode: Mode,
    media_url: &str,
) -> Result<Record, FieldErrors> {
    let mut out = Record::new();
    let mut errors = FieldErrors::new();
    for spec in &entity.fields {
        if !spec.is_writable() {
            continue;
        }
        match input.get(spec.name) {
            Some(raw) => match decode_field(spec, raw, media_url) {
                Ok(v) => {
                    out.insert(spec.name.to_string(), v);
                }
                Err(message) => errors.add(spec.name, message),
            },
            None => {
                if spec.required && mode != Mode::Partial {
                    errors.add(spec.name, REQUIRED);
                } else if mode == Mode::Create {
                    out.insert(spec.name.to_string(), spec.default.clone().unwrap_or(Value::Null));
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

/// Decode string form fields: each value is offered to [`deserialize`] as a JSON string.
pub fn form_to_input<'a>(fields: impl IntoIterator<Item = (&'a String, &'a String)>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Coerce a query-string value to the stored type of `field`; `None` for unknown fields.
pub fn query_value(entity: &EntityDescriptor, field: &str, raw: &str) -> Option<Value> {
    if field == ID_FIELD {
        return Some(raw.trim().parse::<i64>().map(Value::from).unwrap_or_else(|_| raw.into()));
    }
    let spec = entity.field(field)?;
    if !spec.is_readable() {
        return None;
    }
    Some(decode_field(spec, &Value::String(raw.to_string()), "").unwrap_or_else(|_| raw.into()))
}

fn file_url(media_url: &str, path: &str) -> String {
    format!("{}/{}", media_url.trim_end_matches('/'), path)
}

/// A relative path inside the media root under `upload_to`: no scheme, no leading slash,
/// no `.`/`..` segments.
fn is_stored_path(path: &str, upload_to: &str) -> bool {
    let dir = format!("{}/", upload_to.trim_matches('/'));
    let Some(rest) = path.strip_prefix(dir.as_str()) else {
        return false;
    };
    !rest.is_empty()
        && !path.contains(':')
        && !path.contains('\\')
        && path.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

fn decode_field(spec: &FieldSpec, raw: &Value, media_url: &str) -> Result<Value, String> {
    if raw.is_null() || is_blank_form_value(spec, raw) {
        return if spec.nullable {
            Ok(Value::Null)
        } else if raw.is_null() {
            Err(NOT_NULL.to_string())
        } else {
            Err(REQUIRED.to_string())
        };
    }
    match &spec.kind {
        FieldKind::Integer | FieldKind::PositiveInteger => {
            as_integer(raw).map(Value::from).ok_or_else(|| "A valid integer is required.".to_string())
        }
        FieldKind::ForeignKey { .. } => as_integer(raw)
            .map(Value::from)
            .ok_or_else(|| format!("Incorrect type. Expected pk value, received {}.", type_name(raw))),
        FieldKind::Text => match raw {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err("Not a valid string.".to_string()),
        },
        FieldKind::Bool => as_bool(raw).map(Value::Bool).ok_or_else(|| "Must be a valid boolean.".to_string()),
        FieldKind::DateTime => raw
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|d| Value::String(d.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Micros, true)))
            .ok_or_else(|| "Datetime has wrong format. Use RFC 3339.".to_string()),
        FieldKind::Date => raw
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| "Date has wrong format. Use YYYY-MM-DD.".to_string()),
        FieldKind::Choice(choices) => {
            let code = raw.as_str().unwrap_or_default();
            if choices.iter().any(|c| c.code == code) {
                Ok(Value::String(code.to_string()))
            } else {
                Err(format!("\"{}\" is not a valid choice.", value_text(raw)))
            }
        }
        FieldKind::File { upload_to } => {
            let s = raw.as_str().ok_or_else(|| "The submitted data was not a file.".to_string())?;
            let prefix = media_url.trim_end_matches('/');
            let path = if !prefix.is_empty() && s.starts_with(prefix) {
                s[prefix.len()..].trim_start_matches('/')
            } else {
                s
            };
            if !is_stored_path(path, upload_to) {
                return Err(format!("Invalid file path. Expected a file under \"{}/\".", upload_to.trim_matches('/')));
            }
            Ok(Value::String(path.to_string()))
        }
        FieldKind::ManyToMany { .. } => {
            let items = raw.as_array().ok_or_else(|| {
                format!("Expected a list of items but got type \"{}\".", type_name(raw))
            })?;
            items
                .iter()
                .map(|v| as_integer(v).map(Value::from))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
                .ok_or_else(|| "Incorrect type. Expected a list of pk values.".to_string())
        }
        FieldKind::Password => {
            let s = raw.as_str().ok_or_else(|| "Not a valid string.".to_string())?;
            hash_password(s).map(Value::String).map_err(|e| e.to_string())
        }
    }
}

/// Empty form strings mean "no value" for every kind except text.
fn is_blank_form_value(spec: &FieldSpec, raw: &Value) -> bool {
    matches!(raw, Value::String(s) if s.trim().is_empty())
        && !matches!(spec.kind, FieldKind::Text | FieldKind::Password)
}

fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Some(true),
            "false" | "0" | "off" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
