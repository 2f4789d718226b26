use std::any::type_name;
use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::{EffError, ErrorInfo};

fn serde_error<T: ?Sized>(code: &str, err: serde_json::Error) -> EffError {
    EffError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("type", type_name::<T>()),
    )
}

/// Rebuilds every object with its keys sorted.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<_, _>>())
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

fn to_canonical_value<T: Serialize>(value: &T) -> Result<Value, EffError> {
    serde_json::to_value(value)
        .map(canonicalize)
        .map_err(|err| serde_error::<T>("json-serialize", err))
}

/// Compact JSON with sorted keys; the input of every report and plan hash.
///
/// Non-finite floats (an undefined p-value, say) are written as `null`.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, EffError> {
    let canonical = to_canonical_value(value)?;
    serde_json::to_vec(&canonical).map_err(|err| serde_error::<T>("json-write", err))
}

/// Indented form of [`to_canonical_json_bytes`] for the report file.
pub fn to_canonical_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, EffError> {
    let canonical = to_canonical_value(value)?;
    serde_json::to_vec_pretty(&canonical).map_err(|err| serde_error::<T>("json-write", err))
}

/// Decodes JSON, naming the target type in the error context.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, EffError> {
    serde_json::from_slice(data).map_err(|err| serde_error::<T>("json-deserialize", err))
}
