//! Normalization of collection response envelopes.
//!
//! Collection endpoints return one of:
//! - a bare JSON array (unpaginated);
//! - `{"results": [...], "count": N}`;
//! - `{"data": [...], "count": N}`.

use common::pagination::{self, Page};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracerr::Traced;

use crate::Error;

/// Normalizes the provided collection `payload` into a [`Page`] requested
/// with the provided `page` number and `size`.
///
/// A missing `count` is substituted with the number of returned items.
///
/// # Errors
///
/// With [`Error::UnexpectedShape`] if the `payload` matches no envelope, or
/// any of its items fails to deserialize.
pub fn normalize<T: DeserializeOwned>(
    payload: Value,
    page: pagination::Number,
    size: pagination::Size,
) -> Result<Page<T>, Traced<Error>> {
    let (items, count) = match payload {
        Value::Array(items) => {
            return items_of(items).map(Page::unpaginated);
        }
        Value::Object(object) => unwrap(object)?,
        v @ (Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)) => {
            return Err(tracerr::new!(Error::UnexpectedShape(format!(
                "expected a collection, got `{v}`",
            ))));
        }
    };

    let items = items_of::<T>(items)?;
    let total_count = count.unwrap_or(items.len() as u64);
    Ok(Page::paginated(items, total_count, page, size))
}

/// Unwraps items and their total count out of an envelope `object`.
fn unwrap(
    mut object: Map<String, Value>,
) -> Result<(Vec<Value>, Option<u64>), Traced<Error>> {
    let count = object.get("count").and_then(Value::as_u64);
    for key in ["results", "data"] {
        if let Some(Value::Array(items)) = object.remove(key) {
            return Ok((items, count));
        }
    }
    let keys = object.keys().map(String::as_str).collect::<Vec<_>>();
    Err(tracerr::new!(Error::UnexpectedShape(format!(
        "expected `results` or `data` array, got keys: [{}]",
        keys.join(", "),
    ))))
}

/// Deserializes the provided raw `items`.
fn items_of<T: DeserializeOwned>(
    items: Vec<Value>,
) -> Result<Vec<T>, Traced<Error>> {
    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| {
            tracerr::new!(Error::UnexpectedShape(format!(
                "malformed collection item: {e}",
            )))
        })
}
