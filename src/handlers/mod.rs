pub mod check;
pub mod find;
pub mod kill;
pub mod trace;

use serde::Serialize;
use serde_json::{json, Value};

pub(crate) fn to_value<T: Serialize>(data: &T) -> Value {
    serde_json::to_value(data).unwrap_or_else(|_| {
        json!({
            "ok": false,
            "error": "response serialization failed",
        })
    })
}
