use serde_json::{json, Value};
use thiserror::Error;

/// Structured failures surfaced over the JSON boundary. Nothing in the
/// pipeline panics past this point; `main` renders the variant and exits
/// non-zero.
#[derive(Debug, Error)]
pub enum HelperError {
    #[error("unknown_action")]
    UnknownAction,

    /// The kill candidate set exceeded the safety cap. The operation is
    /// rejected whole; a truncated kill could hit the wrong subset.
    #[error("too_many_pids")]
    TooManyPids { attempted: usize },
}

impl HelperError {
    pub fn to_json(&self) -> Value {
        match self {
            HelperError::UnknownAction => json!({
                "ok": false,
                "error": "unknown_action",
                "hint": "use find|check|kill|trace",
            }),
            HelperError::TooManyPids { attempted } => json!({
                "ok": false,
                "error": "too_many_pids",
                "capped": attempted,
            }),
        }
    }
}
