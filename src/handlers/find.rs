use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::HelperError;
use crate::filter::{FilterPayload, MatchFilter};
use crate::matching::MatchResult;
use crate::{processes, resolver};

use super::to_value;

#[derive(Serialize)]
struct FindResponse {
    ok: bool,
    pids: Vec<u32>,
    matches: Vec<MatchResult>,
    ts: i64,
}

/// Enumerate the processes plausibly belonging to the filtered game,
/// ranked best first.
pub fn handle_find(payload: &FilterPayload) -> Result<Value, HelperError> {
    if !cfg!(windows) {
        return Ok(json!({
            "ok": true,
            "pids": [],
            "matches": [],
            "note": "windows-only finder",
        }));
    }

    let filter = MatchFilter::from_payload(payload);
    let outcome = resolver::find(&processes::snapshot(), &filter);

    Ok(to_value(&FindResponse {
        ok: true,
        pids: outcome.selected,
        matches: outcome.candidates,
        ts: Utc::now().timestamp_millis(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn degrades_off_windows() {
        let value = handle_find(&FilterPayload::default()).unwrap();
        assert_eq!(value["ok"], true);
        assert!(value["pids"].as_array().unwrap().is_empty());
        assert_eq!(value["note"], "windows-only finder");
    }

    #[cfg(windows)]
    #[test]
    fn empty_filter_finds_nothing() {
        let value = handle_find(&FilterPayload::default()).unwrap();
        assert_eq!(value["ok"], true);
        assert!(value["pids"].as_array().unwrap().is_empty());
        assert!(value["matches"].as_array().unwrap().is_empty());
    }
}
