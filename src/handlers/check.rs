use serde::Serialize;
use serde_json::{json, Value};

use crate::error::HelperError;
use crate::filter::{FilterPayload, MatchFilter};
use crate::matching::MatchResult;
use crate::{processes, resolver};

use super::to_value;

#[derive(Serialize)]
struct Counts {
    total: usize,
    matches: usize,
    alive: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckResponse {
    ok: bool,
    running: bool,
    alive_pids: Vec<u32>,
    matches: Vec<MatchResult>,
    counts: Counts,
}

/// Liveness check for previously observed pids and/or identity criteria.
pub fn handle_check(payload: &FilterPayload) -> Result<Value, HelperError> {
    if !cfg!(windows) {
        return Ok(json!({
            "ok": true,
            "running": false,
            "alivePids": [],
            "matches": [],
        }));
    }

    let filter = MatchFilter::from_payload(payload);
    let outcome = resolver::check(&processes::snapshot(), &filter);

    let counts = Counts {
        total: outcome.total,
        matches: outcome.matches.len(),
        alive: outcome.alive_pids.len(),
    };
    Ok(to_value(&CheckResponse {
        ok: true,
        running: outcome.running,
        alive_pids: outcome.alive_pids,
        matches: outcome.matches,
        counts,
    }))
}
