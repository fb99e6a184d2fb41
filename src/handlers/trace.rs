use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::{Config, MIN_TRACE_INTERVAL_MS};
use crate::error::HelperError;
use crate::filter::{FilterPayload, MatchFilter};
use crate::trace::{run_trace, TraceSnapshot};
use crate::{processes, resolver};

use super::to_value;

#[derive(Serialize)]
struct TraceResponse {
    ok: bool,
    snapshots: Vec<TraceSnapshot>,
}

/// Poll the check resolution at an interval for a bounded duration and
/// return the whole liveness series.
pub fn handle_trace(payload: &FilterPayload, config: &Config) -> Result<Value, HelperError> {
    if !cfg!(windows) {
        return Ok(json!({
            "ok": true,
            "snapshots": [],
        }));
    }

    let filter = MatchFilter::from_payload(payload);
    let interval_ms = payload
        .interval_ms
        .unwrap_or(config.trace_interval_ms)
        .max(MIN_TRACE_INTERVAL_MS);
    let duration_ms = payload.duration_ms.unwrap_or(config.trace_duration_ms);

    let snapshots = run_trace(
        Duration::from_millis(interval_ms),
        Duration::from_millis(duration_ms),
        || {
            let outcome = resolver::check(&processes::snapshot(), &filter);
            (outcome.running, outcome.alive_pids)
        },
    );

    Ok(to_value(&TraceResponse {
        ok: true,
        snapshots,
    }))
}
