use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

/// One liveness observation in a trace series.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSnapshot {
    pub ts: i64,
    pub running: bool,
    pub alive_pids: Vec<u32>,
}

/// Poll liveness at a fixed interval until the deadline elapses, blocking
/// the calling thread. At least one poll always runs. The series is never
/// reduced; interpreting transitions (running -> not running) is the
/// caller's job.
pub fn run_trace(
    interval: Duration,
    duration: Duration,
    mut poll: impl FnMut() -> (bool, Vec<u32>),
) -> Vec<TraceSnapshot> {
    let deadline = Instant::now() + duration;
    let mut snapshots = Vec::new();

    loop {
        let (running, alive_pids) = poll();
        snapshots.push(TraceSnapshot {
            ts: Utc::now().timestamp_millis(),
            running,
            alive_pids,
        });
        debug!(polls = snapshots.len(), running, "trace poll");

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(interval.min(deadline - now));
    }

    snapshots
}
