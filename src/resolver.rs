use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{
    CRITICAL_IMAGES, IGNORE_IMAGES, IGNORE_PREFIXES, LAUNCHER_IMAGES, MAX_CANDIDATES,
    MIN_SELECT_SCORE,
};
use crate::error::HelperError;
use crate::filter::MatchFilter;
use crate::matching::{
    evaluate, MatchResult, REASON_EXACT_PATH, REASON_IMAGE_MATCH, REASON_TITLE_MATCH,
};
use crate::processes::ProcessRecord;

pub struct FindOutcome {
    /// Pids at or above the selection threshold, best first.
    pub selected: Vec<u32>,
    /// Ranked top candidates, kept as diagnostics even below threshold.
    pub candidates: Vec<MatchResult>,
    /// Snapshot size, for the caller's counters.
    pub total: usize,
}

/// Rank every plausible owner of the filtered game in one snapshot.
pub fn find(snapshot: &[ProcessRecord], filter: &MatchFilter) -> FindOutcome {
    let mut candidates: Vec<MatchResult> = Vec::new();
    for process in snapshot {
        let result = evaluate(process, filter);
        let hit = if filter.strict {
            result.strong
        } else {
            result.any
        };
        if !hit {
            continue;
        }
        if IGNORE_IMAGES.contains(result.name.as_str())
            || LAUNCHER_IMAGES.contains(result.name.as_str())
            || IGNORE_PREFIXES
                .iter()
                .any(|prefix| result.name.starts_with(prefix))
        {
            continue;
        }
        candidates.push(result);
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.pid.cmp(&b.pid)));
    candidates.truncate(MAX_CANDIDATES);

    let selected: Vec<u32> = candidates
        .iter()
        .filter(|candidate| candidate.score >= MIN_SELECT_SCORE)
        .map(|candidate| candidate.pid)
        .collect();

    debug!(
        total = snapshot.len(),
        candidates = candidates.len(),
        selected = selected.len(),
        "find resolution"
    );

    FindOutcome {
        selected,
        candidates,
        total: snapshot.len(),
    }
}

pub struct CheckOutcome {
    pub running: bool,
    pub alive_pids: Vec<u32>,
    pub matches: Vec<MatchResult>,
    pub total: usize,
}

/// Liveness resolution. With explicit pids, liveness is presence in the
/// snapshot; identity criteria, when present, must still hold so a pid
/// recycled by the OS for an unrelated process never reads as alive.
pub fn check(snapshot: &[ProcessRecord], filter: &MatchFilter) -> CheckOutcome {
    let diagnostics = find(snapshot, filter);

    let (running, alive_pids) = if !filter.pids.is_empty() {
        let by_pid: HashMap<u32, &ProcessRecord> =
            snapshot.iter().map(|record| (record.pid, record)).collect();
        let mut alive: Vec<u32> = Vec::new();
        for pid in &filter.pids {
            let Some(record) = by_pid.get(pid).copied() else {
                continue;
            };
            if filter.has_identity() {
                let result = evaluate(record, filter);
                let still_matches = if filter.strict {
                    result.strong
                } else {
                    result.any
                };
                if !still_matches {
                    continue;
                }
            }
            alive.push(*pid);
        }
        (!alive.is_empty(), alive)
    } else {
        // Untargeted probe: strong presence when identity criteria were
        // given; an all-empty filter can never report running.
        let running = snapshot.iter().any(|record| {
            let result = evaluate(record, filter);
            if filter.has_identity() {
                result.strong
            } else {
                result.any
            }
        });
        (running, Vec::new())
    };

    CheckOutcome {
        running,
        alive_pids,
        matches: diagnostics.candidates,
        total: snapshot.len(),
    }
}

pub const KILL_REASON_PROVIDED: &str = "provided-pid";
pub const KILL_REASON_CRITICAL: &str = "critical-skip";
pub const KILL_REASON_SELF: &str = "self-skip";

/// Per-process verdict rows surfaced in the kill report.
#[derive(Debug, Serialize)]
pub struct KillDetail {
    pub pid: u32,
    pub name: String,
    pub reason: &'static str,
    pub ok: bool,
}

#[derive(Debug)]
pub struct KillSelection {
    pub pids: Vec<u32>,
    pub details: Vec<KillDetail>,
}

/// Select kill candidates: snapshot-present members of the provided pid
/// set plus strong matches. Critical system images and the helper's own
/// pid are excluded under all circumstances; weak containment alone never
/// selects. Rejects the whole operation when the candidate count exceeds
/// the safety cap.
pub fn kill_select(
    snapshot: &[ProcessRecord],
    filter: &MatchFilter,
    cap: usize,
    self_pid: u32,
) -> Result<KillSelection, HelperError> {
    let mut pids: Vec<u32> = Vec::new();
    let mut details: Vec<KillDetail> = Vec::new();

    for process in snapshot {
        let result = evaluate(process, filter);
        let provided = filter.pids.binary_search(&process.pid).is_ok();
        if !provided && !result.strong {
            continue;
        }

        if CRITICAL_IMAGES.contains(result.name.as_str()) {
            warn!(
                pid = process.pid,
                name = %result.name,
                "refusing to select critical system process"
            );
            details.push(KillDetail {
                pid: process.pid,
                name: result.name,
                reason: KILL_REASON_CRITICAL,
                ok: false,
            });
            continue;
        }
        if process.pid == self_pid {
            details.push(KillDetail {
                pid: process.pid,
                name: result.name,
                reason: KILL_REASON_SELF,
                ok: false,
            });
            continue;
        }

        let reason = if result.strong {
            // Report the high-confidence signal that justified selection,
            // not incidental containment.
            [REASON_EXACT_PATH, REASON_IMAGE_MATCH, REASON_TITLE_MATCH]
                .into_iter()
                .find(|tag| result.reasons.contains(tag))
                .unwrap_or(KILL_REASON_PROVIDED)
        } else {
            KILL_REASON_PROVIDED
        };
        details.push(KillDetail {
            pid: process.pid,
            name: result.name,
            reason,
            ok: true,
        });
        pids.push(process.pid);
    }

    if pids.len() > cap {
        return Err(HelperError::TooManyPids {
            attempted: pids.len(),
        });
    }

    Ok(KillSelection { pids, details })
}
