use serde::Serialize;

use crate::constants::{
    LAUNCHER_IMAGES, PENALTY_LAUNCHER_SHELL, SCORE_EXACT_PATH, SCORE_IMAGE_MATCH,
    SCORE_PARENT_MATCH, SCORE_TITLE_MATCH, SCORE_UNDER_INSTALL,
};
use crate::filter::MatchFilter;
use crate::processes::ProcessRecord;
use crate::utilities::{basename_stem, extract_cmd_exe, image_from_path, norm_path};

pub const REASON_EXACT_PATH: &str = "exact-executablePath";
pub const REASON_IMAGE_MATCH: &str = "image-name-match";
pub const REASON_UNDER_INSTALL: &str = "exec-under-installDir";
pub const REASON_TITLE_MATCH: &str = "title-match";
pub const REASON_PARENT_MATCH: &str = "parent-match";

/// Verdict for one process against one filter. Only the diagnostic fields
/// go over the wire; `strong`/`any` drive resolution internally.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub pid: u32,
    pub name: String,
    pub path: String,
    pub reasons: Vec<&'static str>,
    pub score: i32,
    #[serde(skip)]
    pub strong: bool,
    #[serde(skip)]
    pub any: bool,
}

/// Score a single process against normalized criteria. Pure function of
/// its inputs; an all-empty filter yields no match.
pub fn evaluate(process: &ProcessRecord, filter: &MatchFilter) -> MatchResult {
    // The snapshot's path field reads as empty for processes the caller
    // lacks privilege on; the command line often still names the binary.
    let reported = process.executable_path.trim();
    let path = if reported.is_empty() {
        norm_path(&extract_cmd_exe(&process.command_line))
    } else {
        norm_path(reported)
    };

    let mut name = process.name.trim().to_lowercase();
    if name.is_empty() && !path.is_empty() {
        name = image_from_path(&path);
    }
    let stem = if path.is_empty() {
        basename_stem(&name)
    } else {
        basename_stem(&path)
    };

    let exact_exec = !filter.executable_path.is_empty() && path == filter.executable_path;
    let image_match = !filter.image_name.is_empty() && name == filter.image_name;

    let title_match = if filter.title_tokens.is_empty() || stem.is_empty() {
        false
    } else {
        let found = filter
            .title_tokens
            .iter()
            .filter(|token| stem.contains(token.as_str()))
            .count();
        // Two distinct tokens in the stem, or the full concatenation for
        // single-word titles where two tokens are unsatisfiable.
        found >= 2 || filter.title_tokens.concat() == stem
    };

    let under_install = !path.is_empty()
        && (!filter.install_dir.is_empty() && path.starts_with(&filter.install_dir)
            || filter
                .install_dir_variants
                .iter()
                .any(|variant| path.starts_with(variant)));

    let parent_match = match (filter.parent_pid, process.parent_pid) {
        (Some(wanted), Some(actual)) => wanted == actual,
        _ => false,
    };

    let mut reasons = Vec::new();
    let mut score = 0;
    if exact_exec {
        reasons.push(REASON_EXACT_PATH);
        score += SCORE_EXACT_PATH;
    }
    if image_match {
        reasons.push(REASON_IMAGE_MATCH);
        score += SCORE_IMAGE_MATCH;
    }
    if under_install {
        reasons.push(REASON_UNDER_INSTALL);
        score += SCORE_UNDER_INSTALL;
    }
    if title_match {
        reasons.push(REASON_TITLE_MATCH);
        score += SCORE_TITLE_MATCH;
    }
    if parent_match {
        reasons.push(REASON_PARENT_MATCH);
        score += SCORE_PARENT_MATCH;
    }
    if LAUNCHER_IMAGES.contains(name.as_str()) {
        score += PENALTY_LAUNCHER_SHELL;
    }

    let strong = exact_exec || image_match || title_match;
    let any = strong || under_install;

    MatchResult {
        pid: process.pid,
        name,
        path,
        reasons,
        score,
        strong,
        any,
    }
}
