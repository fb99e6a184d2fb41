use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::constants::{EXE_SUFFIX, STOPWORDS};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[a-z0-9]+").unwrap();
}

/// Canonical form for path comparison: forward slashes to backslashes,
/// trimmed, lower-cased. Empty input stays empty.
pub fn norm_path(path: &str) -> String {
    path.replace('/', "\\").trim().to_lowercase()
}

/// Basename of a backslash path, lower-cased. Tolerates forward slashes
/// in not-yet-normalized input.
pub fn image_from_path(path: &str) -> String {
    path.rsplit(['\\', '/'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Basename with the extension removed, lower-cased.
pub fn basename_stem(path: &str) -> String {
    let base = image_from_path(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => base[..dot].to_string(),
    }
}

/// Parse a leading executable path out of a raw command line: a leading
/// double-quoted token, else the first whitespace token when it ends in
/// the executable suffix. Empty string when neither form applies.
pub fn extract_cmd_exe(command_line: &str) -> String {
    let c = command_line.trim();
    if c.is_empty() {
        return String::new();
    }
    if let Some(rest) = c.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            if end > 0 {
                return rest[..end].to_string();
            }
        }
    }
    let token = c.split_whitespace().next().unwrap_or_default();
    if token.to_lowercase().ends_with(EXE_SUFFIX) {
        token.to_string()
    } else {
        String::new()
    }
}

/// Lower-cased alphanumeric runs of length >= 3 from a free-text title,
/// stopwords removed, de-duplicated in order of first appearance.
pub fn sanitize_tokens(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for token in TOKEN_RE.find_iter(&lowered) {
        let token = token.as_str();
        if token.len() < 3 || STOPWORDS.contains(token) {
            continue;
        }
        if !out.iter().any(|t| t == token) {
            out.push(token.to_string());
        }
    }
    out
}

/// Lenient pid parsing for caller-supplied JSON: integers, whole floats
/// and numeric strings are accepted, anything else is dropped.
pub fn coerce_pid(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    if let Some(f) = value.as_f64() {
        if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX) {
            return Some(f as u32);
        }
        return None;
    }
    if let Some(s) = value.as_str() {
        return s.trim().parse::<u32>().ok();
    }
    None
}
