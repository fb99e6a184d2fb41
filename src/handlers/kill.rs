use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::{Config, CRITICAL_IMAGES, EXE_SUFFIX, KILL_DETAIL_CAP};
use crate::error::HelperError;
use crate::filter::{FilterPayload, MatchFilter};
use crate::resolver::{self, KillDetail};
use crate::processes;

use super::to_value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KillResponse {
    ok: bool,
    killed_pids: Vec<u32>,
    used_image: bool,
    details: Vec<KillDetail>,
}

/// Termination policy: by image name when the caller prefers it and the
/// image is safe to address that way, otherwise by the selected candidate
/// pid set, subject to the safety cap. Fire-and-forget either way;
/// confirming exits is a follow-up check call.
pub fn handle_kill(payload: &FilterPayload, config: &Config) -> Result<Value, HelperError> {
    if !cfg!(windows) {
        return Ok(json!({
            "ok": true,
            "killedPids": [],
            "usedImage": false,
        }));
    }

    let filter = MatchFilter::from_payload(payload);
    let snapshot = processes::snapshot();

    let mut killed_pids: Vec<u32> = Vec::new();
    let mut used_image = false;
    let mut details: Vec<KillDetail> = Vec::new();

    if filter.prefer_image {
        if let Some(image) = image_kill_target(&filter) {
            killed_pids = processes::stop_by_image(image, &snapshot);
            used_image = true;
        }
    }

    if !used_image {
        let mut selection = resolver::kill_select(
            &snapshot,
            &filter,
            config.kill_cap,
            std::process::id(),
        )?;
        for pid in &selection.pids {
            if processes::stop_process(*pid) {
                killed_pids.push(*pid);
            }
        }
        selection.details.truncate(KILL_DETAIL_CAP);
        details = selection.details;
    }

    Ok(to_value(&KillResponse {
        ok: true,
        killed_pids,
        used_image,
        details,
    }))
}

/// Image-based termination addresses every process sharing the image, so
/// it is gated harder: the image must look like a real executable and
/// must not be a critical system process.
fn image_kill_target(filter: &MatchFilter) -> Option<&str> {
    let image = filter.image_name.as_str();
    if image.is_empty() || !image.ends_with(EXE_SUFFIX) {
        return None;
    }
    if CRITICAL_IMAGES.contains(image) {
        warn!(image, "refusing image-based termination of critical image");
        return None;
    }
    Some(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_from(raw: &str) -> MatchFilter {
        MatchFilter::from_payload(&FilterPayload::parse(raw))
    }

    #[test]
    fn critical_image_is_never_an_image_target() {
        let filter = filter_from(r#"{"preferImage":true,"imageName":"explorer.exe"}"#);
        assert!(image_kill_target(&filter).is_none());
    }

    #[test]
    fn image_target_requires_exe_suffix() {
        let filter = filter_from(r#"{"preferImage":true,"imageName":"game"}"#);
        assert!(image_kill_target(&filter).is_none());
    }

    #[test]
    fn image_target_derives_from_executable_path() {
        let filter =
            filter_from(r#"{"preferImage":true,"executablePath":"C:\\Games\\Foo\\Foo.exe"}"#);
        assert_eq!(image_kill_target(&filter), Some("foo.exe"));
    }

    #[cfg(not(windows))]
    #[test]
    fn degrades_off_windows() {
        let payload = FilterPayload::parse(r#"{"preferImage":true,"imageName":"explorer.exe"}"#);
        let value = handle_kill(&payload, &Config::default()).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["usedImage"], false);
        assert!(value["killedPids"].as_array().unwrap().is_empty());
    }

    #[cfg(windows)]
    #[test]
    fn critical_image_preference_falls_back_without_image_kill() {
        // preferImage with a critical image: the image route is rejected
        // and the pid route finds no selectable candidate.
        let payload = FilterPayload::parse(r#"{"preferImage":true,"imageName":"explorer.exe"}"#);
        let value = handle_kill(&payload, &Config::default()).unwrap();
        assert_eq!(value["usedImage"], false);
        assert!(value["killedPids"].as_array().unwrap().is_empty());
    }
}
