use serde::Deserialize;
use serde_json::Value;

use crate::constants::{APPS_ROOT_SEGMENT, LIBRARY_ROOT_SEGMENT};
use crate::utilities::{coerce_pid, image_from_path, norm_path, sanitize_tokens};

/// Raw filter payload as supplied by the launcher. Every field is
/// optional; unknown keys are ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterPayload {
    pub executable_path: Option<String>,
    pub image_name: Option<String>,
    pub install_dir: Option<String>,
    pub title: Option<String>,
    pub parent_pid: Option<Value>,
    pub pids: Option<Vec<Value>>,
    pub prefer_image: bool,
    pub strict: bool,
    pub interval_ms: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl FilterPayload {
    /// Parse a payload string. Malformed JSON degrades to an empty
    /// payload; it never aborts the operation.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// Comparison-ready match criteria, normalized once per operation.
#[derive(Debug, Default, Clone)]
pub struct MatchFilter {
    pub executable_path: String,
    pub image_name: String,
    pub install_dir: String,
    pub install_dir_variants: Vec<String>,
    pub title_tokens: Vec<String>,
    pub parent_pid: Option<u32>,
    pub pids: Vec<u32>,
    pub prefer_image: bool,
    pub strict: bool,
}

impl MatchFilter {
    pub fn from_payload(payload: &FilterPayload) -> Self {
        let executable_path = norm_path(payload.executable_path.as_deref().unwrap_or_default());

        let mut image_name = payload
            .image_name
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if image_name.is_empty() && !executable_path.is_empty() {
            image_name = image_from_path(&executable_path);
        }

        // Trailing separator enforced so c:\games\foo never prefix-matches
        // c:\games\foobar.
        let mut install_dir = norm_path(payload.install_dir.as_deref().unwrap_or_default());
        install_dir = install_dir.trim_end_matches('\\').to_string();
        if !install_dir.is_empty() {
            install_dir.push('\\');
        }

        let install_dir_variants = library_variants(&install_dir);

        let title_tokens = sanitize_tokens(payload.title.as_deref().unwrap_or_default());

        let parent_pid = payload.parent_pid.as_ref().and_then(coerce_pid);

        let mut pids: Vec<u32> = payload
            .pids
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(coerce_pid)
            .collect();
        pids.sort_unstable();
        pids.dedup();

        MatchFilter {
            executable_path,
            image_name,
            install_dir,
            install_dir_variants,
            title_tokens,
            parent_pid,
            pids,
            prefer_image: payload.prefer_image,
            strict: payload.strict,
        }
    }

    /// True when the filter carries at least one identity criterion, as
    /// opposed to only a pid list. An all-empty filter matches nothing.
    pub fn has_identity(&self) -> bool {
        !self.executable_path.is_empty()
            || !self.image_name.is_empty()
            || !self.install_dir.is_empty()
            || !self.title_tokens.is_empty()
    }
}

/// Alternate install roots for installs referenced through a library root
/// rather than the per-title apps directory.
fn library_variants(install_dir: &str) -> Vec<String> {
    let mut variants = Vec::new();
    if let Some(pos) = install_dir.find(LIBRARY_ROOT_SEGMENT) {
        if !install_dir.contains("\\steamapps\\") {
            let split = pos + LIBRARY_ROOT_SEGMENT.len();
            let (before, after) = install_dir.split_at(split);
            variants.push(format!("{}{}{}", before, APPS_ROOT_SEGMENT, after));
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter_from(raw: &str) -> MatchFilter {
        MatchFilter::from_payload(&FilterPayload::parse(raw))
    }

    #[test]
    fn empty_payload_has_no_identity() {
        let filter = filter_from("{}");
        assert!(!filter.has_identity());
        assert!(filter.pids.is_empty());
    }

    #[test]
    fn malformed_payload_degrades_to_empty() {
        let filter = filter_from("not json at all");
        assert!(!filter.has_identity());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let filter = filter_from(r#"{"imageName":"foo.exe","banana":1}"#);
        assert_eq!(filter.image_name, "foo.exe");
    }

    #[test]
    fn image_name_derived_from_executable_path() {
        let filter = filter_from(r#"{"executablePath":"C:/Games/Foo/Foo.exe"}"#);
        assert_eq!(filter.executable_path, "c:\\games\\foo\\foo.exe");
        assert_eq!(filter.image_name, "foo.exe");
    }

    #[test]
    fn explicit_image_name_wins() {
        let filter = filter_from(
            r#"{"executablePath":"C:\\Games\\Foo\\foo.exe","imageName":"Bar.EXE"}"#,
        );
        assert_eq!(filter.image_name, "bar.exe");
    }

    #[test]
    fn install_dir_gets_trailing_separator() {
        let filter = filter_from(r#"{"installDir":"C:\\Games\\Foo"}"#);
        assert_eq!(filter.install_dir, "c:\\games\\foo\\");
    }

    #[test]
    fn library_variant_inserted_after_library_root() {
        let filter = filter_from(r#"{"installDir":"D:\\SteamLibrary\\Elden Ring"}"#);
        assert_eq!(
            filter.install_dir_variants,
            vec!["d:\\steamlibrary\\steamapps\\elden ring\\"]
        );
    }

    #[test]
    fn no_variant_when_apps_segment_already_present() {
        let filter =
            filter_from(r#"{"installDir":"D:\\SteamLibrary\\steamapps\\common\\Elden Ring"}"#);
        assert!(filter.install_dir_variants.is_empty());
    }

    #[test]
    fn no_variant_without_library_root() {
        let filter = filter_from(r#"{"installDir":"C:\\Games\\Foo"}"#);
        assert!(filter.install_dir_variants.is_empty());
    }

    #[test]
    fn pid_list_drops_junk_and_dedups() {
        let payload = FilterPayload {
            pids: Some(vec![
                json!(100),
                json!("200"),
                json!("zap"),
                json!(-5),
                json!(100),
            ]),
            ..Default::default()
        };
        let filter = MatchFilter::from_payload(&payload);
        assert_eq!(filter.pids, vec![100, 200]);
    }

    #[test]
    fn parent_pid_coerced_from_string() {
        let filter = filter_from(r#"{"parentPid":"4321"}"#);
        assert_eq!(filter.parent_pid, Some(4321));
    }

    #[test]
    fn title_is_tokenized() {
        let filter = filter_from(r#"{"title":"The Witness"}"#);
        assert_eq!(filter.title_tokens, vec!["witness"]);
    }
}
