use std::collections::HashSet;

use lazy_static::lazy_static;
use serde::Deserialize;

/// Optional config.json next to the executable. Missing or malformed
/// fields fall back to the defaults below.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub kill_cap: usize,
    pub trace_interval_ms: u64,
    pub trace_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kill_cap: DEFAULT_KILL_CAP,
            trace_interval_ms: DEFAULT_TRACE_INTERVAL_MS,
            trace_duration_ms: DEFAULT_TRACE_DURATION_MS,
        }
    }
}

pub const CONFIG_NAME: &str = "config.json";

// Scoring weights. Exact path is unforgeable; title tokens and parent
// linkage are corroborating-only.
pub const SCORE_EXACT_PATH: i32 = 100;
pub const SCORE_IMAGE_MATCH: i32 = 80;
pub const SCORE_UNDER_INSTALL: i32 = 50;
pub const SCORE_TITLE_MATCH: i32 = 20;
pub const SCORE_PARENT_MATCH: i32 = 30;
pub const PENALTY_LAUNCHER_SHELL: i32 = -40;

pub const MAX_CANDIDATES: usize = 12;
pub const MIN_SELECT_SCORE: i32 = 10;
pub const DEFAULT_KILL_CAP: usize = 8;
pub const KILL_DETAIL_CAP: usize = 10;

pub const DEFAULT_TRACE_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_TRACE_DURATION_MS: u64 = 30000;
pub const MIN_TRACE_INTERVAL_MS: u64 = 250;

pub const EXE_SUFFIX: &str = ".exe";

// A library root configured at e.g. D:\SteamLibrary\ may hold its titles
// under D:\SteamLibrary\steamapps\common\. The normalizer derives the
// second form when only the first was given.
pub const LIBRARY_ROOT_SEGMENT: &str = "\\steamlibrary\\";
pub const APPS_ROOT_SEGMENT: &str = "steamapps\\";

lazy_static! {
    /// Front-end processes of game distribution platforms. Frequently
    /// running alongside a game but never the game itself.
    pub static ref LAUNCHER_IMAGES: HashSet<&'static str> = HashSet::from([
        "steam.exe",
        "steamwebhelper.exe",
        "epicgameslauncher.exe",
        "epicwebhelper.exe",
        "eaclauncher.exe",
        "easyeanticheat_launcher.exe",
        "easyeanticheat.exe",
    ]);

    /// Shell interpreters, script hosts and crash reporters that show up
    /// under game install trees but are never candidates.
    pub static ref IGNORE_IMAGES: HashSet<&'static str> = HashSet::from([
        "python.exe",
        "python3.exe",
        "python3.11.exe",
        "python3.12.exe",
        "python3.13.exe",
        "py.exe",
        "cmd.exe",
        "conhost.exe",
        "powershell.exe",
        "pwsh.exe",
        "wscript.exe",
        "cscript.exe",
        "reg.exe",
        "node.exe",
        "electron.exe",
        "werfault.exe",
        "crashreportclient.exe",
        "steamwebhelper.exe",
    ]);

    /// Terminating any of these can destabilize the OS. Excluded from kill
    /// candidates under all circumstances.
    pub static ref CRITICAL_IMAGES: HashSet<&'static str> = HashSet::from([
        "explorer.exe",
        "csrss.exe",
        "wininit.exe",
        "winlogon.exe",
        "services.exe",
        "lsass.exe",
        "dwm.exe",
        "smss.exe",
        "svchost.exe",
        "fontdrvhost.exe",
        "system",
        "registry",
    ]);

    pub static ref STOPWORDS: HashSet<&'static str> =
        HashSet::from(["a", "an", "the", "of", "and", "or"]);
}

/// Engine crash handlers ship with per-architecture suffixes, so they are
/// matched by prefix instead of exact name.
pub const IGNORE_PREFIXES: &[&str] = &["unitycrashhandler"];
