use sysinfo::{PidExt, ProcessExt, System, SystemExt};
use tracing::debug;

/// One process from a point-in-time snapshot. Path and command line read
/// as empty for processes the caller lacks privilege on.
#[derive(Debug, Clone, Default)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub executable_path: String,
    pub command_line: String,
    pub parent_pid: Option<u32>,
}

/// Fresh enumeration of the OS process table. Fetched once per operation
/// and never cached across operations; processes exit and restart between
/// calls.
pub fn snapshot() -> Vec<ProcessRecord> {
    let mut sys = System::new_all();
    sys.refresh_all();

    let mut records: Vec<ProcessRecord> = sys
        .processes()
        .iter()
        .map(|(pid, proc_)| ProcessRecord {
            pid: pid.as_u32(),
            name: proc_.name().to_string(),
            executable_path: proc_.exe().to_string_lossy().to_string(),
            command_line: proc_.cmd().join(" "),
            parent_pid: proc_.parent().map(|p| p.as_u32()),
        })
        .collect();
    records.sort_unstable_by_key(|record| record.pid);

    debug!(total = records.len(), "process snapshot taken");
    records
}

/// Forcefully terminate a single process. Fire-and-forget: a `true`
/// return means the terminate call was issued, not that the target
/// exited.
#[cfg(windows)]
pub fn stop_process(pid: u32) -> bool {
    use winapi::um::{
        handleapi::CloseHandle, processthreadsapi::OpenProcess,
        processthreadsapi::TerminateProcess, winnt::PROCESS_TERMINATE,
    };

    unsafe {
        let h_process = OpenProcess(PROCESS_TERMINATE, 0, pid);

        if h_process.is_null() {
            return false;
        }

        let success = TerminateProcess(h_process, 1);
        CloseHandle(h_process);

        success != 0
    }
}

#[cfg(not(windows))]
pub fn stop_process(_pid: u32) -> bool {
    false
}

/// Terminate every snapshot process sharing an image name. Returns the
/// pids a terminate call was issued for.
pub fn stop_by_image(image: &str, snapshot: &[ProcessRecord]) -> Vec<u32> {
    let wanted = image.trim().to_lowercase();
    let mut killed = Vec::new();
    for record in snapshot {
        if record.name.to_lowercase() == wanted && stop_process(record.pid) {
            killed.push(record.pid);
        }
    }
    killed
}

#[cfg(test)]
mod tests {
    use super::*;

    // Selection behavior only; stop_process is a stub off Windows, so no
    // live process is touched.
    #[cfg(not(windows))]
    #[test]
    fn stop_by_image_matches_case_insensitively_against_snapshot() {
        let snap = vec![
            ProcessRecord {
                pid: 10,
                name: "Foo.exe".to_string(),
                ..Default::default()
            },
            ProcessRecord {
                pid: 11,
                name: "bar.exe".to_string(),
                ..Default::default()
            },
        ];
        let killed = stop_by_image("FOO.EXE", &snap);
        // Every returned pid must have carried the requested image.
        assert!(killed.iter().all(|pid| *pid == 10));
    }

    #[test]
    fn snapshot_pids_are_unique_and_sorted() {
        let records = snapshot();
        for pair in records.windows(2) {
            assert!(pair[0].pid < pair[1].pid);
        }
    }
}
