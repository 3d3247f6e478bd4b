//! Commit timestamps for a line range, via `git blame --line-porcelain`.

use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use tracing::debug;

/// `<sha> <orig-line> <final-line>[ <group-size>]`
static COMMIT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9a-f]{40}) \d+ \d+").expect("commit header regex"));

static COMMITTER_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^committer-time (\d+)$").expect("committer-time regex"));

/// Whether a `git` binary can be executed.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Distinct commit times touching lines `start..=end` of `file`.
///
/// `None` when git fails (untracked file, not a repository, bad range).
pub fn blame_timestamps(file: &Path, start: u32, end: u32) -> Option<Vec<DateTime<Utc>>> {
    let start = start.max(1);
    let end = end.max(start);

    let (dir, target) = match (file.is_absolute(), file.parent(), file.file_name()) {
        (true, Some(parent), Some(name)) => (Some(parent), Path::new(name)),
        _ => (None, file),
    };

    let mut cmd = Command::new("git");
    cmd.args(["blame", "--line-porcelain", "-L"])
        .arg(format!("{start},{end}"))
        .arg("--")
        .arg(target)
        .stdin(Stdio::null())
        .stderr(Stdio::piped());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = match cmd.output() {
        Ok(o) => o,
        Err(e) => {
            debug!(file = %file.display(), error = %e, "git blame could not run");
            return None;
        }
    };
    if !output.status.success() {
        debug!(
            file = %file.display(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "git blame failed"
        );
        return None;
    }

    let times = parse_line_porcelain(&String::from_utf8_lossy(&output.stdout));
    if times.is_empty() {
        None
    } else {
        Some(times)
    }
}

/// Parse `--line-porcelain` output into one timestamp per distinct commit,
/// newest first.
pub fn parse_line_porcelain(output: &str) -> Vec<DateTime<Utc>> {
    let mut by_commit: HashMap<String, i64> = HashMap::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        if let Some(caps) = COMMIT_HEADER.captures(line) {
            current = Some(caps[1].to_string());
            continue;
        }
        if let (Some(sha), Some(caps)) = (&current, COMMITTER_TIME.captures(line)) {
            if let Ok(secs) = caps[1].parse::<i64>() {
                by_commit.entry(sha.clone()).or_insert(secs);
            }
        }
    }

    let mut times: Vec<DateTime<Utc>> = by_commit
        .into_values()
        .filter_map(|secs| Utc.timestamp_opt(secs, 0).single())
        .collect();
    times.sort_by(|a, b| b.cmp(a));
    times
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1111111111111111111111111111111111111111 1 1 2
author Ada
author-time 1700000000
committer Ada
committer-time 1700000100
summary first
filename src/lib.rs
\tfn a() {}
1111111111111111111111111111111111111111 2 2
author Ada
author-time 1700000000
committer Ada
committer-time 1700000100
summary first
filename src/lib.rs
\t}
2222222222222222222222222222222222222222 3 3 1
author Bob
committer Bob
committer-time 1710000000
summary second
filename src/lib.rs
\tfn b() {}
";

    #[test]
    fn dedups_per_commit_newest_first() {
        let times = parse_line_porcelain(SAMPLE);
        assert_eq!(times.len(), 2);
        assert_eq!(times[0].timestamp(), 1_710_000_000);
        assert_eq!(times[1].timestamp(), 1_700_000_100);
    }

    #[test]
    fn content_lines_are_not_headers() {
        let tricky = "\
3333333333333333333333333333333333333333 1 1 1
committer-time 1600000000
\tcommitter-time 42
";
        let times = parse_line_porcelain(tricky);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].timestamp(), 1_600_000_000);
    }

    #[test]
    fn patterns_compile() {
        assert!(COMMIT_HEADER.is_match(&format!("{} 1 1", "a".repeat(40))));
        assert!(COMMITTER_TIME.is_match("committer-time 1700000000"));
    }

    #[test]
    fn garbage_yields_nothing() {
        assert!(parse_line_porcelain("not porcelain at all").is_empty());
    }

    #[test]
    fn untracked_file_has_no_history() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("loose.rs");
        std::fs::write(&file, "fn main() {}\n").unwrap();
        assert!(blame_timestamps(&file, 1, 1).is_none());
    }
}
