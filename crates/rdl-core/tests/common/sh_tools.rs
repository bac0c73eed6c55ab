//! Stand-ins for the external downloader, implemented as `sh -c` scripts.
//!
//! The script receives the tool's arguments as `$1..`, exactly as the real
//! executable would.

use rdl_core::config::ToolsConfig;

/// Probe script: prints a duration chosen by the `v=` id in the URL.
pub const PROBE_SCRIPT: &str = r#"
case "$1" in
  *v=long*) echo 1:30:00 ;;
  *v=mid*) echo 12:00 ;;
  *v=short*) echo 04:59 ;;
  *v=garbled*) echo ab:30 ;;
  *) echo "ERROR: Video unavailable" >&2; exit 1 ;;
esac
"#;

/// Fetch script: `-o <dir> <url>` writes `<dir>/<id>` so tests can see what was fetched.
pub const FETCH_SCRIPT: &str = r#"
id="${3##*v=}"
echo "$3" >> "$2/$id"
"#;

pub fn tools() -> ToolsConfig {
    let sh_args = |script: &str| vec!["-c".to_string(), script.to_string(), "sh".to_string()];
    ToolsConfig {
        program: "sh".to_string(),
        probe_args: sh_args(PROBE_SCRIPT),
        fetch_args: sh_args(FETCH_SCRIPT),
        probe_timeout_secs: Some(10),
        fetch_timeout_secs: Some(10),
    }
}
