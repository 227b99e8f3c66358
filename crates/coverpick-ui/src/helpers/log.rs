// crates/coverpick-ui/src/helpers/log.rs
//
// UI-side logging. A release build launched by double-click has no console
// (`windows_subsystem = "windows"`), so everything is appended to
// coverpick.log in the OS temp directory; debug builds also echo to stderr
// next to the worker threads' own output.

use std::io::Write;

/// Append one line to the log file. Write failures are ignored; this never
/// panics.
pub fn vlog(msg: &str) {
    #[cfg(debug_assertions)]
    eprintln!("{msg}");

    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("coverpick.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}

/// Formats like `eprintln!`, routes through `vlog`.
#[macro_export]
macro_rules! coverpick_log {
    ($($arg:tt)*) => {
        $crate::helpers::log::vlog(&format!($($arg)*))
    };
}
