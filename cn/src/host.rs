//! Host identity and display-time collaborators.

use chrono::Local;

/// Hostname for alert bodies; falls back to `localhost` when the lookup
/// fails.
pub fn hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Current local time in the display format used by alert bodies:
/// `YYYY-MM-DD HH:MM:SS,mmm`.
pub fn asctime_now() -> String {
    let now = Local::now();
    format!(
        "{},{:03}",
        now.format("%Y-%m-%d %H:%M:%S"),
        now.timestamp_subsec_millis()
    )
}
