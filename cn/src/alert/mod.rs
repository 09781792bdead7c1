//! Alert message composition.

/// Fixed subject line; a configured prefix is prepended in brackets.
pub const DEFAULT_SUBJECT: &str = "Supervisor Crash Notify";

/// A composed, human-readable alert. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

/// Renders the alert for an unexpected process exit.
///
/// Pure function of its inputs; the caller supplies host identity and the
/// display timestamp. The body lists all fields in fixed order as a
/// markdown bullet list.
pub fn compose(
    hostname: &str,
    processname: &str,
    pid: &str,
    from_state: &str,
    timestamp: &str,
    subject_prefix: Option<&str>,
) -> AlertMessage {
    let subject = match subject_prefix {
        Some(prefix) => format!("[{prefix}]{DEFAULT_SUBJECT}"),
        None => DEFAULT_SUBJECT.to_string(),
    };

    let body = format!(
        "Unexpected process exit detected.\n\
         - Host: {hostname}\n\
         - Process: {processname}\n\
         - PID: {pid}\n\
         - From state: {from_state}\n\
         - Time: {timestamp}"
    );

    AlertMessage { subject, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_contains_all_fields_in_order() {
        let alert = compose("db01", "web", "123", "RUNNING", "2026-08-07 10:11:12,345", None);

        let host = alert.body.find("Host: db01").unwrap();
        let process = alert.body.find("Process: web").unwrap();
        let pid = alert.body.find("PID: 123").unwrap();
        let state = alert.body.find("From state: RUNNING").unwrap();
        let time = alert.body.find("Time: 2026-08-07 10:11:12,345").unwrap();

        assert!(host < process && process < pid && pid < state && state < time);
    }

    #[test]
    fn test_subject_without_prefix() {
        let alert = compose("h", "p", "1", "RUNNING", "t", None);
        assert_eq!(alert.subject, "Supervisor Crash Notify");
    }

    #[test]
    fn test_subject_prefix_is_bracketed() {
        let alert = compose("h", "p", "1", "RUNNING", "t", Some("prod"));
        assert_eq!(alert.subject, "[prod]Supervisor Crash Notify");
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = compose("h", "p", "1", "RUNNING", "t", Some("x"));
        let b = compose("h", "p", "1", "RUNNING", "t", Some("x"));
        assert_eq!(a, b);
    }
}
