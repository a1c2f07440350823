//! Incremental reducer for the launch activity log.
//!
//! Each poll of the tracking endpoint yields a full snapshot; the
//! reducer emits only the lines not yet seen, keyed by position in the
//! entry list, and the terminal line exactly once. Applying the same
//! snapshot twice is a no-op.

use xhub_api::types::{ProgressStatus, TrackingData};

/// Rendering class for one progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl From<ProgressStatus> for Severity {
    fn from(status: ProgressStatus) -> Self {
        match status {
            ProgressStatus::Waiting | ProgressStatus::InProgress => Self::Info,
            ProgressStatus::Warning => Self::Warning,
            ProgressStatus::Failed => Self::Error,
            ProgressStatus::Completed => Self::Success,
        }
    }
}

/// One line ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLine {
    pub severity: Severity,
    pub text: String,
    /// Server path extracted from a successful final message.
    pub link: Option<String>,
}

/// Tracks how much of the activity log has already been emitted.
#[derive(Debug, Default)]
pub struct ProgressState {
    next_idx: usize,
    finished: Option<bool>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a terminal snapshot has been applied.
    pub fn finished(&self) -> bool {
        self.finished.is_some()
    }

    /// The terminal outcome, once known.
    pub fn succeeded(&self) -> Option<bool> {
        self.finished
    }

    /// Fold in one snapshot, returning the lines that are new since the
    /// previous application.
    pub fn apply(&mut self, data: &TrackingData) -> Result<Vec<ProgressLine>, serde_json::Error> {
        let log = data.log()?;
        let mut lines = Vec::new();

        for entry in log.entry_list.iter().skip(self.next_idx) {
            let message = entry.message.as_deref().unwrap_or_default();
            lines.push(ProgressLine {
                severity: entry.status.into(),
                text: capitalize(message),
                link: None,
            });
        }
        self.next_idx = log.entry_list.len();

        if let (None, Some(succeeded)) = (self.finished, data.succeeded) {
            self.finished = Some(succeeded);
            let message = data.final_message.as_deref().unwrap_or_default();
            lines.push(final_line(message, succeeded));
        }

        Ok(lines)
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// On success the trailing `/…` path in the final message is the server
/// URL; surface it as a link.
fn final_line(message: &str, succeeded: bool) -> ProgressLine {
    if succeeded {
        let link = message.find('/').map(|at| message[at..].to_owned());
        ProgressLine {
            severity: Severity::Success,
            text: message.to_owned(),
            link,
        }
    } else {
        ProgressLine {
            severity: Severity::Error,
            text: message.to_owned(),
            link: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, &str, i64)], succeeded: Option<bool>, final_message: Option<&str>) -> TrackingData {
        let entry_list: Vec<serde_json::Value> = entries
            .iter()
            .map(|(status, message, time)| {
                serde_json::json!({"status": status, "message": message, "eventTime": time})
            })
            .collect();
        TrackingData {
            key: Some("k".to_owned()),
            succeeded,
            payload: Some(serde_json::json!({ "entryList": entry_list }).to_string()),
            final_message: final_message.map(str::to_owned),
        }
    }

    #[test]
    fn emits_only_unseen_entries() {
        let mut state = ProgressState::new();

        let first = snapshot(&[("InProgress", "connecting to hub", 1)], None, None);
        let lines = state.apply(&first).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Connecting to hub");
        assert_eq!(lines[0].severity, Severity::Info);

        let second = snapshot(
            &[
                ("InProgress", "connecting to hub", 1),
                ("Warning", "slow response", 2),
            ],
            None,
            None,
        );
        let lines = state.apply(&second).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].severity, Severity::Warning);
    }

    #[test]
    fn reapplying_a_snapshot_is_a_noop() {
        let mut state = ProgressState::new();
        let snap = snapshot(&[("Waiting", "queued", 1)], None, None);

        assert_eq!(state.apply(&snap).unwrap().len(), 1);
        assert!(state.apply(&snap).unwrap().is_empty());
    }

    #[test]
    fn success_appends_final_line_with_link_once() {
        let mut state = ProgressState::new();
        let snap = snapshot(
            &[("Completed", "server started", 1)],
            Some(true),
            Some("Jupyter server available at /user/alice/lab"),
        );

        let lines = state.apply(&snap).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].severity, Severity::Success);
        assert_eq!(lines[1].link.as_deref(), Some("/user/alice/lab"));
        assert!(state.finished());
        assert_eq!(state.succeeded(), Some(true));

        assert!(state.apply(&snap).unwrap().is_empty());
    }

    #[test]
    fn failure_final_line_has_no_link() {
        let mut state = ProgressState::new();
        let snap = snapshot(
            &[("Failed", "spawn timed out", 1)],
            Some(false),
            Some("Failed to launch Jupyter server"),
        );

        let lines = state.apply(&snap).unwrap();
        assert_eq!(lines.last().unwrap().severity, Severity::Error);
        assert!(lines.last().unwrap().link.is_none());
        assert_eq!(state.succeeded(), Some(false));
    }

    #[test]
    fn empty_snapshot_yields_nothing() {
        let mut state = ProgressState::new();
        let lines = state.apply(&TrackingData::default()).unwrap();
        assert!(lines.is_empty());
        assert!(!state.finished());
    }
}
