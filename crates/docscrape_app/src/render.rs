use docscrape_core::{AppViewModel, HealthStatus};

/// Lines to print for what changed between two views. Progress goes to
/// stderr so stdout stays reserved for scraped Markdown.
pub fn render(prev: &AppViewModel, next: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if next.health != prev.health {
        match &next.health {
            HealthStatus::Unknown => {}
            HealthStatus::Checking => lines.push("Checking backend...".to_string()),
            HealthStatus::Reachable => lines.push("Backend is reachable.".to_string()),
            HealthStatus::Unreachable(reason) => {
                lines.push(format!("Backend is not reachable: {reason}"))
            }
        }
    }

    if next.session != prev.session {
        lines.push(format!("Session: {}", next.session.label()));
    }
    if next.session_message != prev.session_message {
        if let Some(message) = &next.session_message {
            lines.push(format!("Session: {message}"));
        }
    }

    if next.status_line != prev.status_line {
        if let Some(status) = &next.status_line {
            let prefix = next
                .active_request
                .as_ref()
                .map(|active| format!("[{}] ", active.source))
                .unwrap_or_default();
            lines.push(format!("{prefix}{status}"));
        }
    }

    if next.last_error != prev.last_error && next.last_error != next.session_message {
        if let Some(error) = &next.last_error {
            lines.push(format!("Error: {error}"));
        }
    }

    lines
}
