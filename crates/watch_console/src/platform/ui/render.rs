use watch_core::{AppViewModel, ConnectionStatus, Match, View};

/// Renders the active screen as plain text lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![header(view)];
    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }

    match view.view {
        View::Dashboard => render_dashboard(view, &mut lines),
        View::Keywords => render_keywords(view, &mut lines),
        View::Chats => render_chats(view, &mut lines),
        View::Settings => render_settings(view, &mut lines),
    }
    lines
}

fn header(view: &AppViewModel) -> String {
    let screen = match view.view {
        View::Dashboard => "Dashboard",
        View::Keywords => "Keywords",
        View::Chats => "Chats",
        View::Settings => "Settings",
    };
    format!("== {} [{}] ==", screen, status_label(view.status))
}

fn status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Open => "live",
        ConnectionStatus::Connecting => "connecting...",
        ConnectionStatus::Closing => "closing...",
        ConnectionStatus::Closed => "disconnected, retrying...",
        ConnectionStatus::Uninstantiated => "not configured",
    }
}

fn render_dashboard(view: &AppViewModel, lines: &mut Vec<String>) {
    lines.push(format!(
        "keywords: {} | chats: {} | matches: {}",
        view.stats.keywords, view.stats.chats, view.stats.matches
    ));
    if view.matches.is_empty() {
        let idle = if view.status == ConnectionStatus::Open {
            "Waiting for matches..."
        } else {
            "Connection to backend is not active. Check Settings."
        };
        lines.push(idle.to_string());
        return;
    }
    for found in &view.matches {
        lines.push(match_line(found));
    }
}

fn match_line(found: &Match) -> String {
    let mut line = format!(
        "{} [{}] {} in {}: {}",
        found.timestamp.format("%Y-%m-%d %H:%M:%S"),
        found.keyword,
        found.author,
        found.chat_name,
        found.message
    );
    if !found.chat_link.is_empty() {
        line.push_str(&format!(" <{}>", found.chat_link));
    }
    line
}

fn render_keywords(view: &AppViewModel, lines: &mut Vec<String>) {
    if view.keywords.is_empty() {
        lines.push("No keywords yet.".to_string());
    }
    lines.extend(view.keywords.iter().map(|keyword| format!("- {keyword}")));
}

fn render_chats(view: &AppViewModel, lines: &mut Vec<String>) {
    if view.chats.is_empty() {
        lines.push("No chats monitored.".to_string());
    }
    lines.extend(view.chats.iter().map(|chat_id| format!("- {chat_id}")));
}

fn render_settings(view: &AppViewModel, lines: &mut Vec<String>) {
    match &view.endpoint {
        Some(endpoint) => lines.push(format!("Backend API URL: {endpoint}")),
        None => lines.push(
            "Welcome! Enter your backend URL with `endpoint <url>` to get started.".to_string(),
        ),
    }
    if let Some(error) = &view.settings_error {
        lines.push(format!("! {error}"));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn unconfigured_settings_prompt() {
        let view = AppViewModel {
            view: View::Settings,
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "== Settings [not configured] ==");
        assert!(lines[1].starts_with("Welcome!"));
    }

    #[test]
    fn dashboard_lists_matches_newest_first() {
        let found = Match {
            id: "1".to_string(),
            author: "alice".to_string(),
            chat_name: "Jobs".to_string(),
            chat_link: "https://t.me/jobs/1".to_string(),
            message: "hiring".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            keyword: "hiring".to_string(),
        };
        let view = AppViewModel {
            view: View::Dashboard,
            status: ConnectionStatus::Open,
            matches: vec![found],
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "== Dashboard [live] ==");
        assert_eq!(
            lines[2],
            "2024-05-01 10:00:00 [hiring] alice in Jobs: hiring <https://t.me/jobs/1>"
        );
    }

    #[test]
    fn every_status_has_its_own_header() {
        let headers: Vec<String> = [
            ConnectionStatus::Uninstantiated,
            ConnectionStatus::Connecting,
            ConnectionStatus::Open,
            ConnectionStatus::Closing,
            ConnectionStatus::Closed,
        ]
        .into_iter()
        .map(|status| {
            render(&AppViewModel {
                view: View::Dashboard,
                status,
                ..AppViewModel::default()
            })[0]
                .clone()
        })
        .collect();

        assert_eq!(headers[3], "== Dashboard [closing...] ==");
        assert_eq!(headers[4], "== Dashboard [disconnected, retrying...] ==");
        for (index, header) in headers.iter().enumerate() {
            assert!(!headers[index + 1..].contains(header), "duplicate {header}");
        }
    }

    #[test]
    fn empty_feed_text_follows_connection() {
        let open = AppViewModel {
            view: View::Dashboard,
            status: ConnectionStatus::Open,
            ..AppViewModel::default()
        };
        assert_eq!(render(&open)[2], "Waiting for matches...");

        let closed = AppViewModel {
            status: ConnectionStatus::Closed,
            ..open
        };
        assert_eq!(
            render(&closed)[2],
            "Connection to backend is not active. Check Settings."
        );
    }
}
