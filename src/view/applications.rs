//! Artist applications: search, filters, table and the review dialogs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::api::{ApplicationStatus, ArtistApplication};
use crate::model::{ActiveSection, Dialog, ViewSnapshot};
use super::utils::{
    border_style, centered_rect, format_compact, format_date, render_placeholder, titled_block,
};

fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Approve => Color::Green,
        ApplicationStatus::Pending => Color::Yellow,
        ApplicationStatus::Reject => Color::Red,
    }
}

fn status_span(status: ApplicationStatus) -> Vec<Span<'static>> {
    vec![
        Span::styled("● ", Style::default().fg(status_color(status))),
        Span::raw(status.label()),
    ]
}

pub fn render_applications(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Length(1), // Active filters
            Constraint::Min(0),    // Table
        ])
        .split(area);

    render_search_box(frame, chunks[0], snapshot);
    render_active_filters(frame, chunks[1], snapshot);
    render_table(frame, chunks[2], snapshot);
}

fn render_search_box(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let ui = &snapshot.ui;
    let text = if ui.filter.search.is_empty() && !ui.search_editing {
        Span::styled("Search by name or email (/)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(ui.filter.search.clone(), Style::default().fg(Color::White))
    };
    let mut line = vec![Span::raw("🔍 "), text];
    if ui.search_editing {
        line.push(Span::styled("▏", Style::default().fg(Color::Green)));
    }
    let search = Paragraph::new(Line::from(line)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(border_style(ui.search_editing)),
    );
    frame.render_widget(search, area);
}

fn render_active_filters(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let filter = &snapshot.ui.filter;
    let mut spans = vec![Span::styled(" Status: ", Style::default().fg(Color::DarkGray))];
    if filter.active.is_empty() {
        spans.push(Span::styled("all", Style::default().fg(Color::DarkGray)));
    } else {
        for status in &filter.active {
            spans.extend(status_span(*status));
            spans.push(Span::raw("  "));
        }
    }
    spans.push(Span::styled(
        "  f filter · c clear",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let focused = snapshot.ui.active_section == ActiveSection::MainContent;
    let block = titled_block("Artist Applications", focused);
    let applications = &snapshot.user.applications;
    if render_placeholder(
        frame,
        area,
        block.clone(),
        &snapshot.user_status,
        applications.is_empty(),
        "No applications match these filters",
    ) {
        return;
    }

    let header = Row::new(vec!["User", "Status", "Followers", "Submitted"])
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = applications
        .iter()
        .enumerate()
        .map(|(i, application)| {
            let (name, followers) = match &application.user {
                Some(user) => (user.full_name.clone(), format_compact(user.followers.len() as u64)),
                None => ("Unknown user".to_string(), "-".to_string()),
            };
            let style = if focused && i == snapshot.ui.main_selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(Line::from(status_span(application.status))),
                Cell::from(followers),
                Cell::from(format_date(&application.submit_date)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(12),
        ],
    )
    .header(header)
    .block(block);

    let mut state = TableState::default();
    state.select(Some(snapshot.ui.main_selected));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Dialogs are drawn over the whole frame, after the rest of the layout.
pub fn render_dialog(frame: &mut Frame, snapshot: &ViewSnapshot) {
    let Some(dialog) = snapshot.ui.dialog else {
        return;
    };

    if dialog == Dialog::FilterMenu {
        render_filter_menu(frame, snapshot);
        return;
    }

    let selected = snapshot
        .ui
        .selected_application
        .as_deref()
        .and_then(|id| snapshot.user.applications.iter().find(|a| a.id == id));
    let Some(application) = selected else {
        return;
    };

    match dialog {
        Dialog::Details => render_details(frame, application),
        Dialog::Approve => render_decision(frame, snapshot, application, ApplicationStatus::Approve),
        Dialog::Reject => render_decision(frame, snapshot, application, ApplicationStatus::Reject),
        Dialog::FilterMenu => {}
    }
}

fn dialog_block(title: &str, color: Color, footer: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .title_bottom(Line::from(format!(" {} ", footer)).centered())
        .style(Style::default().bg(Color::Black))
}

fn label_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_details(frame: &mut Frame, application: &ArtistApplication) {
    let mut lines = Vec::new();
    if let Some(user) = &application.user {
        lines.push(Line::from(Span::styled(
            user.full_name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(label_line("Username", format!("@{}", user.username)));
        lines.push(label_line("Email", user.email.clone()));
        lines.push(label_line("Followers", format_compact(user.followers.len() as u64)));
    }
    let mut status = vec![Span::styled(format!("{:<12}", "Status"), Style::default().fg(Color::DarkGray))];
    status.extend(status_span(application.status));
    lines.push(Line::from(status));
    lines.push(label_line("Submitted", format_date(&application.submit_date)));
    if let Some(reason) = &application.rejection_reason {
        if application.status == ApplicationStatus::Reject && !reason.is_empty() {
            lines.push(label_line("Reason", reason.clone()));
        }
    }
    if let Some(details) = application.details.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(details.to_string(), Style::default().fg(Color::Gray))));
    }

    let area = centered_rect(frame.area(), 60, lines.len() as u16 + 4);
    frame.render_widget(Clear, area);
    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(dialog_block("Application", Color::Cyan, "a approve · x reject · Esc close"));
    frame.render_widget(details, area);
}

fn render_decision(
    frame: &mut Frame,
    snapshot: &ViewSnapshot,
    application: &ArtistApplication,
    status: ApplicationStatus,
) {
    let decision = &snapshot.ui.decision;
    let name = application
        .user
        .as_ref()
        .map(|u| u.full_name.clone())
        .unwrap_or_else(|| "this user".to_string());

    let (title, color, question) = match status {
        ApplicationStatus::Reject => ("Reject application", Color::Red, format!("Reject {} as an artist?", name)),
        _ => ("Approve application", Color::Green, format!("Approve {} as an artist?", name)),
    };

    let mut lines = vec![
        Line::from(Span::styled(question, Style::default().fg(Color::White))),
        Line::from(""),
    ];

    if status == ApplicationStatus::Reject {
        let reason = match decision.reason_label() {
            Some(label) => Span::styled(format!("◀ {} ▶", label), Style::default().fg(Color::Yellow)),
            None => Span::styled("◀ Choose a reason ▶", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", "Reason"), Style::default().fg(Color::DarkGray)),
            reason,
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled(format!("{:<12}", "Details"), Style::default().fg(Color::DarkGray)),
        Span::styled(decision.details.clone(), Style::default().fg(Color::White)),
        Span::styled("▏", Style::default().fg(Color::Green)),
    ]));
    lines.push(Line::from(""));

    let enabled = decision.can_confirm(status, snapshot.user.is_responding());
    let button = if snapshot.user.is_responding() { "Saving..." } else { "Confirm" };
    let button_style = if enabled {
        Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(format!("[ {} ]", button), button_style)));

    let footer = match status {
        ApplicationStatus::Reject => "←/→ reason · Enter confirm · Esc back",
        _ => "Enter confirm · Esc back",
    };
    let area = centered_rect(frame.area(), 64, lines.len() as u16 + 4);
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(dialog_block(title, color, footer));
    frame.render_widget(dialog, area);
}

fn render_filter_menu(frame: &mut Frame, snapshot: &ViewSnapshot) {
    let filter = &snapshot.ui.filter;
    let lines: Vec<Line> = ApplicationStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let check = if filter.is_active(*status) { "[x] " } else { "[ ] " };
            let cursor = if i == filter.menu_cursor { "▸ " } else { "  " };
            let mut spans = vec![Span::raw(cursor), Span::raw(check)];
            spans.extend(status_span(*status));
            let line = Line::from(spans);
            if i == filter.menu_cursor {
                line.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                line
            }
        })
        .collect();

    let area = centered_rect(frame.area(), 44, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    let menu = Paragraph::new(lines).block(dialog_block(
        "Filter by status",
        Color::Cyan,
        "Space toggle · Enter apply · c clear",
    ));
    frame.render_widget(menu, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::api::User;
    use crate::view::tests::{buffer_text, model};

    fn application(id: &str, status: ApplicationStatus) -> ArtistApplication {
        ArtistApplication {
            id: id.into(),
            status,
            submit_date: "2024-05-01T10:00:00.000Z".into(),
            user: Some(User { full_name: format!("Artist {}", id), ..Default::default() }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_table_rows_and_empty_state() {
        let tmp = tempfile::tempdir().unwrap();
        let mut snapshot = model(tmp.path()).snapshot().await;

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render_applications(f, f.area(), &snapshot)).unwrap();
        assert!(buffer_text(&terminal).contains("No applications match these filters"));

        snapshot.user.applications = vec![
            application("a1", ApplicationStatus::Pending),
            application("a2", ApplicationStatus::Reject),
        ];
        terminal.draw(|f| render_applications(f, f.area(), &snapshot)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Artist a1"));
        assert!(text.contains("Pending"));
        assert!(text.contains("Reject"));
        assert!(text.contains("May 1, 2024"));
    }

    #[tokio::test]
    async fn test_reject_dialog_needs_reason() {
        let tmp = tempfile::tempdir().unwrap();
        let mut snapshot = model(tmp.path()).snapshot().await;
        snapshot.user.applications = vec![application("a1", ApplicationStatus::Pending)];
        snapshot.ui.selected_application = Some("a1".into());
        snapshot.ui.dialog = Some(Dialog::Reject);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_dialog(f, &snapshot)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Reject Artist a1 as an artist?"));
        assert!(text.contains("Choose a reason"));

        snapshot.ui.decision.next_reason();
        terminal.draw(|f| render_dialog(f, &snapshot)).unwrap();
        let label = snapshot.ui.decision.reason_label().unwrap();
        assert!(buffer_text(&terminal).contains(label));
    }
}
