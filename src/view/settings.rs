//! Settings / General: the profile form

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::{ActiveSection, ViewSnapshot, COUNTRY_FIELD, PROFILE_FIELDS};
use super::utils::titled_block;

const LABEL_WIDTH: usize = 14;

pub fn render_settings(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let ui = &snapshot.ui;
    let form = &ui.profile;
    let focused = ui.active_section == ActiveSection::MainContent;
    let saving = snapshot.user_status.is_loading();

    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled("Account", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled(format!("{:<width$}", "Username", width = LABEL_WIDTH), dim),
            Span::styled(form.username.clone(), dim),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<width$}", "Email", width = LABEL_WIDTH), dim),
            Span::styled(form.email.clone(), dim),
        ]),
        Line::from(""),
        Line::from(Span::styled("Profile", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
    ];

    for (i, label) in PROFILE_FIELDS.iter().enumerate() {
        let is_focused = focused && form.focus == i;
        let editing = is_focused && ui.profile_editing;
        let marker = if is_focused { "▸ " } else { "  " };
        let label_style = if is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = form.value(i);
        let value_span = if i == COUNTRY_FIELD {
            let arrows = if is_focused { format!("◀ {} ▶", value) } else { value.to_string() };
            Span::styled(arrows, Style::default().fg(Color::White))
        } else if value.is_empty() && !editing {
            Span::styled("-", dim)
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::White))
        };

        let mut spans = vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH - 2), label_style),
            value_span,
        ];
        if editing && i != COUNTRY_FIELD {
            spans.push(Span::styled("▏", Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    let save_style = if saving {
        dim
    } else {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![
        Span::styled(if saving { "[ Saving... ]" } else { "[ Save (s) ]" }, save_style),
        Span::styled(
            if ui.profile_editing {
                "  Enter / Esc stop editing"
            } else {
                "  ↑/↓ field · Enter edit · ←/→ country"
            },
            dim,
        ),
    ]));

    let panel = Paragraph::new(lines).block(titled_block("General", focused));
    frame.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::view::tests::{buffer_text, model};

    #[tokio::test]
    async fn test_profile_form_shows_country_and_read_only_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let mut snapshot = model(tmp.path()).snapshot().await;
        snapshot.ui.profile.username = "neo".into();
        snapshot.ui.profile.email = "neo@matrix.io".into();
        snapshot.ui.profile.full_name = "Thomas Anderson".into();
        snapshot.ui.profile.cycle_country(true);
        snapshot.ui.profile.focus = COUNTRY_FIELD;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render_settings(f, f.area(), &snapshot)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("neo@matrix.io"));
        assert!(text.contains("Thomas Anderson"));
        assert!(text.contains(&format!("◀ {} ▶", snapshot.ui.profile.country_label())));
        assert!(text.contains("Save (s)"));
    }
}
