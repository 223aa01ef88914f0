//! Login and password reset screens

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{Screen, ViewSnapshot};
use super::utils::centered_rect;

struct Field<'a> {
    label: &'a str,
    value: &'a str,
    masked: bool,
    focused: bool,
}

pub fn render_auth_screen(frame: &mut Frame, snapshot: &ViewSnapshot) {
    let ui = &snapshot.ui;
    let loading = snapshot.auth_status.is_loading();

    let (intro, fields, error, submit, footer): (&str, Vec<Field>, Option<&str>, &str, &str) = match ui.screen {
        Screen::Login => (
            "Log in to continue listening.",
            vec![
                Field { label: "Email", value: &ui.login.email, masked: false, focused: ui.login.focus == 0 },
                Field { label: "Password", value: &ui.login.password, masked: true, focused: ui.login.focus == 1 },
            ],
            ui.login.error.as_deref(),
            "Log in",
            "Tab switch field · Enter log in · Ctrl+F forgot password · Ctrl+C quit",
        ),
        Screen::ForgotPassword => (
            "Enter your email address and we'll send you a code to reset your password.",
            vec![Field { label: "Email", value: &ui.forgot_password.email, masked: false, focused: true }],
            ui.forgot_password.error.as_deref(),
            "Send code",
            "Enter send · Esc back to login",
        ),
        Screen::VerifyOtp => (
            "Enter the code we sent to your email.",
            vec![Field { label: "Code", value: &ui.otp.otp, masked: false, focused: true }],
            ui.otp.error.as_deref(),
            "Verify",
            "Enter verify · Esc back to login",
        ),
        Screen::ResetPassword => (
            "Choose a new password for your account.",
            vec![
                Field {
                    label: "New password",
                    value: &ui.reset_password.password,
                    masked: true,
                    focused: ui.reset_password.focus == 0,
                },
                Field {
                    label: "Confirm password",
                    value: &ui.reset_password.confirm,
                    masked: true,
                    focused: ui.reset_password.focus == 1,
                },
            ],
            ui.reset_password.error.as_deref(),
            "Reset password",
            "Tab switch field · Enter save · Esc back to login",
        ),
        _ => return,
    };

    let mut lines = vec![
        Line::from(Span::styled(intro, Style::default().fg(Color::Gray))),
        Line::from(""),
    ];
    if ui.screen == Screen::VerifyOtp && !ui.otp.email.is_empty() {
        lines.insert(1, Line::from(Span::styled(ui.otp.email.clone(), Style::default().fg(Color::Cyan))));
    }

    for field in &fields {
        let label_style = if field.focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let shown = if field.masked {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.to_string()
        };
        let cursor = if field.focused { "▏" } else { "" };
        lines.push(Line::from(Span::styled(field.label, label_style)));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(shown, Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error, Style::default().fg(Color::Red))));
        lines.push(Line::from(""));
    }

    let button = if loading { "Please wait..." } else { submit };
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", button),
        Style::default().fg(Color::Black).bg(if loading { Color::DarkGray } else { Color::Green }),
    )));

    let area = centered_rect(frame.area(), 64, lines.len() as u16 + 4);
    frame.render_widget(Clear, area);
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1))
                .title(format!(" {} ", ui.screen.title()))
                .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .title_bottom(Line::from(format!(" {} ", footer)).centered()),
        );
    frame.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[tokio::test]
    async fn test_password_is_masked() {
        let tmp = tempfile::tempdir().unwrap();
        let model = crate::view::tests::model(tmp.path());
        model
            .update_ui(|ui| {
                ui.screen = Screen::Login;
                ui.login.email = "neo@matrix.io".into();
                ui.login.password = "secret".into();
            })
            .await;
        let snapshot = model.snapshot().await;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render_auth_screen(f, &snapshot)).unwrap();
        let text = crate::view::tests::buffer_text(&terminal);
        assert!(text.contains("neo@matrix.io"));
        assert!(!text.contains("secret"));
        assert!(text.contains("••••••"));
    }
}
