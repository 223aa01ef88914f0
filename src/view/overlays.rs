//! Overlay rendering (toasts, help popup, loading splash)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::store::{Toast, ToastKind};
use super::utils::centered_rect;

const TOAST_WIDTH: u16 = 44;

/// Stack toasts in the top-right corner, newest at the bottom.
pub fn render_toasts(frame: &mut Frame, toasts: &[Toast]) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let mut y = area.y + 1;

    for toast in toasts {
        let (title, color) = match toast.kind {
            ToastKind::Error => (" Error ", Color::Red),
            ToastKind::Success => (" Done ", Color::Green),
            ToastKind::Info => (" Info ", Color::Cyan),
        };

        // Wrapped message lines plus the two borders
        let text_lines = toast.message.chars().count().div_ceil(inner_width).max(1) as u16;
        let height = text_lines + 2;
        if y + height > area.bottom() {
            break;
        }

        let toast_area = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height,
        };
        frame.render_widget(Clear, toast_area);
        let widget = Paragraph::new(toast.message.clone())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(title)
                    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );
        frame.render_widget(widget, toast_area);
        y += height;
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let keybindings = [
        ("", "── Navigation ──"),
        ("Tab", "Switch sidebar / content"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Open / Play"),
        ("r", "Refresh this screen"),
        ("Esc", "Dismiss latest notification"),
        ("", ""),
        ("", "── Home ──"),
        ("Space", "Play / Pause"),
        ("n / p", "Next / Previous track"),
        ("", ""),
        ("", "── Artist applications ──"),
        ("/", "Search"),
        ("f", "Filter by status"),
        ("c", "Clear filters"),
        ("a / x", "Approve / Reject"),
        ("", ""),
        ("", "── Settings ──"),
        ("Enter / e", "Edit field"),
        ("← / →", "Change country"),
        ("s", "Save profile"),
        ("", ""),
        ("", "── General ──"),
        ("L", "Log out"),
        ("?", "Toggle this help"),
        ("q / Ctrl+C", "Quit"),
    ];

    let area = centered_rect(frame.area(), 58, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^52}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>14}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help (? or Esc to close) ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(help_text, area);
}

/// Splash shown while the saved session is restored
pub fn render_loader(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 30, 5);
    let splash = Paragraph::new(vec![
        Line::from(Span::styled(
            "♫ Spotify Clone",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(""),
        Line::from(Span::styled("Loading...", Style::default().fg(Color::DarkGray))).centered(),
    ])
    .block(Block::default());
    frame.render_widget(splash, area);
}
