//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::store::StoreStatus;

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

pub fn titled_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused))
}

/// Loading / error / empty placeholder. Returns `true` when something was drawn
/// and the caller should skip its own content.
pub fn render_placeholder(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    status: &StoreStatus,
    is_empty: bool,
    empty_text: &str,
) -> bool {
    let (text, color) = if status.is_loading() && is_empty {
        ("Loading...".to_string(), Color::Yellow)
    } else if let (Some(error), true) = (&status.error, is_empty) {
        (error.clone(), Color::Red)
    } else if is_empty {
        (empty_text.to_string(), Color::DarkGray)
    } else {
        return false;
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
    true
}

/// Seconds as `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// 950, 1.2K, 3.4M. Rounds to one decimal before picking the unit, so
/// 999_950 reads 1M rather than 1000K.
pub fn format_compact(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000, "K"), (1_000_000, "M"), (1_000_000_000, "B")];
    if n < UNITS[0].0 {
        return n.to_string();
    }
    for (i, (scale, suffix)) in UNITS.iter().enumerate() {
        let scale = u128::from(*scale);
        let tenths = (u128::from(n) * 10 + scale / 2) / scale;
        if tenths < 10_000 || i + 1 == UNITS.len() {
            return match tenths % 10 {
                0 => format!("{}{}", tenths / 10, suffix),
                frac => format!("{}.{}{}", tenths / 10, frac, suffix),
            };
        }
    }
    n.to_string()
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Area of `width` x `height` centered in `area`, clamped to it
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// `submitDate` is an ISO timestamp; show only the day.
pub fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.split('T').next().unwrap_or(raw).to_string())
}
