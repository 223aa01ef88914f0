//! Player bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::store::PlayerState;
use super::utils::format_duration;

/// Song, artist and position in the play queue. Nothing is streamed, so the
/// gauge tracks the queue rather than elapsed time.
pub fn render_player_bar(frame: &mut Frame, area: Rect, player: &PlayerState) {
    let Some(song) = player.current_song() else {
        let idle = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" No track playing "))
            .gauge_style(Style::default().fg(Color::DarkGray))
            .ratio(0.0)
            .label("");
        frame.render_widget(idle, area);
        return;
    };

    let position = player.current_index.unwrap_or(0) + 1;
    let total = player.queue.len().max(1);
    let indicator = if player.is_playing { " ▶" } else { "⏸ " };
    let title = format!("{} {} | {} ", indicator, song.title, song.user.full_name);
    let label = format!("{} / {}  ·  {}", position, total, format_duration(song.duration));

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(" Space play/pause · n next · p previous ").right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((position as f64 / total as f64).clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}
