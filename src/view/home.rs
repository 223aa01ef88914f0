//! Home screen: greeting, top artists and the three song lists

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, Paragraph},
    Frame,
};

use crate::api::Song;
use crate::model::{ActiveSection, ViewSnapshot};
use super::utils::{
    format_compact, format_duration, render_placeholder, render_scrollable_list, titled_block,
    truncate_string,
};

pub fn render_home(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Greeting
            Constraint::Length(3), // Top artists
            Constraint::Min(0),    // Song lists
        ])
        .split(area);

    let greeting = Paragraph::new(Line::from(Span::styled(
        format!(" Good {}", snapshot.greeting),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(greeting, chunks[0]);

    render_top_artists(frame, chunks[1], snapshot);

    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[2]);

    // Offsets follow the player queue: featured, made for you, trending.
    let music = &snapshot.music;
    let sections: [(&str, &[Song], Rect); 3] = [
        ("Featured", &music.featured_songs, lists[0]),
        ("Made For You", &music.made_for_you_songs, lists[1]),
        ("Trending", &music.trending_songs, lists[2]),
    ];
    let mut offset = 0;
    for (title, songs, rect) in sections {
        render_song_section(frame, rect, snapshot, title, songs, offset);
        offset += songs.len();
    }
}

fn render_top_artists(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let block = titled_block("Top Artists", false);
    let artists = &snapshot.stat.users;
    if render_placeholder(frame, area, block.clone(), &snapshot.stat_status, artists.is_empty(), "No artists yet") {
        return;
    }

    let mut spans = Vec::new();
    for (i, artist) in artists.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ·  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(artist.full_name.clone(), Style::default().fg(Color::White)));
        spans.push(Span::styled(
            format!(" {}", format_compact(artist.followers.len() as u64)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_song_section(
    frame: &mut Frame,
    area: Rect,
    snapshot: &ViewSnapshot,
    title: &str,
    songs: &[Song],
    offset: usize,
) {
    let focused = snapshot.ui.active_section == ActiveSection::MainContent;
    let cursor = snapshot.ui.main_selected;
    let has_cursor = focused && (offset..offset + songs.len()).contains(&cursor);
    let block = titled_block(title, has_cursor);

    if render_placeholder(frame, area, block.clone(), &snapshot.music_status, songs.is_empty(), "Nothing here yet") {
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let title_width = width.saturating_sub(30).max(10);
    let items: Vec<ListItem> = songs
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let index = offset + i;
            let is_current = snapshot.player.current_index == Some(index);
            let marker = match (is_current, snapshot.player.is_playing) {
                (true, true) => "▶ ",
                (true, false) => "⏸ ",
                _ => "  ",
            };
            let style = if has_cursor && index == cursor {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(truncate_string(&song.title, title_width)),
                Span::raw(" "),
                Span::raw(truncate_string(&song.user.full_name, 20)),
                Span::raw(format!(" {:>6}", format_duration(song.duration))),
            ]))
            .style(style)
        })
        .collect();

    let selected = if has_cursor { cursor - offset } else { 0 };
    render_scrollable_list(frame, area, items, selected, block);
}
