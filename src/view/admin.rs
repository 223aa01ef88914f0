//! Admin dashboard: totals, popular songs and top artists

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};

use crate::api::GeneralStat;
use crate::model::{ActiveSection, ViewSnapshot};
use super::utils::{
    format_compact, format_duration, render_placeholder, render_scrollable_list, titled_block,
    truncate_string,
};

pub fn render_dashboard(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Min(0),    // Popular songs + top artists
        ])
        .split(area);

    render_stat_cards(frame, chunks[0], snapshot);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_popular_songs(frame, lists[0], snapshot);
    render_top_artists(frame, lists[1], snapshot);
}

fn render_stat_cards(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let stat = &snapshot.stat.general_stat;
    let loading = snapshot.stat_status.is_loading();
    let cards = [
        ("Total Songs", stat.total_songs, Color::Green),
        ("Total Albums", stat.total_albums, Color::Magenta),
        ("Total Users", stat.total_users, Color::Cyan),
        ("Total Artists", stat.total_artists, Color::Yellow),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), rect) in cards.into_iter().zip(columns.iter()) {
        let shown = if loading && *stat == GeneralStat::default() {
            "...".to_string()
        } else {
            value.to_string()
        };
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                shown,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", label))
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(card, *rect);
    }
}

fn render_popular_songs(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let focused = snapshot.ui.active_section == ActiveSection::MainContent;
    let block = titled_block("Popular Songs", focused);
    let songs = &snapshot.stat.songs;
    if render_placeholder(frame, area, block.clone(), &snapshot.stat_status, songs.is_empty(), "No songs yet") {
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let title_width = width.saturating_sub(37).max(10);
    let items: Vec<ListItem> = songs
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let style = if focused && i == snapshot.ui.main_selected {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:>2}. ", i + 1)),
                Span::raw(truncate_string(&song.title, title_width)),
                Span::raw(" "),
                Span::raw(truncate_string(&song.user.full_name, 18)),
                Span::raw(format!(" {:>6}", format_compact(song.views))),
                Span::raw(format!(" {:>6}", format_duration(song.duration))),
            ]))
            .style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, snapshot.ui.main_selected, block);
}

fn render_top_artists(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let block = titled_block("Top Artists", false);
    let artists = &snapshot.stat.users;
    if render_placeholder(frame, area, block.clone(), &snapshot.stat_status, artists.is_empty(), "No artists yet") {
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = artists
        .iter()
        .map(|artist| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        truncate_string(&artist.full_name, width.saturating_sub(10)),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" {:>8}", format_compact(artist.followers.len() as u64)),
                        Style::default().fg(Color::Green),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("@{}", artist.username),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    render_scrollable_list(frame, area, items, 0, block);
}
