//! Layout rendering (top bar, sidebar, friends activity)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, Screen, ViewSnapshot};
use crate::store::Activity;
use super::utils::{render_scrollable_list, titled_block, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Screen title
            Constraint::Length(32), // Signed-in user
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("♫ ", Style::default().fg(Color::Green)),
        Span::styled(
            snapshot.ui.screen.title(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ? for help", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(title, chunks[0]);

    let who = match &snapshot.auth.user {
        Some(user) if snapshot.auth.is_admin() => {
            format!("[{}] {} (admin)", user.initials(), user.full_name)
        }
        Some(user) => format!("[{}] {}", user.initials(), user.full_name),
        None => "Not signed in".to_string(),
    };
    let account = Paragraph::new(truncate_string(&who, 28).trim_end().to_string())
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", snapshot.hostname)),
        );
    frame.render_widget(account, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let entries = Screen::sidebar_entries(snapshot.auth.is_authenticated(), snapshot.auth.is_admin());
    let focused = snapshot.ui.active_section == ActiveSection::Sidebar;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(entries.len() as u16 + 2), // Navigation
            Constraint::Min(0),                           // Library
        ])
        .split(area);

    let nav_items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let marker = if *screen == snapshot.ui.screen { "▸ " } else { "  " };
            let style = if i == snapshot.ui.sidebar_selected && focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if *screen == snapshot.ui.screen {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", marker, screen.title())).style(style)
        })
        .collect();
    render_scrollable_list(
        frame,
        chunks[0],
        nav_items,
        snapshot.ui.sidebar_selected,
        titled_block("Menu", focused),
    );

    let library_block = titled_block("Playlists", false);
    if !snapshot.auth.is_authenticated() {
        let prompt = Paragraph::new("Log in to see your playlists")
            .style(Style::default().fg(Color::DarkGray))
            .block(library_block);
        frame.render_widget(prompt, chunks[1]);
        return;
    }

    let mut items = vec![ListItem::new("♥ Favorite songs").style(Style::default().fg(Color::Magenta))];
    items.extend(snapshot.music.liked_albums.iter().map(|album| {
        ListItem::new(Line::from(vec![
            Span::raw(album.title.clone()),
            Span::styled(
                format!(" · Album · {}", album.user.full_name),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
    }));
    if snapshot.music.liked_albums.is_empty() && snapshot.music_status.is_loading() {
        items.push(ListItem::new("Loading...").style(Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(List::new(items).block(library_block), chunks[1]);
}

pub fn render_friends_activity(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let block = titled_block("Friends Activity", false);

    let Some(user) = &snapshot.auth.user else {
        let prompt = Paragraph::new("Login to see what your friends are playing")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
        frame.render_widget(prompt, area);
        return;
    };

    let online = user
        .following
        .iter()
        .filter(|r| snapshot.chat.is_online(r.id()))
        .count();
    let block = if online > 0 {
        titled_block(&format!("Friends Activity · {} online", online), false)
    } else {
        block
    };

    let following = user.following_users();
    if following.is_empty() {
        let prompt = Paragraph::new("Follow people to see what they are listening to")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
        frame.render_widget(prompt, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = following
        .iter()
        .map(|friend| {
            let dot = if snapshot.chat.is_online(&friend.id) {
                Span::styled("● ", Style::default().fg(Color::Green))
            } else {
                Span::styled("● ", Style::default().fg(Color::DarkGray))
            };
            let name = Line::from(vec![
                dot,
                Span::styled(
                    truncate_string(&friend.full_name, width.saturating_sub(2)),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]);
            let activity = match snapshot.chat.activity(&friend.id) {
                Activity::Playing { title, artist } => vec![
                    Line::from(Span::styled(
                        format!("  ♪ {}", truncate_string(&title, width.saturating_sub(4)).trim_end()),
                        Style::default().fg(Color::White),
                    )),
                    Line::from(Span::styled(
                        format!("    {}", truncate_string(&artist, width.saturating_sub(4)).trim_end()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
                Activity::Idle => vec![Line::from(Span::styled(
                    "  Idle",
                    Style::default().fg(Color::DarkGray),
                ))],
            };

            let mut lines = vec![name];
            lines.extend(activity);
            ListItem::new(lines)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
