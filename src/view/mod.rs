//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It only reads a [`ViewSnapshot`]; nothing here touches the stores.
//!
//! - `utils`: Shared helpers (formatting, blocks, placeholders)
//! - `layout`: Top bar, sidebar and friends activity
//! - `auth`: Login and password reset screens
//! - `home`: Greeting and song lists
//! - `admin`: Admin dashboard
//! - `applications`: Artist applications table and its dialogs
//! - `settings`: Profile form
//! - `progress`: Player bar
//! - `overlays`: Toasts, help popup and the loading splash

mod utils;
mod layout;
mod auth;
mod home;
mod admin;
mod applications;
mod settings;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{Screen, ViewSnapshot};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &ViewSnapshot) {
        let screen = snapshot.ui.screen;

        if screen == Screen::Loading {
            overlays::render_loader(frame);
        } else if screen.is_auth_flow() {
            auth::render_auth_screen(frame, snapshot);
        } else {
            Self::render_main_layout(frame, snapshot);
        }

        if !snapshot.toasts.is_empty() {
            overlays::render_toasts(frame, &snapshot.toasts);
        }

        if snapshot.ui.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }

    fn render_main_layout(frame: &mut Frame, snapshot: &ViewSnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + signed-in user
                Constraint::Min(0),    // Sidebar, content, friends
                Constraint::Length(3), // Player bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], snapshot);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(22), // Menu + playlists
                Constraint::Percentage(54), // Screen content
                Constraint::Percentage(24), // Friends activity
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], snapshot);

        match snapshot.ui.screen {
            Screen::Home => home::render_home(frame, main_chunks[1], snapshot),
            Screen::AdminDashboard => admin::render_dashboard(frame, main_chunks[1], snapshot),
            Screen::ArtistApplications => {
                applications::render_applications(frame, main_chunks[1], snapshot)
            }
            Screen::Settings => settings::render_settings(frame, main_chunks[1], snapshot),
            _ => {}
        }

        layout::render_friends_activity(frame, main_chunks[2], snapshot);

        progress::render_player_bar(frame, chunks[2], &snapshot.player);

        if snapshot.ui.screen == Screen::ArtistApplications && snapshot.ui.dialog.is_some() {
            applications::render_dialog(frame, snapshot);
        }
    }
}
