//! Navigation-related controller methods (screens, sidebar, on-enter fetches)

use crate::model::{ActiveSection, ProfileForm, Screen};
use super::AppController;

impl AppController {
    /// Switch screens, enforcing role gates, and kick off the data the new
    /// screen shows.
    pub async fn navigate(&self, screen: Screen) {
        let auth = self.model.auth.snapshot().await;

        if screen.requires_auth() && !auth.is_authenticated() {
            tracing::debug!(?screen, "Navigation requires login");
            self.model.toasts.info("Log in to continue").await;
            self.model.set_screen(Screen::Login).await;
            return;
        }
        if screen.requires_admin() && !auth.is_admin() {
            tracing::warn!(?screen, "Navigation blocked for non-admin user");
            self.model.toasts.error("Only admins can open this page").await;
            return;
        }

        tracing::debug!(?screen, "Navigating");
        self.model.set_screen(screen).await;

        match screen {
            Screen::Home => self.spawn(|c| async move { c.load_home().await }),
            Screen::AdminDashboard => self.spawn(|c| async move { c.load_dashboard().await }),
            Screen::ArtistApplications => {
                let query = self.model.get_ui_state().await.filter.query_string();
                self.spawn(|c| async move { c.load_applications(query).await });
            }
            Screen::Settings => {
                let form = auth.user.as_ref().map(ProfileForm::from_user).unwrap_or_default();
                self.model.update_ui(|ui| ui.profile = form).await;
            }
            _ => {}
        }
    }

    /// Re-run the fetches of the current screen, and reload the signed-in
    /// user before the layout panels that depend on it.
    pub async fn refresh(&self) {
        let screen = self.model.screen().await;
        self.navigate(screen).await;
        if self.model.auth.snapshot().await.is_authenticated() {
            self.spawn(|c| async move {
                if let Some(user) = c.model.auth.get_current_user().await {
                    c.load_layout(&user.id).await;
                }
            });
        }
    }

    /// Sidebar albums and the friends activity panel
    pub async fn load_layout(&self, user_id: &str) {
        let (albums, presence) = futures::join!(
            self.model.music.get_user_liked_albums(user_id),
            self.model.chat.get_presence(),
        );
        tracing::debug!(
            albums = albums.map(|a| a.len()),
            online = presence.map(|p| p.online_users.len()),
            "Layout data loaded"
        );
    }

    pub async fn load_home(&self) {
        let music = &self.model.music;
        music.get_featured_songs().await;
        music.get_made_for_you_songs().await;
        music.get_trending_songs().await;
        self.model.stat.get_top_artists_stat().await;

        if let Some(queue) = music.snapshot().await.home_queue() {
            self.model.player.initialize_queue(queue).await;
        }
    }

    pub async fn load_dashboard(&self) {
        let stat = &self.model.stat;
        futures::join!(
            stat.get_general_stat(),
            stat.get_popular_songs_stat(),
            stat.get_top_artists_stat(),
        );
    }

    pub async fn load_applications(&self, query: String) {
        tracing::debug!(query = %query, "Loading artist applications");
        self.model.user.get_artist_applications(&query).await;
    }

    // ========================================================================
    // Sidebar
    // ========================================================================

    pub async fn sidebar_entries(&self) -> Vec<Screen> {
        let auth = self.model.auth.snapshot().await;
        Screen::sidebar_entries(auth.is_authenticated(), auth.is_admin())
    }

    pub async fn sidebar_move(&self, down: bool) {
        let len = self.sidebar_entries().await.len();
        self.model
            .update_ui(|ui| ui.sidebar_selected = step(ui.sidebar_selected, len, down))
            .await;
    }

    pub async fn sidebar_open_selected(&self) {
        let entries = self.sidebar_entries().await;
        let selected = self.model.get_ui_state().await.sidebar_selected;
        if let Some(screen) = entries.get(selected).copied() {
            self.navigate(screen).await;
            self.model.update_ui(|ui| ui.active_section = ActiveSection::MainContent).await;
        }
    }

    /// Move the main list cursor within `len` rows
    pub async fn main_move(&self, len: usize, down: bool) {
        self.model
            .update_ui(|ui| ui.main_selected = step(ui.main_selected, len, down))
            .await;
    }
}

/// Cursor step clamped to `0..len`
pub(crate) fn step(current: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use serde_json::json;

    use crate::api::mock::MockApi;
    use crate::api::User;
    use crate::model::AppModel;
    use crate::store::{Revision, SessionStorage, StoreContext, Toasts};

    #[tokio::test]
    async fn test_refresh_reloads_user_then_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let api = Arc::new(MockApi::new());
        let revision = Revision::new();
        let ctx = StoreContext::new(Toasts::new(Duration::from_secs(5), revision.clone()), revision);
        let model = AppModel::new(
            api.clone(),
            ctx,
            SessionStorage::new(tmp.path().join("session")),
            tmp.path().join("token"),
        );
        model.auth.set_user(User { id: "u1".into(), full_name: "Old".into(), ..Default::default() }).await;
        model.set_screen(Screen::Settings).await;
        api.reply("current_user", json!({ "user": { "id": "u1", "fullName": "New", "following": ["u2"] } }))
            .reply("user_liked_albums", json!({ "albums": [] }))
            .reply("presence", json!({ "onlineUsers": [], "userActivities": {} }));

        let controller = AppController::new(model.clone());
        controller.refresh().await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(model.auth.current_user().await.unwrap().full_name, "New");
        let calls = api.calls();
        assert_eq!(calls[0], "current_user");
        assert!(calls.contains(&"user_liked_albums:u1".to_string()));
        assert!(calls.contains(&"presence".to_string()));
    }

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(0, 0, true), 0);
        assert_eq!(step(0, 3, false), 0);
        assert_eq!(step(1, 3, true), 2);
        assert_eq!(step(2, 3, true), 2);
    }
}
