//! Main application model with state management

use std::sync::Arc;

use chrono::{Local, Timelike};
use tokio::sync::Mutex;

use crate::api::MusicApi;
use crate::store::{
    AuthState, AuthStore, ChatState, ChatStore, MusicState, MusicStore, PlayerState, PlayerStore,
    Revision, SessionStorage, StatState, StatStore, StoreContext, StoreStatus, Toast, Toasts,
    UserState, UserStore,
};
use super::types::{Dialog, Screen, UiState};

/// Everything a frame needs, copied out of the stores at once
#[derive(Clone, Debug)]
pub struct ViewSnapshot {
    pub ui: UiState,
    pub auth: AuthState,
    pub auth_status: StoreStatus,
    pub stat: StatState,
    pub stat_status: StoreStatus,
    pub music: MusicState,
    pub music_status: StoreStatus,
    pub user: UserState,
    pub user_status: StoreStatus,
    pub player: PlayerState,
    pub chat: ChatState,
    pub toasts: Vec<Toast>,
    pub greeting: &'static str,
    pub hostname: String,
}

/// Main application model containing all state
#[derive(Clone)]
pub struct AppModel {
    pub toasts: Toasts,
    pub revision: Revision,
    pub session: SessionStorage,
    pub auth: AuthStore,
    pub stat: StatStore,
    pub music: MusicStore,
    pub user: UserStore,
    pub player: PlayerStore,
    pub chat: ChatStore,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
    hostname: String,
}

impl AppModel {
    pub fn new(
        api: Arc<dyn MusicApi>,
        ctx: StoreContext,
        session: SessionStorage,
        token_file: std::path::PathBuf,
    ) -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            auth: AuthStore::new(api.clone(), &ctx, token_file, session.clone()),
            stat: StatStore::new(api.clone(), &ctx, session.clone()),
            music: MusicStore::new(api.clone(), &ctx),
            user: UserStore::new(api.clone(), &ctx),
            player: PlayerStore::new(&ctx),
            chat: ChatStore::new(api, &ctx),
            toasts: ctx.toasts,
            revision: ctx.revision,
            session,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
            hostname,
        }
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    /// Mutate the UI state and schedule a redraw
    pub async fn update_ui<R>(&self, f: impl FnOnce(&mut UiState) -> R) -> R {
        let result = f(&mut *self.ui_state.lock().await);
        self.revision.bump();
        result
    }

    pub async fn screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    pub async fn set_screen(&self, screen: Screen) {
        self.update_ui(|ui| {
            if ui.screen != screen {
                ui.screen = screen;
                ui.main_selected = 0;
                ui.dialog = None;
                ui.search_editing = false;
                ui.profile_editing = false;
            }
        })
        .await;
    }

    pub async fn toggle_help_popup(&self) {
        self.update_ui(|ui| ui.show_help_popup = !ui.show_help_popup).await;
    }

    pub async fn cycle_section(&self) {
        self.update_ui(|ui| ui.active_section = ui.active_section.toggle()).await;
    }

    pub async fn open_dialog(&self, dialog: Dialog, application_id: Option<String>) {
        self.update_ui(|ui| {
            ui.dialog = Some(dialog);
            if application_id.is_some() {
                ui.selected_application = application_id;
            }
        })
        .await;
    }

    /// Closing the last decision dialog also discards what was typed in it.
    pub async fn close_dialog(&self) {
        self.update_ui(|ui| {
            ui.dialog = match ui.dialog {
                Some(Dialog::Approve) | Some(Dialog::Reject) => Some(Dialog::Details),
                _ => None,
            };
            if !matches!(ui.dialog, Some(Dialog::Approve) | Some(Dialog::Reject)) {
                ui.decision = Default::default();
            }
        })
        .await;
    }

    pub async fn close_all_dialogs(&self) {
        self.update_ui(|ui| {
            ui.dialog = None;
            ui.decision = Default::default();
        })
        .await;
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub async fn quit(&self) {
        *self.should_quit.lock().await = true;
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    /// Remove this run's session snapshots
    pub fn end_session(&self) {
        self.session.clear();
    }

    /// Drop every cached slice after logout
    pub async fn reset_stores(&self) {
        self.stat.reset().await;
        self.music.reset().await;
        self.user.reset().await;
        self.player.reset().await;
        self.chat.reset().await;
        self.update_ui(|ui| {
            let screen = ui.screen;
            *ui = UiState::default();
            ui.screen = screen;
        })
        .await;
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            ui: self.get_ui_state().await,
            auth: self.auth.snapshot().await,
            auth_status: self.auth.status().await,
            stat: self.stat.snapshot().await,
            stat_status: self.stat.status().await,
            music: self.music.snapshot().await,
            music_status: self.music.status().await,
            user: self.user.snapshot().await,
            user_status: self.user.status().await,
            player: self.player.snapshot().await,
            chat: self.chat.snapshot().await,
            toasts: self.toasts.visible().await,
            greeting: greeting_for_hour(Local::now().hour()),
            hostname: self.hostname.clone(),
        }
    }
}

pub fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Morning"
    } else if hour < 18 {
        "Afternoon"
    } else {
        "Evening"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::api::mock::MockApi;

    pub(crate) fn model(dir: &std::path::Path) -> AppModel {
        let revision = Revision::new();
        let ctx = StoreContext::new(Toasts::new(Duration::from_secs(5), revision.clone()), revision);
        AppModel::new(
            Arc::new(MockApi::new()),
            ctx,
            SessionStorage::new(dir.join("session")),
            dir.join("token"),
        )
    }

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_for_hour(0), "Morning");
        assert_eq!(greeting_for_hour(11), "Morning");
        assert_eq!(greeting_for_hour(12), "Afternoon");
        assert_eq!(greeting_for_hour(17), "Afternoon");
        assert_eq!(greeting_for_hour(18), "Evening");
        assert_eq!(greeting_for_hour(23), "Evening");
    }

    #[tokio::test]
    async fn test_closing_decision_dialog_resets_form() {
        let tmp = tempfile::tempdir().unwrap();
        let model = model(tmp.path());
        model.open_dialog(Dialog::Details, Some("a1".into())).await;
        model.open_dialog(Dialog::Reject, None).await;
        model.update_ui(|ui| ui.decision.details = "draft".into()).await;

        model.close_dialog().await;
        let ui = model.get_ui_state().await;
        assert_eq!(ui.dialog, Some(Dialog::Details));
        assert_eq!(ui.selected_application.as_deref(), Some("a1"));
        assert!(ui.decision.details.is_empty());
    }

    #[tokio::test]
    async fn test_end_session_removes_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let model = model(tmp.path());
        model.session.save("stat-storage", &1u8).unwrap();
        assert!(tmp.path().join("session/stat-storage.json").exists());

        model.end_session();
        assert!(!tmp.path().join("session").exists());
    }

    #[tokio::test]
    async fn test_set_screen_resets_cursor() {
        let tmp = tempfile::tempdir().unwrap();
        let model = model(tmp.path());
        model.update_ui(|ui| ui.main_selected = 4).await;
        model.set_screen(Screen::Settings).await;
        let ui = model.get_ui_state().await;
        assert_eq!(ui.screen, Screen::Settings);
        assert_eq!(ui.main_selected, 0);
    }
}
