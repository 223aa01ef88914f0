//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::ApplicationStatus;
use crate::model::{ActiveSection, Dialog, Form, Screen, UiState, COUNTRY_FIELD};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.model.quit().await;
            return Ok(());
        }

        let ui = self.model.get_ui_state().await;

        // Handle help popup
        if ui.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h')) {
                self.model.toggle_help_popup().await;
            }
            return Ok(());
        }

        match ui.screen {
            Screen::Loading => {}
            Screen::Login => match key.code {
                KeyCode::Enter => self.submit_login().await,
                KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.open_forgot_password().await
                }
                _ => {
                    self.edit_form(key, |ui| &mut ui.login).await;
                }
            },
            Screen::ForgotPassword => match key.code {
                KeyCode::Esc => self.back_to_login().await,
                KeyCode::Enter => self.submit_forgot_password().await,
                _ => {
                    self.edit_form(key, |ui| &mut ui.forgot_password).await;
                }
            },
            Screen::VerifyOtp => match key.code {
                KeyCode::Esc => self.back_to_login().await,
                KeyCode::Enter => self.submit_otp().await,
                _ => {
                    self.edit_form(key, |ui| &mut ui.otp).await;
                }
            },
            Screen::ResetPassword => match key.code {
                KeyCode::Esc => self.back_to_login().await,
                KeyCode::Enter => self.submit_reset_password().await,
                _ => {
                    self.edit_form(key, |ui| &mut ui.reset_password).await;
                }
            },
            Screen::Home | Screen::AdminDashboard | Screen::ArtistApplications | Screen::Settings => {
                self.handle_main_key(key, &ui).await
            }
        }

        Ok(())
    }

    /// Shared text editing for forms. Returns whether the key was used.
    async fn edit_form<F: Form>(&self, key: KeyEvent, select: fn(&mut UiState) -> &mut F) -> bool {
        self.model
            .update_ui(|ui| {
                let form = select(ui);
                match key.code {
                    KeyCode::Tab | KeyCode::Down => form.focus_next(),
                    KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        form.insert_char(c)
                    }
                    _ => return false,
                }
                true
            })
            .await
    }

    async fn handle_main_key(&self, key: KeyEvent, ui: &UiState) {
        // Text entry and dialogs capture keys before the global bindings
        if ui.screen == Screen::ArtistApplications && self.handle_applications_overlay(key, ui).await {
            return;
        }
        if ui.screen == Screen::Settings && ui.profile_editing {
            self.handle_profile_edit(key).await;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.model.quit().await,
            KeyCode::Char('?') => self.model.toggle_help_popup().await,
            KeyCode::Tab | KeyCode::BackTab => self.model.cycle_section().await,
            KeyCode::Char('r') => self.refresh().await,
            KeyCode::Char('L') => self.logout().await,
            KeyCode::Esc => self.model.toasts.dismiss_latest().await,
            _ => match ui.active_section {
                ActiveSection::Sidebar => match key.code {
                    KeyCode::Up => self.sidebar_move(false).await,
                    KeyCode::Down => self.sidebar_move(true).await,
                    KeyCode::Enter => self.sidebar_open_selected().await,
                    _ => {}
                },
                ActiveSection::MainContent => self.handle_content_key(key, ui).await,
            },
        }
    }

    async fn handle_content_key(&self, key: KeyEvent, ui: &UiState) {
        match ui.screen {
            Screen::Home => match key.code {
                KeyCode::Up | KeyCode::Down => {
                    let len = self.model.player.snapshot().await.queue.len();
                    self.main_move(len, key.code == KeyCode::Down).await;
                }
                KeyCode::Enter => self.play_selected().await,
                KeyCode::Char(' ') => self.play_pause().await,
                KeyCode::Char('n') => self.next_track().await,
                KeyCode::Char('p') => self.previous_track().await,
                _ => {}
            },
            Screen::AdminDashboard => {
                if matches!(key.code, KeyCode::Up | KeyCode::Down) {
                    let len = self.model.stat.snapshot().await.songs.len();
                    self.main_move(len, key.code == KeyCode::Down).await;
                }
            }
            Screen::ArtistApplications => match key.code {
                KeyCode::Up | KeyCode::Down => {
                    let len = self.model.user.snapshot().await.applications.len();
                    self.main_move(len, key.code == KeyCode::Down).await;
                }
                KeyCode::Enter => self.open_application_dialog(Dialog::Details).await,
                KeyCode::Char('a') => self.open_application_dialog(Dialog::Approve).await,
                KeyCode::Char('x') => self.open_application_dialog(Dialog::Reject).await,
                KeyCode::Char('/') => self.model.update_ui(|ui| ui.search_editing = true).await,
                KeyCode::Char('f') => {
                    self.model
                        .update_ui(|ui| {
                            ui.filter.menu_cursor = 0;
                            ui.dialog = Some(Dialog::FilterMenu);
                        })
                        .await
                }
                KeyCode::Char('c') => self.clear_filters().await,
                _ => {}
            },
            Screen::Settings => match key.code {
                KeyCode::Up => self.model.update_ui(|ui| ui.profile.focus_prev()).await,
                KeyCode::Down => self.model.update_ui(|ui| ui.profile.focus_next()).await,
                KeyCode::Left | KeyCode::Right if ui.profile.focus == COUNTRY_FIELD => {
                    let forward = key.code == KeyCode::Right;
                    self.model.update_ui(|ui| ui.profile.cycle_country(forward)).await
                }
                KeyCode::Enter | KeyCode::Char('e') => {
                    self.model.update_ui(|ui| ui.profile_editing = true).await
                }
                KeyCode::Char('s') => self.save_profile().await,
                _ => {}
            },
            _ => {}
        }
    }

    async fn handle_profile_edit(&self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.model.update_ui(|ui| ui.profile_editing = false).await
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                self.model
                    .update_ui(|ui| {
                        if ui.profile.focus == COUNTRY_FIELD {
                            ui.profile.cycle_country(forward);
                        }
                    })
                    .await
            }
            _ => {
                self.edit_form(key, |ui| &mut ui.profile).await;
            }
        }
    }

    /// Search box and dialogs of the applications screen. Returns whether the
    /// key was consumed.
    async fn handle_applications_overlay(&self, key: KeyEvent, ui: &UiState) -> bool {
        if ui.search_editing {
            match key.code {
                KeyCode::Esc => self.model.update_ui(|ui| ui.search_editing = false).await,
                KeyCode::Enter => self.submit_search().await,
                KeyCode::Backspace => {
                    self.model.update_ui(|ui| ui.filter.search.pop()).await;
                }
                KeyCode::Char(c) => self.model.update_ui(|ui| ui.filter.search.push(c)).await,
                _ => {}
            }
            return true;
        }

        let Some(dialog) = ui.dialog else { return false };
        match dialog {
            Dialog::FilterMenu => match key.code {
                KeyCode::Up => {
                    self.model
                        .update_ui(|ui| ui.filter.menu_cursor = ui.filter.menu_cursor.saturating_sub(1))
                        .await
                }
                KeyCode::Down => {
                    self.model
                        .update_ui(|ui| {
                            ui.filter.menu_cursor =
                                (ui.filter.menu_cursor + 1).min(ApplicationStatus::ALL.len() - 1)
                        })
                        .await
                }
                KeyCode::Char(' ') => self.model.update_ui(|ui| ui.filter.toggle_at_cursor()).await,
                KeyCode::Enter => self.apply_filters().await,
                KeyCode::Char('c') => self.clear_filters().await,
                KeyCode::Esc => self.model.close_dialog().await,
                _ => {}
            },
            Dialog::Details => match key.code {
                KeyCode::Char('a') => self.model.open_dialog(Dialog::Approve, None).await,
                KeyCode::Char('x') => self.model.open_dialog(Dialog::Reject, None).await,
                KeyCode::Esc => self.model.close_dialog().await,
                _ => {}
            },
            Dialog::Approve | Dialog::Reject => match key.code {
                KeyCode::Esc => self.model.close_dialog().await,
                KeyCode::Enter => {
                    let status = if dialog == Dialog::Approve {
                        ApplicationStatus::Approve
                    } else {
                        ApplicationStatus::Reject
                    };
                    self.confirm_decision(status).await;
                }
                KeyCode::Left if dialog == Dialog::Reject => {
                    self.model.update_ui(|ui| ui.decision.prev_reason()).await
                }
                KeyCode::Right if dialog == Dialog::Reject => {
                    self.model.update_ui(|ui| ui.decision.next_reason()).await
                }
                KeyCode::Backspace => {
                    self.model.update_ui(|ui| ui.decision.details.pop()).await;
                }
                KeyCode::Char(c) => self.model.update_ui(|ui| ui.decision.details.push(c)).await,
                _ => {}
            },
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::api::mock::MockApi;
    use crate::model::AppModel;
    use crate::store::{Revision, SessionStorage, StoreContext, Toasts};

    fn controller(dir: &std::path::Path) -> AppController {
        let revision = Revision::new();
        let ctx = StoreContext::new(Toasts::new(Duration::from_secs(5), revision.clone()), revision);
        let model = AppModel::new(
            Arc::new(MockApi::new()),
            ctx,
            SessionStorage::new(dir.join("session")),
            dir.join("token"),
        );
        AppController::new(model)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_typing_fills_login_form() {
        let tmp = tempfile::tempdir().unwrap();
        let controller = controller(tmp.path());
        controller.model.set_screen(Screen::Login).await;

        for c in "neo".chars() {
            controller.handle_key_event(press(KeyCode::Char(c))).await.unwrap();
        }
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char('x'))).await.unwrap();
        controller.handle_key_event(press(KeyCode::Backspace)).await.unwrap();

        let login = controller.model.get_ui_state().await.login;
        assert_eq!(login.email, "neo");
        assert_eq!(login.password, "");
        assert_eq!(login.focus, 1);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_any_screen() {
        let tmp = tempfile::tempdir().unwrap();
        let controller = controller(tmp.path());
        controller
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert!(controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn test_search_box_captures_q() {
        let tmp = tempfile::tempdir().unwrap();
        let controller = controller(tmp.path());
        controller.model.set_screen(Screen::ArtistApplications).await;

        controller.handle_key_event(press(KeyCode::Char('/'))).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();

        assert!(!controller.model.should_quit().await);
        assert_eq!(controller.model.get_ui_state().await.filter.search, "q");
    }

    #[tokio::test]
    async fn test_filter_menu_toggle() {
        let tmp = tempfile::tempdir().unwrap();
        let controller = controller(tmp.path());
        controller.model.set_screen(Screen::ArtistApplications).await;

        controller.handle_key_event(press(KeyCode::Char('f'))).await.unwrap();
        controller.handle_key_event(press(KeyCode::Down)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();

        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.dialog, Some(Dialog::FilterMenu));
        assert!(ui.filter.is_active(ApplicationStatus::ALL[1]));
        assert!(ui.filter.query_string().is_empty());
    }
}
