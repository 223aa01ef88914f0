//! Login, logout and the password reset flow

use crate::model::{OtpForm, ResetPasswordForm, Screen};
use super::AppController;

impl AppController {
    pub async fn submit_login(&self) {
        let form = self
            .model
            .update_ui(|ui| ui.login.validate().then(|| ui.login.clone()))
            .await;
        let Some(form) = form else { return };
        if self.model.auth.status().await.is_loading() {
            return;
        }

        self.spawn(|c| async move {
            if let Some(user) = c.model.auth.login(&form.email, &form.password).await {
                c.model.update_ui(|ui| ui.login = Default::default()).await;
                c.model.toasts.success(format!("Welcome back, {}", user.full_name)).await;
                c.load_layout(&user.id).await;
                c.navigate(Screen::Home).await;
            }
        });
    }

    pub async fn submit_forgot_password(&self) {
        let email = self
            .model
            .update_ui(|ui| ui.forgot_password.validate().then(|| ui.forgot_password.email.trim().to_string()))
            .await;
        let Some(email) = email else { return };
        if self.model.auth.status().await.is_loading() {
            return;
        }

        self.spawn(|c| async move {
            if c.model.auth.send_otp(&email).await.is_some() {
                c.model
                    .update_ui(|ui| {
                        ui.otp = OtpForm {
                            email,
                            is_password_reset: true,
                            ..Default::default()
                        };
                    })
                    .await;
                c.model.set_screen(Screen::VerifyOtp).await;
            }
        });
    }

    pub async fn submit_otp(&self) {
        let form = self
            .model
            .update_ui(|ui| ui.otp.validate().then(|| ui.otp.clone()))
            .await;
        let Some(form) = form else { return };
        if self.model.auth.status().await.is_loading() {
            return;
        }

        self.spawn(|c| async move {
            if c.model.auth.verify_otp(&form.email, &form.otp).await.is_none() {
                return;
            }
            if form.is_password_reset {
                c.model
                    .update_ui(|ui| {
                        ui.reset_password = ResetPasswordForm {
                            email: form.email.clone(),
                            otp: form.otp.trim().to_string(),
                            ..Default::default()
                        };
                        ui.otp = Default::default();
                    })
                    .await;
                c.model.set_screen(Screen::ResetPassword).await;
            } else {
                c.model.toasts.success("Email verified. You can log in now.").await;
                c.model.set_screen(Screen::Login).await;
            }
        });
    }

    pub async fn submit_reset_password(&self) {
        let form = self
            .model
            .update_ui(|ui| ui.reset_password.validate().then(|| ui.reset_password.clone()))
            .await;
        let Some(form) = form else { return };
        if self.model.auth.status().await.is_loading() {
            return;
        }

        self.spawn(|c| async move {
            let done = c
                .model
                .auth
                .reset_password(&form.email, &form.otp, &form.password)
                .await;
            if done.is_some() {
                c.model
                    .update_ui(|ui| {
                        ui.reset_password = Default::default();
                        ui.login.email = form.email.clone();
                    })
                    .await;
                c.model.set_screen(Screen::Login).await;
            }
        });
    }

    pub async fn open_forgot_password(&self) {
        if self.model.auth.status().await.is_loading() {
            return;
        }
        let email = self.model.get_ui_state().await.login.email;
        self.model
            .update_ui(|ui| {
                ui.forgot_password = Default::default();
                ui.forgot_password.email = email;
            })
            .await;
        self.model.set_screen(Screen::ForgotPassword).await;
    }

    /// Leaving the reset flow is blocked while a request is in flight.
    pub async fn back_to_login(&self) {
        if self.model.auth.status().await.is_loading() {
            tracing::debug!("Ignoring back to login while a request is in flight");
            return;
        }
        self.model.set_screen(Screen::Login).await;
    }

    pub async fn logout(&self) {
        self.spawn(|c| async move {
            c.model.auth.logout().await;
            c.model.reset_stores().await;
            c.model.set_screen(Screen::Login).await;
            c.model.toasts.info("Logged out").await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use serde_json::json;

    use crate::api::mock::MockApi;
    use crate::model::{AppModel, Form};
    use crate::store::{Revision, SessionStorage, StoreContext, Toasts};

    fn controller(dir: &std::path::Path) -> (Arc<MockApi>, AppController) {
        let api = Arc::new(MockApi::new());
        let revision = Revision::new();
        let ctx = StoreContext::new(Toasts::new(Duration::from_secs(5), revision.clone()), revision);
        let model = AppModel::new(api.clone(), ctx, SessionStorage::new(dir.join("session")), dir.join("token"));
        (api, AppController::new(model))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let tmp = tempfile::tempdir().unwrap();
        let (api, controller) = controller(tmp.path());
        controller.model.set_screen(Screen::ForgotPassword).await;
        for c in "not-an-email".chars() {
            controller.model.update_ui(|ui| ui.forgot_password.insert_char(c)).await;
        }

        controller.submit_forgot_password().await;
        settle().await;

        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.forgot_password.error.as_deref(), Some("Email is invalid"));
        assert_eq!(ui.screen, Screen::ForgotPassword);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_forgot_password_moves_to_otp_with_reset_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let (api, controller) = controller(tmp.path());
        api.reply("send_otp", json!(null));
        controller
            .model
            .update_ui(|ui| ui.forgot_password.email = "neo@matrix.io".into())
            .await;

        controller.submit_forgot_password().await;
        settle().await;

        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.screen, Screen::VerifyOtp);
        assert_eq!(ui.otp.email, "neo@matrix.io");
        assert!(ui.otp.is_password_reset);
    }

    #[tokio::test]
    async fn test_login_lands_on_home() {
        let tmp = tempfile::tempdir().unwrap();
        let (api, controller) = controller(tmp.path());
        api.reply(
            "login",
            json!({ "user": { "id": "u1", "fullName": "Neo" }, "accessToken": "tok" }),
        );
        controller
            .model
            .update_ui(|ui| {
                ui.login.email = "neo@matrix.io".into();
                ui.login.password = "secret".into();
            })
            .await;

        controller.submit_login().await;
        settle().await;

        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.screen, Screen::Home);
        assert!(ui.login.password.is_empty());
        assert!(api.calls().contains(&"user_liked_albums:u1".to_string()));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_open_dashboard() {
        let tmp = tempfile::tempdir().unwrap();
        let (api, controller) = controller(tmp.path());
        api.reply("login", json!({ "user": { "id": "u1" }, "accessToken": "tok" }));
        controller.model.auth.login("neo@matrix.io", "secret").await;
        controller.model.set_screen(Screen::Home).await;

        controller.navigate(Screen::AdminDashboard).await;
        assert_eq!(controller.model.screen().await, Screen::Home);
        assert!(!api.calls().contains(&"general_stat".to_string()));
    }
}
