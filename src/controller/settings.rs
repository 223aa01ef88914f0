//! Profile editing on the settings screen

use crate::model::ProfileForm;
use super::AppController;

impl AppController {
    /// Save is ignored while the user store is busy.
    pub async fn save_profile(&self) {
        if self.model.user.status().await.is_loading() {
            tracing::debug!("Profile save ignored while a request is in flight");
            return;
        }
        let update = self
            .model
            .update_ui(|ui| {
                ui.profile_editing = false;
                ui.profile.to_update()
            })
            .await;
        if update.full_name.is_empty() {
            self.model.toasts.error("Full name is required").await;
            return;
        }

        self.spawn(|c| async move {
            if let Some(user) = c.model.user.update_profile(&update).await {
                let focus = c.model.get_ui_state().await.profile.focus;
                let mut form = ProfileForm::from_user(&user);
                form.focus = focus;
                c.model.update_ui(|ui| ui.profile = form).await;
                c.model.auth.set_user(user).await;
            }
        });
    }
}
