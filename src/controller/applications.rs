//! Artist application review: filters, search and decisions

use crate::api::{ApplicationStatus, ArtistApplication};
use crate::model::Dialog;
use super::AppController;

impl AppController {
    fn refetch_applications(&self, query: String) {
        self.spawn(|c| async move { c.load_applications(query).await });
    }

    pub async fn apply_filters(&self) {
        let query = self
            .model
            .update_ui(|ui| {
                ui.dialog = None;
                ui.filter.apply()
            })
            .await;
        self.refetch_applications(query);
    }

    pub async fn clear_filters(&self) {
        let query = self
            .model
            .update_ui(|ui| {
                ui.dialog = None;
                ui.search_editing = false;
                ui.filter.clear()
            })
            .await;
        self.refetch_applications(query);
    }

    pub async fn submit_search(&self) {
        let query = self
            .model
            .update_ui(|ui| {
                ui.search_editing = false;
                ui.filter.submit_search()
            })
            .await;
        self.refetch_applications(query);
    }

    /// Row under the cursor
    pub async fn highlighted_application(&self) -> Option<ArtistApplication> {
        let index = self.model.get_ui_state().await.main_selected;
        self.model.user.snapshot().await.applications.get(index).cloned()
    }

    pub async fn open_application_dialog(&self, dialog: Dialog) {
        if let Some(application) = self.highlighted_application().await {
            self.model.open_dialog(dialog, Some(application.id)).await;
        }
    }

    /// Send the decision typed in the approve or reject dialog
    pub async fn confirm_decision(&self, status: ApplicationStatus) {
        let ui = self.model.get_ui_state().await;
        let Some(id) = ui.selected_application else { return };
        let responding = self.model.user.snapshot().await.is_responding();
        if !ui.decision.can_confirm(status, responding) {
            tracing::debug!(application_id = %id, %status, responding, "Decision not ready");
            return;
        }

        let response = ui.decision.response(status);
        self.spawn(|c| async move {
            if c.model.user.respond_to_application(&id, response).await.is_some() {
                c.model.close_all_dialogs().await;
            }
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
    use crate::model::AppModel;
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
    async fn test_filter_apply_refetches_with_status() {
        let tmp = tempfile::tempdir().unwrap();
        let (api, controller) = controller(tmp.path());
        api.reply("artist_applications", json!({ "applications": [] }));
        controller
            .model
            .update_ui(|ui| ui.filter.toggle(ApplicationStatus::Pending))
            .await;

        controller.apply_filters().await;
        settle().await;
        assert_eq!(api.calls(), vec!["artist_applications:status=pending"]);
    }

    #[tokio::test]
    async fn test_reject_requires_reason_then_updates_row() {
        let tmp = tempfile::tempdir().unwrap();
        let (api, controller) = controller(tmp.path());
        api.reply(
            "artist_applications",
            json!({ "applications": [{ "id": "a1", "status": "pending" }] }),
        );
        api.reply("respond_to_application", json!(null));
        controller.load_applications(String::new()).await;

        controller.open_application_dialog(Dialog::Details).await;
        controller.model.open_dialog(Dialog::Reject, None).await;
        controller.confirm_decision(ApplicationStatus::Reject).await;
        settle().await;
        assert_eq!(api.calls().len(), 1);

        controller.model.update_ui(|ui| ui.decision.next_reason()).await;
        controller.confirm_decision(ApplicationStatus::Reject).await;
        settle().await;

        let app = controller.highlighted_application().await.unwrap();
        assert_eq!(app.status, ApplicationStatus::Reject);
        assert!(app.rejection_reason.is_some());
        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.dialog, None);
        assert_eq!(ui.decision, Default::default());
    }
}
