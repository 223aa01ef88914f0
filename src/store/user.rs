//! User administration store: artist applications and profile edits

use std::sync::Arc;

use crate::api::{ApplicationResponse, ApplicationStatus, ArtistApplication, MusicApi, ProfileUpdate, User};
use super::core::{Store, StoreContext, StoreStatus};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserState {
    pub applications: Vec<ArtistApplication>,
    /// Decisions on applications still being sent
    pub responding: usize,
}

impl UserState {
    pub fn is_responding(&self) -> bool {
        self.responding > 0
    }
}

/// Mirror an accepted decision onto the matching row. The rejection reason
/// only survives a rejection.
pub fn apply_response(applications: &mut [ArtistApplication], id: &str, response: &ApplicationResponse) {
    if let Some(app) = applications.iter_mut().find(|a| a.id == id) {
        app.status = response.status;
        app.details = Some(response.details.clone());
        app.rejection_reason = match response.status {
            ApplicationStatus::Reject => Some(response.rejection_reason.clone()),
            _ => None,
        };
    }
}

#[derive(Clone)]
pub struct UserStore {
    store: Store<UserState>,
    api: Arc<dyn MusicApi>,
}

impl UserStore {
    pub fn new(api: Arc<dyn MusicApi>, ctx: &StoreContext) -> Self {
        Self {
            store: Store::new("user", UserState::default(), ctx),
            api,
        }
    }

    pub async fn snapshot(&self) -> UserState {
        self.store.snapshot().await
    }

    pub async fn status(&self) -> StoreStatus {
        self.store.status().await
    }

    /// `query` is the raw query string of the applications page, e.g.
    /// `status=pending,reject&query=neo`.
    pub async fn get_artist_applications(&self, query: &str) -> Option<Vec<ArtistApplication>> {
        self.store
            .run(
                "applications",
                async { self.api.artist_applications(query).await.map(|p| p.applications) },
                |s, applications| s.applications = applications,
            )
            .await
    }

    /// Every accepted decision is mirrored onto its row, however the calls
    /// overlap.
    pub async fn respond_to_application(&self, id: &str, response: ApplicationResponse) -> Option<()> {
        self.store.update(|s| s.responding += 1).await;
        let result = self
            .store
            .mutate(
                "respond",
                async { self.api.respond_to_application(id, &response).await },
                |s, _| apply_response(&mut s.applications, id, &response),
            )
            .await;
        self.store.update(|s| s.responding = s.responding.saturating_sub(1)).await;

        if result.is_some() {
            tracing::info!(application_id = id, status = %response.status, "Application answered");
            let outcome = match response.status {
                ApplicationStatus::Approve => "approved",
                ApplicationStatus::Reject => "rejected",
                ApplicationStatus::Pending => "moved back to pending",
            };
            self.store.toasts().success(format!("Application {}", outcome)).await;
        }
        result
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Option<User> {
        let user = self
            .store
            .mutate(
                "profile",
                async { self.api.update_profile(update).await.map(|p| p.user) },
                |_, _| {},
            )
            .await?;
        self.store.toasts().success("Profile updated").await;
        Some(user)
    }

    pub async fn reset(&self) {
        self.store.reset(UserState::default()).await;
    }
}
