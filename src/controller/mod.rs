//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and turns it into store actions. Store actions go through the network, so
//! they are spawned and never awaited on the input path; the UI loop picks up
//! their results through the revision counter.
//!
//! - `input`: Key event handling
//! - `navigation`: Screen changes, role guards and on-enter fetches
//! - `auth`: Login, logout and the password reset flow
//! - `applications`: Artist application filters and decisions
//! - `settings`: Profile editing
//! - `playback`: Play queue controls

mod input;
mod navigation;
mod auth;
mod applications;
mod settings;
mod playback;

use std::future::Future;

use crate::model::AppModel;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: AppModel,
}

impl AppController {
    pub fn new(model: AppModel) -> Self {
        Self { model }
    }

    /// Run a store action in the background with a handle to this controller
    pub(crate) fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(AppController) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(task(self.clone()));
    }

    /// Restore the saved session, then land on home or on the login screen.
    pub async fn bootstrap(&self) {
        match self.model.auth.restore().await {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Resuming session");
                self.load_layout(&user.id).await;
                self.navigate(crate::model::Screen::Home).await;
            }
            None => self.model.set_screen(crate::model::Screen::Login).await,
        }
    }
}
