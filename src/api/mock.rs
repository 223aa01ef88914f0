//! Scripted in-memory backend for store tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::*;

type Scripted = (Duration, Result<Value, ApiError>);

/// Each endpoint pops its next scripted reply; the `data` payload is given as
/// JSON so tests read like the wire format.
#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<&'static str, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
    token: Mutex<Option<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, endpoint: &'static str, data: Value) -> &Self {
        self.push(endpoint, Duration::ZERO, Ok(data))
    }

    pub fn reply_after(&self, endpoint: &'static str, delay: Duration, data: Value) -> &Self {
        self.push(endpoint, delay, Ok(data))
    }

    pub fn fail(&self, endpoint: &'static str, error: ApiError) -> &Self {
        self.push(endpoint, Duration::ZERO, Err(error))
    }

    pub fn fail_after(&self, endpoint: &'static str, delay: Duration, error: ApiError) -> &Self {
        self.push(endpoint, delay, Err(error))
    }

    fn push(&self, endpoint: &'static str, delay: Duration, reply: Result<Value, ApiError>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back((delay, reply));
        self
    }

    /// Endpoints called so far, with their argument when there is one
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    async fn respond<T: DeserializeOwned>(&self, endpoint: &'static str, arg: Option<&str>) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push(match arg {
            Some(arg) => format!("{}:{}", endpoint, arg),
            None => endpoint.to_string(),
        });

        let scripted = self
            .replies
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(|q| q.pop_front());
        let (delay, reply) = scripted.unwrap_or_else(|| {
            (Duration::ZERO, Err(ApiError::Network(format!("no reply scripted for {}", endpoint))))
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let value = reply?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn respond_unit(&self, endpoint: &'static str, arg: Option<&str>) -> Result<(), ApiError> {
        self.respond::<Value>(endpoint, arg).await.map(|_| ())
    }
}

#[async_trait]
impl MusicApi for MockApi {
    async fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.respond("login", Some(&request.email)).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.respond_unit("logout", None).await
    }

    async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        self.respond_unit("send_otp", Some(email)).await
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        self.respond_unit("verify_otp", Some(&request.otp)).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.respond_unit("reset_password", Some(&request.email)).await
    }

    async fn current_user(&self) -> Result<UserPayload, ApiError> {
        self.respond("current_user", None).await
    }

    async fn general_stat(&self) -> Result<GeneralStatPayload, ApiError> {
        self.respond("general_stat", None).await
    }

    async fn popular_songs_stat(&self) -> Result<SongsPayload, ApiError> {
        self.respond("popular_songs_stat", None).await
    }

    async fn top_artists_stat(&self) -> Result<UsersPayload, ApiError> {
        self.respond("top_artists_stat", None).await
    }

    async fn featured_songs(&self) -> Result<SongsPayload, ApiError> {
        self.respond("featured_songs", None).await
    }

    async fn made_for_you_songs(&self) -> Result<SongsPayload, ApiError> {
        self.respond("made_for_you_songs", None).await
    }

    async fn trending_songs(&self) -> Result<SongsPayload, ApiError> {
        self.respond("trending_songs", None).await
    }

    async fn user_liked_albums(&self, user_id: &str) -> Result<AlbumsPayload, ApiError> {
        self.respond("user_liked_albums", Some(user_id)).await
    }

    async fn artist_applications(&self, query: &str) -> Result<ApplicationsPayload, ApiError> {
        self.respond("artist_applications", Some(query)).await
    }

    async fn respond_to_application(
        &self,
        application_id: &str,
        response: &ApplicationResponse,
    ) -> Result<(), ApiError> {
        let arg = format!("{}={}", application_id, response.status);
        self.respond_unit("respond_to_application", Some(&arg)).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserPayload, ApiError> {
        self.respond("update_profile", Some(&update.full_name)).await
    }

    async fn presence(&self) -> Result<PresencePayload, ApiError> {
        self.respond("presence", None).await
    }
}
