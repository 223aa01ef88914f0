//! HTTP implementation of [`MusicApi`] on top of reqwest

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use super::error::ApiError;
use super::types::*;
use super::MusicApi;
use crate::{log_api_request, log_api_result};

const USER_AGENT: &str = concat!("spotify-clone-tui/", env!("CARGO_PKG_VERSION"));

/// Backend client holding the base url and the current bearer token
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpApi {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    fn url(&self, path: &str, query: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("Bad endpoint `{}`: {}", path, e)))?;
        let query = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty());
        url.set_query(query);
        Ok(url)
    }

    async fn request(&self, method: Method, path: &str, query: Option<&str>) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, query)?;
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send and unwrap the `data` envelope
    async fn send_for_data<T: DeserializeOwned>(&self, operation: &'static str, builder: RequestBuilder) -> Result<T, ApiError> {
        log_api_request!(operation);
        let result: Result<T, ApiError> = async {
            let response = Self::check_status(builder.send().await?).await?;
            let body: ApiResponse<T> = response.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(body.data)
        }
        .await;
        log_api_result!(operation, result);
        result
    }

    /// Send and ignore any successful body
    async fn send_unit(&self, operation: &'static str, builder: RequestBuilder) -> Result<(), ApiError> {
        log_api_request!(operation);
        let result: Result<(), ApiError> = async {
            Self::check_status(builder.send().await?).await?;
            Ok(())
        }
        .await;
        log_api_result!(operation, result);
        result
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "API error response");
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn get<T: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path, None).await?;
        self.send_for_data(operation, builder).await
    }

    async fn post_unit<B: Serialize + Sync>(&self, operation: &'static str, path: &str, body: &B) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, path, None).await?.json(body);
        self.send_unit(operation, builder).await
    }
}

#[async_trait]
impl MusicApi for HttpApi {
    async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        let builder = self.request(Method::POST, "auth/login", None).await?.json(request);
        self.send_for_data("login", builder).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "auth/logout", None).await?;
        self.send_unit("logout", builder).await
    }

    async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        self.post_unit("send_otp", "auth/send-otp", &serde_json::json!({ "email": email }))
            .await
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        self.post_unit("verify_otp", "auth/verify-otp", request).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.post_unit("reset_password", "auth/reset-password", request).await
    }

    async fn current_user(&self) -> Result<UserPayload, ApiError> {
        self.get("current_user", "users/me").await
    }

    async fn general_stat(&self) -> Result<GeneralStatPayload, ApiError> {
        self.get("general_stat", "stats/general").await
    }

    async fn popular_songs_stat(&self) -> Result<SongsPayload, ApiError> {
        self.get("popular_songs_stat", "stats/popular-songs").await
    }

    async fn top_artists_stat(&self) -> Result<UsersPayload, ApiError> {
        self.get("top_artists_stat", "stats/top-artists").await
    }

    async fn featured_songs(&self) -> Result<SongsPayload, ApiError> {
        self.get("featured_songs", "songs/featured").await
    }

    async fn made_for_you_songs(&self) -> Result<SongsPayload, ApiError> {
        self.get("made_for_you_songs", "songs/made-for-you").await
    }

    async fn trending_songs(&self) -> Result<SongsPayload, ApiError> {
        self.get("trending_songs", "songs/trending").await
    }

    async fn user_liked_albums(&self, user_id: &str) -> Result<AlbumsPayload, ApiError> {
        self.get("user_liked_albums", &format!("albums/liked/{}", user_id)).await
    }

    async fn artist_applications(&self, query: &str) -> Result<ApplicationsPayload, ApiError> {
        let builder = self
            .request(Method::GET, "users/artist-applications", Some(query))
            .await?;
        self.send_for_data("artist_applications", builder).await
    }

    async fn respond_to_application(
        &self,
        application_id: &str,
        response: &ApplicationResponse,
    ) -> Result<(), ApiError> {
        let form = Form::new()
            .text("details", response.details.clone())
            .text("status", response.status.as_str())
            .text("rejectionReason", response.rejection_reason.clone());
        let builder = self
            .request(Method::PUT, &format!("users/artist-applications/{}", application_id), None)
            .await?
            .multipart(form);
        self.send_unit("respond_to_application", builder).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserPayload, ApiError> {
        let mut form = Form::new();
        for (name, value) in update.text_fields() {
            form = form.text(name, value.to_string());
        }

        if let Some(path) = &update.avatar {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ApiError::InvalidRequest(format!("Could not read avatar {}: {}", path.display(), e))
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "avatar".to_string());
            form = form.part("avatar", Part::bytes(bytes).file_name(file_name));
        }

        let builder = self.request(Method::PUT, "users/me", None).await?.multipart(form);
        self.send_for_data("update_profile", builder).await
    }

    async fn presence(&self) -> Result<PresencePayload, ApiError> {
        self.get("presence", "users/activities").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        let base = Url::parse("http://localhost:5000/api/").unwrap();
        HttpApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_joins_relative_paths() {
        let url = api().url("stats/general", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/stats/general");
    }

    #[test]
    fn test_url_carries_raw_query() {
        let url = api()
            .url("users/artist-applications", Some("?status=pending%2Creject"))
            .unwrap();
        assert_eq!(url.query(), Some("status=pending%2Creject"));

        let url = api().url("users/artist-applications", Some("")).unwrap();
        assert_eq!(url.query(), None);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let base = Url::parse("http://127.0.0.1:9/api/").unwrap();
        let api = HttpApi::new(base, Duration::from_secs(2)).unwrap();
        let err = api.general_stat().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    }
}
