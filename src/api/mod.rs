//! API module - the backend collaborator
//!
//! Stores never talk HTTP directly. They hold an `Arc<dyn MusicApi>` and call
//! one method per endpoint; each method returns the contents of the response
//! `data` field or a typed [`ApiError`].
//!
//! - `types`: wire records and payloads
//! - `error`: failure kinds
//! - `client`: reqwest implementation

mod client;
mod error;
mod types;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

pub use client::HttpApi;
pub use error::ApiError;
pub use types::{
    Album, AlbumsPayload, ApplicationResponse, ApplicationStatus, ApplicationsPayload,
    ArtistApplication, AuthPayload, GeneralStat, GeneralStatPayload, LoginRequest,
    PresencePayload, ProfileUpdate, ResetPasswordRequest, Song, SongsPayload, User, UserPayload,
    UsersPayload, VerifyOtpRequest,
};

#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Bearer token attached to every following request
    async fn set_token(&self, token: Option<String>);

    // Auth
    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn send_otp(&self, email: &str) -> Result<(), ApiError>;
    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<UserPayload, ApiError>;

    // Stats
    async fn general_stat(&self) -> Result<GeneralStatPayload, ApiError>;
    async fn popular_songs_stat(&self) -> Result<SongsPayload, ApiError>;
    async fn top_artists_stat(&self) -> Result<UsersPayload, ApiError>;

    // Music
    async fn featured_songs(&self) -> Result<SongsPayload, ApiError>;
    async fn made_for_you_songs(&self) -> Result<SongsPayload, ApiError>;
    async fn trending_songs(&self) -> Result<SongsPayload, ApiError>;
    async fn user_liked_albums(&self, user_id: &str) -> Result<AlbumsPayload, ApiError>;

    // Users
    async fn artist_applications(&self, query: &str) -> Result<ApplicationsPayload, ApiError>;
    async fn respond_to_application(
        &self,
        application_id: &str,
        response: &ApplicationResponse,
    ) -> Result<(), ApiError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserPayload, ApiError>;

    // Presence
    async fn presence(&self) -> Result<PresencePayload, ApiError>;
}
