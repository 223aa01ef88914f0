//! Wire types mirrored from the backend
//!
//! Every record is a plain value object. Fields the backend may omit are
//! defaulted so a sparse payload still deserializes.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `{ "data": ... }` envelope wrapping every successful response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    pub avatar_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_artist: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_admin: bool,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub biography: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub followers: Vec<UserRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub following: Vec<UserRef>,
}

impl User {
    /// Two-letter fallback shown where the web client would draw an avatar
    pub fn initials(&self) -> String {
        let source = if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        };
        source.chars().take(2).collect()
    }

    /// Followed users that came back embedded rather than as bare ids
    pub fn following_users(&self) -> Vec<User> {
        self.following
            .iter()
            .filter_map(|r| r.as_user().cloned())
            .collect()
    }
}

/// A follower / following entry: the backend sends either an id or a populated user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    User(Box<User>),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::User(user) => &user.id,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            UserRef::Id(_) => None,
            UserRef::User(user) => Some(user),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Song {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Length in seconds
    #[serde(deserialize_with = "null_as_default")]
    pub duration: u32,
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub views: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approve,
    Reject,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Approve,
        ApplicationStatus::Pending,
        ApplicationStatus::Reject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approve => "approve",
            ApplicationStatus::Reject => "reject",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approve => "Approve",
            ApplicationStatus::Reject => "Reject",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approve" => Ok(ApplicationStatus::Approve),
            "reject" => Ok(ApplicationStatus::Reject),
            other => Err(format!("unknown application status `{}`", other)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistApplication {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: ApplicationStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub submit_date: String,
    pub rejection_reason: Option<String>,
    pub details: Option<String>,
    pub user: Option<User>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralStat {
    #[serde(deserialize_with = "null_as_default")]
    pub total_songs: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_albums: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_users: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_artists: u64,
}

// ----------------------------------------------------------------------------
// Response payloads (the contents of `data`)
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralStatPayload {
    pub general_stat: GeneralStat,
}

#[derive(Debug, Deserialize)]
pub struct SongsPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub songs: Vec<Song>,
}

#[derive(Debug, Deserialize)]
pub struct UsersPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumsPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub albums: Vec<Album>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationsPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub applications: Vec<ArtistApplication>,
}

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: User,
    pub access_token: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresencePayload {
    pub online_users: Vec<String>,
    /// user id -> "Idle" or "Playing <title> by <artist>"
    pub user_activities: HashMap<String, String>,
}

// ----------------------------------------------------------------------------
// Request bodies
// ----------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// Admin decision on an artist application, sent as form fields
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationResponse {
    pub status: ApplicationStatus,
    pub details: String,
    pub rejection_reason: String,
}

/// Profile edit from the settings screen, sent as multipart
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub instagram: String,
    pub twitter: String,
    pub youtube: String,
    pub facebook: String,
    pub website: String,
    pub country: String,
    pub biography: String,
    pub avatar: Option<PathBuf>,
}

impl ProfileUpdate {
    pub fn text_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("fullName", &self.full_name),
            ("instagram", &self.instagram),
            ("twitter", &self.twitter),
            ("youtube", &self.youtube),
            ("facebook", &self.facebook),
            ("website", &self.website),
            ("country", &self.country),
            ("biography", &self.biography),
        ]
    }
}
