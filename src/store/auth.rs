//! Authentication store: current user, bearer token and the password reset flow

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiError, LoginRequest, MusicApi, ResetPasswordRequest, User, VerifyOtpRequest};
use super::core::{Store, StoreContext, StoreStatus};
use super::session::SessionStorage;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// Email the last OTP was sent to
    pub otp_email: Option<String>,
    /// OTP accepted by the backend, needed for the final reset call
    pub verified_otp: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

#[derive(Clone)]
pub struct AuthStore {
    store: Store<AuthState>,
    api: Arc<dyn MusicApi>,
    token_file: PathBuf,
    session: SessionStorage,
}

impl AuthStore {
    pub fn new(
        api: Arc<dyn MusicApi>,
        ctx: &StoreContext,
        token_file: PathBuf,
        session: SessionStorage,
    ) -> Self {
        Self {
            store: Store::new("auth", AuthState::default(), ctx),
            api,
            token_file,
            session,
        }
    }

    pub async fn snapshot(&self) -> AuthState {
        self.store.snapshot().await
    }

    pub async fn status(&self) -> StoreStatus {
        self.store.status().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.store.read(|s| s.user.clone()).await
    }

    /// Replace the cached user after a profile edit
    pub async fn set_user(&self, user: User) {
        self.store.update(|s| s.user = Some(user)).await;
    }

    pub async fn login(&self, email: &str, password: &str) -> Option<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let (user, token) = self
            .store
            .run(
                "user",
                async { self.api.login(&request).await.map(|p| (p.user, p.access_token)) },
                |s, (user, token)| {
                    s.user = Some(user);
                    s.token = Some(token);
                },
            )
            .await?;

        self.api.set_token(Some(token.clone())).await;
        self.save_token(&token);
        tracing::info!(user_id = %user.id, "Logged in");
        Some(user)
    }

    /// Local state is always cleared, even when the backend call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.api.set_token(None).await;
        self.remove_token();
        self.session.clear();
        self.store.reset(AuthState::default()).await;
        tracing::info!("Logged out");
    }

    pub async fn send_otp(&self, email: &str) -> Option<()> {
        let email = email.trim().to_string();
        let sent = email.clone();
        self.store
            .run("otp", async { self.api.send_otp(&email).await }, move |s, ()| {
                s.otp_email = Some(sent);
                s.verified_otp = None;
            })
            .await?;
        self.store.toasts().success(format!("A verification code was sent to {}", email)).await;
        Some(())
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Option<()> {
        let request = VerifyOtpRequest {
            email: email.trim().to_string(),
            otp: otp.trim().to_string(),
        };
        let accepted = request.otp.clone();
        self.store
            .run("otp", async { self.api.verify_otp(&request).await }, move |s, ()| {
                s.verified_otp = Some(accepted);
            })
            .await
    }

    pub async fn reset_password(&self, email: &str, otp: &str, new_password: &str) -> Option<()> {
        let request = ResetPasswordRequest {
            email: email.trim().to_string(),
            otp: otp.trim().to_string(),
            new_password: new_password.to_string(),
        };
        self.store
            .run("otp", async { self.api.reset_password(&request).await }, |s, ()| {
                s.otp_email = None;
                s.verified_otp = None;
            })
            .await?;
        self.store.toasts().success("Password updated. You can log in now.").await;
        Some(())
    }

    pub async fn get_current_user(&self) -> Option<User> {
        self.fetch_current_user(&mut false).await
    }

    /// `rejected` is set when the backend refused the token
    async fn fetch_current_user(&self, rejected: &mut bool) -> Option<User> {
        self.store
            .run(
                "user",
                async {
                    let result = self.api.current_user().await.map(|p| p.user);
                    *rejected = result.as_ref().is_err_and(ApiError::is_unauthorized);
                    result
                },
                |s, user| s.user = Some(user),
            )
            .await
    }

    /// Resume the session saved by a previous run. Without a saved token this
    /// does nothing. A token the backend rejects is forgotten; one that could
    /// not be checked stays on disk for the next start.
    pub async fn restore(&self) -> Option<User> {
        let token = self.load_token()?;
        self.api.set_token(Some(token.clone())).await;
        self.store.update(|s| s.token = Some(token)).await;

        let mut rejected = false;
        let user = self.fetch_current_user(&mut rejected).await;

        match user {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                Some(user)
            }
            None => {
                self.api.set_token(None).await;
                self.store.update(|s| s.token = None).await;
                if rejected {
                    tracing::warn!("Saved session rejected, clearing token");
                    self.remove_token();
                } else {
                    tracing::warn!("Could not verify saved session, keeping token");
                }
                None
            }
        }
    }

    fn load_token(&self) -> Option<String> {
        let token = fs::read_to_string(&self.token_file).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save_token(&self, token: &str) {
        let result = self
            .token_file
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(&self.token_file, token));
        if let Err(e) = result {
            tracing::warn!(path = %self.token_file.display(), error = %e, "Failed to save token");
        }
    }

    fn remove_token(&self) {
        if self.token_file.exists() {
            if let Err(e) = fs::remove_file(&self.token_file) {
                tracing::warn!(path = %self.token_file.display(), error = %e, "Failed to remove token");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use serde_json::json;

    use crate::api::mock::MockApi;
    use crate::store::{Revision, Toasts};

    struct Fixture {
        api: Arc<MockApi>,
        store: AuthStore,
        ctx: StoreContext,
        dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(MockApi::new());
        let revision = Revision::new();
        let ctx = StoreContext::new(Toasts::new(Duration::from_secs(5), revision.clone()), revision);
        let store = AuthStore::new(
            api.clone(),
            &ctx,
            dir.path().join("auth").join("token"),
            SessionStorage::new(dir.path().join("session")),
        );
        Fixture { api, store, ctx, dir }
    }

    fn user_json(id: &str, is_admin: bool) -> serde_json::Value {
        json!({ "id": id, "username": "neo", "fullName": "Neo", "email": "neo@matrix.io", "isAdmin": is_admin })
    }

    #[tokio::test]
    async fn test_login_sets_user_and_token() {
        let f = fixture();
        f.api.reply("login", json!({ "user": user_json("u1", true), "accessToken": "tok-1" }));

        let user = f.store.login(" neo@matrix.io ", "secret").await.unwrap();
        assert_eq!(user.id, "u1");

        let state = f.store.snapshot().await;
        assert!(state.is_authenticated());
        assert!(state.is_admin());
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(f.api.token().as_deref(), Some("tok-1"));
        assert_eq!(f.api.calls(), vec!["login:neo@matrix.io"]);
        assert_eq!(fs::read_to_string(f.dir.path().join("auth/token")).unwrap(), "tok-1");
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let f = fixture();
        f.api.fail("login", ApiError::from_status(401, r#"{"message":"Invalid credentials"}"#));

        assert_eq!(f.store.login("neo@matrix.io", "wrong").await, None);
        assert!(!f.store.snapshot().await.is_authenticated());
        assert_eq!(f.store.status().await.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(f.ctx.toasts.visible().await.len(), 1);
        assert_eq!(f.api.token(), None);
    }

    #[tokio::test]
    async fn test_restore_without_token_does_nothing() {
        let f = fixture();
        assert_eq!(f.store.restore().await, None);
        assert!(f.api.calls().is_empty());
        assert!(f.ctx.toasts.visible().await.is_empty());
    }

    #[tokio::test]
    async fn test_restore_with_saved_token() {
        let f = fixture();
        f.store.save_token("saved");
        f.api.reply("current_user", json!({ "user": user_json("u2", false) }));

        let user = f.store.restore().await.unwrap();
        assert_eq!(user.id, "u2");
        assert_eq!(f.api.token().as_deref(), Some("saved"));
        assert!(!f.store.snapshot().await.is_admin());
    }

    #[tokio::test]
    async fn test_restore_forgets_rejected_token() {
        let f = fixture();
        f.store.save_token("expired");
        f.api.fail("current_user", ApiError::from_status(401, ""));

        assert_eq!(f.store.restore().await, None);
        assert_eq!(f.api.token(), None);
        assert!(!f.dir.path().join("auth/token").exists());
        assert_eq!(f.store.snapshot().await.token, None);
    }

    #[tokio::test]
    async fn test_restore_keeps_token_when_server_unreachable() {
        let f = fixture();
        f.store.save_token("still-good");
        f.api.fail("current_user", ApiError::Network("connection refused".into()));

        assert_eq!(f.store.restore().await, None);
        assert_eq!(f.api.token(), None);
        assert_eq!(f.store.snapshot().await.token, None);
        assert_eq!(fs::read_to_string(f.dir.path().join("auth/token")).unwrap(), "still-good");
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let f = fixture();
        f.api.reply("login", json!({ "user": user_json("u1", false), "accessToken": "tok" }));
        f.store.login("neo@matrix.io", "secret").await;
        f.api.fail("logout", ApiError::Network("down".into()));

        f.store.logout().await;
        assert_eq!(f.store.snapshot().await, AuthState::default());
        assert_eq!(f.api.token(), None);
        assert!(!f.dir.path().join("auth/token").exists());
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let f = fixture();
        f.api.reply("send_otp", json!(null));
        f.api.reply("verify_otp", json!(null));
        f.api.reply("reset_password", json!(null));

        assert_eq!(f.store.send_otp("neo@matrix.io").await, Some(()));
        assert_eq!(f.store.snapshot().await.otp_email.as_deref(), Some("neo@matrix.io"));

        assert_eq!(f.store.verify_otp("neo@matrix.io", "123456").await, Some(()));
        assert_eq!(f.store.snapshot().await.verified_otp.as_deref(), Some("123456"));

        assert_eq!(f.store.reset_password("neo@matrix.io", "123456", "hunter22").await, Some(()));
        let state = f.store.snapshot().await;
        assert_eq!(state.otp_email, None);
        assert_eq!(state.verified_otp, None);
        assert_eq!(
            f.api.calls(),
            vec!["send_otp:neo@matrix.io", "verify_otp:123456", "reset_password:neo@matrix.io"]
        );
    }
}
