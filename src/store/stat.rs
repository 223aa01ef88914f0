//! Admin statistics store, persisted for the session

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{GeneralStat, MusicApi, Song, User};
use super::core::{Store, StoreContext, StoreStatus};
use super::session::SessionStorage;

pub const STAT_STORAGE_KEY: &str = "stat-storage";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatState {
    pub general_stat: GeneralStat,
    /// Popular songs
    pub songs: Vec<Song>,
    /// Top artists
    pub users: Vec<User>,
}

#[derive(Clone)]
pub struct StatStore {
    store: Store<StatState>,
    api: Arc<dyn MusicApi>,
    session: SessionStorage,
}

impl StatStore {
    /// Restores the last snapshot of this session, if any.
    pub fn new(api: Arc<dyn MusicApi>, ctx: &StoreContext, session: SessionStorage) -> Self {
        let initial = session.load::<StatState>(STAT_STORAGE_KEY).unwrap_or_default();
        Self {
            store: Store::new("stat", initial, ctx),
            api,
            session,
        }
    }

    pub async fn snapshot(&self) -> StatState {
        self.store.snapshot().await
    }

    pub async fn status(&self) -> StoreStatus {
        self.store.status().await
    }

    pub async fn get_general_stat(&self) -> Option<GeneralStat> {
        let result = self
            .store
            .run(
                "general_stat",
                async { self.api.general_stat().await.map(|p| p.general_stat) },
                |s, stat| s.general_stat = stat,
            )
            .await;
        self.persist().await;
        result
    }

    pub async fn get_popular_songs_stat(&self) -> Option<Vec<Song>> {
        let result = self
            .store
            .run(
                "songs",
                async { self.api.popular_songs_stat().await.map(|p| p.songs) },
                |s, songs| s.songs = songs,
            )
            .await;
        self.persist().await;
        result
    }

    pub async fn get_top_artists_stat(&self) -> Option<Vec<User>> {
        let result = self
            .store
            .run(
                "users",
                async { self.api.top_artists_stat().await.map(|p| p.users) },
                |s, users| s.users = users,
            )
            .await;
        self.persist().await;
        result
    }

    pub async fn reset(&self) {
        self.store.reset(StatState::default()).await;
        self.session.remove(STAT_STORAGE_KEY);
    }

    async fn persist(&self) {
        let state = self.store.snapshot().await;
        if let Err(e) = self.session.save(STAT_STORAGE_KEY, &state) {
            tracing::warn!(error = %e, "Failed to persist stat store");
        }
    }
}
