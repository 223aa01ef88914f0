//! Home feed and library store

use std::sync::Arc;

use crate::api::{Album, MusicApi, Song};
use super::core::{Store, StoreContext, StoreStatus};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MusicState {
    pub featured_songs: Vec<Song>,
    pub made_for_you_songs: Vec<Song>,
    pub trending_songs: Vec<Song>,
    pub liked_albums: Vec<Album>,
}

impl MusicState {
    /// Featured, made-for-you and trending in that order, once all three are loaded
    pub fn home_queue(&self) -> Option<Vec<Song>> {
        if self.featured_songs.is_empty()
            || self.made_for_you_songs.is_empty()
            || self.trending_songs.is_empty()
        {
            return None;
        }
        Some(
            self.featured_songs
                .iter()
                .chain(&self.made_for_you_songs)
                .chain(&self.trending_songs)
                .cloned()
                .collect(),
        )
    }
}

#[derive(Clone)]
pub struct MusicStore {
    store: Store<MusicState>,
    api: Arc<dyn MusicApi>,
}

impl MusicStore {
    pub fn new(api: Arc<dyn MusicApi>, ctx: &StoreContext) -> Self {
        Self {
            store: Store::new("music", MusicState::default(), ctx),
            api,
        }
    }

    pub async fn snapshot(&self) -> MusicState {
        self.store.snapshot().await
    }

    pub async fn status(&self) -> StoreStatus {
        self.store.status().await
    }

    pub async fn get_featured_songs(&self) -> Option<Vec<Song>> {
        self.store
            .run(
                "featured",
                async { self.api.featured_songs().await.map(|p| p.songs) },
                |s, songs| s.featured_songs = songs,
            )
            .await
    }

    pub async fn get_made_for_you_songs(&self) -> Option<Vec<Song>> {
        self.store
            .run(
                "made_for_you",
                async { self.api.made_for_you_songs().await.map(|p| p.songs) },
                |s, songs| s.made_for_you_songs = songs,
            )
            .await
    }

    pub async fn get_trending_songs(&self) -> Option<Vec<Song>> {
        self.store
            .run(
                "trending",
                async { self.api.trending_songs().await.map(|p| p.songs) },
                |s, songs| s.trending_songs = songs,
            )
            .await
    }

    pub async fn get_user_liked_albums(&self, user_id: &str) -> Option<Vec<Album>> {
        self.store
            .run(
                "liked_albums",
                async { self.api.user_liked_albums(user_id).await.map(|p| p.albums) },
                |s, albums| s.liked_albums = albums,
            )
            .await
    }

    pub async fn reset(&self) {
        self.store.reset(MusicState::default()).await;
    }
}
