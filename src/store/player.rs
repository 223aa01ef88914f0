//! Play queue. Pure client state: nothing here reaches the backend or an
//! audio device.

use crate::api::Song;
use super::core::{Store, StoreContext};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub queue: Vec<Song>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
}

impl PlayerState {
    pub fn current_song(&self) -> Option<&Song> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    fn initialize_queue(&mut self, songs: Vec<Song>) {
        self.current_index = match self.current_index {
            _ if songs.is_empty() => None,
            Some(i) if i < songs.len() => Some(i),
            _ => Some(0),
        };
        self.queue = songs;
    }

    fn play_at(&mut self, index: usize) {
        if index < self.queue.len() {
            self.current_index = Some(index);
            self.is_playing = true;
        }
    }

    /// Past the end of the queue playback stops on the last song.
    fn next(&mut self) {
        match self.current_index {
            Some(i) if i + 1 < self.queue.len() => self.play_at(i + 1),
            None if !self.queue.is_empty() => self.play_at(0),
            _ => self.is_playing = false,
        }
    }

    fn previous(&mut self) {
        match self.current_index {
            Some(i) if i > 0 => self.play_at(i - 1),
            _ => self.is_playing = false,
        }
    }
}

#[derive(Clone)]
pub struct PlayerStore {
    store: Store<PlayerState>,
}

impl PlayerStore {
    pub fn new(ctx: &StoreContext) -> Self {
        Self {
            store: Store::new("player", PlayerState::default(), ctx),
        }
    }

    pub async fn snapshot(&self) -> PlayerState {
        self.store.snapshot().await
    }

    pub async fn initialize_queue(&self, songs: Vec<Song>) {
        tracing::debug!(songs = songs.len(), "Queue initialized");
        self.store.update(|s| s.initialize_queue(songs)).await;
    }

    pub async fn play_at(&self, index: usize) {
        self.store.update(|s| s.play_at(index)).await;
    }

    pub async fn toggle_play(&self) {
        self.store
            .update(|s| s.is_playing = !s.is_playing && s.current_song().is_some())
            .await;
    }

    pub async fn next(&self) {
        self.store.update(PlayerState::next).await;
    }

    pub async fn previous(&self) {
        self.store.update(PlayerState::previous).await;
    }

    pub async fn reset(&self) {
        self.store.reset(PlayerState::default()).await;
    }
}
