//! Presence of followed users for the friends activity panel

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::MusicApi;
use super::core::{Store, StoreContext, StoreStatus};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub online_users: HashSet<String>,
    pub user_activities: HashMap<String, String>,
}

impl ChatState {
    pub fn is_online(&self, user_id: &str) -> bool {
        self.online_users.contains(user_id)
    }

    pub fn activity(&self, user_id: &str) -> Activity {
        self.user_activities
            .get(user_id)
            .map(|raw| Activity::parse(raw))
            .unwrap_or(Activity::Idle)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Playing { title: String, artist: String },
}

impl Activity {
    /// Parse `Playing <title> by <artist>`. Anything else counts as idle.
    /// The last ` by ` separates title and artist so titles may contain it.
    pub fn parse(raw: &str) -> Self {
        let Some(rest) = raw.trim().strip_prefix("Playing ") else {
            return Activity::Idle;
        };
        match rest.rsplit_once(" by ") {
            Some((title, artist)) => Activity::Playing {
                title: title.trim().to_string(),
                artist: artist.trim().to_string(),
            },
            None => Activity::Playing {
                title: rest.trim().to_string(),
                artist: String::new(),
            },
        }
    }
}

#[derive(Clone)]
pub struct ChatStore {
    store: Store<ChatState>,
    api: Arc<dyn MusicApi>,
}

impl ChatStore {
    pub fn new(api: Arc<dyn MusicApi>, ctx: &StoreContext) -> Self {
        Self {
            store: Store::new("chat", ChatState::default(), ctx),
            api,
        }
    }

    pub async fn snapshot(&self) -> ChatState {
        self.store.snapshot().await
    }

    pub async fn status(&self) -> StoreStatus {
        self.store.status().await
    }

    pub async fn get_presence(&self) -> Option<ChatState> {
        self.store
            .run(
                "presence",
                async {
                    self.api.presence().await.map(|p| ChatState {
                        online_users: p.online_users.into_iter().collect(),
                        user_activities: p.user_activities,
                    })
                },
                |s, presence| *s = presence,
            )
            .await
    }

    pub async fn reset(&self) {
        self.store.reset(ChatState::default()).await;
    }
}
