//! Play queue controls. Only the queue position moves; there is no audio.

use super::AppController;

impl AppController {
    /// Play the row under the cursor of the home queue
    pub async fn play_selected(&self) {
        let index = self.model.get_ui_state().await.main_selected;
        let queue_len = self.model.player.snapshot().await.queue.len();
        if index < queue_len {
            self.model.player.play_at(index).await;
            self.log_now_playing().await;
        }
    }

    pub async fn play_pause(&self) {
        self.model.player.toggle_play().await;
    }

    pub async fn next_track(&self) {
        self.model.player.next().await;
        self.log_now_playing().await;
    }

    pub async fn previous_track(&self) {
        self.model.player.previous().await;
        self.log_now_playing().await;
    }

    async fn log_now_playing(&self) {
        let player = self.model.player.snapshot().await;
        if let Some(song) = player.current_song() {
            tracing::info!(song_id = %song.id, title = %song.title, playing = player.is_playing, "Now playing");
        }
    }
}
