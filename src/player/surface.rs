use super::{MediaPlayer, PlayerNotice, PlayerObserver, PlayerState};
use crate::bridge::SurfaceHandle;
use crate::command::Command;
use crate::config::{ConfigPatch, PlaybackConfig};
use crate::event::{FinishedListener, VideoFinished};
use log::{debug, error, info, trace, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Play/pause lifecycle of one surface, derived from the wrapped player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// A point-in-time view of one surface, answered over its own queue so it
/// reflects every input enqueued before the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub state: SurfaceState,
    pub source: Option<String>,
    pub config: PlaybackConfig,
    pub position: Duration,
    pub duration: Duration,
}

/// Everything a surface task consumes, over a single queue. Property
/// patches, commands, taps, queries and player notices are applied strictly
/// in arrival order.
pub(crate) enum Msg {
    Patch(ConfigPatch),
    Command(Command),
    Tap,
    Snapshot(oneshot::Sender<SurfaceSnapshot>),
    Notice(PlayerNotice),
    Shutdown,
}

/// Forwards observer callbacks into the surface queue, so player-side
/// changes take their turn behind commands instead of preempting them.
struct NoticeForwarder(mpsc::UnboundedSender<Msg>);

impl PlayerObserver for NoticeForwarder {
    fn on_state_changed(&self, state: PlayerState) {
        let _ = self.0.send(Msg::Notice(PlayerNotice::State(state)));
    }

    fn on_playing_changed(&self, playing: bool) {
        let _ = self.0.send(Msg::Notice(PlayerNotice::Playing(playing)));
    }

    fn on_time_updated(&self, position: Duration) {
        let _ = self.0.send(Msg::Notice(PlayerNotice::Time(position)));
    }

    fn on_buffered_time_updated(&self, buffered: Duration) {
        let _ = self.0.send(Msg::Notice(PlayerNotice::Buffered(buffered)));
    }
}

pub(crate) struct PlaybackSurface {
    handle: SurfaceHandle,
    player: Box<dyn MediaPlayer>,
    config: PlaybackConfig,
    state: SurfaceState,
    source: Option<String>,
    finished_emitted: bool,
    listener: Option<FinishedListener>,
}

impl PlaybackSurface {
    pub(crate) fn new(
        handle: SurfaceHandle,
        mut player: Box<dyn MediaPlayer>,
        config: PlaybackConfig,
        listener: Option<FinishedListener>,
        tx: &mpsc::UnboundedSender<Msg>,
    ) -> Self {
        player.set_observer(Arc::new(NoticeForwarder(tx.clone())));
        Self {
            handle,
            player,
            config,
            state: SurfaceState::Idle,
            source: None,
            finished_emitted: false,
            listener,
        }
    }

    pub(crate) async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Msg>) {
        self.configure();
        while let Some(msg) = rx.recv().await {
            match msg {
                Msg::Patch(patch) => {
                    self.config.apply(patch);
                    self.configure();
                }
                Msg::Command(Command::TogglePlay) => self.toggle_play(),
                Msg::Command(Command::ChangeVideo { url, extra }) => {
                    self.change_video(&url, &extra);
                }
                Msg::Tap => {
                    debug!("surface {}: tapped", self.handle);
                    self.toggle_play();
                }
                Msg::Snapshot(reply) => {
                    let _ = reply.send(self.snapshot());
                }
                Msg::Notice(notice) => self.handle_notice(notice),
                Msg::Shutdown => break,
            }
        }
        info!("surface {}: stopped", self.handle);
    }

    /// Reapplies the full property set, as on first mount: the configured
    /// source is reloaded and playback starts when `autoPlay` asks for it or
    /// when the surface was already playing.
    fn configure(&mut self) {
        info!(
            "surface {}: configure source={:?} auto_play={}",
            self.handle, self.config.source_url, self.config.auto_play
        );
        let url = self.config.source_url.clone();
        self.load(&url, self.config.auto_play);
    }

    /// Swaps the playing media without touching the configured properties; a
    /// later property update reverts to the configured source.
    fn change_video(&mut self, url: &str, extra: &str) {
        info!("surface {}: change video to {url:?}", self.handle);
        if !extra.is_empty() {
            debug!("surface {}: extra param {extra:?} ignored", self.handle);
        }
        self.load(url, true);
    }

    fn load(&mut self, url: &str, start: bool) {
        let was_playing = self.player.is_playing();
        if !url.is_empty() && !url.contains("://") {
            warn!(
                "surface {}: source {url:?} has no scheme, handing it to the player as-is",
                self.handle
            );
        }
        self.player.set_source(url);
        self.source = if url.is_empty() {
            None
        } else {
            Some(url.to_owned())
        };
        // A fresh source re-arms the finished event.
        self.finished_emitted = false;
        if start || was_playing {
            self.player.play();
        }
        self.state = if self.player.is_playing() {
            SurfaceState::Playing
        } else if self.player.duration() > Duration::ZERO {
            SurfaceState::Paused
        } else {
            SurfaceState::Idle
        };
    }

    fn toggle_play(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        } else {
            self.player.play();
        }
        self.refresh_state();
    }

    // Finished is sticky: only a fresh source leaves it.
    fn refresh_state(&mut self) {
        if self.player.is_playing() {
            self.state = SurfaceState::Playing;
        } else if self.state != SurfaceState::Finished {
            self.state = if self.player.duration() > Duration::ZERO {
                SurfaceState::Paused
            } else {
                SurfaceState::Idle
            };
        }
    }

    // Notice payloads can be stale by the time the queue gets to them, e.g.
    // a time update from a source that was swapped out one message later.
    // Handlers re-read the player instead of trusting the payload.
    fn handle_notice(&mut self, notice: PlayerNotice) {
        match notice {
            PlayerNotice::State(state) => {
                if state == PlayerState::Failed {
                    error!(
                        "surface {}: player failed to load {:?}",
                        self.handle, self.source
                    );
                } else {
                    debug!("surface {}: player state {state:?}", self.handle);
                }
                self.refresh_state();
            }
            PlayerNotice::Playing(_) => self.refresh_state(),
            PlayerNotice::Time(_) => self.check_finished(),
            PlayerNotice::Buffered(buffered) => {
                trace!(
                    "surface {}: buffered up to {:.1}s",
                    self.handle,
                    buffered.as_secs_f64()
                );
            }
        }
    }

    fn check_finished(&mut self) {
        let position = self.player.current_time();
        let duration = self.player.duration();
        if duration > Duration::ZERO && position >= duration {
            self.state = SurfaceState::Finished;
            if !self.finished_emitted {
                self.finished_emitted = true;
                self.emit_finished();
            }
        }
    }

    fn emit_finished(&self) {
        info!("surface {}: playback finished", self.handle);
        let event = VideoFinished {
            message: "I am finished".to_owned(),
            foo: "bar".to_owned(),
        };
        match &self.listener {
            Some(listener) => {
                if listener.send(event).is_err() {
                    debug!(
                        "surface {}: finished listener went away, dropping event",
                        self.handle
                    );
                }
            }
            None => debug!(
                "surface {}: no finished listener registered, dropping event",
                self.handle
            ),
        }
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            state: self.state,
            source: self.source.clone(),
            config: self.config.clone(),
            position: self.player.current_time(),
            duration: self.player.duration(),
        }
    }
}
