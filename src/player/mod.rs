mod sim;
mod surface;

pub use sim::SimPlayer;
pub use surface::{SurfaceSnapshot, SurfaceState};

pub(crate) use surface::{Msg, PlaybackSurface};

use std::sync::Arc;
use std::time::Duration;

/// Loading state of the wrapped player's current media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Empty,
    Loading,
    Ready,
    Failed,
}

/// The capabilities a playback surface needs from a wrapped player.
///
/// Implementations wrap whatever engine actually renders the video; the
/// surface only ever talks to the player through this set.
pub trait MediaPlayer: Send {
    /// Replaces the current media item. An empty url unloads the player.
    fn set_source(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn current_time(&self) -> Duration;
    fn duration(&self) -> Duration;
    /// Registers the observer notified of player-side changes. Called once
    /// per surface, before the first `set_source`.
    fn set_observer(&mut self, observer: Arc<dyn PlayerObserver>);
}

/// Receives player-side notifications. Callbacks may fire from any thread
/// and must not call back into the player.
pub trait PlayerObserver: Send + Sync {
    fn on_state_changed(&self, state: PlayerState);
    fn on_playing_changed(&self, playing: bool);
    fn on_time_updated(&self, position: Duration);
    fn on_buffered_time_updated(&self, buffered: Duration);
}

/// Observer callbacks reified as values so a surface can queue them behind
/// the rest of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerNotice {
    State(PlayerState),
    Playing(bool),
    Time(Duration),
    Buffered(Duration),
}
