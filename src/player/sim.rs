use super::{MediaPlayer, PlayerNotice, PlayerObserver, PlayerState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A wrapped player with no real decoder behind it.
///
/// Any url with a scheme loads instantly with a fixed track length and a
/// fully buffered item; the clock only moves when [`SimPlayer::advance`] is
/// called, which keeps behavior deterministic for tests and demos. Clones
/// share one underlying player, so a test can hold a handle to the same
/// instance a surface drives.
#[derive(Clone)]
pub struct SimPlayer {
    core: Arc<Mutex<Core>>,
}

struct Core {
    track_len: Duration,
    source: Option<String>,
    state: PlayerState,
    playing: bool,
    position: Duration,
    duration: Duration,
    observer: Option<Arc<dyn PlayerObserver>>,
}

impl SimPlayer {
    pub fn new(track_len: Duration) -> Self {
        Self {
            core: Arc::new(Mutex::new(Core {
                track_len,
                source: None,
                state: PlayerState::Empty,
                playing: false,
                position: Duration::ZERO,
                duration: Duration::ZERO,
                observer: None,
            })),
        }
    }

    /// Moves the simulated clock forward. Does nothing unless playing; stops
    /// at the end of the track and reports the stop through the observer.
    pub fn advance(&self, dt: Duration) {
        let (observer, pending) = {
            let mut core = self.lock();
            let mut pending = Vec::new();
            if core.playing {
                core.position = core.position.saturating_add(dt).min(core.duration);
                pending.push(PlayerNotice::Time(core.position));
                if core.position >= core.duration {
                    core.playing = false;
                    pending.push(PlayerNotice::Playing(false));
                }
            }
            (core.observer.clone(), pending)
        };
        emit(observer.as_ref(), &pending);
    }

    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaPlayer for SimPlayer {
    fn set_source(&mut self, url: &str) {
        let (observer, pending) = {
            let mut core = self.lock();
            let mut pending = Vec::new();
            if core.playing {
                core.playing = false;
                pending.push(PlayerNotice::Playing(false));
            }
            core.position = Duration::ZERO;
            if url.is_empty() {
                core.source = None;
                core.duration = Duration::ZERO;
                core.state = PlayerState::Empty;
            } else if url.contains("://") {
                core.source = Some(url.to_owned());
                core.duration = core.track_len;
                core.state = PlayerState::Ready;
            } else {
                core.source = None;
                core.duration = Duration::ZERO;
                core.state = PlayerState::Failed;
            }
            pending.push(PlayerNotice::State(core.state));
            if core.state == PlayerState::Ready {
                pending.push(PlayerNotice::Buffered(core.duration));
            }
            (core.observer.clone(), pending)
        };
        emit(observer.as_ref(), &pending);
    }

    fn play(&mut self) {
        let (observer, pending) = {
            let mut core = self.lock();
            let mut pending = Vec::new();
            let at_end = core.duration > Duration::ZERO && core.position >= core.duration;
            if core.source.is_some() && !core.playing && !at_end {
                core.playing = true;
                pending.push(PlayerNotice::Playing(true));
            }
            (core.observer.clone(), pending)
        };
        emit(observer.as_ref(), &pending);
    }

    fn pause(&mut self) {
        let (observer, pending) = {
            let mut core = self.lock();
            let mut pending = Vec::new();
            if core.playing {
                core.playing = false;
                pending.push(PlayerNotice::Playing(false));
            }
            (core.observer.clone(), pending)
        };
        emit(observer.as_ref(), &pending);
    }

    fn is_playing(&self) -> bool {
        self.lock().playing
    }

    fn current_time(&self) -> Duration {
        self.lock().position
    }

    fn duration(&self) -> Duration {
        self.lock().duration
    }

    fn set_observer(&mut self, observer: Arc<dyn PlayerObserver>) {
        self.lock().observer = Some(observer);
    }
}

// Callbacks fire after the core lock is released, so an observer may call
// back into accessors without deadlocking.
fn emit(observer: Option<&Arc<dyn PlayerObserver>>, pending: &[PlayerNotice]) {
    let Some(observer) = observer else { return };
    for notice in pending {
        match *notice {
            PlayerNotice::State(state) => observer.on_state_changed(state),
            PlayerNotice::Playing(playing) => observer.on_playing_changed(playing),
            PlayerNotice::Time(position) => observer.on_time_updated(position),
            PlayerNotice::Buffered(buffered) => observer.on_buffered_time_updated(buffered),
        }
    }
}
