//! Bridge between an application shell and native video playback surfaces.
//!
//! A [`Bridge`] routes by-name property updates, commands and taps to
//! per-surface tasks, each owning one wrapped player behind the
//! [`MediaPlayer`] trait, and reports a single [`VideoFinished`] event per
//! completed playback. [`SimPlayer`] is a deterministic backend for tests
//! and demos.

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod player;

pub use bridge::{Bridge, PlayerFactory, Registry, RegistryBuilder, SurfaceHandle};
pub use command::Command;
pub use config::{ConfigPatch, PlaybackConfig};
pub use error::{BridgeError, Result};
pub use event::{finished_channel, FinishedListener, VideoFinished};
pub use player::{
    MediaPlayer, PlayerObserver, PlayerState, SimPlayer, SurfaceSnapshot, SurfaceState,
};
