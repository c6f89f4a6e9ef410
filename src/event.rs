use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Emitted once per playback when the position reaches the end of the media.
///
/// Field names and values match what the shell side expects to receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFinished {
    pub message: String,
    pub foo: String,
}

/// Sending half handed to a surface at creation; the shell keeps the receiver.
pub type FinishedListener = mpsc::UnboundedSender<VideoFinished>;

pub fn finished_channel() -> (FinishedListener, mpsc::UnboundedReceiver<VideoFinished>) {
    mpsc::unbounded_channel()
}
