use crate::command::Command;
use crate::config::{ConfigPatch, PlaybackConfig};
use crate::error::{BridgeError, Result};
use crate::event::FinishedListener;
use crate::player::{MediaPlayer, Msg, PlaybackSurface, SurfaceSnapshot};
use log::info;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task;

/// Identifies one live surface. Handles are plain numbers so the shell side
/// can carry them across any boundary; a stale one is reported, not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type PlayerFactory = Box<dyn Fn() -> Box<dyn MediaPlayer> + Send + Sync>;

/// Maps component names to the player factory backing them. Built once up
/// front; nothing registers after [`RegistryBuilder::build`].
pub struct Registry {
    components: HashMap<String, PlayerFactory>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn create_player(&self, component: &str) -> Result<Box<dyn MediaPlayer>> {
        let factory = self
            .components
            .get(component)
            .ok_or_else(|| BridgeError::UnknownComponent(component.to_owned()))?;
        Ok(factory())
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    components: HashMap<String, PlayerFactory>,
}

impl RegistryBuilder {
    pub fn component<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn MediaPlayer> + Send + Sync + 'static,
    {
        self.components.insert(name.to_owned(), Box::new(factory));
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            components: self.components,
        }
    }
}

struct Entry {
    tx: mpsc::UnboundedSender<Msg>,
    component: String,
}

struct Inner {
    registry: Registry,
    surfaces: RwLock<HashMap<SurfaceHandle, Entry>>,
    next_handle: AtomicU64,
}

/// Routes property updates, commands, taps and queries to surfaces by
/// handle. Every mutation is enqueued on the target surface's own queue, so
/// calls from different shell threads never interleave mid-operation.
///
/// Cloning is cheap and every clone drives the same set of surfaces.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<Inner>,
}

impl Bridge {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                surfaces: RwLock::new(HashMap::new()),
                next_handle: AtomicU64::new(1),
            }),
        }
    }

    /// Mounts a new surface for `component` and applies `props` as its
    /// initial configuration. The returned handle is the only way to reach
    /// the surface afterwards.
    pub async fn create_surface(
        &self,
        component: &str,
        props: PlaybackConfig,
        listener: Option<FinishedListener>,
    ) -> Result<SurfaceHandle> {
        let player = self.inner.registry.create_player(component)?;
        let handle = SurfaceHandle(self.inner.next_handle.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = PlaybackSurface::new(handle, player, props, listener, &tx);
        task::spawn(surface.run(rx));
        self.inner.surfaces.write().await.insert(
            handle,
            Entry {
                tx,
                component: component.to_owned(),
            },
        );
        info!("created surface {handle} for component {component:?}");
        Ok(handle)
    }

    /// Unmounts a surface. Inputs already queued are still applied before
    /// the surface task stops.
    pub async fn destroy_surface(&self, handle: SurfaceHandle) -> Result<()> {
        let entry = self
            .inner
            .surfaces
            .write()
            .await
            .remove(&handle)
            .ok_or(BridgeError::SurfaceNotFound(handle))?;
        let _ = entry.tx.send(Msg::Shutdown);
        info!(
            "destroyed surface {handle} for component {:?}",
            entry.component
        );
        Ok(())
    }

    /// Updates one property by wire name, e.g. `"autoPlay"` or
    /// `"sourceURL"`. The surface reapplies its full configuration.
    pub async fn set_prop(&self, handle: SurfaceHandle, name: &str, value: &Value) -> Result<()> {
        let patch = ConfigPatch::from_prop(name, value)?;
        self.send(handle, Msg::Patch(patch)).await
    }

    pub async fn patch_props(&self, handle: SurfaceHandle, patch: ConfigPatch) -> Result<()> {
        self.send(handle, Msg::Patch(patch)).await
    }

    pub async fn dispatch(&self, handle: SurfaceHandle, command: Command) -> Result<()> {
        self.send(handle, Msg::Command(command)).await
    }

    /// Decodes and dispatches a by-name command with JSON arguments, the
    /// form a shell-side caller sends. A bad name or argument list is
    /// reported without touching the surface.
    pub async fn dispatch_by_name(
        &self,
        handle: SurfaceHandle,
        name: &str,
        args: &[Value],
    ) -> Result<()> {
        let command = Command::parse(name, args)?;
        self.dispatch(handle, command).await
    }

    /// A tap on the rendered view, which toggles play/pause.
    pub async fn tap(&self, handle: SurfaceHandle) -> Result<()> {
        self.send(handle, Msg::Tap).await
    }

    /// Asks the surface for its current state. The answer reflects every
    /// input enqueued before this call.
    pub async fn snapshot(&self, handle: SurfaceHandle) -> Result<SurfaceSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(handle, Msg::Snapshot(reply_tx)).await?;
        reply_rx
            .await
            .map_err(|_| BridgeError::SurfaceClosed(handle))
    }

    async fn send(&self, handle: SurfaceHandle, msg: Msg) -> Result<()> {
        let surfaces = self.inner.surfaces.read().await;
        let entry = surfaces
            .get(&handle)
            .ok_or(BridgeError::SurfaceNotFound(handle))?;
        entry
            .tx
            .send(msg)
            .map_err(|_| BridgeError::SurfaceClosed(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::SimPlayer;
    use std::time::Duration;

    #[test]
    fn registry_lists_components_sorted() {
        let registry = Registry::builder()
            .component("video", || {
                Box::new(SimPlayer::new(Duration::from_secs(5)))
            })
            .component("audio", || {
                Box::new(SimPlayer::new(Duration::from_secs(5)))
            })
            .build();
        assert_eq!(registry.component_names(), ["audio", "video"]);
    }

    #[test]
    fn registry_reports_unknown_component() {
        let registry = Registry::builder().build();
        let err = registry.create_player("video").map(|_| ()).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownComponent(name) if name == "video"));
    }

    #[test]
    fn handles_round_trip_through_raw() {
        let handle = SurfaceHandle::from_raw(7);
        assert_eq!(handle.raw(), 7);
        assert_eq!(handle.to_string(), "7");
    }
}
