use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROP_AUTO_PLAY: &str = "autoPlay";
pub const PROP_SOURCE_URL: &str = "sourceURL";

/// Declarative playback properties of one surface, as the shell last set them.
///
/// Wire names follow the shell side: `autoPlay` and `sourceURL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    #[serde(rename = "autoPlay")]
    pub auto_play: bool,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
}

impl PlaybackConfig {
    /// Decodes a full property map. Unknown keys and mistyped values are
    /// reported instead of being silently dropped.
    pub fn from_json(props: &Value) -> Result<Self> {
        serde_json::from_value(props.clone()).map_err(|e| BridgeError::InvalidProp(e.to_string()))
    }

    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(auto_play) = patch.auto_play {
            self.auto_play = auto_play;
        }
        if let Some(source_url) = patch.source_url {
            self.source_url = source_url;
        }
    }
}

/// A partial update carrying only the properties the shell actually set.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub auto_play: Option<bool>,
    pub source_url: Option<String>,
}

impl ConfigPatch {
    /// Builds a patch from a single named property.
    pub fn from_prop(name: &str, value: &Value) -> Result<Self> {
        match name {
            PROP_AUTO_PLAY => {
                let auto_play = value.as_bool().ok_or_else(|| {
                    BridgeError::InvalidProp(format!(
                        "{PROP_AUTO_PLAY} expects a boolean, got {value}"
                    ))
                })?;
                Ok(Self {
                    auto_play: Some(auto_play),
                    ..Self::default()
                })
            }
            PROP_SOURCE_URL => {
                let source_url = value.as_str().ok_or_else(|| {
                    BridgeError::InvalidProp(format!(
                        "{PROP_SOURCE_URL} expects a string, got {value}"
                    ))
                })?;
                Ok(Self {
                    source_url: Some(source_url.to_owned()),
                    ..Self::default()
                })
            }
            other => Err(BridgeError::UnknownProp(other.to_owned())),
        }
    }
}
