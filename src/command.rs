use crate::error::{BridgeError, Result};
use serde_json::Value;

pub const CMD_TOGGLE_PLAY: &str = "togglePlay";
pub const CMD_CHANGE_VIDEO: &str = "changeVideo";

/// An imperative instruction the shell dispatches to one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    ChangeVideo { url: String, extra: String },
}

impl Command {
    /// Decodes a by-name dispatch. Name and argument list are checked before
    /// anything reaches a surface, so a bad dispatch never changes playback.
    pub fn parse(name: &str, args: &[Value]) -> Result<Self> {
        match name {
            CMD_TOGGLE_PLAY => {
                if args.is_empty() {
                    Ok(Self::TogglePlay)
                } else {
                    Err(BridgeError::InvalidArgs(format!(
                        "{CMD_TOGGLE_PLAY} takes no arguments, got {}",
                        args.len()
                    )))
                }
            }
            CMD_CHANGE_VIDEO => match args {
                [url, extra] => {
                    let url = url.as_str().ok_or_else(|| {
                        BridgeError::InvalidArgs(format!(
                            "{CMD_CHANGE_VIDEO} url must be a string, got {url}"
                        ))
                    })?;
                    let extra = extra.as_str().ok_or_else(|| {
                        BridgeError::InvalidArgs(format!(
                            "{CMD_CHANGE_VIDEO} extra param must be a string, got {extra}"
                        ))
                    })?;
                    Ok(Self::ChangeVideo {
                        url: url.to_owned(),
                        extra: extra.to_owned(),
                    })
                }
                _ => Err(BridgeError::InvalidArgs(format!(
                    "{CMD_CHANGE_VIDEO} takes a url and an extra param, got {} arguments",
                    args.len()
                ))),
            },
            other => Err(BridgeError::UnknownCommand(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TogglePlay => CMD_TOGGLE_PLAY,
            Self::ChangeVideo { .. } => CMD_CHANGE_VIDEO,
        }
    }

    /// Every command name a surface understands, for shell-side introspection.
    pub fn names() -> [&'static str; 2] {
        [CMD_TOGGLE_PLAY, CMD_CHANGE_VIDEO]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_toggle_play() {
        let command = Command::parse(CMD_TOGGLE_PLAY, &[]).unwrap();
        assert_eq!(command, Command::TogglePlay);
        assert_eq!(command.name(), CMD_TOGGLE_PLAY);
    }

    #[test]
    fn toggle_play_rejects_arguments() {
        let err = Command::parse(CMD_TOGGLE_PLAY, &[json!("stray")]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgs(_)));
    }

    #[test]
    fn parses_change_video() {
        let command =
            Command::parse(CMD_CHANGE_VIDEO, &[json!("https://example.com/b.mp4"), json!("bar")])
                .unwrap();
        assert_eq!(
            command,
            Command::ChangeVideo {
                url: "https://example.com/b.mp4".to_owned(),
                extra: "bar".to_owned(),
            }
        );
        assert_eq!(command.name(), CMD_CHANGE_VIDEO);
    }

    #[test]
    fn change_video_checks_arity() {
        let err = Command::parse(CMD_CHANGE_VIDEO, &[json!("https://example.com/b.mp4")])
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgs(_)));

        let err = Command::parse(CMD_CHANGE_VIDEO, &[]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgs(_)));
    }

    #[test]
    fn change_video_checks_types() {
        let err = Command::parse(CMD_CHANGE_VIDEO, &[json!(1), json!("bar")]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgs(_)));

        let err =
            Command::parse(CMD_CHANGE_VIDEO, &[json!("https://example.com/b.mp4"), json!(null)])
                .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgs(_)));
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = Command::parse("explode", &[]).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownCommand(name) if name == "explode"));
    }

    #[test]
    fn names_lists_both_commands() {
        assert_eq!(Command::names(), [CMD_TOGGLE_PLAY, CMD_CHANGE_VIDEO]);
    }
}
