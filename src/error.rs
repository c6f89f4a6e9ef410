use crate::bridge::SurfaceHandle;
use flexi_logger::FlexiLoggerError;
use std::env::VarError;
use std::io::Error as IoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("no surface with handle {0}")]
    SurfaceNotFound(SurfaceHandle),
    #[error("surface {0} is no longer running")]
    SurfaceClosed(SurfaceHandle),
    #[error("unknown component: {0}")]
    UnknownComponent(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid command arguments: {0}")]
    InvalidArgs(String),
    #[error("unknown property: {0}")]
    UnknownProp(String),
    #[error("invalid property value: {0}")]
    InvalidProp(String),
    #[error("IO error occurred: {0}")]
    Io(#[from] IoError),
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] VarError),
    #[error("Error parsing configuration: {0}")]
    ConfigParsing(#[from] toml::de::Error),
    #[error("Logger error: {0}")]
    Logger(#[from] FlexiLoggerError),
}
