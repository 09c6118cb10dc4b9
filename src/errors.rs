use failure::Fail;
use serde_json;
use std::io;
use std::result;
use std::string::FromUtf8Error;

/// Device control error type
#[derive(Debug, Fail)]
pub enum CtlError {
    #[fail(display = "Device io-error: {}", _0)]
    IOError(io::Error),
    #[fail(display = "Command serialization/Deserialization error: {}", _0)]
    SerDeError(serde_json::error::Error),
    #[fail(display = "WebSocket error: {}", _0)]
    WebSocketError(tungstenite::Error),
    #[fail(display = "WebSocket handshake failed: {}", _0)]
    HandshakeError(String),
    #[fail(display = "Connection closed before the device replied")]
    ClosedBeforeReply,
    #[fail(display = "Device reply is not valid UTF-8")]
    NonTextReply(FromUtf8Error),
    #[fail(display = "Unknown command: {}", _0)]
    UnknownCommand(String),
    #[fail(display = "Invalid value for {}: {}", _0, _1)]
    InvalidValue(String, String),
}

impl From<io::Error> for CtlError {
    fn from(error: io::Error) -> Self {
        CtlError::IOError(error)
    }
}

impl From<serde_json::error::Error> for CtlError {
    fn from(error: serde_json::error::Error) -> Self {
        CtlError::SerDeError(error)
    }
}

impl From<tungstenite::Error> for CtlError {
    fn from(error: tungstenite::Error) -> Self {
        CtlError::WebSocketError(error)
    }
}

impl From<FromUtf8Error> for CtlError {
    fn from(error: FromUtf8Error) -> Self {
        CtlError::NonTextReply(error)
    }
}

/// Device control Result type
pub type Result<T> = result::Result<T, CtlError>;
