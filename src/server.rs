use crate::common::Command;
use crate::{CtlError, Result};
use serde_json::{self, json, Value};
use slog::Logger;
use std::net::{SocketAddr, TcpListener, TcpStream};
use tungstenite::Message;

/// State the simulated device keeps between connections.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    pub value: u8,
    pub enabled: bool,
}

impl DeviceStatus {
    fn apply(&mut self, cmd: Command) -> Value {
        match cmd {
            Command::SetValue(value) => {
                self.value = value;
                json!({ "status": "ok", "value": value })
            }
            Command::Enable(enabled) => {
                self.enabled = enabled;
                json!({ "status": "ok", "enabled": enabled })
            }
            Command::GetStatus => json!({
                "status": "ok",
                "value": self.value,
                "enabled": self.enabled
            }),
        }
    }
}

/// Answers device commands locally, one connection at a time.
pub struct DeviceServer {
    listener: TcpListener,
    log: Logger,
    status: DeviceStatus,
}

impl DeviceServer {
    pub fn bind(addr: &str, log: Logger) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(DeviceServer {
            listener,
            log,
            status: DeviceStatus::default(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn serve(&mut self) -> Result<()> {
        info!(self.log, "Simulator listening"; "addr" => self.local_addr()?);
        loop {
            self.accept_one()?;
        }
    }

    /// Accepts a single connection and serves it until the peer closes.
    pub fn accept_one(&mut self) -> Result<()> {
        let (stream, peer) = self.listener.accept()?;
        info!(self.log, "New connection"; "client addr" => peer);
        if let Err(e) = handle_connection(&mut self.status, &self.log, stream) {
            error!(self.log, "Error while handling connection: {}", e);
        }
        Ok(())
    }
}

fn handle_connection(status: &mut DeviceStatus, log: &Logger, stream: TcpStream) -> Result<()> {
    let mut socket =
        tungstenite::accept(stream).map_err(|e| CtlError::HandshakeError(e.to_string()))?;
    loop {
        let text = match socket.read() {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => String::from_utf8(bytes)?,
            Ok(_) => continue,
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                debug!(log, "Connection closed");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let reply = match serde_json::from_str::<Command>(&text) {
            Ok(cmd) => {
                debug!(log, "Received {} command", cmd.name(); "command" => %cmd);
                status.apply(cmd)
            }
            Err(e) => {
                warn!(log, "Rejected request: {}", e; "request" => &text);
                json!({ "status": "error", "message": e.to_string() })
            }
        };
        socket.send(Message::Text(reply.to_string()))?;
    }
}
