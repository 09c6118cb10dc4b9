use serde_json;
use slog::Logger;
use std::io;
use std::net::TcpStream;
use std::time::Duration;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::common::{Command, Response};
use crate::{CtlError, Result};

/// How long to wait for the device to answer our close frame.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// A connection to the device that lives for exactly one command.
///
/// Every command method consumes the client: the frame is sent, the single
/// reply is read and the connection is closed before the method returns.
pub struct DeviceClient {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    log: Logger,
    close_timeout: Duration,
}

impl DeviceClient {
    pub fn connect(url: &str, log: Logger) -> Result<Self> {
        debug!(log, "Connecting to device"; "url" => url);
        let (socket, _) = tungstenite::connect(url)?;
        let log = log.new(o!("url" => url.to_owned()));
        Ok(DeviceClient {
            socket,
            log,
            close_timeout: CLOSE_TIMEOUT,
        })
    }

    /// Bounds the closing handshake. Defaults to `CLOSE_TIMEOUT`.
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    pub fn send_command(mut self, cmd: Command) -> Result<Response> {
        let payload = serde_json::to_string(&cmd)?;
        self.socket.send(Message::Text(payload))?;
        info!(self.log, "Sent {} command", cmd.name(); "command" => %cmd);
        let res = self.receive()?;
        info!(self.log, "Received response"; "response" => res.as_str());
        self.close();
        Ok(res)
    }

    pub fn set_value(self, value: u8) -> Result<Response> {
        self.send_command(Command::SetValue(value))
    }

    pub fn get_status(self) -> Result<Response> {
        self.send_command(Command::GetStatus)
    }

    pub fn enable(self, state: bool) -> Result<Response> {
        self.send_command(Command::Enable(state))
    }

    fn receive(&mut self) -> Result<Response> {
        loop {
            match self.socket.read()? {
                Message::Text(text) => return Ok(Response::new(text)),
                Message::Binary(bytes) => return Ok(Response::new(String::from_utf8(bytes)?)),
                Message::Close(frame) => {
                    debug!(self.log, "Device closed the connection: {:?}", frame);
                    return Err(CtlError::ClosedBeforeReply);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    // The reply is already in hand, so a failed closing handshake is only logged.
    fn close(mut self) {
        if let MaybeTlsStream::Plain(stream) = self.socket.get_mut() {
            if let Err(e) = stream.set_read_timeout(Some(self.close_timeout)) {
                warn!(self.log, "Could not bound closing handshake: {}", e);
            }
        }
        if let Err(e) = self.socket.close(None) {
            match e {
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {}
                e => warn!(self.log, "Error while closing connection: {}", e),
            }
            return;
        }
        loop {
            match self.socket.read() {
                Ok(_) => continue,
                Err(tungstenite::Error::ConnectionClosed)
                | Err(tungstenite::Error::AlreadyClosed) => break,
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    warn!(
                        self.log,
                        "Device did not finish closing handshake within {:?}", self.close_timeout
                    );
                    return;
                }
                Err(e) => {
                    warn!(self.log, "Error while closing connection: {}", e);
                    return;
                }
            }
        }
        debug!(self.log, "Connection closed");
    }
}

/// Opens a connection, sends `cmd`, returns the reply and closes.
pub fn execute(url: &str, cmd: Command, log: &Logger) -> Result<Response> {
    DeviceClient::connect(url, log.clone())?.send_command(cmd)
}

/// Runs `cmds` in order, each on its own connection, handing every reply to
/// `on_response` as soon as it arrives. Stops at the first error.
pub fn run_sequence<F>(url: &str, cmds: &[Command], log: &Logger, mut on_response: F) -> Result<()>
where
    F: FnMut(Command, Response),
{
    for &cmd in cmds {
        on_response(cmd, execute(url, cmd, log)?);
    }
    Ok(())
}
