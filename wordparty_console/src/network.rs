// Socket.IO client over a blocking tungstenite websocket. A single thread owns the socket: short
// read timeouts let it interleave incoming packets with outgoing events.

use std::io;
use std::net::TcpStream;
use std::time::Duration;

use tungstenite::client::IntoClientRequest;
use tungstenite::http::HeaderValue;
use tungstenite::http::header::COOKIE;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};
use url::Url;

use wordparty::event::WireEvent;
use wordparty::socketio::{EnginePacket, OpenHandshake, SocketIoError, SocketPacket, WEBSOCKET_PATH};


pub const READ_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    SocketIo(SocketIoError),
    Url(url::ParseError),
    Protocol(String),
}

impl std::fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunicationError::Socket(err) => write!(f, "websocket error: {err}"),
            CommunicationError::SocketIo(err) => write!(f, "socket.io error: {err:?}"),
            CommunicationError::Url(err) => write!(f, "bad server address: {err}"),
            CommunicationError::Protocol(message) => write!(f, "protocol error: {message}"),
        }
    }
}

impl std::error::Error for CommunicationError {}

impl From<tungstenite::Error> for CommunicationError {
    fn from(err: tungstenite::Error) -> Self { CommunicationError::Socket(err) }
}

impl From<SocketIoError> for CommunicationError {
    fn from(err: SocketIoError) -> Self { CommunicationError::SocketIo(err) }
}

// Accepts "host:port" as well as full http(s) or ws(s) URLs.
pub fn websocket_url(server_address: &str) -> Result<Url, CommunicationError> {
    let base = if let Some(rest) = server_address.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server_address.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if server_address.starts_with("ws://") || server_address.starts_with("wss://") {
        server_address.to_owned()
    } else {
        format!("ws://{server_address}")
    };
    let base = Url::parse(&base).map_err(CommunicationError::Url)?;
    base.join(WEBSOCKET_PATH).map_err(CommunicationError::Url)
}

pub struct Connection {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    handshake: OpenHandshake,
}

impl Connection {
    // Performs both the Engine.IO handshake and the Socket.IO namespace connect.
    pub fn open(server_address: &str, cookie: &str) -> Result<Self, CommunicationError> {
        let url = websocket_url(server_address)?;
        log::info!("Connecting to {url}");
        let mut request = url.as_str().into_client_request()?;
        let cookie = HeaderValue::from_str(cookie)
            .map_err(|err| CommunicationError::Protocol(format!("bad cookie: {err}")))?;
        request.headers_mut().insert(COOKIE, cookie);
        let (mut socket, _) = tungstenite::connect(request)?;

        let handshake = match read_packet(&mut socket)? {
            EnginePacket::Open(handshake) => handshake,
            packet => {
                return Err(CommunicationError::Protocol(format!(
                    "expected open packet, got {packet:?}"
                )));
            }
        };
        log::info!("Engine.IO session {}", handshake.sid);
        send_packet(&mut socket, &EnginePacket::Message(SocketPacket::Connect(None)))?;
        loop {
            match read_packet(&mut socket)? {
                EnginePacket::Message(SocketPacket::Connect(_)) => break,
                EnginePacket::Message(SocketPacket::ConnectError(data)) => {
                    return Err(CommunicationError::Protocol(format!("connect refused: {data}")));
                }
                EnginePacket::Ping(data) => send_packet(&mut socket, &EnginePacket::Pong(data))?,
                packet => log::debug!("Ignoring {packet:?} before connect"),
            }
        }
        set_read_timeout(&mut socket, Some(READ_TIMEOUT))?;
        Ok(Connection { socket, handshake })
    }

    pub fn handshake(&self) -> &OpenHandshake { &self.handshake }

    pub fn send(&mut self, event: WireEvent) -> Result<(), CommunicationError> {
        log::debug!("-> {}", event.to_json_array());
        send_packet(&mut self.socket, &EnginePacket::event(event))
    }

    // Waits up to `READ_TIMEOUT` for the next event. Keep-alive is handled here.
    pub fn poll(&mut self) -> Result<Option<WireEvent>, CommunicationError> {
        let packet = match self.socket.read() {
            Ok(Message::Text(text)) => EnginePacket::decode(text.as_str())?,
            Ok(Message::Close(_)) => {
                return Err(CommunicationError::Protocol("server closed the connection".to_owned()));
            }
            Ok(_) => return Ok(None),
            Err(tungstenite::Error::Io(err))
                if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
            {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        match packet {
            EnginePacket::Ping(data) => {
                send_packet(&mut self.socket, &EnginePacket::Pong(data))?;
                Ok(None)
            }
            EnginePacket::Message(SocketPacket::Event { event, .. }) => {
                log::debug!("<- {}", event.to_json_array());
                Ok(Some(event))
            }
            EnginePacket::Close | EnginePacket::Message(SocketPacket::Disconnect) => {
                Err(CommunicationError::Protocol("server disconnected".to_owned()))
            }
            packet => {
                log::debug!("Ignoring {packet:?}");
                Ok(None)
            }
        }
    }
}

fn send_packet<S: io::Read + io::Write>(
    socket: &mut WebSocket<S>, packet: &EnginePacket,
) -> Result<(), CommunicationError> {
    socket.send(Message::text(packet.encode()))?;
    Ok(())
}

fn read_packet<S: io::Read + io::Write>(
    socket: &mut WebSocket<S>,
) -> Result<EnginePacket, CommunicationError> {
    loop {
        match socket.read()? {
            Message::Text(text) => return Ok(EnginePacket::decode(text.as_str())?),
            Message::Close(_) => {
                return Err(CommunicationError::Protocol("server closed the connection".to_owned()));
            }
            _ => {}
        }
    }
}

fn set_read_timeout(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>, timeout: Option<Duration>,
) -> Result<(), CommunicationError> {
    let result = match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(timeout),
        MaybeTlsStream::NativeTls(stream) => stream.get_mut().set_read_timeout(timeout),
        _ => Ok(()),
    };
    result.map_err(|err| CommunicationError::Socket(tungstenite::Error::Io(err)))
}
