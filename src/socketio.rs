// Text packets of Engine.IO v4 carrying Socket.IO v5, as sent over a websocket transport. Only
// the default namespace is supported and binary attachments are rejected: the game server never
// uses either.
//
// Examples:
//   0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}   open
//   2                                                                       ping
//   40                                                                      connect
//   42["cc-peel",{"peeling_player":"Alice"}]                                event

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::event::WireEvent;


// Path and query of the websocket endpoint, relative to the server root.
pub const WEBSOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SocketIoError {
    Malformed(String),
    Unsupported(String),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum SocketPacket {
    Connect(Option<serde_json::Value>),
    Disconnect,
    Event { ack_id: Option<u64>, event: WireEvent },
    Ack { ack_id: u64, data: serde_json::Value },
    ConnectError(serde_json::Value),
}

#[derive(Clone, PartialEq, Debug)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(s: &str) -> Result<Self, SocketIoError> {
        let mut chars = s.chars();
        let kind = chars.next().ok_or_else(|| SocketIoError::Malformed("empty packet".to_owned()))?;
        let rest = chars.as_str();
        match kind {
            '0' => serde_json::from_str(rest)
                .map(EnginePacket::Open)
                .map_err(|err| SocketIoError::Malformed(format!("bad open packet: {err}"))),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(rest.to_owned())),
            '3' => Ok(EnginePacket::Pong(rest.to_owned())),
            '4' => SocketPacket::decode(rest).map(EnginePacket::Message),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            _ => Err(SocketIoError::Malformed(format!("unknown engine packet type in {s:?}"))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(handshake) => format!("0{}", json!(handshake)),
            EnginePacket::Close => "1".to_owned(),
            EnginePacket::Ping(data) => format!("2{data}"),
            EnginePacket::Pong(data) => format!("3{data}"),
            EnginePacket::Message(packet) => format!("4{}", packet.encode()),
            EnginePacket::Upgrade => "5".to_owned(),
            EnginePacket::Noop => "6".to_owned(),
        }
    }

    pub fn event(event: WireEvent) -> Self {
        EnginePacket::Message(SocketPacket::Event { ack_id: None, event })
    }
}

impl SocketPacket {
    fn decode(s: &str) -> Result<Self, SocketIoError> {
        let mut chars = s.chars();
        let kind = chars
            .next()
            .ok_or_else(|| SocketIoError::Malformed("empty socket packet".to_owned()))?;
        let rest = chars.as_str();
        if rest.starts_with('/') {
            let namespace = rest.split(',').next().unwrap_or(rest);
            return Err(SocketIoError::Unsupported(format!("namespace {namespace}")));
        }
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let (ack_id, data) = rest.split_at(digits);
        if data.starts_with('-') {
            return Err(SocketIoError::Unsupported("binary attachments".to_owned()));
        }
        let ack_id = if ack_id.is_empty() {
            None
        } else {
            Some(ack_id.parse::<u64>().map_err(|err| SocketIoError::Malformed(err.to_string()))?)
        };
        let parse_data = || -> Result<Option<serde_json::Value>, SocketIoError> {
            if data.is_empty() {
                Ok(None)
            } else {
                serde_json::from_str(data)
                    .map(Some)
                    .map_err(|err| SocketIoError::Malformed(format!("bad packet data: {err}")))
            }
        };
        match kind {
            '0' => Ok(SocketPacket::Connect(parse_data()?)),
            '1' => Ok(SocketPacket::Disconnect),
            '2' => {
                let event = WireEvent::from_json_array(data)
                    .map_err(|err| SocketIoError::Malformed(err.to_string()))?;
                Ok(SocketPacket::Event { ack_id, event })
            }
            '3' => {
                let ack_id =
                    ack_id.ok_or_else(|| SocketIoError::Malformed("ack without id".to_owned()))?;
                Ok(SocketPacket::Ack { ack_id, data: parse_data()?.unwrap_or_default() })
            }
            '4' => Ok(SocketPacket::ConnectError(parse_data()?.unwrap_or_default())),
            '5' | '6' => Err(SocketIoError::Unsupported("binary packets".to_owned())),
            _ => Err(SocketIoError::Malformed(format!("unknown socket packet type in {s:?}"))),
        }
    }

    fn encode(&self) -> String {
        match self {
            SocketPacket::Connect(None) => "0".to_owned(),
            SocketPacket::Connect(Some(auth)) => format!("0{auth}"),
            SocketPacket::Disconnect => "1".to_owned(),
            SocketPacket::Event { ack_id, event } => {
                let ack_id = ack_id.map(|id| id.to_string()).unwrap_or_default();
                format!("2{ack_id}{}", event.to_json_array())
            }
            SocketPacket::Ack { ack_id, data } => format!("3{ack_id}{data}"),
            SocketPacket::ConnectError(data) => format!("4{data}"),
        }
    }
}
