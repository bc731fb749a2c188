// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.
//
// Helpers for driving clients through the wire format, the way the Socket.IO glue does: every
// event is serialized to a JSON array string and parsed back on the other side.

use std::sync::mpsc;

use wordparty::event::{ClientEvent, ServerEvent, WireEvent};


pub const ROOM: &str = "ROOM";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Recipient {
    All,
    One(usize),
}

impl Recipient {
    #[allow(dead_code)]
    pub fn includes(self, client: usize) -> bool {
        match self {
            Recipient::All => true,
            Recipient::One(id) => id == client,
        }
    }
}

// What the server sees when a client emits `event`.
#[allow(dead_code)]
pub fn to_server(event: &impl ClientEvent) -> WireEvent {
    let text = event.to_wire(ROOM).to_json_array();
    let wire = WireEvent::from_json_array(&text).unwrap();
    assert_eq!(wire.payload["room"], ROOM, "{text}");
    wire
}

#[allow(dead_code)]
pub fn drain_to_server<E: ClientEvent>(rx: &mpsc::Receiver<E>) -> Vec<WireEvent> {
    rx.try_iter().map(|event| to_server(&event)).collect()
}

// What a client sees when the server emits `event`.
#[allow(dead_code)]
pub fn to_client<E: ServerEvent>(event: &WireEvent) -> E {
    let text = event.to_json_array();
    E::from_wire(&WireEvent::from_json_array(&text).unwrap()).unwrap()
}

#[allow(dead_code)]
pub fn payload_usize(event: &WireEvent, key: &str) -> usize {
    event.payload[key].as_u64().unwrap_or_else(|| panic!("{key} missing in {event:?}")) as usize
}

#[allow(dead_code)]
pub fn payload_str<'a>(event: &'a WireEvent, key: &str) -> &'a str {
    event.payload[key].as_str().unwrap_or_else(|| panic!("{key} missing in {event:?}"))
}
