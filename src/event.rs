// Real-time events exchanged with the game server. Each game has a closed set of inbound
// (`*ServerEvent`) and outbound (`*ClientEvent`) events. On the wire an event is a Socket.IO
// event name plus a JSON payload; every outbound payload carries the room name.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::coord::{BoardPosition, ShiftDirection};
use crate::countdown::EpochMillis;
use crate::error::EventError;
use crate::team::{Team, TileOwner};


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum GameKind {
    TileBoard,
    TeamGuess,
    ScrambledWords,
}

#[derive(Clone, PartialEq, Debug)]
pub struct WireEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

impl WireEvent {
    pub fn new(name: &str, payload: serde_json::Value) -> Self {
        WireEvent { name: name.to_owned(), payload }
    }

    // `["name", payload]`, i.e. the arguments of `socket.emit`.
    pub fn to_json_array(&self) -> String { json!([self.name, self.payload]).to_string() }

    pub fn from_json_array(s: &str) -> Result<Self, EventError> {
        let malformed = |message: String| EventError::MalformedPayload {
            event: "<unknown>".to_owned(),
            message,
        };
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|err| malformed(err.to_string()))?;
        let serde_json::Value::Array(mut items) = value else {
            return Err(malformed(format!("expected array, got {s}")));
        };
        if items.is_empty() || items.len() > 2 {
            return Err(malformed(format!("expected [name, payload], got {s}")));
        }
        let payload = if items.len() == 2 { items.pop().unwrap_or_default() } else { json!({}) };
        let Some(serde_json::Value::String(name)) = items.pop() else {
            return Err(malformed(format!("event name must be a string: {s}")));
        };
        Ok(WireEvent { name, payload })
    }

    fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, EventError> {
        serde_json::from_value(self.payload.clone()).map_err(|err| EventError::MalformedPayload {
            event: self.name.clone(),
            message: err.to_string(),
        })
    }
}

pub trait ServerEvent: Sized {
    fn from_wire(event: &WireEvent) -> Result<Self, EventError>;
}

pub trait ClientEvent {
    fn to_wire(&self, room: &str) -> WireEvent;
}

fn with_room(room: &str, mut payload: serde_json::Value) -> serde_json::Value {
    if let serde_json::Value::Object(ref mut map) = payload {
        map.insert("room".to_owned(), json!(room));
    }
    payload
}


// ---------------------------------------------------------------------------------------------
// Tile-board game

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PlayerBoard {
    pub hand_tiles: Vec<char>,
    pub board: Vec<Vec<Option<char>>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub num_players: u32,
    pub tiles_left: i32, // -1 until the first game starts
    pub players: HashMap<String, PlayerBoard>,
    pub game_running: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TileBoardServerEvent {
    Peeled { peeling_player: String },
    PeelRejected { invalid_positions: Vec<BoardPosition> },
    UpdateRequested { message: Option<String> },
    BoardUpdated(BoardSnapshot),
    GameOver { winning_player: String },
}

#[derive(Deserialize)]
struct PeelPayload {
    peeling_player: String,
}

#[derive(Deserialize)]
struct UnsuccessfulPeelPayload {
    invalid_positions: Vec<BoardPosition>,
}

#[derive(Deserialize)]
struct RequestUpdatePayload {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct TileBoardGameOverPayload {
    winning_player: String,
}

impl ServerEvent for TileBoardServerEvent {
    fn from_wire(event: &WireEvent) -> Result<Self, EventError> {
        use TileBoardServerEvent::*;
        match event.name.as_str() {
            "cc-peel" => {
                let PeelPayload { peeling_player } = event.parse_payload()?;
                Ok(Peeled { peeling_player })
            }
            "cc-unsuccessful_peel" => {
                let UnsuccessfulPeelPayload { invalid_positions } = event.parse_payload()?;
                Ok(PeelRejected { invalid_positions })
            }
            "cc-request_update" => {
                let RequestUpdatePayload { message } = event.parse_payload()?;
                Ok(UpdateRequested { message })
            }
            "cc-board_update" => Ok(BoardUpdated(event.parse_payload()?)),
            "cc-game_over" => {
                let TileBoardGameOverPayload { winning_player } = event.parse_payload()?;
                Ok(GameOver { winning_player })
            }
            _ => Err(EventError::UnknownEvent(event.name.clone())),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TileBoardClientEvent {
    Join,
    Peel,
    UpdateRequest,
    RemoveTile { board_position: BoardPosition },
    AddTile { hand_tile_index: usize, board_position: BoardPosition },
    ShiftBoard { direction: ShiftDirection },
    Exchange { hand_tile_index: usize },
    StartGame,
}

impl ClientEvent for TileBoardClientEvent {
    fn to_wire(&self, room: &str) -> WireEvent {
        use TileBoardClientEvent::*;
        let (name, payload) = match self {
            Join => ("cc-join", json!({})),
            Peel => ("cc-peel", json!({})),
            UpdateRequest => ("cc-update_request", json!({})),
            RemoveTile { board_position } => {
                ("cc-remove_tile", json!({ "board_position": board_position }))
            }
            AddTile { hand_tile_index, board_position } => (
                "cc-add_tile",
                json!({ "hand_tile_index": hand_tile_index, "board_position": board_position }),
            ),
            ShiftBoard { direction } => ("cc-shift_board", json!({ "direction": direction })),
            Exchange { hand_tile_index } => {
                ("cc-exchange", json!({ "hand_tile_index": hand_tile_index }))
            }
            StartGame => ("cc-start_game", json!({})),
        };
        WireEvent::new(name, with_room(room, payload))
    }
}


// ---------------------------------------------------------------------------------------------
// Team word-guessing game

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct WordTileState {
    pub word: String,
    pub hidden_value: TileOwner,
    pub guessed: bool,
}

// Either the full board (on join or mode change) or only the tiles touched by the last guess.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TeamGuessUpdate {
    pub tiles: Vec<WordTileState>,
    pub blue_team_tiles_remaining: u32,
    pub red_team_tiles_remaining: u32,
    pub current_team: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_team: Option<Team>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TeamGuessServerEvent {
    GameUpdated(TeamGuessUpdate),
    ReloadPage,
    Error { message: String },
}

#[derive(Deserialize)]
struct GameUpdatePayload {
    game_state: TeamGuessUpdate,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

impl ServerEvent for TeamGuessServerEvent {
    fn from_wire(event: &WireEvent) -> Result<Self, EventError> {
        use TeamGuessServerEvent::*;
        match event.name.as_str() {
            "game_update" => {
                let GameUpdatePayload { game_state } = event.parse_payload()?;
                Ok(GameUpdated(game_state))
            }
            "reload_page" => Ok(ReloadPage),
            "error" => {
                let ErrorPayload { message } = event.parse_payload()?;
                Ok(Error { message })
            }
            _ => Err(EventError::UnknownEvent(event.name.clone())),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TeamGuessClientEvent {
    Join,
    Guess { word: String },
    EndTurn,
    PlayerModeChange,
    NewGame,
}

impl ClientEvent for TeamGuessClientEvent {
    fn to_wire(&self, room: &str) -> WireEvent {
        use TeamGuessClientEvent::*;
        let (name, payload) = match self {
            Join => ("join", json!({})),
            Guess { word } => ("guess", json!({ "guess": word })),
            EndTurn => ("end_turn", json!({})),
            PlayerModeChange => ("player_mode_change", json!({})),
            NewGame => ("new_game", json!({})),
        };
        WireEvent::new(name, with_room(room, payload))
    }
}


// ---------------------------------------------------------------------------------------------
// Scrambled-word game

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GuessReply {
    pub valid: bool,
    pub guess: String,
    // Tile indices spelling the word; absent for invalid guesses.
    #[serde(default)]
    pub path: Option<Vec<usize>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ScrambledSnapshot {
    pub tiles: Vec<String>,
    // Absent when the server runs rounds without a timer.
    #[serde(default)]
    pub expire_time: Option<EpochMillis>,
    #[serde(default)]
    pub player_guesses: Vec<String>,
    // Absent when the server resets the board for the whole room.
    #[serde(default)]
    pub player_total_score: Option<u32>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RoundSummary {
    pub scored_words: Vec<String>,
    pub scored_word_values: Vec<u32>,
    // Number of players who found each scored word.
    pub scored_word_guessers: Vec<u32>,
    pub unscored_words: Vec<String>,
    pub total_score: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ScrambledServerEvent {
    GuessReplied(GuessReply),
    GameState(ScrambledSnapshot),
    GameOver(RoundSummary),
    PlayersUpdated { players: String },
}

#[derive(Deserialize)]
struct PlayersUpdatePayload {
    players: String,
}

impl ServerEvent for ScrambledServerEvent {
    fn from_wire(event: &WireEvent) -> Result<Self, EventError> {
        use ScrambledServerEvent::*;
        match event.name.as_str() {
            "guess_reply" => Ok(GuessReplied(event.parse_payload()?)),
            "game_state" => Ok(GameState(event.parse_payload()?)),
            "game_over" => Ok(GameOver(event.parse_payload()?)),
            "players_update" => {
                let PlayersUpdatePayload { players } = event.parse_payload()?;
                Ok(PlayersUpdated { players })
            }
            _ => Err(EventError::UnknownEvent(event.name.clone())),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ScrambledClientEvent {
    Join,
    Guess { guess: String },
    TimerExpired,
    NewGame,
}

impl ClientEvent for ScrambledClientEvent {
    fn to_wire(&self, room: &str) -> WireEvent {
        use ScrambledClientEvent::*;
        let (name, payload) = match self {
            Join => ("join", json!({})),
            Guess { guess } => ("guess", json!({ "guess": guess })),
            TimerExpired => ("timer_expired", json!({})),
            NewGame => ("new_game", json!({})),
        };
        WireEvent::new(name, with_room(room, payload))
    }
}
